// Author: Dustin Pilgrim
// License: MIT

use crate::core::{
    action::{Action, Location, Notice},
    error::{Error, StateError},
    events::{Event, SignOutOutcome},
    state::{Phase, State},
};
use crate::{sdebug, sinfo, swarn};

use super::Watchdog;

impl Watchdog {
    pub fn handle_event(&mut self, state: &mut State, event: Event) -> Result<Vec<Action>, Error> {
        let now_ms = event.now_ms();
        let mut out = Vec::new();

        match event {
            Event::Installed { .. } => {
                if state.phase() != Phase::Detached {
                    return Err(Error::InvalidState(StateError::AlreadyInstalled));
                }
                state.begin(now_ms, &self.cfg);
                sinfo!("Watchdog", "installed; warning in {}ms, expiry in {}ms",
                    self.cfg.warning_timeout_ms, self.cfg.inactivity_timeout_ms);
            }

            Event::Uninstalled { .. } => {
                if state.phase() == Phase::Detached {
                    return Err(Error::InvalidState(StateError::NotInstalled));
                }
                if state.warning_visible() {
                    out.push(Action::DismissWarning);
                }
                state.detach();
                sinfo!("Watchdog", "uninstalled");
            }

            Event::UserActivity { kind, .. } => {
                if !state.phase().is_live() {
                    // Late input from a torn-down listener; nothing to reset.
                    sdebug!("Watchdog", "ignoring {} while {}", kind.as_str(), state.phase().as_str());
                    return Ok(out);
                }
                if !self.cfg.counts_as_activity(kind) {
                    return Ok(out);
                }
                state.record_activity(kind);
                out.extend(self.reset(state, now_ms));
            }

            Event::ExtendSession { .. } => match state.phase() {
                Phase::Active | Phase::Warned => {
                    state.record_extension();
                    out.extend(self.reset(state, now_ms));
                    sinfo!("Watchdog", "session extended");
                }
                Phase::Detached => return Err(Error::InvalidState(StateError::NotInstalled)),
                Phase::Expired => return Err(Error::InvalidState(StateError::SessionExpired)),
            },

            Event::Tick { .. } => {
                out.extend(self.fire_due(state, now_ms));
            }

            Event::SignOutSettled { outcome, .. } => {
                if !state.sign_out_pending() {
                    return Err(Error::InvalidState(StateError::NoSignOutPending));
                }
                state.settle_sign_out();

                if let SignOutOutcome::Failed { reason } = outcome {
                    swarn!("Watchdog", "sign-out failed ({reason}); treating session as ended");
                }

                out.push(Action::Navigate {
                    location: self.expiry_location(),
                });
            }
        }

        Ok(out)
    }

    /// Clear any visible warning and measure a new pair from `now_ms`.
    fn reset(&self, state: &mut State, now_ms: u64) -> Vec<Action> {
        let mut out = Vec::new();
        if state.warning_visible() {
            out.push(Action::DismissWarning);
        }
        state.rearm(now_ms, &self.cfg);
        out
    }

    fn fire_due(&self, state: &mut State, now_ms: u64) -> Vec<Action> {
        let mut out = Vec::new();
        let Some(d) = state.deadlines() else {
            return out;
        };

        match state.phase() {
            // A tick that arrives past both deadlines (e.g. after suspend)
            // expires straight away rather than warning about the past.
            Phase::Active | Phase::Warned if now_ms >= d.logout_at_ms => {
                if state.warning_visible() {
                    out.push(Action::DismissWarning);
                }
                state.expire();
                out.push(Action::SignOut);
                sinfo!("Watchdog", "inactivity timeout reached; signing out");
            }

            Phase::Active if now_ms >= d.warn_at_ms => {
                state.enter_warned();
                out.push(Action::ShowWarning {
                    notice: Notice {
                        title: self.cfg.warning_title.clone(),
                        body: self.cfg.warning_body_text(),
                        timeout_ms: d.logout_at_ms - now_ms,
                        action_label: self.cfg.stay_label.clone(),
                    },
                });
                sinfo!("Watchdog", "warning shown; expiry in {}ms", d.logout_at_ms - now_ms);
            }

            _ => {}
        }

        out
    }

    fn expiry_location(&self) -> Location {
        Location::new(self.cfg.login_path.clone()).with_param(self.cfg.expiry_marker.clone(), "true")
    }
}
