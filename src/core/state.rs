// Author: Dustin Pilgrim
// License: MIT

use serde::Serialize;

use crate::core::config::WatchdogConfig;
use crate::core::events::ActivityKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// No instance installed (outside the authenticated area).
    Detached,
    /// Installed, no warning shown.
    Active,
    /// Warning visible, countdown to expiry running.
    Warned,
    /// Terminal for this instance; sign-out issued.
    Expired,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Detached => "detached",
            Phase::Active => "active",
            Phase::Warned => "warned",
            Phase::Expired => "expired",
        }
    }

    pub fn is_live(&self) -> bool {
        matches!(self, Phase::Active | Phase::Warned)
    }
}

/// The single pending warn/logout pair, both measured from the same activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadlines {
    pub warn_at_ms: u64,
    pub logout_at_ms: u64,
}

impl Deadlines {
    pub fn from_activity(now_ms: u64, cfg: &WatchdogConfig) -> Self {
        Self {
            warn_at_ms: now_ms.saturating_add(cfg.warning_timeout_ms),
            logout_at_ms: now_ms.saturating_add(cfg.inactivity_timeout_ms),
        }
    }
}

#[derive(Debug, Clone)]
pub struct State {
    phase: Phase,

    // Timing (ms on the runtime's monotonic clock)
    installed_at_ms: Option<u64>,
    last_activity_ms: u64,
    last_activity_kind: Option<ActivityKind>,

    // At most one pending pair; replaced wholesale on reset.
    deadlines: Option<Deadlines>,

    warning_visible: bool,
    sign_out_pending: bool,

    // Per-instance counters
    warnings_shown: u64,
    extensions: u64,
}

impl State {
    pub fn new() -> Self {
        Self {
            phase: Phase::Detached,
            installed_at_ms: None,
            last_activity_ms: 0,
            last_activity_kind: None,
            deadlines: None,
            warning_visible: false,
            sign_out_pending: false,
            warnings_shown: 0,
            extensions: 0,
        }
    }

    // ---------------- getters ----------------

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn installed_at_ms(&self) -> Option<u64> {
        self.installed_at_ms
    }

    pub fn last_activity_ms(&self) -> u64 {
        self.last_activity_ms
    }

    pub fn last_activity_kind(&self) -> Option<ActivityKind> {
        self.last_activity_kind
    }

    pub fn deadlines(&self) -> Option<Deadlines> {
        self.deadlines
    }

    pub fn warning_visible(&self) -> bool {
        self.warning_visible
    }

    pub fn sign_out_pending(&self) -> bool {
        self.sign_out_pending
    }

    pub fn warnings_shown(&self) -> u64 {
        self.warnings_shown
    }

    pub fn extensions(&self) -> u64 {
        self.extensions
    }

    // ---------------- transitions ----------------

    /// Fresh instance: counters cleared, deadlines armed from `now_ms`.
    pub fn begin(&mut self, now_ms: u64, cfg: &WatchdogConfig) {
        *self = State::new();
        self.installed_at_ms = Some(now_ms);
        self.rearm(now_ms, cfg);
    }

    /// Replace the deadline pair with one measured from `now_ms` and drop back to Active.
    pub fn rearm(&mut self, now_ms: u64, cfg: &WatchdogConfig) {
        self.phase = Phase::Active;
        self.last_activity_ms = now_ms;
        self.deadlines = Some(Deadlines::from_activity(now_ms, cfg));
        self.warning_visible = false;
    }

    pub fn record_activity(&mut self, kind: ActivityKind) {
        self.last_activity_kind = Some(kind);
    }

    pub fn record_extension(&mut self) {
        self.extensions = self.extensions.saturating_add(1);
    }

    pub fn enter_warned(&mut self) {
        self.phase = Phase::Warned;
        self.warning_visible = true;
        self.warnings_shown = self.warnings_shown.saturating_add(1);
    }

    /// Terminal for this instance: no deadlines, sign-out in flight.
    pub fn expire(&mut self) {
        self.phase = Phase::Expired;
        self.deadlines = None;
        self.warning_visible = false;
        self.sign_out_pending = true;
    }

    pub fn settle_sign_out(&mut self) {
        self.sign_out_pending = false;
    }

    pub fn detach(&mut self) {
        self.phase = Phase::Detached;
        self.deadlines = None;
        self.warning_visible = false;
        self.sign_out_pending = false;
        self.installed_at_ms = None;
    }
}

impl Default for State {
    fn default() -> Self {
        State::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rearm_replaces_the_pair() {
        let cfg = WatchdogConfig::default();
        let mut s = State::new();
        s.begin(0, &cfg);
        assert_eq!(
            s.deadlines(),
            Some(Deadlines { warn_at_ms: 540_000, logout_at_ms: 600_000 })
        );

        s.enter_warned();
        s.rearm(300_000, &cfg);
        assert_eq!(s.phase(), Phase::Active);
        assert!(!s.warning_visible());
        assert_eq!(
            s.deadlines(),
            Some(Deadlines { warn_at_ms: 840_000, logout_at_ms: 900_000 })
        );
    }

    #[test]
    fn begin_clears_previous_instance() {
        let cfg = WatchdogConfig::default();
        let mut s = State::new();
        s.begin(0, &cfg);
        s.enter_warned();
        s.record_extension();
        s.expire();

        s.begin(5_000, &cfg);
        assert_eq!(s.phase(), Phase::Active);
        assert_eq!(s.warnings_shown(), 0);
        assert_eq!(s.extensions(), 0);
        assert!(!s.sign_out_pending());
        assert_eq!(s.installed_at_ms(), Some(5_000));
    }
}
