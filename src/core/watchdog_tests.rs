// Author: Dustin Pilgrim
// License: MIT

use crate::core::action::{Action, Location};
use crate::core::config::WatchdogConfig;
use crate::core::error::{Error, StateError};
use crate::core::events::{ActivityKind, Event, SignOutOutcome};
use crate::core::state::{Phase, State};
use crate::core::watchdog::Watchdog;

const WARN: u64 = 540_000;
const EXPIRE: u64 = 600_000;

fn installed_at(now_ms: u64) -> (Watchdog, State) {
    let mut wd = Watchdog::new(WatchdogConfig::default()).unwrap();
    let mut state = State::new();
    let actions = wd
        .handle_event(&mut state, Event::Installed { now_ms })
        .unwrap();
    assert!(actions.is_empty());
    (wd, state)
}

fn tick(wd: &mut Watchdog, state: &mut State, now_ms: u64) -> Vec<Action> {
    wd.handle_event(state, Event::Tick { now_ms }).unwrap()
}

fn activity(wd: &mut Watchdog, state: &mut State, now_ms: u64) -> Vec<Action> {
    wd.handle_event(
        state,
        Event::UserActivity {
            kind: ActivityKind::PointerMove,
            now_ms,
        },
    )
    .unwrap()
}

fn is_warning(actions: &[Action]) -> bool {
    matches!(actions, [Action::ShowWarning { .. }])
}

fn expiry_target() -> Location {
    Location::new("/login").with_param("sessionExpired", "true")
}

#[test]
fn activity_spaced_under_warning_threshold_never_warns() {
    let (mut wd, mut state) = installed_at(0);

    let mut now = 0;
    for _ in 0..20 {
        now += WARN - 1;
        assert!(tick(&mut wd, &mut state, now).is_empty());
        assert!(activity(&mut wd, &mut state, now).is_empty());
    }

    assert_eq!(state.phase(), Phase::Active);
    assert_eq!(state.warnings_shown(), 0);
}

#[test]
fn warning_fires_exactly_once_at_threshold() {
    let (mut wd, mut state) = installed_at(0);

    assert!(tick(&mut wd, &mut state, WARN - 1).is_empty());

    let actions = tick(&mut wd, &mut state, WARN);
    assert!(is_warning(&actions));
    assert_eq!(state.phase(), Phase::Warned);

    assert!(tick(&mut wd, &mut state, WARN + 1).is_empty());
    assert!(tick(&mut wd, &mut state, EXPIRE - 1).is_empty());
    assert_eq!(state.warnings_shown(), 1);
}

#[test]
fn warning_notice_carries_remaining_window_and_affordance() {
    let (mut wd, mut state) = installed_at(0);

    let actions = tick(&mut wd, &mut state, WARN);
    match actions.as_slice() {
        [Action::ShowWarning { notice }] => {
            assert_eq!(notice.title, "Session Expiry Warning");
            assert_eq!(notice.timeout_ms, 60_000);
            assert_eq!(notice.action_label, "Stay Logged In");
            assert!(notice.body.contains("1 minute"));
        }
        other => panic!("unexpected actions: {other:?}"),
    }
}

#[test]
fn expiry_signs_out_once_then_navigates_once() {
    let (mut wd, mut state) = installed_at(0);

    tick(&mut wd, &mut state, WARN);

    let actions = tick(&mut wd, &mut state, EXPIRE);
    assert_eq!(actions, vec![Action::DismissWarning, Action::SignOut]);
    assert_eq!(state.phase(), Phase::Expired);
    assert_eq!(wd.next_deadline_ms(&state), None);

    // No second sign-out from later ticks.
    assert!(tick(&mut wd, &mut state, EXPIRE + 10_000).is_empty());

    let actions = wd
        .handle_event(
            &mut state,
            Event::SignOutSettled {
                outcome: SignOutOutcome::Completed,
                now_ms: EXPIRE + 20,
            },
        )
        .unwrap();
    assert_eq!(actions, vec![Action::Navigate { location: expiry_target() }]);

    let again = wd.handle_event(
        &mut state,
        Event::SignOutSettled {
            outcome: SignOutOutcome::Completed,
            now_ms: EXPIRE + 30,
        },
    );
    assert_eq!(again, Err(Error::InvalidState(StateError::NoSignOutPending)));
}

#[test]
fn failed_sign_out_still_navigates_with_marker() {
    let (mut wd, mut state) = installed_at(0);
    tick(&mut wd, &mut state, WARN);
    tick(&mut wd, &mut state, EXPIRE);

    let actions = wd
        .handle_event(
            &mut state,
            Event::SignOutSettled {
                outcome: SignOutOutcome::Failed {
                    reason: "provider unreachable".to_string(),
                },
                now_ms: EXPIRE + 5,
            },
        )
        .unwrap();

    match actions.as_slice() {
        [Action::Navigate { location }] => {
            assert_eq!(location.to_string(), "/login?sessionExpired=true");
        }
        other => panic!("unexpected actions: {other:?}"),
    }
}

#[test]
fn extend_while_warned_dismisses_and_restarts_full_budget() {
    let (mut wd, mut state) = installed_at(0);
    tick(&mut wd, &mut state, WARN);

    let extend_at = WARN + 30_000;
    let actions = wd
        .handle_event(&mut state, Event::ExtendSession { now_ms: extend_at })
        .unwrap();
    assert_eq!(actions, vec![Action::DismissWarning]);
    assert_eq!(state.phase(), Phase::Active);
    assert_eq!(state.extensions(), 1);

    // Old expiry instant passes quietly.
    assert!(tick(&mut wd, &mut state, EXPIRE).is_empty());
    assert!(tick(&mut wd, &mut state, extend_at + WARN - 1).is_empty());
    assert!(is_warning(&tick(&mut wd, &mut state, extend_at + WARN)));
    assert!(tick(&mut wd, &mut state, extend_at + EXPIRE - 1).is_empty());
    assert_eq!(
        tick(&mut wd, &mut state, extend_at + EXPIRE),
        vec![Action::DismissWarning, Action::SignOut]
    );
}

#[test]
fn activity_while_warned_returns_to_active() {
    let (mut wd, mut state) = installed_at(0);
    tick(&mut wd, &mut state, WARN);

    let actions = activity(&mut wd, &mut state, WARN + 1_000);
    assert_eq!(actions, vec![Action::DismissWarning]);
    assert_eq!(state.phase(), Phase::Active);
    assert_eq!(wd.next_deadline_ms(&state), Some(WARN + 1_000 + WARN));
}

#[test]
fn reset_at_300s_moves_warning_and_logout() {
    let (mut wd, mut state) = installed_at(0);

    activity(&mut wd, &mut state, 300_000);

    // Without the reset logout would have happened here.
    assert!(tick(&mut wd, &mut state, 600_000).is_empty());
    assert!(tick(&mut wd, &mut state, 839_999).is_empty());
    assert!(is_warning(&tick(&mut wd, &mut state, 840_000)));
    assert!(tick(&mut wd, &mut state, 899_999).is_empty());
    assert_eq!(
        tick(&mut wd, &mut state, 900_000),
        vec![Action::DismissWarning, Action::SignOut]
    );
}

#[test]
fn uninstall_stops_all_firing() {
    let (mut wd, mut state) = installed_at(0);
    tick(&mut wd, &mut state, WARN);

    let actions = wd
        .handle_event(&mut state, Event::Uninstalled { now_ms: WARN + 1 })
        .unwrap();
    assert_eq!(actions, vec![Action::DismissWarning]);
    assert_eq!(state.phase(), Phase::Detached);
    assert_eq!(wd.next_deadline_ms(&state), None);

    assert!(tick(&mut wd, &mut state, EXPIRE).is_empty());
    assert!(tick(&mut wd, &mut state, EXPIRE * 10).is_empty());
    assert!(activity(&mut wd, &mut state, EXPIRE * 10).is_empty());
}

#[test]
fn uninstall_while_active_emits_nothing() {
    let (mut wd, mut state) = installed_at(0);
    let actions = wd
        .handle_event(&mut state, Event::Uninstalled { now_ms: 10 })
        .unwrap();
    assert!(actions.is_empty());
}

#[test]
fn double_install_is_rejected() {
    let (mut wd, mut state) = installed_at(0);
    let res = wd.handle_event(&mut state, Event::Installed { now_ms: 5 });
    assert_eq!(res, Err(Error::InvalidState(StateError::AlreadyInstalled)));

    // Original deadlines untouched.
    assert_eq!(wd.next_deadline_ms(&state), Some(WARN));
}

#[test]
fn extend_outside_live_session_is_rejected() {
    let mut wd = Watchdog::new(WatchdogConfig::default()).unwrap();
    let mut state = State::new();

    let res = wd.handle_event(&mut state, Event::ExtendSession { now_ms: 0 });
    assert_eq!(res, Err(Error::InvalidState(StateError::NotInstalled)));

    wd.handle_event(&mut state, Event::Installed { now_ms: 0 }).unwrap();
    tick(&mut wd, &mut state, EXPIRE);
    let res = wd.handle_event(&mut state, Event::ExtendSession { now_ms: EXPIRE + 1 });
    assert_eq!(res, Err(Error::InvalidState(StateError::SessionExpired)));
}

#[test]
fn late_tick_past_both_deadlines_expires_without_warning() {
    let (mut wd, mut state) = installed_at(0);
    let actions = tick(&mut wd, &mut state, EXPIRE + 3_600_000);
    assert_eq!(actions, vec![Action::SignOut]);
    assert_eq!(state.warnings_shown(), 0);
}

#[test]
fn reinstall_after_expiry_requires_teardown() {
    let (mut wd, mut state) = installed_at(0);
    tick(&mut wd, &mut state, EXPIRE);
    wd.handle_event(
        &mut state,
        Event::SignOutSettled {
            outcome: SignOutOutcome::Completed,
            now_ms: EXPIRE,
        },
    )
    .unwrap();

    let res = wd.handle_event(&mut state, Event::Installed { now_ms: EXPIRE + 1 });
    assert_eq!(res, Err(Error::InvalidState(StateError::AlreadyInstalled)));

    wd.handle_event(&mut state, Event::Uninstalled { now_ms: EXPIRE + 1 })
        .unwrap();
    wd.handle_event(&mut state, Event::Installed { now_ms: EXPIRE + 2 })
        .unwrap();
    assert_eq!(state.phase(), Phase::Active);
    assert_eq!(wd.next_deadline_ms(&state), Some(EXPIRE + 2 + WARN));
}

#[test]
fn disabled_activity_kind_does_not_reset() {
    let cfg = WatchdogConfig {
        activity_kinds: vec![ActivityKind::KeyDown],
        ..WatchdogConfig::default()
    };
    let mut wd = Watchdog::new(cfg).unwrap();
    let mut state = State::new();
    wd.handle_event(&mut state, Event::Installed { now_ms: 0 }).unwrap();

    activity(&mut wd, &mut state, 100_000);
    assert_eq!(wd.next_deadline_ms(&state), Some(WARN));

    wd.handle_event(
        &mut state,
        Event::UserActivity {
            kind: ActivityKind::KeyDown,
            now_ms: 100_000,
        },
    )
    .unwrap();
    assert_eq!(wd.next_deadline_ms(&state), Some(100_000 + WARN));
    assert_eq!(state.last_activity_kind(), Some(ActivityKind::KeyDown));
}

#[test]
fn snapshot_reports_countdowns() {
    let (mut wd, mut state) = installed_at(0);

    let snap = wd.snapshot(&state, 40_000);
    assert_eq!(snap.phase, Phase::Active);
    assert_eq!(snap.seconds_until_warning, Some(500));
    assert_eq!(snap.seconds_until_logout, Some(560));

    tick(&mut wd, &mut state, WARN);
    let snap = wd.snapshot(&state, WARN + 15_000);
    assert_eq!(snap.phase, Phase::Warned);
    assert!(snap.warning_visible);
    assert_eq!(snap.seconds_until_warning, None);
    assert_eq!(snap.seconds_until_logout, Some(45));
    assert!(snap.pretty_text.contains("Session: warned"));
}

#[test]
fn invalid_config_is_rejected_at_construction() {
    let cfg = WatchdogConfig {
        warning_timeout_ms: EXPIRE + 1,
        ..WatchdogConfig::default()
    };
    assert!(matches!(Watchdog::new(cfg), Err(Error::InvalidConfig(_))));
}
