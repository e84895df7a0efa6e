// Author: Dustin Pilgrim
// License: MIT

use std::time::Duration;

use crate::core::{
    info::InfoSnapshot,
    state::{Phase, State},
    utils::format_duration,
};

use super::Watchdog;

fn secs_until(target_ms: u64, now_ms: u64) -> u64 {
    target_ms.saturating_sub(now_ms).div_ceil(1000)
}

impl Watchdog {
    pub fn snapshot(&self, state: &State, now_ms: u64) -> InfoSnapshot {
        let phase = state.phase();
        let live = phase.is_live();

        let deadlines = state.deadlines().filter(|_| live);
        let seconds_until_warning = deadlines
            .filter(|_| phase == Phase::Active)
            .map(|d| secs_until(d.warn_at_ms, now_ms));
        let seconds_until_logout = deadlines.map(|d| secs_until(d.logout_at_ms, now_ms));
        let seconds_since_activity =
            live.then(|| now_ms.saturating_sub(state.last_activity_ms()) / 1000);

        let mut pretty = format!("Session: {}", phase.as_str());

        if let Some(secs) = seconds_until_warning {
            pretty.push_str(&format!(
                "\nWarning in: {}",
                format_duration(Duration::from_secs(secs))
            ));
        }
        if let Some(secs) = seconds_until_logout {
            pretty.push_str(&format!(
                "\nLogout in: {}",
                format_duration(Duration::from_secs(secs))
            ));
        }
        if let Some(secs) = seconds_since_activity {
            let kind = state
                .last_activity_kind()
                .map(|k| k.as_str())
                .unwrap_or("none");
            pretty.push_str(&format!(
                "\nLast activity: {} ago ({kind})",
                format_duration(Duration::from_secs(secs))
            ));
        }
        if let Some(at) = state.installed_at_ms().filter(|_| live) {
            pretty.push_str(&format!(
                "\nSession age: {}",
                format_duration(Duration::from_secs(now_ms.saturating_sub(at) / 1000))
            ));
        }
        if phase != Phase::Detached {
            pretty.push_str(&format!(
                "\nWarnings shown: {}\nExtensions: {}",
                state.warnings_shown(),
                state.extensions()
            ));
        }

        InfoSnapshot {
            phase,
            installed: phase != Phase::Detached,
            seconds_until_warning,
            seconds_until_logout,
            seconds_since_activity,
            last_activity: state.last_activity_kind(),
            warning_visible: state.warning_visible(),
            warnings_shown: state.warnings_shown(),
            extensions: state.extensions(),
            pretty_text: pretty,
        }
    }
}
