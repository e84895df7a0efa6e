// Author: Dustin Pilgrim
// License: MIT

use crate::core::{
    error::ConfigError,
    events::ActivityKind,
    utils::format_window,
};

/// Total time since last activity after which the session is terminated.
pub const INACTIVITY_TIMEOUT_MS: u64 = 10 * 60 * 1000;
/// Time since last activity after which the expiry warning is shown.
pub const WARNING_TIMEOUT_MS: u64 = 9 * 60 * 1000;

pub const DEFAULT_LOGIN_PATH: &str = "/login";
pub const DEFAULT_EXPIRY_MARKER: &str = "sessionExpired";
pub const DEFAULT_WARNING_TITLE: &str = "Session Expiry Warning";
pub const DEFAULT_STAY_LABEL: &str = "Stay Logged In";
pub const DEFAULT_SIGN_OUT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_INPUT_SEAT: &str = "seat0";

/// Semantics of the watchdog state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchdogConfig {
    pub inactivity_timeout_ms: u64,
    pub warning_timeout_ms: u64,

    pub login_path: String,
    pub expiry_marker: String,

    pub warning_title: String,
    /// `None` renders "You will be logged out due to inactivity in <window>."
    pub warning_body: Option<String>,
    pub stay_label: String,

    pub activity_kinds: Vec<ActivityKind>,
}

impl Default for WatchdogConfig {
    fn default() -> Self {
        Self {
            inactivity_timeout_ms: INACTIVITY_TIMEOUT_MS,
            warning_timeout_ms: WARNING_TIMEOUT_MS,
            login_path: DEFAULT_LOGIN_PATH.to_string(),
            expiry_marker: DEFAULT_EXPIRY_MARKER.to_string(),
            warning_title: DEFAULT_WARNING_TITLE.to_string(),
            warning_body: None,
            stay_label: DEFAULT_STAY_LABEL.to_string(),
            activity_kinds: ActivityKind::ALL.to_vec(),
        }
    }
}

impl WatchdogConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.inactivity_timeout_ms == 0 || self.warning_timeout_ms == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        if self.warning_timeout_ms >= self.inactivity_timeout_ms {
            return Err(ConfigError::WarningNotBeforeExpiry {
                warning_ms: self.warning_timeout_ms,
                inactivity_ms: self.inactivity_timeout_ms,
            });
        }
        if !self.login_path.starts_with('/') {
            return Err(ConfigError::InvalidLoginPath(self.login_path.clone()));
        }
        if self.expiry_marker.trim().is_empty() {
            return Err(ConfigError::EmptyExpiryMarker);
        }
        if self.activity_kinds.is_empty() {
            return Err(ConfigError::NoActivityKinds);
        }
        Ok(())
    }

    /// Trailing part of the inactivity budget during which the warning is up.
    pub fn warning_window_ms(&self) -> u64 {
        self.inactivity_timeout_ms.saturating_sub(self.warning_timeout_ms)
    }

    pub fn counts_as_activity(&self, kind: ActivityKind) -> bool {
        self.activity_kinds.contains(&kind)
    }

    pub fn warning_body_text(&self) -> String {
        match &self.warning_body {
            Some(body) => body.clone(),
            None => format!(
                "You will be logged out due to inactivity in {}.",
                format_window(self.warning_window_ms())
            ),
        }
    }
}

/// Settings that only matter to the daemon around the state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    pub sign_out_command: Option<String>,
    pub sign_out_timeout_secs: u64,
    pub navigate_command: Option<String>,
    pub base_url: Option<String>,
    pub install_on_start: bool,
    pub exit_on_expiry: bool,
    pub input_seat: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            sign_out_command: None,
            sign_out_timeout_secs: DEFAULT_SIGN_OUT_TIMEOUT_SECS,
            navigate_command: None,
            base_url: None,
            install_on_start: true,
            exit_on_expiry: false,
            input_seat: DEFAULT_INPUT_SEAT.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigFile {
    pub watchdog: WatchdogConfig,
    pub runtime: RuntimeConfig,
}
