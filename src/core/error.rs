// Author: Dustin Pilgrim
// License: MIT

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The watchdog configuration is unusable.
    ///
    /// Examples:
    /// - warning threshold at or after the inactivity timeout
    /// - empty login path
    InvalidConfig(ConfigError),

    /// An event was rejected because it is invalid in the current state.
    ///
    /// Examples:
    /// - install while an instance is still live
    /// - extend after the session expired
    /// - sign-out settled without a sign-out in flight
    InvalidState(StateError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// One of the timeouts is zero.
    ZeroTimeout,

    /// The warning would fire at or after expiry.
    WarningNotBeforeExpiry { warning_ms: u64, inactivity_ms: u64 },

    /// Login path is empty or not absolute.
    InvalidLoginPath(String),

    /// Expiry marker query key is empty.
    EmptyExpiryMarker,

    /// No activity kind would ever reset the timers.
    NoActivityKinds,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateError {
    AlreadyInstalled,
    NotInstalled,
    SessionExpired,
    NoSignOutPending,
}

// ---------------- Display ----------------

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidConfig(e) => write!(f, "{e}"),
            Error::InvalidState(e) => write!(f, "{e}"),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ZeroTimeout =>
                write!(f, "timeouts must be greater than zero"),
            ConfigError::WarningNotBeforeExpiry { warning_ms, inactivity_ms } =>
                write!(
                    f,
                    "warning timeout ({warning_ms}ms) must be shorter than inactivity timeout ({inactivity_ms}ms)"
                ),
            ConfigError::InvalidLoginPath(p) =>
                write!(f, "invalid login path '{p}' (must start with '/')"),
            ConfigError::EmptyExpiryMarker =>
                write!(f, "expiry marker must not be empty"),
            ConfigError::NoActivityKinds =>
                write!(f, "no activity events enabled"),
        }
    }
}

impl fmt::Display for StateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StateError::AlreadyInstalled =>
                write!(f, "watchdog already installed"),
            StateError::NotInstalled =>
                write!(f, "watchdog not installed"),
            StateError::SessionExpired =>
                write!(f, "session already expired"),
            StateError::NoSignOutPending =>
                write!(f, "no sign-out in flight"),
        }
    }
}

impl std::error::Error for Error {}
