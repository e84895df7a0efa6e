// Author: Dustin Pilgrim
// License: MIT

pub mod auth;
pub mod input;
pub mod navigate;
pub mod notice;
pub mod process;

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// A configured shell command could not be spawned or exited non-zero.
    Command(String),
    /// Session bus call failed.
    Bus(String),
    /// libinput could not be opened or assigned to the seat.
    Input(String),
    Timeout,
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceError::Command(e) => write!(f, "command failed: {e}"),
            ServiceError::Bus(e) => write!(f, "d-bus: {e}"),
            ServiceError::Input(e) => write!(f, "input: {e}"),
            ServiceError::Timeout => write!(f, "timed out"),
        }
    }
}

impl std::error::Error for ServiceError {}

impl From<zbus::Error> for ServiceError {
    fn from(e: zbus::Error) -> Self {
        ServiceError::Bus(e.to_string())
    }
}
