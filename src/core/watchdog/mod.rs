// Author: Dustin Pilgrim
// License: MIT

mod engine;
mod snapshot;

use crate::core::{
    config::WatchdogConfig,
    error::Error,
    state::{Phase, State},
};

/// Pure inactivity watchdog. All time comes in through events; all side
/// effects leave as actions.
#[derive(Debug, Clone)]
pub struct Watchdog {
    cfg: WatchdogConfig,
}

impl Watchdog {
    pub fn new(cfg: WatchdogConfig) -> Result<Self, Error> {
        cfg.validate().map_err(Error::InvalidConfig)?;
        Ok(Self { cfg })
    }

    pub fn config(&self) -> &WatchdogConfig {
        &self.cfg
    }

    /// When the runtime must deliver the next `Tick`, if anything is pending.
    pub fn next_deadline_ms(&self, state: &State) -> Option<u64> {
        let d = state.deadlines()?;
        match state.phase() {
            Phase::Active => Some(d.warn_at_ms),
            Phase::Warned => Some(d.logout_at_ms),
            Phase::Detached | Phase::Expired => None,
        }
    }
}
