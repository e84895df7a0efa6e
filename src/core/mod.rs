// Author: Dustin Pilgrim
// License: MIT

pub mod action;
pub mod config;
pub mod error;
pub mod events;
pub mod info;
pub mod state;
pub mod utils;
pub mod watchdog;
pub mod watchdog_msg;

#[cfg(test)]
mod watchdog_tests;
