// Author: Dustin Pilgrim
// License: MIT

use serde::Serialize;

use crate::core::{events::ActivityKind, state::Phase};

/// Snapshot returned from the daemon for `vigil info`.
///
/// - the serialized fields are the JSON contract of `vigil info --json`.
/// - `pretty_text` is CLI-facing output for `vigil info`.
#[derive(Debug, Clone, Serialize)]
pub struct InfoSnapshot {
    pub phase: Phase,
    pub installed: bool,
    pub seconds_until_warning: Option<u64>,
    pub seconds_until_logout: Option<u64>,
    pub seconds_since_activity: Option<u64>,
    pub last_activity: Option<ActivityKind>,
    pub warning_visible: bool,
    pub warnings_shown: u64,
    pub extensions: u64,

    #[serde(skip_serializing)]
    pub pretty_text: String,
}
