// Author: Dustin Pilgrim
// License: MIT

use serde::Serialize;

/// Input signals that count as "the user is present".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ActivityKind {
    PointerMove,
    PointerDown,
    KeyDown,
    TouchStart,
}

impl ActivityKind {
    pub const ALL: [ActivityKind; 4] = [
        ActivityKind::PointerMove,
        ActivityKind::PointerDown,
        ActivityKind::KeyDown,
        ActivityKind::TouchStart,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityKind::PointerMove => "pointer-move",
            ActivityKind::PointerDown => "pointer-down",
            ActivityKind::KeyDown => "key-down",
            ActivityKind::TouchStart => "touch-start",
        }
    }

    /// Accepts kebab-case, snake_case and the DOM event names.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "pointer-move" | "pointermove" | "mousemove" => Some(ActivityKind::PointerMove),
            "pointer-down" | "pointerdown" | "mousedown" => Some(ActivityKind::PointerDown),
            "key-down" | "keydown" => Some(ActivityKind::KeyDown),
            "touch-start" | "touchstart" => Some(ActivityKind::TouchStart),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignOutOutcome {
    Completed,
    Failed { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// The authenticated area was entered; start a fresh instance.
    Installed {
        now_ms: u64,
    },

    /// The authenticated area was left without an expiry.
    Uninstalled {
        now_ms: u64,
    },

    UserActivity {
        kind: ActivityKind,
        now_ms: u64,
    },

    /// "Stay logged in" was chosen.
    ExtendSession {
        now_ms: u64,
    },

    /// A scheduled deadline may have been reached.
    Tick {
        now_ms: u64,
    },

    /// The auth provider's sign-out call finished, successfully or not.
    SignOutSettled {
        outcome: SignOutOutcome,
        now_ms: u64,
    },
}

impl Event {
    pub fn now_ms(&self) -> u64 {
        match self {
            Event::Installed { now_ms }
            | Event::Uninstalled { now_ms }
            | Event::UserActivity { now_ms, .. }
            | Event::ExtendSession { now_ms }
            | Event::Tick { now_ms }
            | Event::SignOutSettled { now_ms, .. } => *now_ms,
        }
    }
}
