// Author: Dustin Pilgrim
// License: MIT

use std::fmt;

/// Handle returned by the notification surface for a shown notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NoticeId(pub u32);

impl fmt::Display for NoticeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Content of the expiry warning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub body: String,
    /// How long the notice should stay up (the remaining warning window).
    pub timeout_ms: u64,
    /// Label of the "stay logged in" affordance.
    pub action_label: String,
}

/// A client-side navigation target, e.g. `/login?sessionExpired=true`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub path: String,
    pub query: Vec<(String, String)>,
}

impl Location {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            query: Vec::new(),
        }
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path)?;
        for (i, (k, v)) in self.query.iter().enumerate() {
            let sep = if i == 0 { '?' } else { '&' };
            write!(f, "{sep}{k}={v}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Surface the expiry warning with its "stay logged in" affordance.
    ShowWarning { notice: Notice },

    /// Take down the currently visible warning, if the runtime still holds one.
    DismissWarning,

    /// Invoke the auth provider. The runtime must report back with
    /// `Event::SignOutSettled` once the call resolves or fails.
    SignOut,

    Navigate { location: Location },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn location_renders_query_in_order() {
        let loc = Location::new("/login")
            .with_param("sessionExpired", "true")
            .with_param("from", "dashboard");
        assert_eq!(loc.to_string(), "/login?sessionExpired=true&from=dashboard");
    }

    #[test]
    fn location_without_query_is_bare_path() {
        assert_eq!(Location::new("/login").to_string(), "/login");
    }
}
