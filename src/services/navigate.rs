// Author: Dustin Pilgrim
// License: MIT

use futures::future::BoxFuture;

use crate::core::action::Location;
use crate::sinfo;

use super::{
    process::{escape_single_quotes, run_shell_command},
    ServiceError,
};

pub trait Navigator: Send + Sync + 'static {
    fn navigate<'a>(&'a self, location: &'a Location) -> BoxFuture<'a, Result<(), ServiceError>>;
}

/// Opens the target with an external command, e.g. `xdg-open`.
#[derive(Debug, Clone, Default)]
pub struct CommandNavigator {
    command: Option<String>,
    base_url: String,
}

impl CommandNavigator {
    pub fn new(command: Option<String>, base_url: Option<String>) -> Self {
        Self {
            command: command.filter(|c| !c.trim().is_empty()),
            base_url: base_url
                .map(|u| u.trim_end_matches('/').to_string())
                .unwrap_or_default(),
        }
    }

    pub fn target(&self, location: &Location) -> String {
        format!("{}{}", self.base_url, location)
    }
}

impl Navigator for CommandNavigator {
    fn navigate<'a>(&'a self, location: &'a Location) -> BoxFuture<'a, Result<(), ServiceError>> {
        Box::pin(async move {
            let target = self.target(location);
            match &self.command {
                Some(cmd) => {
                    sinfo!("Navigate", "{} -> {}", cmd, target);
                    run_shell_command(&format!("{} '{}'", cmd, escape_single_quotes(&target))).await
                }
                None => {
                    sinfo!("Navigate", "redirect to {}", target);
                    Ok(())
                }
            }
        })
    }
}
