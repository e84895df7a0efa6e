// Author: Dustin Pilgrim
// License: MIT

use futures::future::BoxFuture;

use crate::{sdebug, sinfo};

use super::{process::run_shell_command, ServiceError};

/// The authentication provider, as far as the watchdog is concerned.
pub trait AuthProvider: Send + Sync + 'static {
    fn sign_out(&self) -> BoxFuture<'_, Result<(), ServiceError>>;
}

/// Signs out by running a shell command (e.g. a `curl` against the logout
/// endpoint). Without a command the sign-out is only logged.
#[derive(Debug, Clone, Default)]
pub struct CommandAuthProvider {
    command: Option<String>,
}

impl CommandAuthProvider {
    pub fn new(command: Option<String>) -> Self {
        Self {
            command: command.filter(|c| !c.trim().is_empty()),
        }
    }
}

impl AuthProvider for CommandAuthProvider {
    fn sign_out(&self) -> BoxFuture<'_, Result<(), ServiceError>> {
        Box::pin(async move {
            match &self.command {
                Some(cmd) => {
                    sinfo!("Auth", "sign-out: {}", cmd);
                    run_shell_command(cmd).await
                }
                None => {
                    sdebug!("Auth", "sign-out: no command configured");
                    Ok(())
                }
            }
        })
    }
}
