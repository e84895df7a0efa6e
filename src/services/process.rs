// Author: Dustin Pilgrim
// License: MIT

use std::process::Stdio;

use tokio::process::Command;

use super::ServiceError;

/// Run `command` through `sh -c` and wait for it; non-zero exit is an error.
pub async fn run_shell_command(command: &str) -> Result<(), ServiceError> {
    if command.trim().is_empty() {
        return Err(ServiceError::Command("empty command".to_string()));
    }

    let status = Command::new("sh")
        .arg("-c")
        .arg(command)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .kill_on_drop(true)
        .status()
        .await
        .map_err(|e| ServiceError::Command(format!("spawn '{command}': {e}")))?;

    if status.success() {
        Ok(())
    } else {
        Err(ServiceError::Command(format!("'{command}' exited with {status}")))
    }
}

pub fn escape_single_quotes(s: &str) -> String {
    s.replace('\'', r"'\''")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn exit_status_maps_to_result() {
        assert!(run_shell_command("true").await.is_ok());
        assert!(matches!(
            run_shell_command("exit 3").await,
            Err(ServiceError::Command(_))
        ));
    }

    #[tokio::test]
    async fn empty_command_is_rejected() {
        assert!(run_shell_command("   ").await.is_err());
    }

    #[test]
    fn quotes_are_escaped_for_sh() {
        assert_eq!(escape_single_quotes("it's"), r"it'\''s");
    }
}
