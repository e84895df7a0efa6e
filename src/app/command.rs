// Author: Dustin Pilgrim
// License: MIT

use crate::cli::{Args, Command};

use super::AnyError;

const NOT_RUNNING_JSON: &str =
    r#"{"phase":"not_running","installed":false,"seconds_until_warning":null,"seconds_until_logout":null}"#;

fn fallback_message(cmd: &Command) -> &'static str {
    match cmd {
        Command::Extend => "Session extended",
        Command::Activity { .. } => "Activity recorded",
        Command::Install => "Session watchdog installed",
        Command::Uninstall => "Session watchdog uninstalled",
        Command::Info { .. } => "",
        Command::Stop => "Stopping vigil daemon",
    }
}

pub async fn run(args: Args) -> Result<(), AnyError> {
    let Some(cmd) = args.command.as_ref() else {
        return Ok(());
    };

    match crate::ipc::client::send_raw(&cmd.to_ipc()).await {
        Ok(resp) => {
            let out = resp.trim_end();
            if out.starts_with("ERROR:") {
                eprintln!("vigil: {}", out.trim_start_matches("ERROR:").trim());
            } else if out.is_empty() {
                let msg = fallback_message(cmd);
                if !msg.is_empty() {
                    println!("{msg}");
                }
            } else {
                println!("{out}");
            }
        }
        Err(e) => {
            if matches!(cmd, Command::Info { json: true }) {
                // Scripts reading `info --json` still get valid JSON.
                println!("{NOT_RUNNING_JSON}");
            } else {
                eprintln!("vigil: {e}");
            }
        }
    }

    Ok(())
}
