// Author: Dustin Pilgrim
// License: MIT

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "vigil",
    version = env!("CARGO_PKG_VERSION"),
    about = "Vigil session inactivity watchdog"
)]
pub struct Args {
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[arg(short, long, action)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    #[command(about = "Stay logged in: restart the inactivity budget")]
    Extend,

    #[command(about = "Report user activity (default: key-down)")]
    Activity {
        /// pointer-move, pointer-down, key-down or touch-start
        kind: Option<String>,
    },

    #[command(about = "Start watching a new authenticated session")]
    Install,

    #[command(about = "Stop watching without signing out")]
    Uninstall,

    #[command(about = "Display current session information")]
    Info {
        #[arg(long)]
        json: bool,
    },

    #[command(about = "Stop the running vigil daemon")]
    Stop,
}

impl Command {
    /// Wire form of the command on the control socket.
    pub fn to_ipc(&self) -> String {
        match self {
            Command::Extend => "extend".to_string(),
            Command::Activity { kind: Some(kind) } => format!("activity {kind}"),
            Command::Activity { kind: None } => "activity".to_string(),
            Command::Install => "install".to_string(),
            Command::Uninstall => "uninstall".to_string(),
            Command::Info { json: true } => "info --json".to_string(),
            Command::Info { json: false } => "info".to_string(),
            Command::Stop => "stop".to_string(),
        }
    }
}
