// Author: Dustin Pilgrim
// License: MIT

use std::fmt::Arguments;
use std::fs::{OpenOptions, create_dir_all, metadata, rename};
use std::io::{IsTerminal, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, Once};

use chrono::Local;
use once_cell::sync::Lazy;

/// Maximum log file size in bytes before rotation (5 MiB)
const MAX_LOG_SIZE: u64 = 5 * 1024 * 1024;

#[derive(PartialEq, PartialOrd, Clone, Copy, Debug)]
pub enum LogLevel {
    Error = 1,
    Warn  = 2,
    Info  = 3,
    Debug = 4,
}

impl LogLevel {
    fn color(&self) -> &'static str {
        match self {
            LogLevel::Error => "\x1b[31m",
            LogLevel::Warn  => "\x1b[33m",
            LogLevel::Info  => "\x1b[36m",
            LogLevel::Debug => "\x1b[90m",
        }
    }

    fn short(&self) -> &'static str {
        match self {
            LogLevel::Error => "ERR",
            LogLevel::Warn  => "WRN",
            LogLevel::Info  => "INF",
            LogLevel::Debug => "DBG",
        }
    }
}

const RESET_COLOR: &str = "\x1b[0m";

pub struct Config {
    pub level: LogLevel,
    pub use_colors: bool,
    pub console: bool,
    pub file: Option<PathBuf>,
}

pub static GLOBAL_CONFIG: Lazy<Mutex<Config>> = Lazy::new(|| {
    Mutex::new(Config {
        level: LogLevel::Info,
        use_colors: std::io::stdout().is_terminal(),
        console: false,
        // File output is switched on by the daemon; clients and tests stay quiet.
        file: None,
    })
});

static SESSION_SEPARATOR: Once = Once::new();

/// Debug level plus console echo.
pub fn set_verbose(enabled: bool) {
    if let Ok(mut config) = GLOBAL_CONFIG.lock() {
        config.level = if enabled { LogLevel::Debug } else { LogLevel::Info };
        config.console = enabled;
    }
}

pub fn enable_file_output(path: PathBuf) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        create_dir_all(parent)?;
    }
    if let Ok(mut config) = GLOBAL_CONFIG.lock() {
        config.file = Some(path);
    }
    Ok(())
}

/// Core logging function
pub fn log_message(level: LogLevel, prefix: &str, args: Arguments) {
    let Ok(config) = GLOBAL_CONFIG.lock() else {
        return;
    };

    if level > config.level {
        return;
    }

    let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");
    let file_line = format!("[{}][{}][{}] {}", timestamp, level.short(), prefix, args);

    if let Some(path) = &config.file {
        if let Err(e) = write_line_to_log(path, &file_line) {
            eprintln!("Failed to write log: {}", e);
        }
    }

    // Errors always reach the terminal; everything else only in verbose mode.
    if config.console || level == LogLevel::Error {
        let console_line = if config.use_colors {
            format!("{}●{} [{}][{}] {}", level.color(), RESET_COLOR, timestamp, prefix, args)
        } else {
            file_line
        };
        match level {
            LogLevel::Error | LogLevel::Warn => eprintln!("{}", console_line),
            _ => println!("{}", console_line),
        }
    }
}

/// Flexible macro to allow formatted logging
#[macro_export]
macro_rules! slog {
    ($level:expr, $prefix:expr, $($arg:tt)*) => {
        $crate::log::log_message($level, $prefix, format_args!($($arg)*))
    };
}

/// Convenience macros
#[macro_export]
macro_rules! sinfo {
    ($prefix:expr, $($arg:tt)*) => { $crate::slog!($crate::log::LogLevel::Info, $prefix, $($arg)*) };
}

#[macro_export]
macro_rules! swarn {
    ($prefix:expr, $($arg:tt)*) => { $crate::slog!($crate::log::LogLevel::Warn, $prefix, $($arg)*) };
}

#[macro_export]
macro_rules! serror {
    ($prefix:expr, $($arg:tt)*) => { $crate::slog!($crate::log::LogLevel::Error, $prefix, $($arg)*) };
}

#[macro_export]
macro_rules! sdebug {
    ($prefix:expr, $($arg:tt)*) => { $crate::slog!($crate::log::LogLevel::Debug, $prefix, $($arg)*) };
}

/// Default log file path
pub fn log_path() -> PathBuf {
    let mut path = dirs::cache_dir().unwrap_or_else(|| PathBuf::from("/tmp"));
    path.push("vigil");
    path.push("vigil.log");
    path
}

/// Keep one previous generation as `<file>.1`.
fn rotate_log_if_needed(path: &Path) {
    if let Ok(meta) = metadata(path) {
        if meta.len() >= MAX_LOG_SIZE {
            let _ = rename(path, format!("{}.1", path.display()));
        }
    }
}

/// Blank line between daemon runs
fn ensure_session_newline_once(path: &Path) {
    SESSION_SEPARATOR.call_once(|| {
        if let Ok(meta) = metadata(path) {
            if meta.len() > 0 {
                if let Ok(mut file) = OpenOptions::new().append(true).open(path) {
                    let _ = writeln!(file);
                }
            }
        }
    });
}

fn write_line_to_log(path: &Path, line: &str) -> std::io::Result<()> {
    rotate_log_if_needed(path);
    ensure_session_newline_once(path);

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?;

    writeln!(file, "{}", line)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_order_by_verbosity() {
        assert!(LogLevel::Error < LogLevel::Warn);
        assert!(LogLevel::Info < LogLevel::Debug);
    }

    #[test]
    fn log_path_lives_under_vigil() {
        let p = log_path();
        assert!(p.ends_with("vigil/vigil.log"));
    }
}
