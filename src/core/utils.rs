// Author: Dustin Pilgrim
// License: MIT

use std::time::Duration;

pub fn format_duration(dur: Duration) -> String {
    let secs = dur.as_secs();

    if secs < 60 {
        format!("{}s", secs)
    } else if secs < 3600 {
        let minutes = secs / 60;
        let seconds = secs % 60;
        format!("{}m {}s", minutes, seconds)
    } else {
        let hours = secs / 3600;
        let minutes = (secs % 3600) / 60;
        format!("{}h {}m", hours, minutes)
    }
}

/// Human phrasing for the warning text ("1 minute", "90 seconds").
pub fn format_window(ms: u64) -> String {
    let secs = ms / 1000;
    if secs >= 60 && secs % 60 == 0 {
        let minutes = secs / 60;
        if minutes == 1 {
            "1 minute".to_string()
        } else {
            format!("{minutes} minutes")
        }
    } else if secs == 1 {
        "1 second".to_string()
    } else {
        format!("{secs} seconds")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_buckets() {
        assert_eq!(format_duration(Duration::from_secs(42)), "42s");
        assert_eq!(format_duration(Duration::from_secs(540)), "9m 0s");
        assert_eq!(format_duration(Duration::from_secs(3720)), "1h 2m");
    }

    #[test]
    fn window_phrasing() {
        assert_eq!(format_window(60_000), "1 minute");
        assert_eq!(format_window(120_000), "2 minutes");
        assert_eq!(format_window(90_000), "90 seconds");
        assert_eq!(format_window(1_000), "1 second");
    }
}
