// Author: Dustin Pilgrim
// License: MIT

use eyre::{eyre, Result};
use rune_cfg::RuneConfig;

use crate::core::{
    config::{ConfigFile, RuntimeConfig, WatchdogConfig},
    events::ActivityKind,
};

/// Looks up `vigil.<key>`, accepting both the underscore and dash spelling.
macro_rules! lookup {
    ($config:expr, $ty:ty, $key:literal) => {
        $config
            .get::<$ty>(concat!("vigil.", $key))
            .or_else(|_| $config.get::<$ty>(&concat!("vigil.", $key).replace('_', "-")))
            .ok()
    };
}

fn non_empty(s: Option<String>) -> Option<String> {
    s.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

fn secs_to_ms(secs: u64) -> u64 {
    secs.saturating_mul(1000)
}

fn parse_activity_events(raw: Vec<String>) -> Result<Vec<ActivityKind>> {
    let mut kinds = Vec::new();
    for name in raw {
        let kind = ActivityKind::parse(&name)
            .ok_or_else(|| eyre!("unknown activity event '{}'", name))?;
        if !kinds.contains(&kind) {
            kinds.push(kind);
        }
    }
    Ok(kinds)
}

pub fn parse_config(config: &RuneConfig) -> Result<ConfigFile> {
    let defaults = WatchdogConfig::default();

    let inactivity_timeout_ms = lookup!(config, u64, "inactivity_timeout")
        .map(secs_to_ms)
        .unwrap_or(defaults.inactivity_timeout_ms);

    let warning_timeout_ms = lookup!(config, u64, "warning_timeout")
        .map(secs_to_ms)
        .unwrap_or(defaults.warning_timeout_ms);

    let activity_kinds = match lookup!(config, Vec<String>, "activity_events") {
        Some(raw) => parse_activity_events(raw)?,
        None => defaults.activity_kinds.clone(),
    };

    let watchdog = WatchdogConfig {
        inactivity_timeout_ms,
        warning_timeout_ms,
        login_path: non_empty(lookup!(config, String, "login_path")).unwrap_or(defaults.login_path),
        expiry_marker: non_empty(lookup!(config, String, "expiry_marker"))
            .unwrap_or(defaults.expiry_marker),
        warning_title: non_empty(lookup!(config, String, "warning_title"))
            .unwrap_or(defaults.warning_title),
        warning_body: non_empty(lookup!(config, String, "warning_body")),
        stay_label: non_empty(lookup!(config, String, "stay_label")).unwrap_or(defaults.stay_label),
        activity_kinds,
    };

    watchdog.validate().map_err(|e| eyre!("{}", e))?;

    let runtime_defaults = RuntimeConfig::default();

    let sign_out_timeout_secs = lookup!(config, u64, "sign_out_timeout")
        .unwrap_or(runtime_defaults.sign_out_timeout_secs);
    if sign_out_timeout_secs == 0 {
        return Err(eyre!("sign_out_timeout must be greater than zero"));
    }

    let runtime = RuntimeConfig {
        sign_out_command: non_empty(lookup!(config, String, "sign_out_command")),
        sign_out_timeout_secs,
        navigate_command: non_empty(lookup!(config, String, "navigate_command")),
        base_url: non_empty(lookup!(config, String, "base_url")),
        install_on_start: lookup!(config, bool, "install_on_start")
            .unwrap_or(runtime_defaults.install_on_start),
        exit_on_expiry: lookup!(config, bool, "exit_on_expiry")
            .unwrap_or(runtime_defaults.exit_on_expiry),
        input_seat: non_empty(lookup!(config, String, "input_seat"))
            .unwrap_or(runtime_defaults.input_seat),
    };

    Ok(ConfigFile { watchdog, runtime })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Result<ConfigFile> {
        let config = RuneConfig::from_str(text).map_err(|e| eyre!("{}", e))?;
        parse_config(&config)
    }

    #[test]
    fn embedded_default_matches_built_in_defaults() {
        let cfg = parse(crate::config::DEFAULT_CONFIG).unwrap();
        assert_eq!(cfg, ConfigFile::default());
    }

    #[test]
    fn reads_seconds_and_dash_spellings() {
        let cfg = parse(
            r#"
vigil:
  inactivity-timeout 120
  warning_timeout 90
  login-path "/signin"
  activity_events ["keydown", "touch-start"]
  sign-out-command "logout-now"
  base_url "https://app.example.org"
  exit-on-expiry true
end
"#,
        )
        .unwrap();

        assert_eq!(cfg.watchdog.inactivity_timeout_ms, 120_000);
        assert_eq!(cfg.watchdog.warning_timeout_ms, 90_000);
        assert_eq!(cfg.watchdog.login_path, "/signin");
        assert_eq!(
            cfg.watchdog.activity_kinds,
            vec![ActivityKind::KeyDown, ActivityKind::TouchStart]
        );
        assert_eq!(cfg.runtime.sign_out_command.as_deref(), Some("logout-now"));
        assert_eq!(cfg.runtime.base_url.as_deref(), Some("https://app.example.org"));
        assert!(cfg.runtime.exit_on_expiry);
        assert!(cfg.runtime.install_on_start);
    }

    #[test]
    fn rejects_warning_after_expiry() {
        let err = parse(
            r#"
vigil:
  inactivity_timeout 60
  warning_timeout 60
end
"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("warning timeout"));
    }

    #[test]
    fn rejects_unknown_activity_event() {
        let err = parse(
            r#"
vigil:
  activity_events ["scroll"]
end
"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("scroll"));
    }

    #[test]
    fn rejects_zero_sign_out_timeout() {
        assert!(parse("vigil:\n  sign_out_timeout 0\nend\n").is_err());
    }
}
