// Author: Dustin Pilgrim
// License: MIT

use tokio::sync::{mpsc, oneshot};

use crate::core::{
    events::ActivityKind,
    watchdog_msg::{Reply, WatchdogMsg},
};
use crate::{sdebug, swarn};

const DAEMON_GONE: &str = "ERROR: daemon is shutting down";

/// Routes one textual command to the daemon loop and renders its reply.
pub async fn route_command(cmd: &str, tx: &mpsc::Sender<WatchdogMsg>) -> String {
    let mut parts = cmd.split_whitespace();
    let head = parts.next().unwrap_or("");
    let args: Vec<&str> = parts.collect();

    let result: Result<String, String> = match head {
        "extend" => request(tx, |reply| WatchdogMsg::Extend { reply }).await,
        "install" => request(tx, |reply| WatchdogMsg::Install { reply }).await,
        "uninstall" => request(tx, |reply| WatchdogMsg::Uninstall { reply }).await,
        "stop" => request(tx, |reply| WatchdogMsg::Stop { reply }).await,

        "activity" => {
            let kind = match args.first() {
                Some(raw) => ActivityKind::parse(raw)
                    .ok_or_else(|| format!("ERROR: unknown activity kind '{raw}'")),
                None => Ok(ActivityKind::KeyDown),
            };
            match kind {
                Ok(kind) => {
                    sdebug!("Router", "injected activity: {}", kind.as_str());
                    tx.send(WatchdogMsg::Activity(kind))
                        .await
                        .map(|_| "Activity recorded".to_string())
                        .map_err(|_| DAEMON_GONE.to_string())
                }
                Err(e) => Err(e),
            }
        }

        "info" => {
            let as_json = args.contains(&"--json");
            let (reply, rx) = oneshot::channel();
            if tx.send(WatchdogMsg::GetInfo { reply }).await.is_err() {
                Err(DAEMON_GONE.to_string())
            } else {
                match rx.await {
                    Ok(snap) if as_json => serde_json::to_string(&snap)
                        .map_err(|e| format!("ERROR: failed to encode info: {e}")),
                    Ok(snap) => Ok(snap.pretty_text),
                    Err(_) => Err(DAEMON_GONE.to_string()),
                }
            }
        }

        _ => {
            swarn!("Router", "Unknown IPC command: {}", cmd);
            Err(format!("ERROR: Unknown command '{cmd}'"))
        }
    };

    result.unwrap_or_else(|e| e)
}

async fn request(
    tx: &mpsc::Sender<WatchdogMsg>,
    make: impl FnOnce(Reply) -> WatchdogMsg,
) -> Result<String, String> {
    let (reply, rx) = oneshot::channel();
    tx.send(make(reply))
        .await
        .map_err(|_| DAEMON_GONE.to_string())?;

    match rx.await {
        Ok(Ok(msg)) => Ok(msg),
        Ok(Err(e)) => Err(format!("ERROR: {e}")),
        Err(_) => Err(DAEMON_GONE.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{info::InfoSnapshot, state::Phase};

    /// Stand-in for the daemon loop: answers every request from a fixed script.
    fn fake_daemon() -> (mpsc::Sender<WatchdogMsg>, tokio::task::JoinHandle<Vec<String>>) {
        let (tx, mut rx) = mpsc::channel::<WatchdogMsg>(8);
        let task = tokio::spawn(async move {
            let mut seen = Vec::new();
            while let Some(msg) = rx.recv().await {
                match msg {
                    WatchdogMsg::Activity(kind) => seen.push(format!("activity {}", kind.as_str())),
                    WatchdogMsg::Extend { reply } => {
                        seen.push("extend".to_string());
                        let _ = reply.send(Err("watchdog not installed".to_string()));
                    }
                    WatchdogMsg::Install { reply } => {
                        seen.push("install".to_string());
                        let _ = reply.send(Ok("Session watchdog installed".to_string()));
                    }
                    WatchdogMsg::GetInfo { reply } => {
                        seen.push("info".to_string());
                        let _ = reply.send(InfoSnapshot {
                            phase: Phase::Active,
                            installed: true,
                            seconds_until_warning: Some(30),
                            seconds_until_logout: Some(90),
                            seconds_since_activity: Some(510),
                            last_activity: None,
                            warning_visible: false,
                            warnings_shown: 0,
                            extensions: 0,
                            pretty_text: "Session: active".to_string(),
                        });
                    }
                    _ => {}
                }
            }
            seen
        });
        (tx, task)
    }

    #[tokio::test]
    async fn routes_requests_and_renders_replies() {
        let (tx, task) = fake_daemon();

        assert_eq!(route_command("install", &tx).await, "Session watchdog installed");
        assert_eq!(route_command("extend", &tx).await, "ERROR: watchdog not installed");
        assert_eq!(route_command("activity pointerdown", &tx).await, "Activity recorded");
        assert_eq!(route_command("info", &tx).await, "Session: active");

        let json = route_command("info --json", &tx).await;
        let v: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(v["phase"], "active");
        assert_eq!(v["seconds_until_logout"], 90);
        assert!(v.get("pretty_text").is_none());

        drop(tx);
        let seen = task.await.unwrap();
        assert_eq!(
            seen,
            vec!["install", "extend", "activity pointer-down", "info", "info"]
        );
    }

    #[tokio::test]
    async fn rejects_unknown_input() {
        let (tx, _task) = fake_daemon();

        assert_eq!(
            route_command("reboot now", &tx).await,
            "ERROR: Unknown command 'reboot now'"
        );
        assert_eq!(
            route_command("activity scroll", &tx).await,
            "ERROR: unknown activity kind 'scroll'"
        );
    }

    #[tokio::test]
    async fn reports_a_stopped_daemon() {
        let (tx, rx) = mpsc::channel::<WatchdogMsg>(1);
        drop(rx);
        assert_eq!(route_command("extend", &tx).await, DAEMON_GONE);
    }
}
