// Author: Dustin Pilgrim
// License: MIT

use tokio::sync::{mpsc, watch};
use tokio::time::{sleep_until, Instant};

use crate::core::{state::Phase, watchdog_msg::WatchdogMsg};
use crate::{sinfo, swarn};

use super::{AnyError, Daemon};

async fn wait_for(deadline: Option<Instant>) {
    match deadline {
        Some(at) => sleep_until(at).await,
        None => std::future::pending::<()>().await,
    }
}

impl Daemon {
    pub async fn run(
        &mut self,
        tx: mpsc::Sender<WatchdogMsg>,
        mut rx: mpsc::Receiver<WatchdogMsg>,
        mut shutdown: watch::Receiver<bool>,
        shutdown_tx: watch::Sender<bool>,
    ) -> Result<(), AnyError> {
        sinfo!("Daemon", "daemon starting");

        if self.runtime.install_on_start {
            if let Err(e) = self.install(&tx).await {
                swarn!("Daemon", "initial install failed: {}", e);
            }
        }

        loop {
            // Recomputed every turn, so a reset can never leave an old deadline behind.
            let deadline = self
                .watchdog
                .next_deadline_ms(&self.state)
                .map(|ms| self.clock.instant_at(ms));

            tokio::select! {
                _ = shutdown.changed() => {
                    if *shutdown.borrow() {
                        sinfo!("Daemon", "daemon stopping (shutdown requested)");
                        break;
                    }
                }

                _ = wait_for(deadline) => {
                    self.on_deadline().await;
                }

                maybe = rx.recv() => {
                    let Some(msg) = maybe else {
                        sinfo!("Daemon", "daemon stopping (channel closed)");
                        break;
                    };

                    match msg {
                        WatchdogMsg::Activity(kind) => {
                            self.on_activity(kind).await;
                        }

                        WatchdogMsg::NoticeAction { id, action_key } => {
                            self.on_notice_action(id, &action_key).await;
                        }

                        WatchdogMsg::Install { reply } => {
                            let out = self.install(&tx).await;
                            let _ = reply.send(out);
                        }

                        WatchdogMsg::Uninstall { reply } => {
                            let out = self.uninstall().await;
                            let _ = reply.send(out);
                        }

                        WatchdogMsg::Extend { reply } => {
                            let out = self.extend_session().await;
                            let _ = reply.send(out);
                        }

                        WatchdogMsg::GetInfo { reply } => {
                            let now_ms = self.clock.now_ms();
                            let _ = reply.send(self.watchdog.snapshot(&self.state, now_ms));
                        }

                        WatchdogMsg::Stop { reply } => {
                            sinfo!("Daemon", "daemon stopping (stop requested via IPC)");
                            let _ = reply.send(Ok("Stopping vigil daemon".to_string()));
                            let _ = shutdown_tx.send(true);
                            break;
                        }
                    }
                }
            }

            if self.teardown_if_expired().await && self.runtime.exit_on_expiry {
                sinfo!("Daemon", "daemon stopping (session expired)");
                let _ = shutdown_tx.send(true);
                break;
            }
        }

        if self.state.phase() != Phase::Detached {
            let _ = self.uninstall().await;
        }

        Ok(())
    }
}
