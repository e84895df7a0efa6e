// Author: Dustin Pilgrim
// License: MIT

use std::path::Path;

use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::{UnixListener, UnixStream},
    sync::mpsc,
    time::{timeout, Duration},
};

use crate::core::watchdog_msg::WatchdogMsg;
use crate::{sdebug, serror};

use super::router::route_command;

const CONNECTION_TIMEOUT: Duration = Duration::from_secs(10);

/// Binds the control socket, replacing a stale file left by a crashed daemon.
/// The single-instance lock is held before this runs, so nothing live owns it.
pub fn bind_socket(path: &Path) -> std::io::Result<UnixListener> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    if path.exists() {
        std::fs::remove_file(path)?;
    }
    UnixListener::bind(path)
}

/// Accept loop: one short-lived task per connection, one command per connection.
pub fn spawn_ipc_server(listener: UnixListener, tx: mpsc::Sender<WatchdogMsg>) {
    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut stream, _addr)) => {
                    let tx = tx.clone();

                    tokio::spawn(async move {
                        let result = timeout(CONNECTION_TIMEOUT, async {
                            if let Err(e) = handle_connection(&mut stream, &tx).await {
                                serror!("Ipc", "Error handling IPC connection: {}", e);
                            }
                        })
                        .await;

                        if result.is_err() {
                            serror!("Ipc", "IPC connection timed out after 10 seconds");
                        }

                        let _ = stream.shutdown().await;
                    });
                }
                Err(e) => serror!("Ipc", "Failed to accept IPC connection: {}", e),
            }
        }
    });
}

async fn handle_connection(
    stream: &mut UnixStream,
    tx: &mpsc::Sender<WatchdogMsg>,
) -> std::io::Result<()> {
    let mut buf = vec![0u8; 256];
    let n = stream.read(&mut buf).await?;

    if n == 0 {
        return Ok(());
    }

    let cmd = String::from_utf8_lossy(&buf[..n]).trim().to_string();

    if !cmd.contains("--json") {
        sdebug!("Ipc", "Received IPC command: {}", cmd);
    }

    let response = route_command(&cmd, tx).await;

    stream.write_all(response.as_bytes()).await?;
    stream.flush().await?;

    Ok(())
}
