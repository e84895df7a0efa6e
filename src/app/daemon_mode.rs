// Author: Dustin Pilgrim
// License: MIT

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::{mpsc, watch};

use crate::cli::Args;
use crate::core::watchdog_msg::WatchdogMsg;
use crate::daemon::{Daemon, Services};
use crate::services::{
    auth::CommandAuthProvider,
    input::LibinputSource,
    navigate::CommandNavigator,
    notice::{DesktopNotices, LogNotices, NoticeSurface},
};
use crate::{serror, sinfo, swarn};

use super::AnyError;

const CHANNEL_CAPACITY: usize = 64;

pub async fn run(args: Args) -> Result<(), AnyError> {
    // single-instance
    let _instance_lock = crate::app::platform::acquire_single_instance_lock().map_err(|e| {
        eprintln!("vigil: {e}");
        io::Error::new(io::ErrorKind::AlreadyExists, e)
    })?;

    crate::log::set_verbose(args.verbose);

    let log_path = crate::log::log_path();
    if let Err(e) = crate::log::enable_file_output(log_path.clone()) {
        eprintln!("vigil: failed to enable file logging at {}: {e}", log_path.display());
    }

    sinfo!("Vigil", "vigil starting");

    // bootstrap only if no --config (and bootstrap itself only writes when missing)
    if args.config.is_none() {
        if let Err(e) = crate::config::bootstrap::ensure_user_config_exists() {
            swarn!("Config", "failed to bootstrap default config: {e}");
        }
    }

    let config_path: PathBuf = match args.config.as_deref() {
        Some(p) => p.to_path_buf(),
        None => crate::config::resolve_default_config_path(),
    };

    let cfg_file = crate::config::load_from_path(&config_path).map_err(|e| {
        serror!("Config", "{e:#}");
        io::Error::new(io::ErrorKind::InvalidData, format!("{e:#}"))
    })?;
    sinfo!("Config", "using {}", config_path.display());

    let (tx, rx) = mpsc::channel::<WatchdogMsg>(CHANNEL_CAPACITY);

    // IPC control socket
    let socket_path = crate::ipc::socket_path().map_err(|e| io::Error::new(io::ErrorKind::NotFound, e))?;
    let listener = crate::ipc::server::bind_socket(&socket_path)?;
    crate::ipc::server::spawn_ipc_server(listener, tx.clone());
    sinfo!("Ipc", "listening on {}", socket_path.display());

    let notices: Arc<dyn NoticeSurface> = match DesktopNotices::connect("vigil", tx.clone()).await {
        Ok(n) => Arc::new(n),
        Err(e) => {
            swarn!("Notice", "desktop notifications unavailable ({e}); warnings go to the log only");
            Arc::new(LogNotices::default())
        }
    };

    let runtime = &cfg_file.runtime;
    let services = Services {
        auth: Arc::new(CommandAuthProvider::new(runtime.sign_out_command.clone())),
        navigator: Arc::new(CommandNavigator::new(
            runtime.navigate_command.clone(),
            runtime.base_url.clone(),
        )),
        notices,
        activity: Arc::new(LibinputSource::new(runtime.input_seat.clone())),
    };

    let mut daemon = Daemon::new(cfg_file, services)?;

    // shutdown
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let mut daemon_task = tokio::spawn({
        let shutdown_tx = shutdown_tx.clone();
        async move { daemon.run(tx, rx, shutdown_rx, shutdown_tx).await }
    });

    let result = tokio::select! {
        res = &mut daemon_task => res,

        _ = tokio::signal::ctrl_c() => {
            sinfo!("Vigil", "received Ctrl+C, shutting down");
            let _ = shutdown_tx.send(true);
            daemon_task.await
        }
    };

    let _ = std::fs::remove_file(&socket_path);

    match result {
        Ok(Ok(())) => {
            sinfo!("Vigil", "vigil stopped");
            Ok(())
        }
        Ok(Err(e)) => Err(e),
        Err(join_err) => Err(Box::new(join_err)),
    }
}
