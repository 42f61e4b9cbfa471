// SPDX-License-Identifier: GPL-3.0-only

use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use mount_tray::cli::Cli;
use mount_tray::config::Config;
use mount_tray::error::exit_message;
use mount_tray::sni::SniIconFactory;
use mount_tray::{IconManager, TrayError, logging};
use mount_tray_udisks::{UdisksMountActions, UdisksVolumeMonitor};
use tokio::sync::mpsc;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            eprintln!("{}", exit_message(&program_name(), &e));
            ExitCode::from(1)
        }
    }
}

async fn run(cli: Cli) -> Result<(), TrayError> {
    let config = Config::load(cli.config.as_deref())?;
    logging::init(&config);

    tracing::info!("Starting mount-tray v{}", env!("CARGO_PKG_VERSION"));

    let monitor = UdisksVolumeMonitor::new(config.include_system_mounts)
        .await
        .map_err(|e| TrayError::Volume(e.into()))?;
    let actions = UdisksMountActions::new(monitor.connection().clone());

    let (icon_events_tx, icon_events_rx) = mpsc::unbounded_channel();
    let factory = SniIconFactory::new(icon_events_tx).await?;

    let manager = IconManager::new(factory, Arc::new(actions))
        .with_open_on_activate(config.open_on_activate);
    manager
        .run(&monitor, icon_events_rx, shutdown_signal())
        .await?;

    tracing::info!("mount-tray stopped");
    Ok(())
}

async fn shutdown_signal() {
    use tokio::signal::unix::{SignalKind, signal};

    let mut terminate = match signal(SignalKind::terminate()) {
        Ok(stream) => stream,
        Err(e) => {
            tracing::warn!("Cannot listen for SIGTERM: {e}");
            let _ = tokio::signal::ctrl_c().await;
            return;
        }
    };

    tokio::select! {
        _ = tokio::signal::ctrl_c() => tracing::info!("Received interrupt"),
        _ = terminate.recv() => tracing::info!("Received SIGTERM"),
    }
}

fn program_name() -> String {
    std::env::args()
        .next()
        .as_deref()
        .and_then(|arg0| Path::new(arg0).file_name())
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| "mount-tray".to_string())
}
