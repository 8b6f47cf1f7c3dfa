//! Process signals: SIGTERM/SIGINT stop the server, SIGHUP reloads config.

use std::sync::Arc;

use tokio::signal::unix::{SignalKind, signal};
use tokio::sync::Notify;

use crate::config::ConfigLoader;
use crate::state::AppState;

/// Completes on the first SIGTERM or SIGINT.
pub async fn shutdown_signal() {
    let mut sigterm = signal(SignalKind::terminate()).expect("failed to install SIGTERM handler");
    let mut sigint = signal(SignalKind::interrupt()).expect("failed to install SIGINT handler");

    let name = tokio::select! {
        _ = sigterm.recv() => "SIGTERM",
        _ = sigint.recv() => "SIGINT",
    };
    tracing::info!(signal = name, "Initiating graceful shutdown");
}

/// Reloads the config file on every SIGHUP until the returned `Notify` fires.
///
/// The listen address and the status-query client keep their startup values.
pub fn spawn_config_reload_handler(state: AppState, loader: Arc<ConfigLoader>) -> Arc<Notify> {
    let stop = Arc::new(Notify::new());
    let stopped = stop.clone();

    tokio::spawn(async move {
        let mut sighup = signal(SignalKind::hangup()).expect("failed to install SIGHUP handler");

        loop {
            tokio::select! {
                _ = sighup.recv() => reload(&state, &loader).await,
                _ = stopped.notified() => break,
            }
        }
        tracing::debug!("Config reload handler stopped");
    });

    stop
}

async fn reload(state: &AppState, loader: &ConfigLoader) {
    tracing::info!("Received SIGHUP, reloading configuration");
    match loader.reload() {
        Ok(loaded) => {
            loaded.install(&state.config).await;
            tracing::info!("Configuration reloaded");
        }
        // The running configuration stays in place.
        Err(e) => tracing::error!(error = %e, "Failed to reload configuration"),
    }
}
