//! Expo Countdown - clock-corrected event countdown client
//!
//! This is the main entry point for the expo-countdown application.

use std::sync::Arc;
use tokio::{net::TcpListener, sync::watch};
use tracing::{error, info};

use expo_countdown::{
    api::create_router,
    config::{Config, WidgetConfig},
    state::{AppState, CountdownSnapshot},
    utils::shutdown_signal,
    widget::spawn_widget,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("expo_countdown={},tower_http=info", config.log_level()))
        .with_writer(std::io::stderr)
        .init();

    let widget = WidgetConfig::try_from(&config)?;

    info!("Starting expo-countdown v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Configuration: api_base={}, site={:?}, site_id={:?}, live={}, retry={}s",
        widget.api_base,
        widget.scope.slug,
        widget.scope.id,
        widget.live_updates,
        widget.retry_delay.as_secs()
    );

    let handle = spawn_widget(&widget)?;

    // Optional local HTTP surface
    if let Some(addr) = config.serve.as_deref() {
        let state = Arc::new(AppState::new(&widget, handle.snapshots.clone()));
        let app = create_router(state);
        let listener = TcpListener::bind(addr).await?;

        info!("Serving countdown on http://{}", addr);
        info!("  GET /countdown - Current countdown snapshot");
        info!("  GET /api/timer - Legacy deadline context");
        info!("  GET /health    - Health check");

        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                error!("Server error: {}", e);
            }
        });
    }

    tokio::select! {
        _ = print_countdown(handle.snapshots.clone(), config.quiet) => {
            info!("Countdown stopped");
        }
        result = shutdown_signal() => {
            if let Err(e) = result {
                error!("Failed to install signal handler: {}", e);
            }
            info!("Shutdown signal received");
        }
    }

    handle.shutdown();
    info!("Shutdown complete");
    Ok(())
}

/// Print every rendered tick to stdout until the tick task stops
async fn print_countdown(mut snapshots: watch::Receiver<CountdownSnapshot>, quiet: bool) {
    while snapshots.changed().await.is_ok() {
        if !quiet {
            let line = snapshots.borrow_and_update().status_line();
            println!("{}", line);
        }
    }
}
