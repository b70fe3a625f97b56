//! Live update background task

use reqwest::Url;
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::{services::listen, state::TimerUpdate, wire::SiteScope};

/// Listen for pushed deadline changes. Not reconnected when the stream
/// ends; the poll task covers for a lost connection.
pub async fn live_update_task(url: Url, scope: SiteScope, updates: mpsc::Sender<TimerUpdate>) {
    info!("Opening live updates at {}", url);

    match listen(&url, &scope, updates).await {
        Ok(()) => info!("Live update stream closed"),
        Err(e) => warn!("Live updates stopped: {}", e),
    }
}
