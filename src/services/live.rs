//! Live deadline updates over WebSocket

use futures::stream::StreamExt;
use reqwest::Url;
use tokio::{sync::mpsc, time::Instant};
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{debug, info};

use crate::{
    error::Result,
    state::TimerUpdate,
    wire::{parse_live_message, SiteScope},
};

/// Turn a text frame into an update for this widget, if it is one
pub fn accept_frame(text: &str, scope: &SiteScope, received_at: Instant) -> Option<TimerUpdate> {
    let Some(message) = parse_live_message(text) else {
        debug!("Dropping unrecognised live frame");
        return None;
    };

    if !scope.accepts(&message.scope) {
        debug!(
            "Ignoring live update for site {:?}/{:?}",
            message.scope.slug, message.scope.id
        );
        return None;
    }

    Some(TimerUpdate::pushed(message.payload, received_at))
}

/// Connect to `url` and forward matching updates until the stream ends.
///
/// Returns `Ok(())` on a clean close or when the update receiver goes away.
pub async fn listen(url: &Url, scope: &SiteScope, updates: mpsc::Sender<TimerUpdate>) -> Result<()> {
    let (mut stream, _) = connect_async(url.as_str()).await?;
    info!("Live updates connected to {}", url);

    while let Some(frame) = stream.next().await {
        let text = match frame? {
            Message::Text(text) => text,
            Message::Close(_) => {
                debug!("Live update stream sent close");
                break;
            }
            _ => continue,
        };

        if let Some(update) = accept_frame(&text, scope, Instant::now()) {
            info!("Live update for timer '{}'", update.payload.event_name);
            if updates.send(update).await.is_err() {
                debug!("Update receiver dropped, closing live stream");
                break;
            }
        }
    }

    Ok(())
}
