//! Deadline polling background task

use std::time::Duration;

use tokio::{
    sync::mpsc,
    time::{sleep, Instant},
};
use tracing::{debug, info, warn};

use crate::{services::DeadlineResolver, state::TimerUpdate};

/// Resolve the deadline, retrying the whole chain every `retry_delay` until
/// a source answers. With `refresh` set, keeps re-resolving on that period
/// after each success; otherwise stops after the first one.
pub async fn deadline_poll_task(
    resolver: DeadlineResolver,
    retry_delay: Duration,
    refresh: Option<Duration>,
    updates: mpsc::Sender<TimerUpdate>,
) {
    info!(
        "Starting deadline poll task over {} source(s)",
        resolver.candidates().len()
    );

    loop {
        let requested_at = Instant::now();

        match resolver.resolve().await {
            Ok(payload) => {
                if updates.send(TimerUpdate::polled(payload, requested_at)).await.is_err() {
                    debug!("Update receiver dropped, stopping poll task");
                    return;
                }

                match refresh {
                    Some(every) => sleep(every).await,
                    None => {
                        debug!("Deadline resolved, poll task done");
                        return;
                    }
                }
            }
            Err(e) => {
                warn!("{}, retrying in {}s", e, retry_delay.as_secs_f32());
                sleep(retry_delay).await;
            }
        }
    }
}
