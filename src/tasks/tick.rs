//! Countdown tick background task

use std::time::Duration;

use chrono::Utc;
use tokio::{
    sync::{mpsc, watch},
    time::{sleep_until, Instant},
};
use tracing::{debug, info};

use crate::state::{CountdownSnapshot, Decorations, TimerState, TimerUpdate, UpdateGate};

/// Owns the timer state. Renders a snapshot, then waits `tick` while
/// applying any updates that arrive; the next tick is scheduled only after
/// the current one has been rendered.
///
/// Stops once nobody is watching the snapshots.
pub async fn countdown_tick_task(
    mut state: TimerState,
    decorations: Decorations,
    tick: Duration,
    mut updates: mpsc::Receiver<TimerUpdate>,
    snapshots: watch::Sender<CountdownSnapshot>,
) {
    info!("Starting countdown tick task ({}ms)", tick.as_millis());

    let mut gate = UpdateGate::new();
    let mut updates_open = true;

    loop {
        let snapshot = CountdownSnapshot::render(&state, &decorations, Utc::now());
        if snapshots.send(snapshot).is_err() {
            info!("No snapshot watchers left, stopping tick task");
            return;
        }

        let next_tick = Instant::now() + tick;
        loop {
            tokio::select! {
                _ = sleep_until(next_tick) => break,

                update = updates.recv(), if updates_open => match update {
                    Some(update) => {
                        gate.apply(&mut state, update, Utc::now());
                    }
                    None => {
                        debug!("All update senders closed, countdown continues on last state");
                        updates_open = false;
                    }
                },
            }
        }
    }
}
