//! Wiring of one countdown widget: channels plus background tasks

use chrono::Utc;
use tokio::{
    sync::{mpsc, watch},
    task::JoinHandle,
};
use tracing::info;

use crate::{
    config::WidgetConfig,
    error::Result,
    services::DeadlineResolver,
    state::CountdownSnapshot,
    tasks::{countdown_tick_task, deadline_poll_task, live_update_task},
};

const UPDATE_BUFFER: usize = 16;

/// A running widget. Dropping the handle stops its tasks.
#[derive(Debug)]
pub struct WidgetHandle {
    pub snapshots: watch::Receiver<CountdownSnapshot>,
    tasks: Vec<JoinHandle<()>>,
}

impl WidgetHandle {
    /// Latest rendered tick
    pub fn current(&self) -> CountdownSnapshot {
        self.snapshots.borrow().clone()
    }

    pub fn shutdown(self) {
        drop(self);
    }
}

impl Drop for WidgetHandle {
    fn drop(&mut self) {
        for task in &self.tasks {
            task.abort();
        }
    }
}

/// Start the tick, poll and live update tasks for `config`.
///
/// A static deadline replaces both network paths.
pub fn spawn_widget(config: &WidgetConfig) -> Result<WidgetHandle> {
    let resolver = match config.static_deadline {
        Some(_) => None,
        None => Some(DeadlineResolver::new(config)?),
    };

    let state = config.initial_state();
    let (updates_tx, updates_rx) = mpsc::channel(UPDATE_BUFFER);
    let (snapshot_tx, snapshot_rx) = watch::channel(CountdownSnapshot::render(
        &state,
        &config.decorations,
        Utc::now(),
    ));

    let mut tasks = vec![tokio::spawn(countdown_tick_task(
        state,
        config.decorations.clone(),
        config.tick,
        updates_rx,
        snapshot_tx,
    ))];

    match resolver {
        Some(resolver) => {
            tasks.push(tokio::spawn(deadline_poll_task(
                resolver,
                config.retry_delay,
                config.refresh_interval,
                updates_tx.clone(),
            )));

            if config.live_updates {
                tasks.push(tokio::spawn(live_update_task(
                    config.live_url(),
                    config.scope.clone(),
                    updates_tx,
                )));
            }
        }
        None => info!("Using fixed deadline, network sources disabled"),
    }

    Ok(WidgetHandle {
        snapshots: snapshot_rx,
        tasks,
    })
}
