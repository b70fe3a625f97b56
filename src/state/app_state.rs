//! Shared state behind the local HTTP surface

use std::time::Instant;

use chrono::FixedOffset;
use tokio::sync::watch;

use super::CountdownSnapshot;
use crate::{
    config::WidgetConfig,
    services::context::{build_timer_context, TimerContext},
    wire::SiteScope,
};

/// Read-only view of a running widget for HTTP handlers
#[derive(Debug)]
pub struct AppState {
    /// Latest rendered tick
    pub snapshots: watch::Receiver<CountdownSnapshot>,
    pub display_offset: FixedOffset,
    pub api_base: String,
    pub scope: SiteScope,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(config: &WidgetConfig, snapshots: watch::Receiver<CountdownSnapshot>) -> Self {
        Self {
            snapshots,
            display_offset: config.display_offset,
            api_base: config.api_base.to_string(),
            scope: config.scope.clone(),
            start_time: Instant::now(),
        }
    }

    /// Get the most recently published snapshot
    pub fn current_snapshot(&self) -> CountdownSnapshot {
        self.snapshots.borrow().clone()
    }

    /// Legacy `/api/timer` context for the current target, if there is one
    pub fn legacy_context(&self) -> Option<TimerContext> {
        let target = self.snapshots.borrow().target?;
        Some(build_timer_context(target, self.display_offset))
    }

    /// Calculate uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }
}
