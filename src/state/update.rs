//! Deadline updates flowing into the tick task

use chrono::{DateTime, Utc};
use tokio::time::Instant;
use tracing::warn;

use super::TimerState;
use crate::wire::TimerPayload;

/// Where an update came from and when
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateSource {
    /// HTTP resolution round that started at `requested_at`
    Poll { requested_at: Instant },
    /// Live push received at `received_at`
    Push { received_at: Instant },
}

/// A normalized payload on its way to the tick task
#[derive(Debug, Clone, PartialEq)]
pub struct TimerUpdate {
    pub source: UpdateSource,
    pub payload: TimerPayload,
}

impl TimerUpdate {
    pub fn polled(payload: TimerPayload, requested_at: Instant) -> Self {
        Self {
            source: UpdateSource::Poll { requested_at },
            payload,
        }
    }

    pub fn pushed(payload: TimerPayload, received_at: Instant) -> Self {
        Self {
            source: UpdateSource::Push { received_at },
            payload,
        }
    }
}

/// Orders polled and pushed updates. A poll that was requested before the
/// latest applied push carries older data and is dropped.
#[derive(Debug, Default)]
pub struct UpdateGate {
    last_push: Option<Instant>,
}

impl UpdateGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply `update` to `state` unless it is stale. Returns whether it was applied.
    pub fn apply(&mut self, state: &mut TimerState, update: TimerUpdate, local_now: DateTime<Utc>) -> bool {
        match update.source {
            UpdateSource::Poll { requested_at } => {
                if let Some(pushed) = self.last_push {
                    if requested_at < pushed {
                        warn!(
                            "Discarding polled timer '{}': a newer live update was already applied",
                            update.payload.event_name
                        );
                        return false;
                    }
                }
            }
            UpdateSource::Push { received_at } => {
                self.last_push = Some(self.last_push.map_or(received_at, |p| p.max(received_at)));
            }
        }

        state.apply(&update.payload, local_now);
        true
    }
}
