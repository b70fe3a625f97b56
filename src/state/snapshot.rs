//! Rendered countdown published to watchers

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{CountdownPhase, DisplayParts, TimerState};
use crate::wire::TimerMode;

/// Host page decoration carried alongside the countdown
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decorations {
    pub bg_url: Option<String>,
    pub logo_url: Option<String>,
}

/// One rendered tick of the countdown
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountdownSnapshot {
    pub event_name: String,
    pub mode: TimerMode,
    pub phase: CountdownPhase,
    pub display: DisplayParts,
    pub target: Option<DateTime<Utc>>,
    pub clock_offset_ms: i64,
    #[serde(flatten)]
    pub decorations: Decorations,
    pub rendered_at: DateTime<Utc>,
}

impl CountdownSnapshot {
    pub fn render(state: &TimerState, decorations: &Decorations, local_now: DateTime<Utc>) -> Self {
        Self {
            event_name: state.event_name.clone(),
            mode: state.mode,
            phase: state.phase(local_now),
            display: state.display(local_now),
            target: state.target,
            clock_offset_ms: state.clock_offset_ms,
            decorations: decorations.clone(),
            rendered_at: local_now,
        }
    }

    /// Single status line, e.g. `Expo [UNTIL_START] 02:03:04:05`
    pub fn status_line(&self) -> String {
        let name: &str = if self.event_name.is_empty() { "-" } else { &self.event_name };
        let suffix = match self.phase {
            CountdownPhase::Dormant => " (waiting for deadline)",
            CountdownPhase::Running => "",
            CountdownPhase::Expired => " (expired)",
        };
        format!("{} [{}] {}{}", name, self.mode.as_str(), self.display.clock(), suffix)
    }
}
