//! Zero-padded countdown fields

use chrono::Duration;
use serde::{Deserialize, Serialize};

/// The four fields a countdown shows. Days may run past two digits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayParts {
    pub days: String,
    pub hours: String,
    pub minutes: String,
    pub seconds: String,
}

impl DisplayParts {
    /// All fields "00"
    pub fn zeroed() -> Self {
        Self {
            days: "00".to_string(),
            hours: "00".to_string(),
            minutes: "00".to_string(),
            seconds: "00".to_string(),
        }
    }

    /// Split a remaining duration into whole days, hours, minutes, seconds.
    /// Non-positive durations render as zeroes.
    pub fn from_remaining(remaining: Duration) -> Self {
        if remaining <= Duration::zero() {
            return Self::zeroed();
        }

        let total = remaining.num_seconds();
        let days = total / 86_400;
        let hours = (total % 86_400) / 3_600;
        let minutes = (total % 3_600) / 60;
        let seconds = total % 60;

        Self {
            days: pad2(days),
            hours: pad2(hours),
            minutes: pad2(minutes),
            seconds: pad2(seconds),
        }
    }

    pub fn is_zeroed(&self) -> bool {
        *self == Self::zeroed()
    }

    /// `DD:HH:MM:SS`
    pub fn clock(&self) -> String {
        format!("{}:{}:{}:{}", self.days, self.hours, self.minutes, self.seconds)
    }
}

impl Default for DisplayParts {
    fn default() -> Self {
        Self::zeroed()
    }
}

fn pad2(n: i64) -> String {
    format!("{:02}", n.max(0))
}
