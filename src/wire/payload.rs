//! Timer payloads as served by the deadline endpoints

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Which end of the event the countdown targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TimerMode {
    #[default]
    UntilStart,
    UntilEnd,
}

impl TimerMode {
    /// Anything other than an explicit `UNTIL_END` counts down to the start
    pub fn from_wire(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some("UNTIL_END") => TimerMode::UntilEnd,
            _ => TimerMode::UntilStart,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TimerMode::UntilStart => "UNTIL_START",
            TimerMode::UntilEnd => "UNTIL_END",
        }
    }
}

/// Unified timer payload. Legacy `deadline_iso_utc` responses are folded
/// into this shape on parse.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct TimerPayload {
    pub event_name: String,
    pub mode: TimerMode,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub server_time: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawPayload {
    event_name: Option<String>,
    mode: Option<String>,
    start_time: Option<String>,
    end_time: Option<String>,
    server_time: Option<String>,
    deadline_iso_utc: Option<String>,
}

impl From<RawPayload> for TimerPayload {
    fn from(raw: RawPayload) -> Self {
        let event_name = raw.event_name.unwrap_or_default();

        let is_legacy = raw.deadline_iso_utc.is_some()
            && raw.start_time.is_none()
            && raw.end_time.is_none();

        if is_legacy {
            return Self {
                event_name,
                mode: TimerMode::UntilEnd,
                start_time: None,
                end_time: raw.deadline_iso_utc,
                server_time: raw.server_time,
            };
        }

        Self {
            event_name,
            mode: TimerMode::from_wire(raw.mode.as_deref()),
            start_time: raw.start_time,
            end_time: raw.end_time,
            server_time: raw.server_time,
        }
    }
}

impl TimerPayload {
    /// Parse and normalize a JSON value in either the unified or legacy shape
    pub fn from_value(value: serde_json::Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value::<RawPayload>(value).map(Self::from)
    }

    /// Parse and normalize a JSON document
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<RawPayload>(text).map(Self::from)
    }

    /// Raw target string for the current mode
    pub fn target(&self) -> Option<&str> {
        match self.mode {
            TimerMode::UntilEnd => self.end_time.as_deref(),
            TimerMode::UntilStart => self.start_time.as_deref(),
        }
    }

    pub fn target_instant(&self) -> Option<DateTime<Utc>> {
        self.target().and_then(parse_instant)
    }

    pub fn server_instant(&self) -> Option<DateTime<Utc>> {
        self.server_time.as_deref().and_then(parse_instant)
    }

    /// True when the payload names a target that parses as a timestamp
    pub fn has_usable_deadline(&self) -> bool {
        self.target_instant().is_some()
    }
}

/// Parse an RFC 3339 timestamp. Offset-less timestamps are read as UTC.
pub fn parse_instant(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}
