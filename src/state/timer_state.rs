//! Timer state structure and clock-corrected countdown math

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::DisplayParts;
use crate::wire::{TimerMode, TimerPayload};

const MAX_CLOCK_SKEW_SECS: i64 = 366 * 86_400;

/// Where a countdown stands relative to its target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CountdownPhase {
    /// No usable target yet
    Dormant,
    Running,
    Expired,
}

/// Countdown state owned by a single tick task
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimerState {
    pub event_name: String,
    pub mode: TimerMode,
    pub target: Option<DateTime<Utc>>,
    pub server_observed: Option<DateTime<Utc>>,
    /// `local_now - server_observed` at the last sync
    pub clock_offset_ms: i64,
}

impl TimerState {
    /// Create a dormant timer state
    pub fn new() -> Self {
        Self {
            event_name: String::new(),
            mode: TimerMode::UntilStart,
            target: None,
            server_observed: None,
            clock_offset_ms: 0,
        }
    }

    /// Create a state counting down to a fixed deadline, no server sync
    pub fn with_deadline(target: DateTime<Utc>) -> Self {
        Self {
            mode: TimerMode::UntilEnd,
            target: Some(target),
            ..Self::new()
        }
    }

    /// Apply a normalized payload received at `local_now`.
    ///
    /// The clock offset is recomputed from the payload's server time; a
    /// payload without one resets it to zero.
    pub fn apply(&mut self, payload: &TimerPayload, local_now: DateTime<Utc>) {
        self.event_name = payload.event_name.clone();
        self.mode = payload.mode;
        self.target = payload.target_instant();
        self.server_observed = payload
            .server_instant()
            .filter(|server| plausible_server_time(*server, local_now));
        self.clock_offset_ms = self
            .server_observed
            .map(|server| (local_now - server).num_milliseconds())
            .unwrap_or(0);

        if payload.server_time.is_some() && self.server_observed.is_none() {
            warn!(
                "Ignoring server time {:?} for '{}', offset reset to 0",
                payload.server_time, payload.event_name
            );
        }

        if self.target.is_none() {
            warn!("Timer payload for '{}' has no usable target time", self.event_name);
        }
        debug!(
            "Applied timer '{}' mode={} target={:?} offset={}ms",
            self.event_name,
            self.mode.as_str(),
            self.target,
            self.clock_offset_ms
        );
    }

    /// Local time corrected onto the server's clock. `None` if the
    /// correction leaves chrono's representable range.
    pub fn normalized_now(&self, local_now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        local_now.checked_sub_signed(Duration::try_milliseconds(self.clock_offset_ms)?)
    }

    /// Time left until the target, or `None` while dormant
    pub fn remaining(&self, local_now: DateTime<Utc>) -> Option<Duration> {
        let target = self.target?;
        Some(target - self.normalized_now(local_now)?)
    }

    pub fn phase(&self, local_now: DateTime<Utc>) -> CountdownPhase {
        match self.remaining(local_now) {
            None => CountdownPhase::Dormant,
            Some(left) if left > Duration::zero() => CountdownPhase::Running,
            Some(_) => CountdownPhase::Expired,
        }
    }

    pub fn display(&self, local_now: DateTime<Utc>) -> DisplayParts {
        self.remaining(local_now)
            .map(DisplayParts::from_remaining)
            .unwrap_or_else(DisplayParts::zeroed)
    }
}

/// A server clock more than a year away from ours is treated as
/// broken rather than used as an offset.
fn plausible_server_time(server: DateTime<Utc>, local_now: DateTime<Utc>) -> bool {
    (local_now - server).num_seconds().abs() <= MAX_CLOCK_SKEW_SECS
}

impl Default for TimerState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(h: u32, m: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, h, m, s).unwrap()
    }

    fn payload(target: &str, server: Option<&str>) -> TimerPayload {
        TimerPayload {
            event_name: "Expo".to_string(),
            mode: TimerMode::UntilStart,
            start_time: Some(target.to_string()),
            end_time: None,
            server_time: server.map(str::to_string),
        }
    }

    #[test]
    fn dormant_state_shows_zeroes() {
        let state = TimerState::new();
        assert_eq!(state.phase(at(10, 0, 0)), CountdownPhase::Dormant);
        assert!(state.display(at(10, 0, 0)).is_zeroed());
    }

    #[test]
    fn offset_is_local_minus_server() {
        let mut state = TimerState::new();
        // Local clock runs 90s ahead of the server.
        state.apply(
            &payload("2025-06-01T12:00:00Z", Some("2025-06-01T10:00:00Z")),
            at(10, 1, 30),
        );

        assert_eq!(state.clock_offset_ms, 90_000);
        assert_eq!(state.normalized_now(at(10, 1, 30)), Some(at(10, 0, 0)));
        assert_eq!(state.display(at(10, 1, 30)).clock(), "00:02:00:00");
    }

    #[test]
    fn far_future_server_time_is_ignored() {
        let now = Utc::now();
        let mut state = TimerState::new();
        state.apply(
            &payload("2090-01-01T00:00:00Z", Some("+262142-12-31T23:59:59")),
            now,
        );

        assert_eq!(state.clock_offset_ms, 0);
        assert_eq!(state.server_observed, None);

        let later = now + Duration::days(400);
        assert!(!state.display(later).is_zeroed());
        assert_eq!(state.phase(later), CountdownPhase::Running);
    }

    #[test]
    fn out_of_range_offset_goes_dormant_instead_of_panicking() {
        let mut state = TimerState::with_deadline(at(12, 0, 0));
        state.clock_offset_ms = -8_208_474_438_681_358;

        assert_eq!(state.normalized_now(at(10, 0, 0)), None);
        assert_eq!(state.phase(at(10, 0, 0)), CountdownPhase::Dormant);
        assert!(state.display(at(10, 0, 0)).is_zeroed());
    }

    #[test]
    fn missing_server_time_resets_offset() {
        let mut state = TimerState::new();
        state.clock_offset_ms = 5_000;
        state.apply(&payload("2025-06-01T12:00:00Z", None), at(10, 0, 0));

        assert_eq!(state.clock_offset_ms, 0);
        assert_eq!(state.remaining(at(11, 0, 0)), Some(Duration::hours(1)));
    }

    #[test]
    fn past_deadline_is_expired_and_zeroed() {
        let state = TimerState::with_deadline(at(9, 0, 0));
        assert_eq!(state.phase(at(10, 0, 0)), CountdownPhase::Expired);
        assert!(state.display(at(10, 0, 0)).is_zeroed());
        assert_eq!(state.phase(at(9, 0, 0)), CountdownPhase::Expired);
    }

    #[test]
    fn unparsable_target_goes_dormant() {
        let mut state = TimerState::with_deadline(at(12, 0, 0));
        state.apply(&payload("soon", None), at(10, 0, 0));

        assert_eq!(state.target, None);
        assert_eq!(state.phase(at(10, 0, 0)), CountdownPhase::Dormant);
        assert!(state.display(at(10, 0, 0)).is_zeroed());
    }

    #[test]
    fn remaining_tracks_target_minus_now() {
        let state = TimerState::with_deadline(Utc.with_ymd_and_hms(2025, 6, 3, 13, 14, 15).unwrap());
        assert_eq!(state.display(at(12, 0, 0)).clock(), "02:01:14:15");
        assert_eq!(state.phase(at(12, 0, 0)), CountdownPhase::Running);
    }
}
