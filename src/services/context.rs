//! Legacy timer context: the `/api/timer` shape the site templates read

use chrono::{DateTime, Datelike, FixedOffset, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

const MONTHS_UPPER: [&str; 12] = [
    "JANUARY", "FEBRUARY", "MARCH", "APRIL", "MAY", "JUNE", "JULY", "AUGUST", "SEPTEMBER",
    "OCTOBER", "NOVEMBER", "DECEMBER",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerContext {
    pub deadline_iso_utc: String,
    pub deadline_month_upper: String,
    pub deadline_day: u32,
}

/// Deadline as a UTC ISO string plus month/day labels in `display_offset`
pub fn build_timer_context(deadline: DateTime<Utc>, display_offset: FixedOffset) -> TimerContext {
    let local = deadline.with_timezone(&display_offset);

    TimerContext {
        deadline_iso_utc: deadline.to_rfc3339_opts(SecondsFormat::Secs, true),
        deadline_month_upper: MONTHS_UPPER[local.month0() as usize].to_string(),
        deadline_day: local.day(),
    }
}
