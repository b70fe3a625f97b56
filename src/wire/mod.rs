//! Wire formats
//!
//! JSON shapes exchanged with the event backend: polled timer payloads and
//! pushed live update envelopes.

pub mod envelope;
pub mod payload;

pub use envelope::{parse_live_message, LiveEvent, LiveMessage, SiteScope};
pub use payload::{parse_instant, TimerMode, TimerPayload};
