//! State management module
//!
//! Countdown state owned by the tick task, the snapshots it publishes, and
//! the updates it consumes.

pub mod app_state;
pub mod display;
pub mod snapshot;
pub mod timer_state;
pub mod update;

// Re-export main types
pub use app_state::AppState;
pub use display::DisplayParts;
pub use snapshot::{CountdownSnapshot, Decorations};
pub use timer_state::{CountdownPhase, TimerState};
pub use update::{TimerUpdate, UpdateGate, UpdateSource};
