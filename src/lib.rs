//! Expo Countdown - a clock-corrected event countdown client
//!
//! Resolves an event deadline from a chain of HTTP sources, listens for
//! pushed changes over WebSocket, and renders a zero-padded countdown once
//! per tick, corrected for the offset between local and server clocks.

pub mod api;
pub mod config;
pub mod error;
pub mod services;
pub mod state;
pub mod tasks;
pub mod utils;
pub mod widget;
pub mod wire;

// Re-export commonly used types
pub use api::create_router;
pub use config::{Config, WidgetConfig};
pub use error::TimerError;
pub use state::{AppState, CountdownPhase, CountdownSnapshot, DisplayParts, TimerState};
pub use utils::signals::shutdown_signal;
pub use widget::{spawn_widget, WidgetHandle};
pub use wire::{SiteScope, TimerMode, TimerPayload};
