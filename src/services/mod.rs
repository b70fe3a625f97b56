//! Backend communication module
//!
//! This module contains the HTTP deadline resolver, the live WebSocket
//! listener and the legacy timer context builder.

pub mod context;
pub mod live;
pub mod resolver;

// Re-export main types
pub use context::{build_timer_context, TimerContext};
pub use live::{accept_frame, listen};
pub use resolver::DeadlineResolver;
