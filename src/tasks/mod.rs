//! Background tasks module
//!
//! This module contains the tasks that make up a running countdown widget.

pub mod live_updates;
pub mod poller;
pub mod tick;

// Re-export main functions
pub use live_updates::live_update_task;
pub use poller::deadline_poll_task;
pub use tick::countdown_tick_task;
