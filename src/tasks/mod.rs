//! Background tasks module
//!
//! This module contains background tasks that run alongside the HTTP server.

pub mod idle_timer;

// Re-export main functions
pub use idle_timer::idle_timer_task;
