//! State management module
//!
//! This module contains the shared application state and the preferences it
//! carries next to the idle controller.

pub mod app_state;
pub mod preferences;

// Re-export main types
pub use app_state::AppState;
pub use preferences::Preferences;
