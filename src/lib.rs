//! Kiosk Idle - idle-screen controller for touch-screen kiosk displays
//!
//! This library decides when a kiosk shows its idle (attract) screen versus
//! its content, and serves the kiosk's supporting behaviours: language and
//! text-size preferences, QR codes for external links and video playback
//! policy for embedded players.

pub mod config;
pub mod display;
pub mod i18n;
pub mod idle;
pub mod state;
pub mod api;
pub mod qr;
pub mod tasks;
pub mod utils;
pub mod video;

// Re-export commonly used types
pub use config::Config;
pub use idle::{IdleController, IdlePhase, IdleSnapshot};
pub use state::AppState;
pub use api::create_router;
pub use utils::signals::shutdown_signal;
