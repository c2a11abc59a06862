//! Idle screen state machine
//!
//! This module contains the idle display controller, its timer slots and the
//! snapshot type published to observers.

pub mod controller;
pub mod snapshot;
pub mod timer;

// Re-export main types
pub use controller::{
    IdleConfig, IdleController, IdlePhase, COUNTDOWN_START, IDLE_TIMEOUT, TICK_PERIOD,
    WARNING_TIMEOUT,
};
pub use snapshot::IdleSnapshot;
pub use timer::{Timer, TimerKind, TimerSet};
