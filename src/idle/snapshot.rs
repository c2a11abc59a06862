//! Observable view of the idle controller

use serde::{Deserialize, Serialize};

use super::{controller::IdlePhase, timer::TimerKind};

/// Everything a renderer needs to draw the idle state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdleSnapshot {
    pub phase: IdlePhase,
    pub visible: bool,
    pub warning_active: bool,
    pub countdown: u8,
    pub video_playing: bool,
    pub armed: Vec<TimerKind>,
    /// Earliest armed deadline, in milliseconds on the controller clock
    pub next_deadline_ms: Option<u64>,
}

impl Default for IdleSnapshot {
    fn default() -> Self {
        super::IdleController::default().snapshot()
    }
}
