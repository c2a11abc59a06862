//! Idle timer background task

use std::{sync::Arc, time::Duration};
use tokio::time::{sleep, sleep_until};
use tracing::{debug, error, info};

use crate::state::AppState;

/// Background task that fires the idle controller's timers when they are due.
///
/// Sleeps until the earliest armed deadline, or until a transition changes
/// the armed timers, whichever comes first.
pub async fn idle_timer_task(state: Arc<AppState>) {
    info!("Starting idle timer task");

    loop {
        let deadline = match state.next_deadline() {
            Ok(deadline) => deadline,
            Err(e) => {
                error!("Failed to read next idle deadline: {}", e);
                // Wait a bit before retrying
                sleep(Duration::from_secs(1)).await;
                continue;
            }
        };

        let Some(deadline) = deadline else {
            debug!("No idle timer armed, waiting for a transition");
            state.timers_changed().await;
            continue;
        };

        tokio::select! {
            _ = sleep_until(deadline) => {
                match state.fire_due_timers() {
                    Ok(fired) => debug!("Fired {} idle timer(s)", fired),
                    Err(e) => error!("Failed to fire idle timers: {}", e),
                }
            }

            _ = state.timers_changed() => {
                debug!("Idle timers changed, recomputing deadline");
            }
        }
    }
}
