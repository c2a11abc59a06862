//! Main application state management

use std::{
    sync::Mutex,
    time::{Duration, Instant},
};
use chrono::{DateTime, Utc};
use tokio::sync::{watch, Notify};
use tracing::{info, warn};

use crate::{
    display::TextSize,
    i18n::Language,
    idle::{IdleConfig, IdleController, IdleSnapshot},
    video::VideoPolicy,
};
use super::Preferences;

/// Application state shared by the HTTP handlers and the idle timer task.
///
/// Owns the single idle controller of the kiosk. Everything that reports
/// interaction or video state is handed an `Arc<AppState>`.
#[derive(Debug)]
pub struct AppState {
    /// The idle display controller
    controller: Mutex<IdleController>,
    /// Origin of the controller clock
    clock_origin: tokio::time::Instant,
    /// Language and text size
    preferences: Mutex<Preferences>,
    video_policy: VideoPolicy,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    last_action: Mutex<Option<String>>,
    last_action_time: Mutex<Option<DateTime<Utc>>>,
    /// Snapshot published after every idle state change
    snapshot_tx: watch::Sender<IdleSnapshot>,
    /// Keep the receiver alive to prevent channel closure
    _snapshot_rx: watch::Receiver<IdleSnapshot>,
    /// Wakes the idle timer task when the armed timers change
    timers_changed: Notify,
}

impl AppState {
    /// Create a new AppState showing the idle screen
    pub fn new(port: u16, host: String, idle_config: IdleConfig, preferences: Preferences) -> Self {
        let controller = IdleController::new(idle_config);
        let (snapshot_tx, snapshot_rx) = watch::channel(controller.snapshot());

        Self {
            controller: Mutex::new(controller),
            clock_origin: tokio::time::Instant::now(),
            preferences: Mutex::new(preferences),
            video_policy: VideoPolicy::default(),
            start_time: Instant::now(),
            port,
            host,
            last_action: Mutex::new(None),
            last_action_time: Mutex::new(None),
            snapshot_tx,
            _snapshot_rx: snapshot_rx,
            timers_changed: Notify::new(),
        }
    }

    /// Elapsed time on the controller clock
    pub fn now(&self) -> Duration {
        self.clock_origin.elapsed()
    }

    /// Apply a transition to the controller and notify observers
    pub fn update_idle<F>(&self, action: &str, updater: F) -> Result<IdleSnapshot, String>
    where
        F: FnOnce(&mut IdleController, Duration),
    {
        let mut controller = self.controller.lock()
            .map_err(|e| format!("Failed to lock idle controller: {}", e))?;

        let timers_before = controller.timers().clone();
        updater(&mut *controller, self.now());
        let timers_changed = *controller.timers() != timers_before;
        let snapshot = controller.snapshot();
        // Publish under the lock so observers see transitions in order
        self.publish(snapshot.clone());
        drop(controller);

        // Update last action tracking
        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action.to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }

        if timers_changed {
            self.timers_changed.notify_one();
        }

        Ok(snapshot)
    }

    /// Any interaction on the kiosk content
    pub fn notify_interaction(&self) -> Result<IdleSnapshot, String> {
        self.update_idle("interaction", |controller, now| controller.notify_interaction(now))
    }

    /// Video player state change
    pub fn set_video_playing(&self, playing: bool) -> Result<IdleSnapshot, String> {
        info!("Setting video playing to: {}", playing);
        self.update_idle(
            if playing { "video-play" } else { "video-stop" },
            |controller, now| controller.set_video_playing(playing, now),
        )
    }

    /// The visitor touched the idle screen
    pub fn dismiss_idle_screen(&self) -> Result<IdleSnapshot, String> {
        self.update_idle("idle-dismiss", |controller, now| controller.dismiss_idle_screen(now))
    }

    /// Go back to the idle screen now
    pub fn force_idle_screen(&self) -> Result<IdleSnapshot, String> {
        self.update_idle("idle-force", |controller, _| controller.force_idle_screen())
    }

    /// "Stay" action of the warning overlay
    pub fn cancel_warning_return(&self) -> Result<IdleSnapshot, String> {
        self.update_idle("warning-cancel", |controller, now| controller.cancel_warning_return(now))
    }

    /// Fire every controller timer that is due. Called by the idle timer task.
    pub fn fire_due_timers(&self) -> Result<usize, String> {
        let mut controller = self.controller.lock()
            .map_err(|e| format!("Failed to lock idle controller: {}", e))?;

        let fired = controller.advance(self.now());
        if fired > 0 {
            self.publish(controller.snapshot());
        }

        Ok(fired)
    }

    /// Instant at which the next controller timer is due
    pub fn next_deadline(&self) -> Result<Option<tokio::time::Instant>, String> {
        self.controller.lock()
            .map(|controller| controller.next_deadline().map(|d| self.clock_origin + d))
            .map_err(|e| format!("Failed to lock idle controller: {}", e))
    }

    /// Resolves once a transition has changed the armed timers
    pub async fn timers_changed(&self) {
        self.timers_changed.notified().await
    }

    /// Release all timers before exit
    pub fn shutdown(&self) -> Result<(), String> {
        let mut controller = self.controller.lock()
            .map_err(|e| format!("Failed to lock idle controller: {}", e))?;

        controller.cancel_all();
        self.publish(controller.snapshot());
        drop(controller);

        self.timers_changed.notify_one();
        info!("Idle timers cancelled");
        Ok(())
    }

    /// Get current idle snapshot
    pub fn get_idle_snapshot(&self) -> Result<IdleSnapshot, String> {
        self.controller.lock()
            .map(|controller| controller.snapshot())
            .map_err(|e| format!("Failed to lock idle controller: {}", e))
    }

    /// Watch idle snapshots as they are published
    pub fn subscribe(&self) -> watch::Receiver<IdleSnapshot> {
        self.snapshot_tx.subscribe()
    }

    fn publish(&self, snapshot: IdleSnapshot) {
        if let Err(e) = self.snapshot_tx.send(snapshot) {
            warn!("Failed to send idle snapshot: {}", e);
        }
    }

    /// Get current preferences
    pub fn get_preferences(&self) -> Result<Preferences, String> {
        self.preferences.lock()
            .map(|preferences| preferences.clone())
            .map_err(|e| format!("Failed to lock preferences: {}", e))
    }

    /// Switch the kiosk language
    pub fn set_language(&self, language: Language) -> Result<Preferences, String> {
        let mut preferences = self.preferences.lock()
            .map_err(|e| format!("Failed to lock preferences: {}", e))?;

        info!("Setting language to: {}", language);
        preferences.language = language;
        Ok(preferences.clone())
    }

    /// Change the text size
    pub fn set_text_size(&self, text_size: TextSize) -> Result<Preferences, String> {
        let mut preferences = self.preferences.lock()
            .map_err(|e| format!("Failed to lock preferences: {}", e))?;

        info!("Setting text size to: {}", text_size);
        preferences.text_size = text_size;
        Ok(preferences.clone())
    }

    /// Warning overlay text in the current language
    pub fn warning_message(&self) -> Result<&'static str, String> {
        self.get_preferences()
            .map(|preferences| preferences.language.warning_message())
    }

    pub fn video_policy(&self) -> &VideoPolicy {
        &self.video_policy
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::idle::{IdlePhase, TimerKind};

    fn state() -> AppState {
        AppState::new(0, "127.0.0.1".to_string(), IdleConfig::default(), Preferences::default())
    }

    #[tokio::test(start_paused = true)]
    async fn operations_publish_snapshots() {
        let state = state();
        let mut rx = state.subscribe();
        assert_eq!(rx.borrow_and_update().phase, IdlePhase::IdleScreen);

        state.dismiss_idle_screen().unwrap();
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().phase, IdlePhase::Waiting);

        let (action, time) = state.get_last_action();
        assert_eq!(action.as_deref(), Some("idle-dismiss"));
        assert!(time.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn next_deadline_is_on_the_tokio_clock() {
        let state = state();
        assert_eq!(state.next_deadline().unwrap(), None);

        let before = tokio::time::Instant::now();
        state.dismiss_idle_screen().unwrap();
        let deadline = state.next_deadline().unwrap().unwrap();
        assert!(deadline >= before + Duration::from_secs(60));

        tokio::time::advance(Duration::from_secs(60)).await;
        assert_eq!(state.fire_due_timers().unwrap(), 1);
        assert!(state.get_idle_snapshot().unwrap().warning_active);
    }

    #[tokio::test(start_paused = true)]
    async fn timer_change_wakes_waiter() {
        let state = state();
        state.dismiss_idle_screen().unwrap();
        // the stored permit completes immediately
        tokio::time::timeout(Duration::from_millis(1), state.timers_changed())
            .await
            .unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_cancels_timers() {
        let state = state();
        state.dismiss_idle_screen().unwrap();
        state.shutdown().unwrap();

        let snapshot = state.get_idle_snapshot().unwrap();
        assert!(snapshot.armed.is_empty());
        assert_eq!(state.next_deadline().unwrap(), None);
        assert!(!snapshot.armed.contains(&TimerKind::Idle));
    }

    #[tokio::test]
    async fn preferences_drive_warning_text() {
        let state = AppState::new(
            0,
            "127.0.0.1".to_string(),
            IdleConfig::default(),
            Preferences::default(),
        );
        assert_eq!(state.warning_message().unwrap(), Language::Fr.warning_message());

        state.set_language(Language::Eus).unwrap();
        state.set_text_size(TextSize::Large).unwrap();

        let preferences = state.get_preferences().unwrap();
        assert_eq!(preferences.language, Language::Eus);
        assert_eq!(preferences.text_size, TextSize::Large);
        assert_eq!(state.warning_message().unwrap(), Language::Eus.warning_message());
    }
}
