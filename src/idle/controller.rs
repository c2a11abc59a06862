//! Idle display controller
//!
//! Decides whether the kiosk shows its idle screen or active content. After an
//! inactivity window the controller raises a countdown warning; if nobody
//! reacts before the countdown ends (or the warning auto-resolves) the idle
//! screen comes back. A playing video suspends all of this.
//!
//! The controller owns no clock. Every operation takes `now`, the elapsed time
//! since the owner's clock origin, and the owner calls [`IdleController::advance`]
//! whenever [`IdleController::next_deadline`] has passed.

use std::time::Duration;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{
    snapshot::IdleSnapshot,
    timer::{Timer, TimerKind, TimerSet},
};

/// Inactivity window before the warning overlay appears
pub const IDLE_TIMEOUT: Duration = Duration::from_millis(60_000);
/// Warning overlay auto-resolves to the idle screen after this long
pub const WARNING_TIMEOUT: Duration = Duration::from_millis(10_000);
/// Countdown tick period
pub const TICK_PERIOD: Duration = Duration::from_millis(1_000);
/// Countdown start value, in ticks
pub const COUNTDOWN_START: u8 = 5;

/// Timing parameters of the idle controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdleConfig {
    pub idle_timeout: Duration,
    pub warning_timeout: Duration,
    pub tick_period: Duration,
    pub countdown_start: u8,
}

impl Default for IdleConfig {
    fn default() -> Self {
        Self {
            idle_timeout: IDLE_TIMEOUT,
            warning_timeout: WARNING_TIMEOUT,
            tick_period: TICK_PERIOD,
            countdown_start: COUNTDOWN_START,
        }
    }
}

/// What the display currently shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdlePhase {
    /// Idle screen shown, no timer armed
    IdleScreen,
    /// Content shown with no inactivity timer (video playing)
    Content,
    /// Content shown, inactivity timer running
    Waiting,
    /// Countdown overlay shown over the content
    Warning,
}

/// Idle session state and its three timer slots
#[derive(Debug, Clone)]
pub struct IdleController {
    config: IdleConfig,
    visible: bool,
    warning_active: bool,
    countdown: u8,
    video_playing: bool,
    timers: TimerSet,
}

impl IdleController {
    /// Create a controller showing the idle screen
    pub fn new(config: IdleConfig) -> Self {
        Self {
            countdown: config.countdown_start,
            config,
            visible: true,
            warning_active: false,
            video_playing: false,
            timers: TimerSet::new(),
        }
    }

    pub fn config(&self) -> &IdleConfig {
        &self.config
    }

    pub fn is_idle_screen_visible(&self) -> bool {
        self.visible
    }

    pub fn is_warning_active(&self) -> bool {
        self.warning_active
    }

    pub fn countdown_value(&self) -> u8 {
        self.countdown
    }

    pub fn is_video_playing(&self) -> bool {
        self.video_playing
    }

    pub fn timers(&self) -> &TimerSet {
        &self.timers
    }

    pub fn armed_timers(&self) -> Vec<TimerKind> {
        self.timers.armed()
    }

    pub fn next_deadline(&self) -> Option<Duration> {
        self.timers.next_deadline()
    }

    pub fn phase(&self) -> IdlePhase {
        if self.visible {
            IdlePhase::IdleScreen
        } else if self.warning_active {
            IdlePhase::Warning
        } else if self.timers.is_armed(TimerKind::Idle) {
            IdlePhase::Waiting
        } else {
            IdlePhase::Content
        }
    }

    pub fn snapshot(&self) -> IdleSnapshot {
        IdleSnapshot {
            phase: self.phase(),
            visible: self.visible,
            warning_active: self.warning_active,
            countdown: self.countdown,
            video_playing: self.video_playing,
            armed: self.armed_timers(),
            next_deadline_ms: self.next_deadline().map(|d| d.as_millis() as u64),
        }
    }

    /// Release every timer. Safe to call in any state.
    pub fn cancel_all(&mut self) {
        self.timers.cancel_all();
    }

    /// Any interaction on the content. Ignored while the idle screen is shown.
    ///
    /// While the warning overlay is up, an interaction counts as the "stay"
    /// action: it behaves exactly like [`IdleController::cancel_warning_return`],
    /// hiding the overlay, resetting the countdown and restarting the window.
    pub fn notify_interaction(&mut self, now: Duration) {
        if self.visible {
            return;
        }

        if self.warning_active {
            // Touching the overlay counts as "stay"
            self.cancel_warning_return(now);
            return;
        }

        self.start_idle_timer(now);
    }

    /// Video players report play/pause/end here
    pub fn set_video_playing(&mut self, playing: bool, now: Duration) {
        self.video_playing = playing;

        if playing {
            debug!("Video playing, suspending idle timers");
            self.cancel_all();
            self.warning_active = false;
        } else if !self.visible {
            debug!("Video stopped, resuming inactivity window");
            self.start_idle_timer(now);
        }
    }

    /// The user touched the idle screen
    pub fn dismiss_idle_screen(&mut self, now: Duration) {
        self.cancel_all();
        self.visible = false;
        self.warning_active = false;
        self.countdown = self.config.countdown_start;
        info!("Idle screen dismissed");
        self.start_idle_timer(now);
    }

    /// Return to the idle screen immediately
    pub fn force_idle_screen(&mut self) {
        self.show_idle_screen();
    }

    /// The "stay" action of the warning overlay
    pub fn cancel_warning_return(&mut self, now: Duration) {
        self.cancel_all();
        self.warning_active = false;
        self.countdown = self.config.countdown_start;
        debug!("Warning cancelled, restarting inactivity window");
        self.start_idle_timer(now);
    }

    /// Fire every timer due at `now`, earliest first. Each fires at its own
    /// deadline so re-armed timers are scheduled without drift.
    ///
    /// Returns the number of timers fired.
    pub fn advance(&mut self, now: Duration) -> usize {
        let mut fired = 0;

        while let Some((kind, timer)) = self.timers.take_due(now) {
            fired += 1;
            match kind {
                TimerKind::Idle => self.on_idle_timeout(timer.deadline),
                TimerKind::Warning => self.on_warning_timeout(),
                TimerKind::Countdown => self.on_countdown_tick(timer),
            }
        }

        fired
    }

    fn start_idle_timer(&mut self, now: Duration) {
        self.cancel_all();

        if self.visible || self.video_playing {
            return;
        }

        self.timers
            .arm(TimerKind::Idle, Timer::once(now, self.config.idle_timeout));
    }

    fn show_idle_screen(&mut self) {
        self.cancel_all();
        self.visible = true;
        self.warning_active = false;
        self.countdown = self.config.countdown_start;
        info!("Showing idle screen");
    }

    fn on_idle_timeout(&mut self, at: Duration) {
        if self.video_playing {
            self.start_idle_timer(at);
            return;
        }

        self.cancel_all();
        self.warning_active = true;
        self.countdown = self.config.countdown_start;
        info!("Inactivity window elapsed, showing warning ({}s)", self.countdown);

        self.timers.arm(
            TimerKind::Countdown,
            Timer::repeating(at, self.config.tick_period),
        );
        self.timers.arm(
            TimerKind::Warning,
            Timer::once(at, self.config.warning_timeout),
        );
    }

    fn on_warning_timeout(&mut self) {
        if self.video_playing {
            self.cancel_all();
            return;
        }

        debug!("Warning auto-resolved");
        self.show_idle_screen();
    }

    fn on_countdown_tick(&mut self, tick: Timer) {
        if self.video_playing {
            self.warning_active = false;
            self.countdown = self.config.countdown_start;
            self.start_idle_timer(tick.deadline);
            return;
        }

        if !self.warning_active {
            return;
        }

        self.countdown = self.countdown.saturating_sub(1);
        debug!("Countdown: {}", self.countdown);

        if self.countdown == 0 {
            self.show_idle_screen();
        } else if let Some(next) = tick.next() {
            self.timers.arm(TimerKind::Countdown, next);
        }
    }
}

impl Default for IdleController {
    fn default() -> Self {
        Self::new(IdleConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    /// Controller in the warning phase; the overlay appeared at 60s
    fn in_warning() -> IdleController {
        let mut controller = IdleController::default();
        controller.dismiss_idle_screen(ms(0));
        controller.advance(ms(60_000));
        assert_eq!(controller.phase(), IdlePhase::Warning);
        controller
    }

    fn assert_invariants(controller: &IdleController) {
        if controller.is_warning_active() {
            assert!(!controller.is_idle_screen_visible());
        }
        if controller.is_video_playing() {
            assert!(controller.armed_timers().is_empty());
            assert!(!controller.is_warning_active());
        }
        if controller.is_idle_screen_visible() {
            assert!(controller.armed_timers().is_empty());
        }
        assert!(controller.countdown_value() <= COUNTDOWN_START);
    }

    #[test]
    fn starts_on_idle_screen_without_timers() {
        let controller = IdleController::default();
        assert_eq!(controller.phase(), IdlePhase::IdleScreen);
        assert_eq!(controller.countdown_value(), 5);
        assert!(controller.armed_timers().is_empty());
        assert_eq!(controller.next_deadline(), None);
    }

    #[test]
    fn dismiss_then_inactivity_shows_warning() {
        let mut controller = IdleController::default();
        controller.dismiss_idle_screen(ms(0));

        assert_eq!(controller.phase(), IdlePhase::Waiting);
        assert_eq!(controller.armed_timers(), vec![TimerKind::Idle]);

        assert_eq!(controller.advance(ms(59_999)), 0);
        assert_eq!(controller.phase(), IdlePhase::Waiting);

        assert_eq!(controller.advance(ms(60_000)), 1);
        assert_eq!(controller.phase(), IdlePhase::Warning);
        assert_eq!(controller.countdown_value(), 5);
        assert_eq!(
            controller.armed_timers(),
            vec![TimerKind::Countdown, TimerKind::Warning]
        );
        assert_invariants(&controller);
    }

    #[test]
    fn five_ticks_return_to_idle_screen() {
        let mut controller = in_warning();

        for second in 1..=4u64 {
            controller.advance(ms(60_000 + second * 1_000));
            assert_eq!(controller.countdown_value(), 5 - second as u8);
            assert_eq!(controller.phase(), IdlePhase::Warning);
        }

        controller.advance(ms(65_000));
        assert_eq!(controller.phase(), IdlePhase::IdleScreen);
        assert_eq!(controller.countdown_value(), 5);
        assert!(controller.armed_timers().is_empty());
        assert_invariants(&controller);
    }

    #[test]
    fn one_large_advance_fires_everything_in_order() {
        let mut controller = IdleController::default();
        controller.dismiss_idle_screen(ms(0));

        // idle timeout + five ticks; the warning timer is cleared by the last tick
        assert_eq!(controller.advance(ms(120_000)), 6);
        assert_eq!(controller.phase(), IdlePhase::IdleScreen);
        assert_eq!(controller.next_deadline(), None);
    }

    #[test]
    fn warning_auto_resolves_when_countdown_is_slower() {
        let mut controller = IdleController::new(IdleConfig {
            tick_period: ms(3_000),
            ..IdleConfig::default()
        });
        controller.dismiss_idle_screen(ms(0));
        controller.advance(ms(60_000));

        controller.advance(ms(69_999));
        assert_eq!(controller.phase(), IdlePhase::Warning);
        assert_eq!(controller.countdown_value(), 2);

        controller.advance(ms(70_000));
        assert_eq!(controller.phase(), IdlePhase::IdleScreen);
        assert_eq!(controller.countdown_value(), 5);
        assert!(controller.armed_timers().is_empty());
    }

    #[test]
    fn video_during_warning_hides_overlay_and_clears_timers() {
        let mut controller = in_warning();
        controller.advance(ms(62_000));

        controller.set_video_playing(true, ms(62_500));

        assert_eq!(controller.phase(), IdlePhase::Content);
        assert!(controller.is_video_playing());
        assert!(!controller.is_warning_active());
        assert!(controller.armed_timers().is_empty());
        assert_invariants(&controller);

        // nothing fires while the video plays
        assert_eq!(controller.advance(ms(600_000)), 0);
        assert_eq!(controller.phase(), IdlePhase::Content);
    }

    #[test]
    fn video_stop_restarts_inactivity_window() {
        let mut controller = IdleController::default();
        controller.dismiss_idle_screen(ms(0));
        controller.set_video_playing(true, ms(10_000));
        controller.set_video_playing(false, ms(200_000));

        assert_eq!(controller.phase(), IdlePhase::Waiting);
        assert_eq!(controller.next_deadline(), Some(ms(260_000)));
    }

    #[test]
    fn video_stop_on_idle_screen_arms_nothing() {
        let mut controller = IdleController::default();
        controller.set_video_playing(true, ms(0));
        controller.set_video_playing(false, ms(1_000));

        assert_eq!(controller.phase(), IdlePhase::IdleScreen);
        assert!(controller.armed_timers().is_empty());
    }

    #[test]
    fn idle_timeout_with_video_flag_arms_nothing() {
        // Reach the callback with the flag set but the slot still armed, as
        // happens when the flag flips between scheduling and firing.
        let mut controller = IdleController::default();
        controller.dismiss_idle_screen(ms(0));
        controller.video_playing = true;

        controller.advance(ms(60_000));
        assert!(!controller.is_warning_active());
        assert!(controller.armed_timers().is_empty());
    }

    #[test]
    fn tick_with_video_flag_returns_to_waiting() {
        let mut controller = in_warning();
        controller.video_playing = true;

        controller.advance(ms(61_000));
        assert!(!controller.is_warning_active());
        assert_eq!(controller.countdown_value(), 5);
        assert!(controller.armed_timers().is_empty());
    }

    #[test]
    fn cancel_just_before_auto_resolve_restarts_window() {
        let mut controller = IdleController::new(IdleConfig {
            tick_period: ms(3_000),
            ..IdleConfig::default()
        });
        controller.dismiss_idle_screen(ms(0));
        controller.advance(ms(60_000));
        controller.advance(ms(69_999));
        assert!(controller.countdown_value() > 0);

        controller.cancel_warning_return(ms(69_999));

        assert_eq!(controller.phase(), IdlePhase::Waiting);
        assert_eq!(controller.countdown_value(), 5);
        assert_eq!(controller.armed_timers(), vec![TimerKind::Idle]);
        assert_eq!(controller.next_deadline(), Some(ms(129_999)));
    }

    #[test]
    fn interactions_restart_window_without_drift() {
        let mut controller = IdleController::default();
        controller.dismiss_idle_screen(ms(0));

        for now in [5_000, 30_000, 59_000, 110_000] {
            controller.advance(ms(now));
            controller.notify_interaction(ms(now));
            assert_eq!(controller.next_deadline(), Some(ms(now + 60_000)));
            assert_eq!(controller.phase(), IdlePhase::Waiting);
        }
    }

    #[test]
    fn repeated_interaction_is_idempotent() {
        let mut once = IdleController::default();
        once.dismiss_idle_screen(ms(0));
        once.notify_interaction(ms(1_000));

        let mut many = IdleController::default();
        many.dismiss_idle_screen(ms(0));
        for _ in 0..10 {
            many.notify_interaction(ms(1_000));
        }

        assert_eq!(once.timers(), many.timers());
        assert_eq!(once.snapshot(), many.snapshot());
    }

    #[test]
    fn interaction_on_idle_screen_is_ignored() {
        let mut controller = IdleController::default();
        controller.notify_interaction(ms(1_000));
        assert_eq!(controller.phase(), IdlePhase::IdleScreen);
        assert!(controller.armed_timers().is_empty());
    }

    #[test]
    fn interaction_during_warning_acts_as_stay() {
        let mut controller = in_warning();
        controller.advance(ms(63_000));

        controller.notify_interaction(ms(63_500));
        assert_eq!(controller.phase(), IdlePhase::Waiting);
        assert_eq!(controller.countdown_value(), 5);
        assert_eq!(controller.next_deadline(), Some(ms(123_500)));
    }

    #[test]
    fn force_idle_screen_clears_everything() {
        let mut controller = in_warning();
        controller.force_idle_screen();

        assert_eq!(controller.phase(), IdlePhase::IdleScreen);
        assert!(controller.armed_timers().is_empty());
        assert_invariants(&controller);
    }

    #[test]
    fn cancel_all_is_total() {
        let mut controller = IdleController::default();
        controller.cancel_all();
        controller.cancel_all();

        let mut warning = in_warning();
        warning.cancel_all();
        assert!(warning.armed_timers().is_empty());
    }

    #[test]
    fn only_phase_timers_are_armed_after_each_operation() {
        let mut controller = IdleController::default();
        let mut now = 0u64;

        let steps: [fn(&mut IdleController, Duration); 6] = [
            |c, t| c.dismiss_idle_screen(t),
            |c, t| c.notify_interaction(t),
            |c, t| c.set_video_playing(true, t),
            |c, t| c.set_video_playing(false, t),
            |c, t| c.cancel_warning_return(t),
            |c, _| c.force_idle_screen(),
        ];

        for round in 0..30 {
            let step = steps[(round * 7 + 3) % steps.len()];
            now += 17_000;
            controller.advance(ms(now));
            step(&mut controller, ms(now));

            let armed = controller.armed_timers();
            match controller.phase() {
                IdlePhase::IdleScreen | IdlePhase::Content => assert!(armed.is_empty()),
                IdlePhase::Waiting => assert_eq!(armed, vec![TimerKind::Idle]),
                IdlePhase::Warning => {
                    assert_eq!(armed, vec![TimerKind::Countdown, TimerKind::Warning])
                }
            }
            assert_invariants(&controller);
        }
    }
}
