//! Owned timer slots for the idle controller
//!
//! Timers are plain deadlines measured on the controller's clock (elapsed time
//! since its origin). Nothing fires by itself: the owner asks the set which
//! timer is due and acts on it.

use std::time::Duration;
use serde::{Deserialize, Serialize};

/// The three scheduled callbacks the idle controller can own
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerKind {
    /// Inactivity window before the warning overlay
    Idle,
    /// Auto-resolve of the warning overlay
    Warning,
    /// One-second countdown tick while the overlay is shown
    Countdown,
}

impl TimerKind {
    /// Firing order for timers sharing the same deadline
    const PRIORITY: [TimerKind; 3] = [TimerKind::Countdown, TimerKind::Warning, TimerKind::Idle];
}

/// A pending scheduled callback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timer {
    pub deadline: Duration,
    pub period: Option<Duration>,
}

impl Timer {
    /// A one-shot timer firing `delay` after `now`
    pub fn once(now: Duration, delay: Duration) -> Self {
        Self {
            deadline: now + delay,
            period: None,
        }
    }

    /// A repeating timer whose first tick is one `period` after `now`
    pub fn repeating(now: Duration, period: Duration) -> Self {
        Self {
            deadline: now + period,
            period: Some(period),
        }
    }

    pub fn is_due(&self, now: Duration) -> bool {
        self.deadline <= now
    }

    /// The following occurrence of a repeating timer, scheduled from this
    /// deadline rather than from the time it was observed.
    pub fn next(&self) -> Option<Self> {
        self.period.map(|period| Self {
            deadline: self.deadline + period,
            period: Some(period),
        })
    }
}

/// Three independent timer slots, each either armed or empty
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimerSet {
    idle: Option<Timer>,
    warning: Option<Timer>,
    countdown: Option<Timer>,
}

impl TimerSet {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self, kind: TimerKind) -> &Option<Timer> {
        match kind {
            TimerKind::Idle => &self.idle,
            TimerKind::Warning => &self.warning,
            TimerKind::Countdown => &self.countdown,
        }
    }

    fn slot_mut(&mut self, kind: TimerKind) -> &mut Option<Timer> {
        match kind {
            TimerKind::Idle => &mut self.idle,
            TimerKind::Warning => &mut self.warning,
            TimerKind::Countdown => &mut self.countdown,
        }
    }

    pub fn get(&self, kind: TimerKind) -> Option<&Timer> {
        self.slot(kind).as_ref()
    }

    /// Arm a slot, replacing whatever it held
    pub fn arm(&mut self, kind: TimerKind, timer: Timer) {
        *self.slot_mut(kind) = Some(timer);
    }

    /// Clear a slot. Clearing an empty slot is a no-op.
    pub fn clear(&mut self, kind: TimerKind) -> Option<Timer> {
        self.slot_mut(kind).take()
    }

    /// Clear every slot regardless of prior state
    pub fn cancel_all(&mut self) {
        self.idle = None;
        self.warning = None;
        self.countdown = None;
    }

    pub fn is_armed(&self, kind: TimerKind) -> bool {
        self.slot(kind).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.armed().is_empty()
    }

    /// Armed slots in firing-priority order
    pub fn armed(&self) -> Vec<TimerKind> {
        TimerKind::PRIORITY
            .into_iter()
            .filter(|kind| self.is_armed(*kind))
            .collect()
    }

    pub fn next_deadline(&self) -> Option<Duration> {
        TimerKind::PRIORITY
            .into_iter()
            .filter_map(|kind| self.get(kind).map(|timer| timer.deadline))
            .min()
    }

    /// Remove and return the earliest timer due at `now`, if any
    pub fn take_due(&mut self, now: Duration) -> Option<(TimerKind, Timer)> {
        let kind = TimerKind::PRIORITY
            .into_iter()
            .filter_map(|kind| self.get(kind).map(|timer| (kind, *timer)))
            .filter(|(_, timer)| timer.is_due(now))
            .min_by_key(|(_, timer)| timer.deadline)
            .map(|(kind, _)| kind)?;

        self.clear(kind).map(|timer| (kind, timer))
    }
}
