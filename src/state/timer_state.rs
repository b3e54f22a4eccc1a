//! Timer state structure and the countdown state machine

use serde::{Deserialize, Serialize};

use crate::{error::TimerError, services::Preferences};

/// Duration used on first launch when nothing was stored yet (10 minutes)
pub const DEFAULT_DURATION_MS: u64 = 600_000;

/// Nominal period between two ticks
pub const TICK_INTERVAL_MS: u64 = 1_000;

/// Keys of the persisted snapshot
pub mod keys {
    pub const CONFIGURED_DURATION: &str = "start_time_in_millis";
    pub const REMAINING: &str = "millis_left";
    pub const RUNNING: &str = "timer_running";
    pub const END_TIME: &str = "end_time";
}

/// Phase of the timer as seen by the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerPhase {
    Idle,
    Running,
    Paused,
}

/// Result of applying one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The timer is not running; the tick arrived after a pause, reset or suspend
    Stale,
    /// Still counting down, with this many milliseconds left
    Remaining(u64),
    /// The countdown reached zero on this tick
    Expired,
}

/// Result of reloading a snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResumeOutcome {
    /// The timer was not running when suspended
    Stopped,
    /// The timer was running and still has time left
    Ticking,
    /// The timer was running and ran out while suspended
    ExpiredWhileAway,
}

/// Timer state for tracking the countdown
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerState {
    configured_duration_ms: u64,
    remaining_ms: u64,
    running: bool,
    end_time_ms: i64,
}

impl TimerState {
    /// Create an idle timer holding the full configured duration
    pub fn new(configured_duration_ms: u64) -> Self {
        Self {
            configured_duration_ms,
            remaining_ms: configured_duration_ms,
            running: false,
            end_time_ms: 0,
        }
    }

    pub fn configured_duration_ms(&self) -> u64 {
        self.configured_duration_ms
    }

    pub fn remaining_ms(&self) -> u64 {
        self.remaining_ms
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Absolute end of the countdown, meaningful only while running
    pub fn end_time_ms(&self) -> Option<i64> {
        self.running.then_some(self.end_time_ms)
    }

    pub fn phase(&self) -> TimerPhase {
        if self.running {
            TimerPhase::Running
        } else if self.remaining_ms > 0 && self.remaining_ms < self.configured_duration_ms {
            TimerPhase::Paused
        } else {
            TimerPhase::Idle
        }
    }

    /// Replace the configured duration and reset to it
    pub fn set_duration(&mut self, duration_ms: u64) -> Result<(), TimerError> {
        if self.running {
            return Err(TimerError::Running);
        }
        self.configured_duration_ms = duration_ms;
        self.reset();
        Ok(())
    }

    /// Start (or resume) counting down from the remaining time
    pub fn start(&mut self, now_ms: i64) -> Result<(), TimerError> {
        if self.running {
            return Err(TimerError::Running);
        }
        if self.remaining_ms == 0 {
            return Err(TimerError::NothingLeft);
        }
        self.end_time_ms = now_ms.saturating_add(to_i64(self.remaining_ms));
        self.running = true;
        Ok(())
    }

    /// Freeze the remaining time at `now_ms`
    pub fn pause(&mut self, now_ms: i64) {
        if !self.running {
            return;
        }
        self.remaining_ms = self.remaining_at(now_ms);
        self.running = false;
    }

    /// Back to the full configured duration, not running
    pub fn reset(&mut self) {
        self.remaining_ms = self.configured_duration_ms;
        self.running = false;
    }

    /// Recompute the remaining time from the end timestamp
    pub fn tick(&mut self, now_ms: i64) -> TickOutcome {
        if !self.running {
            return TickOutcome::Stale;
        }
        self.remaining_ms = self.remaining_at(now_ms);
        if self.remaining_ms == 0 {
            self.running = false;
            TickOutcome::Expired
        } else {
            TickOutcome::Remaining(self.remaining_ms)
        }
    }

    /// Time left at `now_ms` while running, clamped to `0..=configured`
    pub fn remaining_at(&self, now_ms: i64) -> u64 {
        if !self.running {
            return self.remaining_ms;
        }
        let left = self.end_time_ms.saturating_sub(now_ms);
        u64::try_from(left)
            .unwrap_or(0)
            .min(self.configured_duration_ms)
    }

    /// Write the four snapshot entries
    pub fn to_preferences(&self, prefs: &mut Preferences) {
        prefs.put_long(keys::CONFIGURED_DURATION, to_i64(self.configured_duration_ms));
        prefs.put_long(keys::REMAINING, to_i64(self.remaining_ms));
        prefs.put_bool(keys::RUNNING, self.running);
        prefs.put_long(keys::END_TIME, self.end_time_ms);
    }

    /// Read a snapshot back, falling back to `default_duration_ms` on first launch
    ///
    /// The result is the state exactly as stored; call [`TimerState::resume`] to
    /// account for the time spent suspended.
    pub fn from_preferences(prefs: &Preferences, default_duration_ms: u64) -> Self {
        let configured_duration_ms = to_u64(
            prefs.get_long(keys::CONFIGURED_DURATION, to_i64(default_duration_ms)),
        );
        let remaining_ms = to_u64(prefs.get_long(keys::REMAINING, to_i64(configured_duration_ms)))
            .min(configured_duration_ms);
        let running = prefs.get_bool(keys::RUNNING, false);
        let end_time_ms = if running {
            prefs.get_long(keys::END_TIME, 0)
        } else {
            0
        };

        Self {
            configured_duration_ms,
            remaining_ms,
            running,
            end_time_ms,
        }
    }

    /// Catch up with the wall clock after a reload
    pub fn resume(&mut self, now_ms: i64) -> ResumeOutcome {
        if !self.running {
            return ResumeOutcome::Stopped;
        }

        if self.end_time_ms.saturating_sub(now_ms) <= 0 {
            self.remaining_ms = 0;
            self.running = false;
            return ResumeOutcome::ExpiredWhileAway;
        }

        self.remaining_ms = self.remaining_at(now_ms);
        self.end_time_ms = now_ms.saturating_add(to_i64(self.remaining_ms));
        ResumeOutcome::Ticking
    }
}

impl Default for TimerState {
    fn default() -> Self {
        Self::new(DEFAULT_DURATION_MS)
    }
}

fn to_i64(ms: u64) -> i64 {
    i64::try_from(ms).unwrap_or(i64::MAX)
}

fn to_u64(ms: i64) -> u64 {
    u64::try_from(ms).unwrap_or(0)
}
