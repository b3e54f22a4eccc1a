//! What the single timer screen shows

use serde::{Deserialize, Serialize};

use super::{timer_state::TICK_INTERVAL_MS, TimerPhase, TimerState};

/// Derived view of the timer: display text and control visibility
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenState {
    /// Remaining time as `H:MM:SS` or `MM:SS`
    pub display: String,
    pub phase: TimerPhase,
    /// The minutes text input and its Set button
    pub input_visible: bool,
    pub start_pause_label: String,
    pub start_pause_visible: bool,
    pub reset_visible: bool,
}

impl ScreenState {
    pub fn from_timer(timer: &TimerState) -> Self {
        let remaining = timer.remaining_ms();

        if timer.is_running() {
            Self {
                display: format_remaining(remaining),
                phase: timer.phase(),
                input_visible: false,
                start_pause_label: "Pause".to_string(),
                start_pause_visible: true,
                reset_visible: false,
            }
        } else {
            Self {
                display: format_remaining(remaining),
                phase: timer.phase(),
                input_visible: true,
                start_pause_label: "Start".to_string(),
                // less than a second left reads as 00:00
                start_pause_visible: remaining >= TICK_INTERVAL_MS,
                reset_visible: remaining < timer.configured_duration_ms(),
            }
        }
    }
}

impl From<&TimerState> for ScreenState {
    fn from(timer: &TimerState) -> Self {
        Self::from_timer(timer)
    }
}

/// Format milliseconds as `H:MM:SS` when at least an hour is left, `MM:SS` otherwise
pub fn format_remaining(remaining_ms: u64) -> String {
    let total_seconds = remaining_ms / 1000;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{:02}:{:02}", minutes, seconds)
    }
}
