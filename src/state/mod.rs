//! State management module
//!
//! This module contains the timer state machine, the screen it drives and the
//! controller that ties both to the clock and the preference store.

pub mod app_state;
pub mod duration_input;
pub mod screen_state;
pub mod timer_state;

// Re-export main types
pub use app_state::{AppState, TickerCommand};
pub use duration_input::parse_minutes_input;
pub use screen_state::{format_remaining, ScreenState};
pub use timer_state::{ResumeOutcome, TickOutcome, TimerPhase, TimerState};
