//! Countdown Timer - A single-screen countdown timer served over HTTP
//!
//! This library provides the timer state machine, the screen it drives, a
//! ticking background task and a flat preference store that keeps the timer
//! across suspension.

pub mod config;
pub mod error;
pub mod state;
pub mod api;
pub mod services;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use error::TimerError;
pub use state::AppState;
pub use api::create_router;
pub use utils::signals::shutdown_signal;
