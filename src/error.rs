//! Error types for timer operations

use thiserror::Error;

/// Errors produced by timer commands and lifecycle operations
#[derive(Debug, Error)]
pub enum TimerError {
    #[error("Field can't be empty")]
    EmptyInput,

    #[error("Please enter a valid number")]
    InvalidNumber(String),

    #[error("Please enter a positive number")]
    NonPositive,

    #[error("Duration is too large")]
    TooLarge,

    #[error("Timer is running, pause it first")]
    Running,

    #[error("Nothing left to count down, reset the timer first")]
    NothingLeft,

    #[error("Timer is suspended")]
    Suspended,

    #[error("Failed to lock timer state: {0}")]
    Lock(String),

    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

impl TimerError {
    /// Rejections caused by what the user typed
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::EmptyInput | Self::InvalidNumber(_) | Self::NonPositive | Self::TooLarge
        )
    }

    /// Rejections caused by the command not being available in the current phase
    pub fn is_state_conflict(&self) -> bool {
        matches!(self, Self::Running | Self::NothingLeft | Self::Suspended)
    }
}
