//! Validation of the minutes text input

use crate::error::TimerError;

pub const MILLIS_PER_MINUTE: u64 = 60_000;

/// Parse the minutes typed into the input field into a duration in milliseconds
pub fn parse_minutes_input(input: &str) -> Result<u64, TimerError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(TimerError::EmptyInput);
    }

    let minutes: i64 = input
        .parse()
        .map_err(|_| TimerError::InvalidNumber(input.to_string()))?;
    if minutes <= 0 {
        return Err(TimerError::NonPositive);
    }

    u64::try_from(minutes)
        .ok()
        .and_then(|m| m.checked_mul(MILLIS_PER_MINUTE))
        .filter(|ms| i64::try_from(*ms).is_ok())
        .ok_or(TimerError::TooLarge)
}
