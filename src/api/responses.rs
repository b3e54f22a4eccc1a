//! API request and response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::state::{ScreenState, TimerState};

/// Body of POST /set: the raw text of the minutes input
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetDurationRequest {
    pub minutes: String,
}

/// API response structure for button and lifecycle endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub screen: Option<ScreenState>,
}

impl ApiResponse {
    /// Create a new API response
    pub fn new(status: &str, message: String, screen: Option<ScreenState>) -> Self {
        Self {
            status: status.to_string(),
            message,
            timestamp: Utc::now(),
            screen,
        }
    }

    /// The command was applied
    pub fn ok(message: String, screen: ScreenState) -> Self {
        Self::new("ok", message, Some(screen))
    }

    /// The command was refused; `message` is the notice shown to the user
    pub fn rejected(message: String, screen: Option<ScreenState>) -> Self {
        Self::new("rejected", message, screen)
    }

    /// Something failed on our side
    pub fn error(message: String, screen: Option<ScreenState>) -> Self {
        Self::new("error", message, screen)
    }
}

/// Full status including the raw timer fields
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub screen: ScreenState,
    pub timer: TimerState,
    pub suspended: bool,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
