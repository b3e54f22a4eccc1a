//! HTTP endpoint handlers

use std::sync::Arc;
use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
};
use tracing::{error, info, warn};

use crate::{
    error::TimerError,
    state::{AppState, ResumeOutcome},
};
use super::responses::{ApiResponse, HealthResponse, SetDurationRequest, StatusResponse};

type ApiResult = Result<Json<ApiResponse>, (StatusCode, Json<ApiResponse>)>;

/// Turn a failed command into a status code and a notice for the user
fn rejection(state: &AppState, err: TimerError) -> (StatusCode, Json<ApiResponse>) {
    let screen = state.get_screen().ok();

    if err.is_input_error() {
        warn!("Input rejected: {}", err);
        (StatusCode::BAD_REQUEST, Json(ApiResponse::rejected(err.to_string(), screen)))
    } else if err.is_state_conflict() {
        warn!("Command rejected: {}", err);
        (StatusCode::CONFLICT, Json(ApiResponse::rejected(err.to_string(), screen)))
    } else {
        error!("Command failed: {:#}", err);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error(err.to_string(), screen)),
        )
    }
}

/// Handle POST /set - Set the configured duration from the minutes input
pub async fn set_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SetDurationRequest>,
) -> ApiResult {
    match state.set_duration(&request.minutes) {
        Ok(screen) => {
            info!("Set endpoint called - duration set to {}", screen.display);
            Ok(Json(ApiResponse::ok(format!("Timer set to {}", screen.display), screen)))
        }
        Err(e) => Err(rejection(&state, e)),
    }
}

/// Handle POST /start-pause - Start, resume or pause the countdown
pub async fn start_pause_handler(State(state): State<Arc<AppState>>) -> ApiResult {
    match state.toggle_start_pause() {
        Ok(screen) => {
            let message = if screen.start_pause_label == "Pause" {
                "Timer started"
            } else {
                "Timer paused"
            };
            info!("Start-pause endpoint called - {}", message);
            Ok(Json(ApiResponse::ok(message.to_string(), screen)))
        }
        Err(e) => Err(rejection(&state, e)),
    }
}

/// Handle POST /reset - Reset to the configured duration
pub async fn reset_handler(State(state): State<Arc<AppState>>) -> ApiResult {
    match state.reset() {
        Ok(screen) => {
            info!("Reset endpoint called");
            Ok(Json(ApiResponse::ok("Timer reset".to_string(), screen)))
        }
        Err(e) => Err(rejection(&state, e)),
    }
}

/// Handle POST /suspend - Persist the timer and stop ticking
pub async fn suspend_handler(State(state): State<Arc<AppState>>) -> ApiResult {
    if let Err(e) = state.suspend() {
        return Err(rejection(&state, e));
    }

    match state.get_screen() {
        Ok(screen) => Ok(Json(ApiResponse::ok("Timer suspended".to_string(), screen))),
        Err(e) => Err(rejection(&state, e)),
    }
}

/// Handle POST /resume - Reload the timer and catch up with the wall clock
pub async fn resume_handler(State(state): State<Arc<AppState>>) -> ApiResult {
    let outcome = match state.resume() {
        Ok(outcome) => outcome,
        Err(e) => return Err(rejection(&state, e)),
    };

    let message = match outcome {
        ResumeOutcome::Stopped => "Timer resumed",
        ResumeOutcome::Ticking => "Timer resumed and running",
        ResumeOutcome::ExpiredWhileAway => "Timer finished while suspended",
    };

    match state.get_screen() {
        Ok(screen) => Ok(Json(ApiResponse::ok(message.to_string(), screen))),
        Err(e) => Err(rejection(&state, e)),
    }
}

/// Handle GET /status - Return the screen and the raw timer fields
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Result<Json<StatusResponse>, StatusCode> {
    let timer = match state.get_timer_state() {
        Ok(t) => t,
        Err(e) => {
            error!("Failed to get timer state: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let (last_action, last_action_time) = state.get_last_action();

    Ok(Json(StatusResponse {
        screen: (&timer).into(),
        timer,
        suspended: state.is_suspended(),
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    }))
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
