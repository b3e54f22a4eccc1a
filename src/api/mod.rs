//! HTTP API module
//!
//! This module contains all HTTP endpoint handlers and response structures.

pub mod handlers;
pub mod responses;

use std::sync::Arc;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use handlers::{
    health_handler, reset_handler, resume_handler, set_handler, start_pause_handler,
    status_handler, suspend_handler,
};

/// Create the HTTP router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/set", post(set_handler))
        .route("/start-pause", post(start_pause_handler))
        .route("/reset", post(reset_handler))
        // Lifecycle
        .route("/suspend", post(suspend_handler))
        .route("/resume", post(resume_handler))
        .route("/status", get(status_handler))
        .route("/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
