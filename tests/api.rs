// Integration tests for the HTTP surface of the timer screen
use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use countdown_timer::{
    api::responses::{ApiResponse, StatusResponse},
    create_router,
    services::{JsonFileStore, PreferenceStore},
    state::TimerPhase,
    utils::{Clock, ManualClock},
    AppState,
};
use serde::de::DeserializeOwned;
use tower::ServiceExt;

const NOW: i64 = 1_700_000_000_000;

struct Harness {
    clock: Arc<ManualClock>,
    store: Arc<JsonFileStore>,
    state: Arc<AppState>,
    router: Router,
    _dir: tempfile::TempDir,
}

impl Harness {
    fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let clock = Arc::new(ManualClock::new(NOW));
        let store = Arc::new(JsonFileStore::new(dir.path().join("prefs.json")));
        let state = Self::state(&clock, &store);
        let router = create_router(Arc::clone(&state));
        Self {
            clock,
            store,
            state,
            router,
            _dir: dir,
        }
    }

    fn state(clock: &Arc<ManualClock>, store: &Arc<JsonFileStore>) -> Arc<AppState> {
        let state = Arc::new(AppState::new(
            20553,
            "127.0.0.1".to_string(),
            600_000,
            Arc::clone(clock) as Arc<dyn Clock>,
            Arc::clone(store) as Arc<dyn PreferenceStore>,
        ));
        state.resume().expect("Failed to resume");
        state
    }

    /// Simulate the process being stopped and started again
    fn restart(&mut self) {
        self.state.suspend().expect("Failed to suspend");
        self.state = Self::state(&self.clock, &self.store);
        self.router = create_router(Arc::clone(&self.state));
    }

    async fn send<T: DeserializeOwned>(&self, method: Method, uri: &str, body: Option<&str>) -> (StatusCode, T) {
        let mut request = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                request = request.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(request.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    async fn post(&self, uri: &str) -> (StatusCode, ApiResponse) {
        self.send(Method::POST, uri, None).await
    }

    async fn set(&self, minutes: &str) -> (StatusCode, ApiResponse) {
        let body = serde_json::json!({ "minutes": minutes }).to_string();
        self.send(Method::POST, "/set", Some(&body)).await
    }

    async fn status(&self) -> StatusResponse {
        let (code, status) = self.send(Method::GET, "/status", None).await;
        assert_eq!(code, StatusCode::OK);
        status
    }
}

#[tokio::test]
async fn test_health() {
    let harness = Harness::new();
    let (code, body): (StatusCode, serde_json::Value) =
        harness.send(Method::GET, "/health", None).await;
    assert_eq!(code, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_first_launch_status() {
    let harness = Harness::new();
    let status = harness.status().await;
    assert_eq!(status.screen.display, "10:00");
    assert_eq!(status.screen.phase, TimerPhase::Idle);
    assert!(!status.suspended);
    assert_eq!(status.timer.configured_duration_ms(), 600_000);
}

#[tokio::test]
async fn test_set_start_pause_reset_flow() {
    let harness = Harness::new();

    let (code, body) = harness.set("25").await;
    assert_eq!(code, StatusCode::OK);
    assert_eq!(body.screen.as_ref().unwrap().display, "25:00");

    let (code, body) = harness.post("/start-pause").await;
    assert_eq!(code, StatusCode::OK);
    assert_eq!(body.message, "Timer started");
    let screen = body.screen.unwrap();
    assert!(!screen.input_visible);
    assert!(!screen.reset_visible);

    harness.clock.advance(65_000);
    let (_, body) = harness.post("/start-pause").await;
    assert_eq!(body.message, "Timer paused");
    let screen = body.screen.unwrap();
    assert_eq!(screen.display, "23:55");
    assert!(screen.reset_visible);

    let (code, body) = harness.post("/reset").await;
    assert_eq!(code, StatusCode::OK);
    assert_eq!(body.screen.unwrap().display, "25:00");
}

#[tokio::test]
async fn test_bad_input_is_rejected_with_notice() {
    let harness = Harness::new();

    for (input, notice) in [
        ("", "Field can't be empty"),
        ("0", "Please enter a positive number"),
        ("soon", "Please enter a valid number"),
    ] {
        let (code, body) = harness.set(input).await;
        assert_eq!(code, StatusCode::BAD_REQUEST);
        assert_eq!(body.status, "rejected");
        assert_eq!(body.message, notice);
        assert_eq!(body.screen.unwrap().display, "10:00");
    }
}

#[tokio::test]
async fn test_set_while_running_conflicts() {
    let harness = Harness::new();
    harness.post("/start-pause").await;

    let (code, body) = harness.set("3").await;
    assert_eq!(code, StatusCode::CONFLICT);
    assert_eq!(body.status, "rejected");
}

#[tokio::test]
async fn test_suspend_blocks_commands_until_resume() {
    let harness = Harness::new();

    let (code, _) = harness.post("/suspend").await;
    assert_eq!(code, StatusCode::OK);
    assert!(harness.status().await.suspended);

    let (code, body) = harness.post("/start-pause").await;
    assert_eq!(code, StatusCode::CONFLICT);
    assert_eq!(body.message, "Timer is suspended");

    let (code, body) = harness.post("/resume").await;
    assert_eq!(code, StatusCode::OK);
    assert_eq!(body.message, "Timer resumed");
}

#[tokio::test]
async fn test_running_timer_survives_restart() {
    let mut harness = Harness::new();
    harness.set("2").await;
    harness.post("/start-pause").await;

    harness.clock.advance(45_000);
    harness.restart();

    let status = harness.status().await;
    assert_eq!(status.timer.remaining_ms(), 75_000);
    assert_eq!(status.screen.phase, TimerPhase::Running);
    assert_eq!(status.screen.display, "01:15");
}

#[tokio::test]
async fn test_timer_finished_while_away() {
    let harness = Harness::new();
    harness.set("1").await;
    harness.post("/start-pause").await;
    harness.post("/suspend").await;

    harness.clock.advance(120_000);
    let (code, body) = harness.post("/resume").await;
    assert_eq!(code, StatusCode::OK);
    assert_eq!(body.message, "Timer finished while suspended");

    let screen = body.screen.unwrap();
    assert_eq!(screen.display, "00:00");
    assert!(!screen.start_pause_visible);
    assert!(screen.reset_visible);

    let (code, body) = harness.post("/start-pause").await;
    assert_eq!(code, StatusCode::CONFLICT);
    assert_eq!(body.message, "Nothing left to count down, reset the timer first");
}
