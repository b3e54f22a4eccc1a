//! Countdown Timer - A single-screen countdown timer served over HTTP
//!
//! This is the main entry point for the countdown-timer application.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use countdown_timer::{
    config::Config,
    state::AppState,
    api::create_router,
    services::{JsonFileStore, MemoryStore, PreferenceStore},
    tasks::countdown_ticker_task,
    utils::{shutdown_signal, Clock, SystemClock},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("countdown_timer={},tower_http=info", config.log_level()))
        .init();

    info!("Starting countdown-timer server v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: host={}, port={}, default={}min",
          config.host, config.port, config.minutes);

    let store: Arc<dyn PreferenceStore> = if config.ephemeral {
        info!("Preferences kept in memory only");
        Arc::new(MemoryStore::new())
    } else {
        let store = JsonFileStore::new(config.state_path());
        info!("Preferences stored at {}", store.path().display());
        Arc::new(store)
    };
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    let state = Arc::new(AppState::new(
        config.port,
        config.host.clone(),
        config.default_duration_ms(),
        clock,
        store,
    ));

    // Subscribe before resuming so a running timer's start command is not lost
    let commands = state.subscribe_ticker();
    let ticker_state = Arc::clone(&state);
    tokio::spawn(async move {
        countdown_ticker_task(ticker_state, commands).await;
    });

    state.resume()?;

    // Create HTTP router with all endpoints
    let app = create_router(Arc::clone(&state));

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /set         - Set duration from {{\"minutes\": \"..\"}}");
    info!("  POST /start-pause - Start, resume or pause the countdown");
    info!("  POST /reset       - Reset to the configured duration");
    info!("  POST /suspend     - Save the timer and stop ticking");
    info!("  POST /resume      - Reload the timer and continue");
    info!("  GET  /status      - Current screen and timer fields");
    info!("  GET  /health      - Health check");

    let server = axum::serve(listener, app);
    let shutdown = async {
        match shutdown_signal().await {
            Ok(()) => info!("Shutdown signal received"),
            Err(e) => {
                // Without signal handling the server simply runs until killed
                tracing::error!("Failed to listen for signals: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown => {}
    }

    // Leaving the process is a suspension: persist so the next start can catch up
    state.suspend()?;

    info!("Server shutdown complete");
    Ok(())
}
