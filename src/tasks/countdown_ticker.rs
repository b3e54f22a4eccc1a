//! Countdown ticker background task

use std::{ops::ControlFlow, sync::Arc, time::Duration};
use tokio::{
    sync::broadcast::{error::RecvError, Receiver},
    time::{sleep, Instant},
};
use tracing::{debug, error, info, warn};

use crate::state::{timer_state::TICK_INTERVAL_MS, AppState, TickOutcome, TickerCommand};

/// Background task that delivers roughly one tick per second while the timer runs
///
/// `commands` must be subscribed before the first command is sent, otherwise
/// that command is never seen.
pub async fn countdown_ticker_task(state: Arc<AppState>, mut commands: Receiver<TickerCommand>) {
    info!("Starting countdown ticker task");

    loop {
        match commands.recv().await {
            Ok(TickerCommand::Start) => {
                debug!("Ticker started");
                if run_countdown(&state, &mut commands).await.is_break() {
                    break;
                }
            }
            Ok(TickerCommand::Stop) => {
                debug!("Ticker already idle");
            }
            Err(RecvError::Lagged(skipped)) => {
                warn!("Ticker missed {} commands, resyncing with timer state", skipped);
                let running = state
                    .get_timer_state()
                    .map(|timer| timer.is_running())
                    .unwrap_or(false);
                if running
                    && !state.is_suspended()
                    && run_countdown(&state, &mut commands).await.is_break()
                {
                    break;
                }
            }
            Err(RecvError::Closed) => break,
        }
    }

    info!("Countdown ticker task stopped");
}

/// Tick until the countdown expires or is cancelled
///
/// Breaks when the command channel is closed.
async fn run_countdown(
    state: &AppState,
    commands: &mut Receiver<TickerCommand>,
) -> ControlFlow<()> {
    // first tick right away so the display refreshes on start
    let next_tick = sleep(Duration::ZERO);
    tokio::pin!(next_tick);

    loop {
        tokio::select! {
            _ = &mut next_tick => {
                match state.tick() {
                    Ok(TickOutcome::Remaining(left)) => {
                        next_tick.as_mut().reset(Instant::now() + next_tick_delay(left));
                    }
                    Ok(TickOutcome::Expired) => {
                        info!("Countdown expired, ticker idle");
                        return ControlFlow::Continue(());
                    }
                    Ok(TickOutcome::Stale) => {
                        debug!("Timer no longer running, ticker idle");
                        return ControlFlow::Continue(());
                    }
                    Err(e) => {
                        error!("Failed to apply tick: {}", e);
                        next_tick
                            .as_mut()
                            .reset(Instant::now() + Duration::from_millis(TICK_INTERVAL_MS));
                    }
                }
            }

            command = commands.recv() => {
                match command {
                    // a restart may already have superseded this stop
                    Ok(TickerCommand::Stop) if state.is_ticking() => {
                        debug!("Ignoring stop, timer is running again");
                    }
                    Ok(TickerCommand::Stop) => {
                        debug!("Ticker cancelled");
                        return ControlFlow::Continue(());
                    }
                    Ok(TickerCommand::Start) => {
                        debug!("Ticker already running");
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        // stale ticks are ignored by the timer, so keep going
                        warn!("Ticker missed {} commands while counting down", skipped);
                    }
                    Err(RecvError::Closed) => return ControlFlow::Break(()),
                }
            }
        }
    }
}

/// Wait one tick interval, or less when the countdown ends sooner
fn next_tick_delay(remaining_ms: u64) -> Duration {
    Duration::from_millis(remaining_ms.clamp(1, TICK_INTERVAL_MS))
}
