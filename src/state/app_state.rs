//! Main application state management

use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex, MutexGuard,
    },
    time::Instant,
};
use chrono::{DateTime, Utc};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use super::{
    duration_input::parse_minutes_input, ResumeOutcome, ScreenState, TickOutcome, TimerState,
};
use crate::{
    error::TimerError,
    services::{PreferenceStore, Preferences},
    utils::Clock,
};

/// Instructions for the countdown ticker task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickerCommand {
    /// Begin delivering ticks
    Start,
    /// Cancel any pending tick
    Stop,
}

/// What a user command did: the action to record and the ticker command to send
struct Applied {
    action: &'static str,
    ticker: Option<TickerCommand>,
}

impl Applied {
    fn new(action: &'static str, ticker: Option<TickerCommand>) -> Self {
        Self { action, ticker }
    }
}

/// Main application state: the screen controller behind the HTTP surface
#[derive(Debug)]
pub struct AppState {
    /// Timer fields, mutated only under this lock
    pub timer_state: Arc<Mutex<TimerState>>,
    /// Duration used when the store holds no snapshot yet
    pub default_duration_ms: u64,
    /// True between a suspend and the following resume
    suspended: AtomicBool,
    clock: Arc<dyn Clock>,
    store: Arc<dyn PreferenceStore>,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    pub last_action: Arc<Mutex<Option<String>>>,
    pub last_action_time: Arc<Mutex<Option<DateTime<Utc>>>>,
    /// Channel to start and cancel the ticker
    pub ticker_tx: broadcast::Sender<TickerCommand>,
}

impl AppState {
    /// Create a suspended AppState; call [`AppState::resume`] to load the stored snapshot
    pub fn new(
        port: u16,
        host: String,
        default_duration_ms: u64,
        clock: Arc<dyn Clock>,
        store: Arc<dyn PreferenceStore>,
    ) -> Self {
        let (ticker_tx, _) = broadcast::channel(16);

        Self {
            timer_state: Arc::new(Mutex::new(TimerState::new(default_duration_ms))),
            default_duration_ms,
            suspended: AtomicBool::new(true),
            clock,
            store,
            start_time: Instant::now(),
            port,
            host,
            last_action: Arc::new(Mutex::new(None)),
            last_action_time: Arc::new(Mutex::new(None)),
            ticker_tx,
        }
    }

    /// Subscribe to ticker commands
    pub fn subscribe_ticker(&self) -> broadcast::Receiver<TickerCommand> {
        self.ticker_tx.subscribe()
    }

    pub fn now_ms(&self) -> i64 {
        self.clock.now_ms()
    }

    pub fn is_suspended(&self) -> bool {
        self.suspended.load(Ordering::SeqCst)
    }

    /// Apply a user command to the timer and record it as the last action
    ///
    /// The ticker command is broadcast while the lock is still held, so the
    /// ticker sees commands in the same order as the state changes.
    fn update_timer<F>(&self, updater: F) -> Result<ScreenState, TimerError>
    where
        F: FnOnce(&mut TimerState, i64) -> Result<Applied, TimerError>,
    {
        if self.is_suspended() {
            return Err(TimerError::Suspended);
        }

        let mut timer = self.lock_timer()?;
        let applied = updater(&mut timer, self.now_ms())?;
        if let Some(command) = applied.ticker {
            self.notify_ticker(command);
        }
        let screen = ScreenState::from_timer(&timer);
        drop(timer); // Release the lock early

        self.record_action(applied.action);
        Ok(screen)
    }

    fn lock_timer(&self) -> Result<MutexGuard<'_, TimerState>, TimerError> {
        self.timer_state
            .lock()
            .map_err(|e| TimerError::Lock(e.to_string()))
    }

    fn record_action(&self, action: &str) {
        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action.to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }
    }

    fn notify_ticker(&self, command: TickerCommand) {
        if let Err(e) = self.ticker_tx.send(command) {
            warn!("Failed to send ticker command {:?}: {}", command, e);
        }
    }

    /// Whether ticks should still be delivered
    pub fn is_ticking(&self) -> bool {
        !self.is_suspended()
            && self
                .timer_state
                .lock()
                .map(|timer| timer.is_running())
                .unwrap_or(false)
    }

    /// Handle the Set button with the text of the minutes input
    pub fn set_duration(&self, input: &str) -> Result<ScreenState, TimerError> {
        let duration_ms = parse_minutes_input(input).inspect_err(|e| {
            warn!("Rejected duration input {:?}: {}", input, e);
        })?;

        let screen = self.update_timer(|timer, _| {
            timer.set_duration(duration_ms)?;
            Ok(Applied::new("set", None))
        })?;
        info!("Duration set to {} ms", duration_ms);
        Ok(screen)
    }

    /// Handle the Start/Pause button
    pub fn toggle_start_pause(&self) -> Result<ScreenState, TimerError> {
        let screen = self.update_timer(|timer, now| {
            if timer.is_running() {
                timer.pause(now);
                Ok(Applied::new("pause", Some(TickerCommand::Stop)))
            } else {
                timer.start(now)?;
                Ok(Applied::new("start", Some(TickerCommand::Start)))
            }
        })?;
        info!("Timer toggled to {:?} at {}", screen.phase, screen.display);
        Ok(screen)
    }

    /// Start or resume the countdown
    pub fn start(&self) -> Result<ScreenState, TimerError> {
        let screen = self.update_timer(|timer, now| {
            timer.start(now)?;
            Ok(Applied::new("start", Some(TickerCommand::Start)))
        })?;
        info!("Timer started with {} left", screen.display);
        Ok(screen)
    }

    /// Pause the countdown, freezing the remaining time
    pub fn pause(&self) -> Result<ScreenState, TimerError> {
        let screen = self.update_timer(|timer, now| {
            timer.pause(now);
            Ok(Applied::new("pause", Some(TickerCommand::Stop)))
        })?;
        info!("Timer paused at {}", screen.display);
        Ok(screen)
    }

    /// Handle the Reset button
    pub fn reset(&self) -> Result<ScreenState, TimerError> {
        let screen = self.update_timer(|timer, _| {
            timer.reset();
            Ok(Applied::new("reset", Some(TickerCommand::Stop)))
        })?;
        info!("Timer reset to {}", screen.display);
        Ok(screen)
    }

    /// Periodic callback: bring the remaining time up to date with the wall clock
    pub fn tick(&self) -> Result<TickOutcome, TimerError> {
        if self.is_suspended() {
            return Ok(TickOutcome::Stale);
        }

        let mut timer = self.lock_timer()?;
        let outcome = timer.tick(self.now_ms());
        let screen = ScreenState::from_timer(&timer);
        drop(timer);

        match outcome {
            TickOutcome::Remaining(_) => debug!("Tick: {} left", screen.display),
            TickOutcome::Expired => {
                info!("Countdown finished");
                self.record_action("finish");
            }
            TickOutcome::Stale => debug!("Ignoring stale tick"),
        }
        Ok(outcome)
    }

    /// Persist the timer snapshot and stop ticking
    pub fn suspend(&self) -> Result<(), TimerError> {
        if self.is_suspended() {
            debug!("Already suspended, nothing to save");
            return Ok(());
        }

        let timer = self.lock_timer()?;
        let mut prefs = Preferences::new();
        timer.to_preferences(&mut prefs);
        self.store.save(&prefs)?;
        self.suspended.store(true, Ordering::SeqCst);
        self.notify_ticker(TickerCommand::Stop);
        drop(timer);

        self.record_action("suspend");
        info!("Timer suspended, snapshot saved");
        Ok(())
    }

    /// Reload the stored snapshot and catch up with the time spent suspended
    pub fn resume(&self) -> Result<ResumeOutcome, TimerError> {
        if !self.is_suspended() {
            debug!("Not suspended, keeping current state");
            let running = self.get_timer_state()?.is_running();
            return Ok(if running {
                ResumeOutcome::Ticking
            } else {
                ResumeOutcome::Stopped
            });
        }

        let prefs = self.store.load().unwrap_or_else(|e| {
            warn!("Unreadable timer snapshot, starting from defaults: {:#}", e);
            Preferences::default()
        });
        let mut restored = TimerState::from_preferences(&prefs, self.default_duration_ms);
        let outcome = restored.resume(self.now_ms());

        let mut timer = self.lock_timer()?;
        *timer = restored;
        self.suspended.store(false, Ordering::SeqCst);
        if outcome == ResumeOutcome::Ticking {
            self.notify_ticker(TickerCommand::Start);
        }
        let screen = ScreenState::from_timer(&timer);
        drop(timer);

        self.record_action("resume");
        match outcome {
            ResumeOutcome::Ticking => {
                info!("Resumed running timer with {} left", screen.display);
            }
            ResumeOutcome::ExpiredWhileAway => {
                info!("Timer expired while suspended");
            }
            ResumeOutcome::Stopped => {
                info!("Resumed stopped timer at {}", screen.display);
            }
        }
        Ok(outcome)
    }

    /// Get current timer state
    pub fn get_timer_state(&self) -> Result<TimerState, TimerError> {
        self.lock_timer().map(|timer| timer.clone())
    }

    /// Get what the screen currently shows
    pub fn get_screen(&self) -> Result<ScreenState, TimerError> {
        self.lock_timer().map(|timer| ScreenState::from_timer(&timer))
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }
}
