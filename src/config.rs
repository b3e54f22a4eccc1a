//! Configuration and CLI argument handling

use std::path::PathBuf;
use clap::Parser;

use crate::{services::JsonFileStore, state::duration_input::MILLIS_PER_MINUTE};

/// CLI argument parsing structure
#[derive(Debug, Parser)]
#[command(name = "countdown-timer")]
#[command(about = "A single-screen countdown timer served over HTTP")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20553")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Countdown duration in minutes used on first launch
    #[arg(short, long, default_value = "10", value_parser = clap::value_parser!(u64).range(1..=1_000_000))]
    pub minutes: u64,

    /// Preference file the timer is saved to on suspend
    #[arg(long, value_name = "PATH")]
    pub state_file: Option<PathBuf>,

    /// Keep the timer in memory only
    #[arg(long, conflicts_with = "state_file")]
    pub ephemeral: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    /// First-launch duration in milliseconds
    pub fn default_duration_ms(&self) -> u64 {
        self.minutes * MILLIS_PER_MINUTE
    }

    /// Where the preference file lives
    pub fn state_path(&self) -> PathBuf {
        self.state_file
            .clone()
            .unwrap_or_else(JsonFileStore::default_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_first_launch() {
        let config = Config::try_parse_from(["countdown-timer"]).unwrap();
        assert_eq!(config.address(), "127.0.0.1:20553");
        assert_eq!(config.default_duration_ms(), 600_000);
        assert_eq!(config.log_level(), "info");
        assert!(!config.ephemeral);
        assert!(config.state_path().ends_with("countdown-timer/prefs.json"));
    }

    #[test]
    fn flags_override_defaults() {
        let config = Config::try_parse_from([
            "countdown-timer",
            "-p",
            "8080",
            "-m",
            "25",
            "--state-file",
            "/tmp/timer.json",
            "-v",
        ])
        .unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.default_duration_ms(), 1_500_000);
        assert_eq!(config.state_path(), PathBuf::from("/tmp/timer.json"));
        assert_eq!(config.log_level(), "debug");
    }

    #[test]
    fn zero_minutes_is_refused() {
        assert!(Config::try_parse_from(["countdown-timer", "-m", "0"]).is_err());
    }

    #[test]
    fn ephemeral_conflicts_with_state_file() {
        assert!(
            Config::try_parse_from(["countdown-timer", "--ephemeral", "--state-file", "x"])
                .is_err()
        );
    }
}
