//! Configuration and CLI argument handling

use std::time::Duration;
use clap::Parser;

use crate::{display::TextSize, i18n::Language, idle::IdleConfig};

/// CLI argument parsing structure
#[derive(Parser, Debug, Clone)]
#[command(name = "kiosk-idle")]
#[command(about = "Idle-screen controller daemon for touch-screen kiosk displays")]
#[command(version = "1.0.0")]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20480")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Inactivity window before the warning overlay, in seconds
    #[arg(long, default_value = "60", value_parser = clap::value_parser!(u64).range(1..))]
    pub idle_timeout: u64,

    /// Warning overlay auto-resolve delay, in seconds
    #[arg(long, default_value = "10", value_parser = clap::value_parser!(u64).range(1..))]
    pub warning_timeout: u64,

    /// Countdown tick period, in milliseconds
    #[arg(long, default_value = "1000", value_parser = clap::value_parser!(u64).range(1..))]
    pub tick_ms: u64,

    /// Countdown start value shown on the warning overlay (1 to 5)
    #[arg(long, default_value = "5", value_parser = clap::value_parser!(u8).range(1..=5))]
    pub countdown: u8,

    /// Initial language (fr or eus); detected from LANG when omitted
    #[arg(short, long)]
    pub language: Option<Language>,

    /// Initial text size (small, medium or large)
    #[arg(long, default_value = "medium")]
    pub text_size: TextSize,

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

    /// Timing parameters for the idle controller
    pub fn idle_config(&self) -> IdleConfig {
        IdleConfig {
            idle_timeout: Duration::from_secs(self.idle_timeout),
            warning_timeout: Duration::from_secs(self.warning_timeout),
            tick_period: Duration::from_millis(self.tick_ms),
            countdown_start: self.countdown,
        }
    }

    /// Language from the command line, or detected from the environment
    pub fn initial_language(&self) -> Language {
        self.language.unwrap_or_else(|| {
            std::env::var("LANG")
                .map(|tag| Language::detect(&tag))
                .unwrap_or_default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_kiosk_timings() {
        let config = Config::try_parse_from(["kiosk-idle"]).unwrap();
        assert_eq!(config.idle_config(), IdleConfig::default());
        assert_eq!(config.address(), "127.0.0.1:20480");
        assert_eq!(config.log_level(), "info");
        assert_eq!(config.text_size, TextSize::Medium);
    }

    #[test]
    fn explicit_language_wins() {
        let config = Config::try_parse_from(["kiosk-idle", "--language", "eus", "-v"]).unwrap();
        assert_eq!(config.initial_language(), Language::Eus);
        assert_eq!(config.log_level(), "debug");
    }

    #[test]
    fn countdown_is_limited_to_five() {
        let config = Config::try_parse_from(["kiosk-idle", "--countdown", "3"]).unwrap();
        assert_eq!(config.idle_config().countdown_start, 3);

        assert!(Config::try_parse_from(["kiosk-idle", "--countdown", "6"]).is_err());
        assert!(Config::try_parse_from(["kiosk-idle", "--countdown", "200"]).is_err());
        assert!(Config::try_parse_from(["kiosk-idle", "--countdown", "0"]).is_err());
    }

    #[test]
    fn zero_durations_are_rejected() {
        for flag in ["--idle-timeout", "--warning-timeout", "--tick-ms"] {
            assert!(Config::try_parse_from(["kiosk-idle", flag, "0"]).is_err(), "{} 0", flag);
            assert!(Config::try_parse_from(["kiosk-idle", flag, "1"]).is_ok(), "{} 1", flag);
        }
    }

    #[test]
    fn unknown_language_is_rejected() {
        assert!(Config::try_parse_from(["kiosk-idle", "--language", "en"]).is_err());
    }
}
