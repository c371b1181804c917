//! Series configuration loaded from TOML.

use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use series_engine::{DEFAULT_ROUNDS, SeriesConfig, StartingRule};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Settings for a series against the computer.
///
/// Every key is optional in the file:
///
/// ```toml
/// rounds = 5
/// starting_rule = "alternate"
/// reply_delay_ms = 500
/// round_pause_ms = 1500
/// seed = 42
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Rounds the series is played "best of".
    #[serde(default = "default_rounds")]
    rounds: u32,

    /// Who opens each round.
    #[serde(default)]
    starting_rule: StartingRule,

    /// How long the computer "thinks" before replying.
    #[serde(default = "default_reply_delay_ms")]
    reply_delay_ms: u64,

    /// How long a finished board stays up before the next round starts.
    #[serde(default = "default_round_pause_ms")]
    round_pause_ms: u64,

    /// Seed for the computer's random moves; OS entropy when absent.
    #[serde(default)]
    seed: Option<u64>,
}

fn default_rounds() -> u32 {
    DEFAULT_ROUNDS
}

fn default_reply_delay_ms() -> u64 {
    500
}

fn default_round_pause_ms() -> u64 {
    1500
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            rounds: default_rounds(),
            starting_rule: StartingRule::default(),
            reply_delay_ms: default_reply_delay_ms(),
            round_pause_ms: default_round_pause_ms(),
            seed: None,
        }
    }
}

impl AppConfig {
    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config = Self::from_toml(&content)?;
        info!(rounds = config.rounds, starting_rule = %config.starting_rule, "Config loaded");
        Ok(config)
    }

    /// Parses configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;
        config.validate()
    }

    /// Applies command-line overrides, then re-validates.
    #[instrument(skip(self))]
    pub fn with_overrides(
        mut self,
        rounds: Option<u32>,
        starting_rule: Option<StartingRule>,
        reply_delay_ms: Option<u64>,
        seed: Option<u64>,
    ) -> Result<Self, ConfigError> {
        if let Some(rounds) = rounds {
            self.rounds = rounds;
        }
        if let Some(rule) = starting_rule {
            self.starting_rule = rule;
        }
        if let Some(delay) = reply_delay_ms {
            self.reply_delay_ms = delay;
        }
        if seed.is_some() {
            self.seed = seed;
        }
        self.validate()
    }

    fn validate(self) -> Result<Self, ConfigError> {
        if self.rounds == 0 {
            return Err(ConfigError::new("rounds must be at least 1".to_string()));
        }
        Ok(self)
    }

    /// Series settings for the engine.
    pub fn series_config(&self) -> SeriesConfig {
        SeriesConfig::new(self.rounds, self.starting_rule)
    }

    /// Delay before the computer replies.
    pub fn reply_delay(&self) -> Duration {
        Duration::from_millis(self.reply_delay_ms)
    }

    /// Pause between a finished round and the next one.
    pub fn round_pause(&self) -> Duration {
        Duration::from_millis(self.round_pause_ms)
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error at the caller's location.
    #[track_caller]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = AppConfig::from_toml("").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(*config.rounds(), 5);
        assert_eq!(config.reply_delay(), Duration::from_millis(500));
        assert_eq!(config.round_pause(), Duration::from_millis(1500));
        assert_eq!(*config.starting_rule(), StartingRule::Alternate);
    }

    #[test]
    fn test_zero_rounds_rejected() {
        let err = AppConfig::from_toml("rounds = 0").unwrap_err();
        assert!(err.message.contains("rounds"));
    }

    #[test]
    fn test_unknown_key_rejected() {
        assert!(AppConfig::from_toml("difficulty = \"hard\"").is_err());
    }

    #[test]
    fn test_overrides_win() {
        let config = AppConfig::from_toml("rounds = 3\nstarting_rule = \"computer\"")
            .unwrap()
            .with_overrides(Some(7), None, Some(0), Some(9))
            .unwrap();
        assert_eq!(*config.rounds(), 7);
        assert_eq!(*config.starting_rule(), StartingRule::Computer);
        assert_eq!(*config.reply_delay_ms(), 0);
        assert_eq!(*config.seed(), Some(9));
        assert_eq!(config.series_config().wins_needed(), 4);
    }
}
