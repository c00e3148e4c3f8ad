//! Layered configuration
//!
//! Merge order, later wins: compiled defaults, `shared_wordle.toml` (or an explicit
//! path), then `SHARED_WORDLE_*` environment variables.

use crate::game::{
    DEFAULT_COOLDOWN_HOURS, DEFAULT_MAX_GUESSES, DEFAULT_PAR, Settings, SubmissionPolicy,
};
use chrono::TimeDelta;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File looked up in the working directory when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "shared_wordle.toml";

const ENV_PREFIX: &str = "SHARED_WORDLE_";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] Box<figment::Error>),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub max_guesses: usize,
    /// Zero or negative disables the cooldown
    pub cooldown_hours: i64,
    pub par: i64,
    pub auto_start: bool,
    pub recent_games_limit: usize,
    pub log_level: String,
    /// Target words, one per line; the embedded list when unset
    pub word_list: Option<PathBuf>,
    /// Submittable words with optional definitions; the embedded dictionary when unset
    pub dictionary: Option<PathBuf>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            max_guesses: DEFAULT_MAX_GUESSES,
            cooldown_hours: DEFAULT_COOLDOWN_HOURS,
            par: DEFAULT_PAR,
            auto_start: true,
            recent_games_limit: 5,
            log_level: "info".to_string(),
            word_list: None,
            dictionary: None,
        }
    }
}

impl GameConfig {
    /// Load from defaults, the config file and the environment
    ///
    /// A missing file is not an error; its layer is simply empty.
    ///
    /// # Errors
    /// Returns `ConfigError` if a layer fails to parse or the result is invalid.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let file = path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));
        let config: Self = Figment::new()
            .merge(Serialized::defaults(Self::default()))
            .merge(Toml::file(file))
            .merge(Env::prefixed(ENV_PREFIX))
            .extract()
            .map_err(Box::new)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from defaults and a TOML string only
    ///
    /// # Errors
    /// Returns `ConfigError` if the string fails to parse or the result is invalid.
    pub fn from_toml_str(toml: &str) -> Result<Self, ConfigError> {
        let config: Self = Figment::new()
            .merge(Serialized::defaults(Self::default()))
            .merge(Toml::string(toml))
            .extract()
            .map_err(Box::new)?;
        config.validate()?;
        Ok(config)
    }

    /// # Errors
    /// Returns `ConfigError::Invalid` naming the first bad field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_guesses == 0 {
            return Err(ConfigError::Invalid("max_guesses must be at least 1".into()));
        }
        if self.log_level.trim().is_empty() {
            return Err(ConfigError::Invalid("log_level must not be empty".into()));
        }
        if self.cooldown().is_none() {
            return Err(ConfigError::Invalid(format!(
                "cooldown_hours {} is out of range",
                self.cooldown_hours
            )));
        }
        Ok(())
    }

    fn cooldown(&self) -> Option<TimeDelta> {
        TimeDelta::try_hours(self.cooldown_hours.max(0))
    }

    /// Orchestrator settings derived from this configuration
    #[must_use]
    pub fn settings(&self) -> Settings {
        Settings {
            max_guesses: self.max_guesses,
            policy: SubmissionPolicy::new(self.cooldown().unwrap_or(TimeDelta::MAX)),
            par: self.par,
            auto_start: self.auto_start,
            recent_games_limit: self.recent_games_limit,
        }
    }
}
