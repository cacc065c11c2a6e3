//! Client configuration.
//!
//! Loaded from `math-physical.json` (camelCase keys, every field optional)
//! and then overridden by command line flags.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::scoring::TimeLimit;

/// The default config file name.
pub const CONFIG_FILE_NAME: &str = "math-physical.json";

/// Allowed range for the stopwatch refresh interval.
pub const TICK_INTERVAL_RANGE_MS: std::ops::RangeInclusive<u64> = 100..=1000;

fn default_base_url() -> String {
    "https://script.google.com/macros/s/AKfycbw0Jry0N4CJbvJCEXmnD6wH_hOLxfv1wpMruNuT6jl3HYONPwzvM9nKogwLMt2G_ttviA/exec"
        .to_string()
}

fn default_cache_dir() -> String {
    ".math-physical".to_string()
}

const fn default_cache_ttl_secs() -> u64 {
    3600
}

fn default_question_counts() -> Vec<u32> {
    vec![5, 10, 20]
}

const fn default_question_count() -> u32 {
    10
}

const fn default_tick_interval_ms() -> u64 {
    100
}

const fn default_ranking_limit() -> usize {
    10
}

const fn default_request_timeout_secs() -> u64 {
    15
}

const fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Web app URL of the content service.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Directory holding the taxonomy cache file.
    #[serde(default = "default_cache_dir")]
    pub cache_dir: String,

    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,

    /// Question counts offered on the menu.
    #[serde(default = "default_question_counts")]
    pub question_counts: Vec<u32>,

    /// Count used when the menu selection is empty.
    #[serde(default = "default_question_count")]
    pub default_question_count: u32,

    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,

    #[serde(default)]
    pub time_limit: TimeLimit,

    /// Keep a separate ranking per topic and question count.
    #[serde(default = "default_true")]
    pub per_mode_rankings: bool,

    /// Maximum number of rows on the ranking screen.
    #[serde(default = "default_ranking_limit")]
    pub ranking_limit: usize,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Log file path. Logging is off when unset.
    #[serde(default)]
    pub log_file: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            cache_dir: default_cache_dir(),
            cache_ttl_secs: default_cache_ttl_secs(),
            question_counts: default_question_counts(),
            default_question_count: default_question_count(),
            tick_interval_ms: default_tick_interval_ms(),
            time_limit: TimeLimit::default(),
            per_mode_rankings: true,
            ranking_limit: default_ranking_limit(),
            request_timeout_secs: default_request_timeout_secs(),
            log_file: None,
        }
    }
}

impl Config {
    /// Loads `math-physical.json` from the current directory, or defaults.
    pub fn load() -> Result<Self, ConfigError> {
        let current_dir = std::env::current_dir().map_err(|e| {
            ConfigError::parse(
                "<current directory>",
                format!("cannot determine current directory: {e}"),
            )
        })?;
        Self::load_from_file(&current_dir.join(CONFIG_FILE_NAME))
    }

    /// Loads configuration from `path`.
    ///
    /// A missing file yields the defaults. A file that exists but does not
    /// parse is an error.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let config = Self::default();
                config.validate()?;
                return Ok(config);
            }
            Err(e) => {
                return Err(ConfigError::parse(path, format!("failed to read file: {e}")));
            }
        };

        let config: Self =
            serde_json::from_str(&contents).map_err(|e| ConfigError::parse(path, e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.base_url.trim().is_empty() {
            return Err(ConfigError::invalid("baseUrl must not be empty"));
        }
        if !TICK_INTERVAL_RANGE_MS.contains(&self.tick_interval_ms) {
            return Err(ConfigError::invalid(format!(
                "tickIntervalMs must be between {} and {}, got {}",
                TICK_INTERVAL_RANGE_MS.start(),
                TICK_INTERVAL_RANGE_MS.end(),
                self.tick_interval_ms
            )));
        }
        if self.cache_ttl_secs == 0 {
            return Err(ConfigError::invalid("cacheTtlSecs must be greater than 0"));
        }
        if self.question_counts.is_empty() || self.question_counts.contains(&0) {
            return Err(ConfigError::invalid(
                "questionCounts must list at least one positive count",
            ));
        }
        if self.default_question_count == 0 {
            return Err(ConfigError::invalid(
                "defaultQuestionCount must be greater than 0",
            ));
        }
        if self.ranking_limit == 0 {
            return Err(ConfigError::invalid("rankingLimit must be greater than 0"));
        }
        if let TimeLimit::Budget {
            seconds_per_question: 0,
        } = self.time_limit
        {
            return Err(ConfigError::invalid(
                "secondsPerQuestion must be greater than 0",
            ));
        }
        Ok(())
    }

    pub fn cache_path(&self) -> PathBuf {
        Path::new(&self.cache_dir).join(crate::data::CACHE_FILE_NAME)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
