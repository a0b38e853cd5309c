use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

use crate::core::codes::DEFAULT_ALPHABET;
use crate::core::scoring::ScoringParams;

/// Application configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub pairing: PairingSettings,
    #[serde(default)]
    pub scoring: ScoringSettings,
    #[serde(default)]
    pub cache: CacheSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Invite code and pair lifetime settings
#[derive(Debug, Clone, Deserialize)]
pub struct PairingSettings {
    #[serde(default = "default_code_length")]
    pub code_length: usize,
    #[serde(default = "default_code_alphabet")]
    pub code_alphabet: String,
    /// Collision retries at one code length before the space is widened
    #[serde(default = "default_attempts_per_length")]
    pub max_attempts_per_length: u32,
    /// How many times the code may grow by one character before
    /// creation gives up with a conflict
    #[serde(default = "default_max_widenings")]
    pub max_widenings: u32,
    #[serde(default = "default_ttl_days")]
    pub ttl_days: i64,
}

impl Default for PairingSettings {
    fn default() -> Self {
        Self {
            code_length: default_code_length(),
            code_alphabet: default_code_alphabet(),
            max_attempts_per_length: default_attempts_per_length(),
            max_widenings: default_max_widenings(),
            ttl_days: default_ttl_days(),
        }
    }
}

fn default_code_length() -> usize { 6 }
fn default_code_alphabet() -> String { DEFAULT_ALPHABET.to_string() }
fn default_attempts_per_length() -> u32 { 5 }
fn default_max_widenings() -> u32 { 3 }
fn default_ttl_days() -> i64 { 30 }

/// Scoring engine settings
#[derive(Debug, Clone, Deserialize)]
pub struct ScoringSettings {
    #[serde(default = "default_dealbreaker_threshold")]
    pub dealbreaker_threshold: f64,
}

impl Default for ScoringSettings {
    fn default() -> Self {
        Self {
            dealbreaker_threshold: default_dealbreaker_threshold(),
        }
    }
}

impl ScoringSettings {
    pub fn params(&self) -> ScoringParams {
        ScoringParams {
            dealbreaker_threshold: self.dealbreaker_threshold,
        }
    }
}

fn default_dealbreaker_threshold() -> f64 { 0.75 }

/// Report cache settings
#[derive(Debug, Clone, Deserialize)]
pub struct CacheSettings {
    #[serde(default = "default_cache_ttl_secs")]
    pub ttl_secs: u64,
    #[serde(default = "default_cache_capacity")]
    pub capacity: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            ttl_secs: default_cache_ttl_secs(),
            capacity: default_cache_capacity(),
        }
    }
}

fn default_cache_ttl_secs() -> u64 { 300 }
fn default_cache_capacity() -> u64 { 1000 }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Environment variables (prefixed with PAIRSCORE_)
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            // Add default config file
            .add_source(File::with_name("config/default").required(false))
            // Add local config file (for development overrides)
            .add_source(File::with_name("config/local").required(false))
            // Add environment variables (prefixed with PAIRSCORE_)
            // e.g., PAIRSCORE_PAIRING__TTL_DAYS -> pairing.ttl_days
            .add_source(
                Environment::with_prefix("PAIRSCORE")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("PAIRSCORE")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }
}
