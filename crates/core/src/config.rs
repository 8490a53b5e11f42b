//! Runtime configuration from environment variables.
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | `CASCADE_SEED` | clock | RNG seed |
//! | `CASCADE_LEVEL` | 1 | Starting level |
//! | `CASCADE_ANIMATE` | on | Honor pacing pauses when replaying turns |
//! | `CASCADE_LOG_PATH` | unset | File sink for the engine log |
//! | `CASCADE_VERBOSE` | off | Include debug lines in the log |
//! | `CASCADE_TRACE_PATH` | unset | Write each turn's event log as JSON lines |

use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::ConfigError;
use crate::log_warn;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameConfig {
    pub seed: u32,
    pub level: u32,
    pub animate: bool,
    pub log_path: Option<String>,
    pub verbose: bool,
    pub trace_path: Option<String>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            seed: 1,
            level: 1,
            animate: true,
            log_path: None,
            verbose: false,
            trace_path: None,
        }
    }
}

/// Parse on/off style values.
pub fn parse_switch(key: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key,
            value: value.to_string(),
        }),
    }
}

pub fn parse_number(key: &'static str, value: &str) -> Result<u32, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidValue {
            key,
            value: value.to_string(),
        })
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Seed derived from the wall clock, for unseeded runs.
pub fn clock_seed() -> u32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u32)
        .unwrap_or(1)
}

impl GameConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from any key lookup. Unparsable values are logged and
    /// replaced by their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let seed = lookup("CASCADE_SEED")
            .and_then(|v| warn_invalid(parse_number("CASCADE_SEED", &v)))
            .unwrap_or_else(clock_seed);
        let level = lookup("CASCADE_LEVEL")
            .and_then(|v| warn_invalid(parse_number("CASCADE_LEVEL", &v)))
            .unwrap_or(defaults.level)
            .max(1);
        let animate = lookup("CASCADE_ANIMATE")
            .and_then(|v| warn_invalid(parse_switch("CASCADE_ANIMATE", &v)))
            .unwrap_or(defaults.animate);
        let verbose = lookup("CASCADE_VERBOSE")
            .and_then(|v| warn_invalid(parse_switch("CASCADE_VERBOSE", &v)))
            .unwrap_or(defaults.verbose);

        Self {
            seed,
            level,
            animate,
            log_path: lookup("CASCADE_LOG_PATH").and_then(non_empty),
            verbose,
            trace_path: lookup("CASCADE_TRACE_PATH").and_then(non_empty),
        }
    }
}

fn warn_invalid<T>(parsed: Result<T, ConfigError>) -> Option<T> {
    match parsed {
        Ok(v) => Some(v),
        Err(err) => {
            log_warn!("Config", "{}; using default", err);
            None
        }
    }
}
