//! Diagnostic logging.
//!
//! Logs go to stderr so they never mix with the child's stdout. Nothing is
//! emitted at the default level; set `PRUN_LOG=debug` to trace gate decisions
//! and child lifecycle, and `PRUN_LOG_FORMAT=json` for machine-readable lines.

use std::str::FromStr;
use thiserror::Error;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Environment variable holding the filter directive.
pub const LOG_ENV: &str = "PRUN_LOG";

/// Environment variable selecting the output format.
pub const LOG_FORMAT_ENV: &str = "PRUN_LOG_FORMAT";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LoggerError {
    #[error("invalid log format: {0} (expected: text|json)")]
    InvalidFormat(String),
    #[error("invalid log level: {0}")]
    InvalidLevel(String),
    #[error("failed to initialize logger: {0}")]
    InitializationFailed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = LoggerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            _ => Err(LoggerError::InvalidFormat(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    pub format: LogFormat,
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::Text,
            level: "warn".to_string(),
        }
    }
}

impl LogConfig {
    /// Read `PRUN_LOG` and `PRUN_LOG_FORMAT`, falling back to defaults when unset.
    pub fn from_env() -> Result<Self, LoggerError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, LoggerError> {
        let mut cfg = Self::default();
        if let Some(level) = lookup(LOG_ENV).filter(|v| !v.trim().is_empty()) {
            cfg.level = level;
        }
        if let Some(format) = lookup(LOG_FORMAT_ENV).filter(|v| !v.trim().is_empty()) {
            cfg.format = format.parse()?;
        }
        Ok(cfg)
    }
}

/// Install the global subscriber.
pub fn init(cfg: &LogConfig) -> Result<(), LoggerError> {
    let filter =
        EnvFilter::try_new(&cfg.level).map_err(|_| LoggerError::InvalidLevel(cfg.level.clone()))?;

    let result = match cfg.format {
        LogFormat::Text => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().compact().with_writer(std::io::stderr))
            .try_init(),
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init(),
    };
    result.map_err(|e| LoggerError::InitializationFailed(e.to_string()))
}

/// Configure logging from the environment, reporting problems on stderr.
///
/// A bad setting leaves logging off; it never affects the exit status.
pub fn init_from_env(me: &str) {
    if let Err(e) = LogConfig::from_env().and_then(|cfg| init(&cfg)) {
        eprintln!("{me}: logging disabled: {e}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let cfg = LogConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(cfg, LogConfig::default());
    }

    #[test]
    fn test_env_overrides() {
        let cfg =
            LogConfig::from_lookup(lookup(&[(LOG_ENV, "prun::gate=debug"), (LOG_FORMAT_ENV, "JSON")]))
                .unwrap();
        assert_eq!(cfg.level, "prun::gate=debug");
        assert_eq!(cfg.format, LogFormat::Json);
    }

    #[test]
    fn test_bad_format_rejected() {
        let err = LogConfig::from_lookup(lookup(&[(LOG_FORMAT_ENV, "xml")])).unwrap_err();
        assert_eq!(err, LoggerError::InvalidFormat("xml".to_string()));
    }

    #[test]
    fn test_bad_level_rejected() {
        let cfg = LogConfig {
            format: LogFormat::Text,
            level: "prun=bogus".to_string(),
        };
        assert!(matches!(init(&cfg), Err(LoggerError::InvalidLevel(_))));
    }
}
