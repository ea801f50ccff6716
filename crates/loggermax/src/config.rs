//! Centralized configuration for a [`Logger`](crate::Logger).
//!
//! `LoggerConfig` seeds the debug flag and picks rendering options,
//! programmatically, from environment variables, or from a TOML file.

use std::env;
use std::path::Path;

use serde::Deserialize;

use crate::detection::DisplayContext;

/// Errors raised while loading configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Logger configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    /// Initial state of the debug flag
    pub debug: bool,
    /// Force plain text mode (no styling)
    pub force_plain: bool,
    /// Force styled output even when not attached to a terminal
    pub force_color: Option<bool>,
    /// Use the remote sink's trace for full-stack context when it has one
    pub prefer_remote_trace: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            debug: false,
            force_plain: false,
            force_color: None,
            prefer_remote_trace: true,
        }
    }
}

impl LoggerConfig {
    /// Create config with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create config from environment variables
    ///
    /// # Environment Variables
    ///
    /// | Variable | Values | Description |
    /// |----------|--------|-------------|
    /// | `LOGGERMAX_DEBUG` | 1/true/yes/on | Enable the debug flag |
    /// | `LOGGERMAX_FORCE_COLOR` | (set) | Force styled output |
    /// | `LOGGERMAX_PLAIN` | (set) | Force plain output |
    /// | `NO_COLOR` | (set) | Disable colors (standard) |
    /// | `LOGGERMAX_REMOTE_TRACE` | 0/false | Ignore the remote trace |
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env();
        config
    }

    /// Overlay environment variables onto this config.
    pub fn apply_env(&mut self) {
        if let Ok(val) = env::var("LOGGERMAX_DEBUG") {
            self.debug = is_truthy(&val);
        }
        if env::var("LOGGERMAX_FORCE_COLOR").is_ok() {
            self.force_color = Some(true);
        }
        if env::var("LOGGERMAX_PLAIN").is_ok() || env::var("NO_COLOR").is_ok() {
            self.force_plain = true;
        }
        if let Ok(val) = env::var("LOGGERMAX_REMOTE_TRACE") {
            self.prefer_remote_trace =
                !matches!(val.to_lowercase().as_str(), "0" | "false" | "no" | "off");
        }
        log::debug!(target: "loggermax::config", "resolved config from environment: {self:?}");
    }

    /// Parse a TOML document; missing keys keep their defaults.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        Ok(config)
    }

    /// Read and parse a TOML config file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&source)?;
        log::debug!(target: "loggermax::config", "loaded config from {}", path.display());
        Ok(config)
    }

    // ─────────────────────────────────────────────────
    // Builder Methods
    // ─────────────────────────────────────────────────

    #[must_use]
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Enable plain text mode (no styling)
    #[must_use]
    pub fn plain_mode(mut self) -> Self {
        self.force_plain = true;
        self
    }

    #[must_use]
    pub fn force_color(mut self, force: bool) -> Self {
        self.force_color = Some(force);
        self
    }

    #[must_use]
    pub fn with_remote_trace(mut self, prefer: bool) -> Self {
        self.prefer_remote_trace = prefer;
        self
    }

    // ─────────────────────────────────────────────────
    // Resolution Methods
    // ─────────────────────────────────────────────────

    /// Resolve the display context based on config and environment
    #[must_use]
    pub fn resolve_context(&self) -> DisplayContext {
        if self.force_plain {
            return DisplayContext::Plain;
        }
        if let Some(true) = self.force_color {
            return DisplayContext::Rich;
        }
        DisplayContext::detect()
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(value.trim().to_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = LoggerConfig::new();
        assert!(!config.debug);
        assert!(!config.force_plain);
        assert_eq!(config.force_color, None);
        assert!(config.prefer_remote_trace);
    }

    #[test]
    fn test_builder_pattern() {
        let config = LoggerConfig::new()
            .with_debug(true)
            .with_remote_trace(false)
            .force_color(true);
        assert!(config.debug);
        assert!(!config.prefer_remote_trace);
        assert_eq!(config.resolve_context(), DisplayContext::Rich);
    }

    #[test]
    fn test_plain_mode_wins_over_color() {
        let config = LoggerConfig::new().force_color(true).plain_mode();
        assert_eq!(config.resolve_context(), DisplayContext::Plain);
    }

    #[test]
    fn test_from_toml_partial() {
        let config = LoggerConfig::from_toml_str("debug = true\n").unwrap();
        assert!(config.debug);
        assert!(config.prefer_remote_trace);
    }

    #[test]
    fn test_from_toml_invalid() {
        let err = LoggerConfig::from_toml_str("debug = \"maybe\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        assert!(err.to_string().starts_with("invalid config"));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "debug = true\nforce_plain = true").unwrap();
        let config = LoggerConfig::from_file(file.path()).unwrap();
        assert!(config.debug);
        assert!(config.force_plain);
    }

    #[test]
    fn test_from_missing_file() {
        let err = LoggerConfig::from_file("/nonexistent/loggermax.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_truthy_values() {
        assert!(is_truthy("1"));
        assert!(is_truthy(" Yes "));
        assert!(!is_truthy("0"));
        assert!(!is_truthy(""));
    }
}
