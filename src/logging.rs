//! Structured logging on top of `tracing`.
//!
//! Logs always go to stderr so that `--json` output on stdout stays parseable.

use crate::error::{AssetError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

/// Environment variable holding a filter directive; it wins over the config.
pub const LOG_ENV: &str = "ASSETCTL_LOG";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// trace, debug, info, warn, error or off
    #[serde(default = "default_level")]
    pub level: String,

    #[serde(default)]
    pub format: LogFormat,

    #[serde(default = "default_true")]
    pub color: bool,

    /// Per-module levels, e.g. `"assetctl::document" = "trace"`.
    #[serde(default)]
    pub modules: BTreeMap<String, String>,
}

fn default_level() -> String {
    "warn".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            format: LogFormat::default(),
            color: default_true(),
            modules: BTreeMap::new(),
        }
    }
}

/// Install the global subscriber. Fails if one is already installed.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let filter = build_env_filter(config)?;
    let registry = Registry::default().with(filter);

    let installed = match config.format {
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_writer(std::io::stderr),
            )
            .try_init(),
        LogFormat::Text => registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_ansi(config.color)
                    .with_writer(std::io::stderr),
            )
            .try_init(),
    };

    installed.map_err(|e| AssetError::InvalidConfig(format!("failed to initialize logging: {}", e)))
}

/// Filter from `ASSETCTL_LOG` if set, otherwise from the config level and
/// per-module overrides.
pub fn build_env_filter(config: &LoggingConfig) -> Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_env(LOG_ENV) {
        return Ok(filter);
    }

    let mut filter = EnvFilter::try_new(&config.level).map_err(|e| {
        AssetError::InvalidConfig(format!("invalid log level '{}': {}", config.level, e))
    })?;

    for (module, level) in &config.modules {
        let directive = format!("{}={}", module, level);
        let parsed = directive.parse::<Directive>().map_err(|e| {
            AssetError::InvalidConfig(format!("invalid log directive '{}': {}", directive, e))
        })?;
        filter = filter.add_directive(parsed);
    }

    Ok(filter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_defaults() {
        let config = LoggingConfig::default();
        assert_eq!(config.level, "warn");
        assert_eq!(config.format, LogFormat::Text);
    }

    #[test]
    fn test_parse_from_toml() {
        let config: LoggingConfig = toml::from_str(
            "level = \"debug\"\nformat = \"json\"\n[modules]\n\"assetctl::search\" = \"trace\"\n",
        )
        .unwrap();
        assert_eq!(config.format, LogFormat::Json);
        assert_eq!(config.modules.len(), 1);
    }

    #[test]
    #[serial]
    fn test_filter_rejects_bad_directive() {
        std::env::remove_var(LOG_ENV);
        let mut config = LoggingConfig::default();
        config
            .modules
            .insert("assetctl".to_string(), "loud".to_string());
        assert!(build_env_filter(&config).is_err());
    }

    #[test]
    #[serial]
    fn test_env_overrides_config() {
        std::env::set_var(LOG_ENV, "assetctl=trace");
        let config = LoggingConfig {
            level: "not a level".to_string(),
            ..LoggingConfig::default()
        };
        let filter = build_env_filter(&config);
        std::env::remove_var(LOG_ENV);
        assert!(filter.is_ok());
    }
}
