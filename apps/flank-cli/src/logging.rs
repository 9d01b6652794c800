//! Logging configuration and initialization
//!
//! Logs go to stderr so stdout stays free for piping. The level comes from
//! `-v`, `LOG_LEVEL` or a `RUST_LOG` filter; `LOG_FORMAT=json` switches to
//! structured output.

use anyhow::{Context, Result};
use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Log level for filtering messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn to_tracing_level(self) -> Level {
        match self {
            LogLevel::Trace => Level::TRACE,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warn => Level::WARN,
            LogLevel::Error => Level::ERROR,
        }
    }
}

impl std::str::FromStr for LogLevel {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(anyhow::anyhow!("Invalid log level: {}", s)),
        }
    }
}

/// Log format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable text
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "pretty" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            _ => Err(anyhow::anyhow!("Invalid log format: {}", s)),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogConfig {
    /// Explicit level from `-v` or `LOG_LEVEL`; `None` defers to `RUST_LOG`
    pub level: Option<LogLevel>,
    pub format: LogFormat,
    /// Extra filter directives, e.g. `flank_entrez=trace,reqwest=warn`
    pub filter_directives: Option<String>,
}

impl LogConfig {
    /// Read `LOG_LEVEL`, `LOG_FORMAT` and `LOG_FILTER` from the environment.
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Same as [`LogConfig::from_env`] with a custom variable lookup.
    pub fn from_vars<F>(var: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(level) = var("LOG_LEVEL") {
            config.level = Some(level.parse()?);
        }
        if let Some(format) = var("LOG_FORMAT") {
            config.format = format.parse()?;
        }
        config.filter_directives = var("LOG_FILTER");
        Ok(config)
    }

    /// `-v` wins over any level taken from the environment.
    pub fn with_verbosity(mut self, verbose: bool) -> Self {
        if verbose {
            self.level = Some(LogLevel::Debug);
        }
        self
    }

    /// Filter for this configuration. `rust_log` is the `RUST_LOG` value and
    /// only sets the base filter when no explicit level is configured.
    pub fn build_filter(&self, rust_log: Option<&str>) -> Result<EnvFilter> {
        let mut filter = match (self.level, rust_log.map(str::trim)) {
            (Some(level), _) => EnvFilter::default().add_directive(level.to_tracing_level().into()),
            (None, Some(directives)) if !directives.is_empty() => {
                EnvFilter::try_new(directives).context("Invalid RUST_LOG filter")?
            }
            _ => EnvFilter::default().add_directive(LogLevel::Info.to_tracing_level().into()),
        };

        if let Some(ref directives) = self.filter_directives {
            for directive in directives.split(',').filter(|d| !d.trim().is_empty()) {
                filter = filter.add_directive(
                    directive
                        .trim()
                        .parse()
                        .context("Failed to parse filter directive")?,
                );
            }
        }

        Ok(filter)
    }
}

/// Install the global subscriber. Call once at startup.
pub fn init_logging(config: &LogConfig) -> Result<()> {
    let rust_log = std::env::var("RUST_LOG").ok();
    let filter = config.build_filter(rust_log.as_deref())?;

    let fmt_layer = fmt::layer().with_writer(std::io::stderr).with_target(false);

    match config.format {
        LogFormat::Text => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt_layer)
                .try_init()?;
        }
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt_layer.json())
                .try_init()?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tracing::level_filters::LevelFilter;

    #[test]
    fn test_parse_levels() {
        assert_eq!("WARNING".parse::<LogLevel>().unwrap(), LogLevel::Warn);
        assert_eq!("debug".parse::<LogLevel>().unwrap(), LogLevel::Debug);
        assert!("loud".parse::<LogLevel>().is_err());
    }

    #[test]
    fn test_parse_formats() {
        assert_eq!("json".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!("pretty".parse::<LogFormat>().unwrap(), LogFormat::Text);
        assert!("xml".parse::<LogFormat>().is_err());
    }

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_env_values() {
        let env = vars(&[("LOG_LEVEL", "warn"), ("LOG_FORMAT", "json")]);
        let config = LogConfig::from_vars(|k| env.get(k).cloned()).unwrap();
        assert_eq!(config.level, Some(LogLevel::Warn));
        assert_eq!(config.format, LogFormat::Json);
        assert_eq!(config.filter_directives, None);

        let env = vars(&[("LOG_LEVEL", "loud")]);
        assert!(LogConfig::from_vars(|k| env.get(k).cloned()).is_err());
    }

    #[test]
    fn test_verbose_flag_beats_log_level() {
        let env = vars(&[("LOG_LEVEL", "error")]);
        let config = LogConfig::from_vars(|k| env.get(k).cloned())
            .unwrap()
            .with_verbosity(true);
        assert_eq!(config.level, Some(LogLevel::Debug));

        let config = LogConfig::from_vars(|k| env.get(k).cloned())
            .unwrap()
            .with_verbosity(false);
        assert_eq!(config.level, Some(LogLevel::Error));
    }

    #[test]
    fn test_rust_log_sets_base_level() {
        let filter = LogConfig::default().build_filter(Some("warn")).unwrap();
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::WARN));
    }

    #[test]
    fn test_default_level_is_info() {
        let filter = LogConfig::default().build_filter(None).unwrap();
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::INFO));

        let filter = LogConfig::default().build_filter(Some("  ")).unwrap();
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::INFO));
    }

    #[test]
    fn test_explicit_level_beats_rust_log() {
        let config = LogConfig::default().with_verbosity(true);
        let filter = config.build_filter(Some("error")).unwrap();
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::DEBUG));
    }

    #[test]
    fn test_invalid_filter_directive() {
        let config = LogConfig {
            filter_directives: Some("flank_entrez=loudest".to_string()),
            ..LogConfig::default()
        };
        assert!(config.build_filter(None).is_err());
    }
}
