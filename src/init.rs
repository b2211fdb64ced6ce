use crate::appender::BsonAppender;
use crate::bsonifier::DefaultBsonifier;
use crate::class_identity::ClassIdentity;
use crate::env::{
    env_opt, BSON_APPENDER_MIN_LEVEL_ENV, BSON_APPENDER_SEPARATOR_ENV,
    BSON_APPENDER_STDOUT_ENV,
};
use crate::event::{Level, ParseLevelError};
use crate::layer::BsonLayer;
use crate::sink::DocumentSink;
use std::sync::Arc;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::Registry;

/// Configuration of the BSON layer.
///
/// **Fields**
/// - `min_level`: events below this level are not forwarded to the sink.
/// - `separator`: splits logger names and module paths into packages.
///   Defaults to `::`, the separator of `tracing` targets.
/// - `enable_stdout`: if `true`, a `tracing_subscriber::fmt::Layer` is
///   installed next to the [`BsonLayer`] and events are also printed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LayerConfig {
    pub min_level: Level,
    pub separator: String,
    pub enable_stdout: bool,
}

impl Default for LayerConfig {
    fn default() -> Self {
        Self {
            min_level: Level::Info,
            separator: ClassIdentity::PATH.to_string(),
            enable_stdout: true,
        }
    }
}

/// Error returned when a configuration value cannot be parsed.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("invalid {key}: {source}")]
    InvalidLevel {
        key: &'static str,
        #[source]
        source: ParseLevelError,
    },

    #[error("invalid {key}: expected true or false, got {value:?}")]
    InvalidBool { key: &'static str, value: String },
}

/// Error returned by [`try_init_tracing_with_config`].
#[derive(thiserror::Error, Debug)]
pub enum InitError {
    #[error("failed to set global subscriber: {0}")]
    SetGlobalDefault(#[from] tracing::subscriber::SetGlobalDefaultError),
}

impl LayerConfig {
    /// Build a config from the `BSON_APPENDER_*` environment variables,
    /// using defaults for unset or empty ones.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_values(
            env_opt(BSON_APPENDER_MIN_LEVEL_ENV).as_deref(),
            env_opt(BSON_APPENDER_SEPARATOR_ENV).as_deref(),
            env_opt(BSON_APPENDER_STDOUT_ENV).as_deref(),
        )
    }

    fn from_values(
        min_level: Option<&str>,
        separator: Option<&str>,
        enable_stdout: Option<&str>,
    ) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(level) = min_level {
            config.min_level = level.parse().map_err(|source| ConfigError::InvalidLevel {
                key: BSON_APPENDER_MIN_LEVEL_ENV,
                source,
            })?;
        }
        // An empty separator would stop splitting names into packages.
        if let Some(separator) = separator.filter(|s| !s.trim().is_empty()) {
            config.separator = separator.to_string();
        }
        if let Some(value) = enable_stdout {
            config.enable_stdout = parse_bool(value).ok_or_else(|| ConfigError::InvalidBool {
                key: BSON_APPENDER_STDOUT_ENV,
                value: value.to_string(),
            })?;
        }
        Ok(config)
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Build a [`BsonLayer`] for `sink` with the default document layout.
pub fn build_layer<S: DocumentSink>(sink: S, config: &LayerConfig) -> BsonLayer<S> {
    let bsonifier = DefaultBsonifier::with_separator(config.separator.clone());
    BsonLayer::new(BsonAppender::with_bsonifier(sink, bsonifier), config.min_level)
}

/// Install a global `tracing` subscriber that writes every event to `sink`.
///
/// **Parameters**
/// - `sink`: implementation of [`DocumentSink`] that will receive one
///   document per event.
/// - `config`: [`LayerConfig`] controlling filtering and output.
///
/// **Errors**
///
/// Returns [`InitError::SetGlobalDefault`] if a global subscriber was
/// already installed.
pub fn try_init_tracing_with_config(
    sink: Arc<dyn DocumentSink>,
    config: LayerConfig,
) -> Result<(), InitError> {
    let layer = build_layer(sink, &config);

    // Two subscriber shapes because the `fmt` layer changes the type.
    if config.enable_stdout {
        let fmt_layer = tracing_subscriber::fmt::layer();
        let subscriber = Registry::default().with(layer).with(fmt_layer);
        tracing::subscriber::set_global_default(subscriber)?;
    } else {
        let subscriber = Registry::default().with(layer);
        tracing::subscriber::set_global_default(subscriber)?;
    }
    Ok(())
}

/// Same as [`try_init_tracing_with_config`].
///
/// # Panics
///
/// Panics if a global subscriber has already been set.
pub fn init_tracing_with_config(sink: Arc<dyn DocumentSink>, config: LayerConfig) {
    try_init_tracing_with_config(sink, config).expect("set global subscriber");
}

/// Initialize tracing with [`LayerConfig::default`].
///
/// # Panics
///
/// Panics if a global subscriber has already been set.
pub fn init_tracing(sink: Arc<dyn DocumentSink>) {
    init_tracing_with_config(sink, LayerConfig::default());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_values_keep_defaults() {
        let config = LayerConfig::from_values(None, None, None).unwrap();
        assert_eq!(config, LayerConfig::default());
        assert_eq!(config.separator, "::");
    }

    #[test]
    fn values_override_defaults() {
        let config = LayerConfig::from_values(Some("error"), Some("."), Some("off")).unwrap();
        assert_eq!(config.min_level, Level::Error);
        assert_eq!(config.separator, ".");
        assert!(!config.enable_stdout);
    }

    #[test]
    fn empty_separator_keeps_default() {
        let config = LayerConfig::from_values(None, Some(""), None).unwrap();
        assert_eq!(config.separator, "::");

        let config = LayerConfig::from_values(None, Some("  "), None).unwrap();
        assert_eq!(config.separator, "::");
    }

    #[test]
    fn bad_level_is_reported() {
        let err = LayerConfig::from_values(Some("loud"), None, None).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidLevel { .. }));
        assert!(err.to_string().contains(BSON_APPENDER_MIN_LEVEL_ENV));
    }

    #[test]
    fn bad_bool_is_reported() {
        let err = LayerConfig::from_values(None, None, Some("maybe")).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidBool { .. }));
    }

    #[test]
    fn build_layer_uses_config() {
        let config = LayerConfig {
            min_level: Level::Warn,
            separator: ".".into(),
            enable_stdout: false,
        };
        let layer = build_layer(crate::noop_sink::NoopSink, &config);
        assert_eq!(layer.min_level(), Level::Warn);
        assert_eq!(layer.appender().bsonifier().separator(), ".");
    }
}
