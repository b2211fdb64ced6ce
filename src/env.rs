//! Environment variable names used by this crate for convenient
//! configuration of the layer from services.
//!
//! These are purely helpers; the appender and sink types remain decoupled
//! from environment access.

/// Minimum level forwarded to the sink, e.g. `INFO`.
pub const BSON_APPENDER_MIN_LEVEL_ENV: &str = "BSON_APPENDER_MIN_LEVEL";

/// Separator used to split logger and class names into packages.
pub const BSON_APPENDER_SEPARATOR_ENV: &str = "BSON_APPENDER_SEPARATOR";

/// Whether to also print events through a `fmt` layer (`true`/`false`).
pub const BSON_APPENDER_STDOUT_ENV: &str = "BSON_APPENDER_STDOUT";

/// Read an environment variable, treating unset and empty values alike.
pub fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
