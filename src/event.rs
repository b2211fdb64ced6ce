use chrono::{DateTime, Utc};
use std::error::Error;
use std::fmt;
use std::str::FromStr;

/// Severity of a [`LogEvent`], ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
    Fatal,
}

impl Level {
    /// Canonical upper-case name, e.g. `"ERROR"`.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Level::Trace => "TRACE",
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
            Level::Fatal => "FATAL",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&tracing::Level> for Level {
    fn from(level: &tracing::Level) -> Self {
        match *level {
            tracing::Level::TRACE => Level::Trace,
            tracing::Level::DEBUG => Level::Debug,
            tracing::Level::INFO => Level::Info,
            tracing::Level::WARN => Level::Warn,
            _ => Level::Error,
        }
    }
}

/// Error returned when a level name cannot be parsed.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown log level: {0:?}")]
pub struct ParseLevelError(pub String);

impl FromStr for Level {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "TRACE" => Ok(Level::Trace),
            "DEBUG" => Ok(Level::Debug),
            "INFO" => Ok(Level::Info),
            "WARN" | "WARNING" => Ok(Level::Warn),
            "ERROR" => Ok(Level::Error),
            "FATAL" => Ok(Level::Fatal),
            _ => Err(ParseLevelError(s.to_string())),
        }
    }
}

/// Source location of the call that produced a [`LogEvent`].
///
/// Pieces the host framework cannot supply are set to [`LocationInfo::NA`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationInfo {
    pub file_name: String,
    pub method_name: String,
    pub line_number: i64,
    /// Fully qualified name of the class (or module) that issued the call.
    pub class_name: String,
}

impl LocationInfo {
    /// Marker for an unavailable location component.
    pub const NA: &'static str = "?";
}

/// One frame of a [`Throwable`]'s stack trace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackFrame {
    /// `None` for frames without a source file, e.g. generated code.
    pub file_name: Option<String>,
    pub method_name: String,
    /// May be one of the negative sentinels below; never reinterpreted.
    pub line_number: i64,
    /// Fully qualified name of the declaring class.
    pub declaring_class: String,
}

impl StackFrame {
    /// Line number is not known.
    pub const UNKNOWN_LINE: i64 = -1;
    /// Frame belongs to a native method.
    pub const NATIVE_METHOD_LINE: i64 = -2;
}

/// One entry of an event's causal exception chain.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Throwable {
    pub message: Option<String>,
    /// Outermost call first.
    pub stack_trace: Vec<StackFrame>,
}

impl Throwable {
    pub fn new(message: Option<String>, stack_trace: Vec<StackFrame>) -> Self {
        Self { message, stack_trace }
    }
}

/// Build a throwable chain from an error and its `source()` chain,
/// outermost error first.
///
/// Rust errors carry no frame information, so every stack trace is empty.
pub fn throwable_chain(error: &(dyn Error + 'static)) -> Vec<Throwable> {
    let mut chain = Vec::new();
    let mut current = Some(error);
    while let Some(err) = current {
        chain.push(Throwable::new(Some(err.to_string()), Vec::new()));
        current = err.source();
    }
    chain
}

/// A single structured record emitted by the logging framework.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEvent {
    pub timestamp: DateTime<Utc>,
    pub level: Level,
    pub thread_name: String,
    pub message: String,
    pub location: Option<LocationInfo>,
    pub logger_name: String,
    /// Empty when the event carries no exception.
    pub throwables: Vec<Throwable>,
}

impl LogEvent {
    pub fn builder() -> LogEventBuilder {
        LogEventBuilder::default()
    }
}

/// Returned by [`LogEventBuilder::build`] when a mandatory field is missing.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EventError {
    #[error("log event is missing mandatory field `{0}`")]
    MissingField(&'static str),
}

/// Field-by-field constructor for [`LogEvent`].
///
/// Level, message, thread name and logger name are mandatory. The timestamp
/// defaults to the instant the builder was created.
#[derive(Debug, Clone)]
pub struct LogEventBuilder {
    timestamp: DateTime<Utc>,
    level: Option<Level>,
    thread_name: Option<String>,
    message: Option<String>,
    location: Option<LocationInfo>,
    logger_name: Option<String>,
    throwables: Vec<Throwable>,
}

impl Default for LogEventBuilder {
    fn default() -> Self {
        Self {
            timestamp: Utc::now(),
            level: None,
            thread_name: None,
            message: None,
            location: None,
            logger_name: None,
            throwables: Vec::new(),
        }
    }
}

impl LogEventBuilder {
    pub fn timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn level(mut self, level: Level) -> Self {
        self.level = Some(level);
        self
    }

    pub fn thread_name(mut self, thread_name: impl Into<String>) -> Self {
        self.thread_name = Some(thread_name.into());
        self
    }

    /// Accepts anything with a string form.
    pub fn message(mut self, message: impl fmt::Display) -> Self {
        self.message = Some(message.to_string());
        self
    }

    pub fn location(mut self, location: LocationInfo) -> Self {
        self.location = Some(location);
        self
    }

    pub fn logger_name(mut self, logger_name: impl Into<String>) -> Self {
        self.logger_name = Some(logger_name.into());
        self
    }

    /// Append one throwable to the end of the chain.
    pub fn throwable(mut self, throwable: Throwable) -> Self {
        self.throwables.push(throwable);
        self
    }

    pub fn throwables(mut self, throwables: impl IntoIterator<Item = Throwable>) -> Self {
        self.throwables.extend(throwables);
        self
    }

    pub fn build(self) -> Result<LogEvent, EventError> {
        Ok(LogEvent {
            timestamp: self.timestamp,
            level: self.level.ok_or(EventError::MissingField("level"))?,
            thread_name: self
                .thread_name
                .ok_or(EventError::MissingField("thread_name"))?,
            message: self.message.ok_or(EventError::MissingField("message"))?,
            location: self.location,
            logger_name: self
                .logger_name
                .ok_or(EventError::MissingField("logger_name"))?,
            throwables: self.throwables,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, thiserror::Error)]
    #[error("connection refused")]
    struct Refused;

    #[derive(Debug, thiserror::Error)]
    #[error("query failed")]
    struct QueryFailed(#[source] Refused);

    #[test]
    fn levels_are_ordered_by_severity() {
        assert!(Level::Debug < Level::Info);
        assert!(Level::Info < Level::Warn);
        assert!(Level::Warn < Level::Error);
        assert!(Level::Error < Level::Fatal);
    }

    #[test]
    fn maps_tracing_levels() {
        assert_eq!(Level::from(&tracing::Level::TRACE), Level::Trace);
        assert_eq!(Level::from(&tracing::Level::WARN), Level::Warn);
        assert_eq!(Level::from(&tracing::Level::ERROR), Level::Error);
    }

    #[test]
    fn level_parses_case_insensitively() {
        assert_eq!("warn".parse::<Level>(), Ok(Level::Warn));
        assert_eq!(" Error ".parse::<Level>(), Ok(Level::Error));
        assert!("loud".parse::<Level>().is_err());
        assert_eq!(Level::Fatal.to_string(), "FATAL");
    }

    #[test]
    fn builder_rejects_missing_level() {
        let err = LogEvent::builder()
            .message("boom")
            .thread_name("main")
            .logger_name("app")
            .build()
            .unwrap_err();
        assert_eq!(err, EventError::MissingField("level"));
    }

    #[test]
    fn builder_rejects_missing_message() {
        let err = LogEvent::builder()
            .level(Level::Info)
            .thread_name("main")
            .logger_name("app")
            .build()
            .unwrap_err();
        assert_eq!(err, EventError::MissingField("message"));
    }

    #[test]
    fn builder_rejects_missing_thread_name() {
        let err = LogEvent::builder()
            .level(Level::Info)
            .message("started")
            .logger_name("app")
            .build()
            .unwrap_err();
        assert_eq!(err, EventError::MissingField("thread_name"));
    }

    #[test]
    fn builder_rejects_missing_logger_name() {
        let err = LogEvent::builder()
            .level(Level::Info)
            .message("started")
            .thread_name("main")
            .build()
            .unwrap_err();
        assert_eq!(err, EventError::MissingField("logger_name"));
    }

    #[test]
    fn builder_keeps_throwable_order() {
        let event = LogEvent::builder()
            .level(Level::Error)
            .message(42)
            .thread_name("main")
            .logger_name("app")
            .throwable(Throwable::new(Some("first".into()), Vec::new()))
            .throwable(Throwable::new(Some("second".into()), Vec::new()))
            .build()
            .unwrap();

        assert_eq!(event.message, "42");
        let messages: Vec<_> = event
            .throwables
            .iter()
            .map(|t| t.message.as_deref().unwrap())
            .collect();
        assert_eq!(messages, ["first", "second"]);
    }

    #[test]
    fn throwable_chain_walks_sources_outermost_first() {
        let err = QueryFailed(Refused);
        let chain = throwable_chain(&err);
        assert_eq!(chain.len(), 2);
        assert_eq!(chain[0].message.as_deref(), Some("query failed"));
        assert_eq!(chain[1].message.as_deref(), Some("connection refused"));
        assert!(chain.iter().all(|t| t.stack_trace.is_empty()));
    }
}
