use crate::appender::{AppendError, BsonAppender};
use crate::bsonifier::{DefaultBsonifier, LogEventBsonifier};
use crate::event::{throwable_chain, Level, LocationInfo, LogEvent, Throwable};
use crate::sink::DocumentSink;
use chrono::Utc;
use std::fmt;
use std::sync::{Arc, atomic::{AtomicU64, Ordering}};
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::registry::LookupSpan;

/// Callback receiving append failures the layer cannot return to its caller.
pub type ErrorHandler = Arc<dyn Fn(&AppendError) + Send + Sync>;

/// `tracing_subscriber` layer that turns every event into a [`LogEvent`]
/// and passes it to a [`BsonAppender`] on the emitting thread.
///
/// Events below `min_level` are ignored. Since `on_event` cannot return an
/// error, each failed append is handed once to the error handler, which by
/// default prints it to stderr.
pub struct BsonLayer<S, B = DefaultBsonifier> {
    appender: BsonAppender<S, B>,
    min_level: Level,
    on_error: ErrorHandler,
    /// Total events seen by the layer (before filtering by level).
    pub total_events: Arc<AtomicU64>,
    /// Accepted by the sink.
    pub appended_events: Arc<AtomicU64>,
    /// Rejected by the bsonifier or the sink.
    pub failed_events: Arc<AtomicU64>,
}

impl<S, B> BsonLayer<S, B> {
    /// Create a layer that forwards events at `min_level` and above.
    pub fn new(appender: BsonAppender<S, B>, min_level: Level) -> Self {
        Self {
            appender,
            min_level,
            on_error: Arc::new(report_to_stderr),
            total_events: Arc::new(AtomicU64::new(0)),
            appended_events: Arc::new(AtomicU64::new(0)),
            failed_events: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Replace the handler that receives failed appends.
    pub fn with_error_handler<F>(mut self, handler: F) -> Self
    where
        F: Fn(&AppendError) + Send + Sync + 'static,
    {
        self.on_error = Arc::new(handler);
        self
    }

    pub fn appender(&self) -> &BsonAppender<S, B> {
        &self.appender
    }

    pub fn min_level(&self) -> Level {
        self.min_level
    }
}

impl<S, B> fmt::Debug for BsonLayer<S, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BsonLayer")
            .field("min_level", &self.min_level)
            .finish_non_exhaustive()
    }
}

// We can't use `tracing::error!` here: we are in the middle of dispatching
// an event and the report would come straight back into this layer.
fn report_to_stderr(err: &AppendError) {
    eprintln!("bson appender failed: {}", err);
}

fn current_thread_name() -> String {
    let thread = std::thread::current();
    match thread.name() {
        Some(name) => name.to_string(),
        None => format!("{:?}", thread.id()),
    }
}

impl<S, B, Sub> Layer<Sub> for BsonLayer<S, B>
where
    S: DocumentSink + 'static,
    B: LogEventBsonifier + 'static,
    Sub: Subscriber + for<'span> LookupSpan<'span>,
{
    fn on_event(&self, event: &Event<'_>, ctx: Context<'_, Sub>) {
        self.total_events.fetch_add(1, Ordering::Relaxed);
        let meta = event.metadata();
        let level = Level::from(meta.level());
        if level < self.min_level {
            return;
        }

        let mut visitor = FieldVisitor::default();
        event.record(&mut visitor);

        let location = match (meta.file(), meta.line()) {
            (Some(file), Some(line)) => Some(LocationInfo {
                file_name: file.to_string(),
                method_name: ctx
                    .event_span(event)
                    .map(|span| span.name())
                    .unwrap_or(LocationInfo::NA)
                    .to_string(),
                line_number: i64::from(line),
                class_name: meta.module_path().unwrap_or_else(|| meta.target()).to_string(),
            }),
            _ => None,
        };

        let log_event = LogEvent {
            timestamp: Utc::now(),
            level,
            thread_name: current_thread_name(),
            message: visitor.rendered_message(),
            location,
            logger_name: meta.target().to_string(),
            throwables: visitor.throwables,
        };

        match self.appender.append(&log_event) {
            Ok(()) => {
                self.appended_events.fetch_add(1, Ordering::Relaxed);
            }
            Err(err) => {
                self.failed_events.fetch_add(1, Ordering::Relaxed);
                (self.on_error)(&err);
            }
        }
    }
}

/// Collects the message, the remaining fields and any recorded errors of
/// one event.
#[derive(Debug, Default)]
pub struct FieldVisitor {
    pub message: Option<String>,
    pub fields: Vec<(&'static str, String)>,
    pub throwables: Vec<Throwable>,
}

impl FieldVisitor {
    /// The message followed by ` key=value` for every other field.
    pub fn rendered_message(&self) -> String {
        let mut out = self.message.clone().unwrap_or_default();
        for (name, value) in &self.fields {
            if !out.is_empty() {
                out.push(' ');
            }
            out.push_str(&format!("{}={}", name, value));
        }
        out
    }
}

impl Visit for FieldVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = Some(value.to_string());
        } else {
            self.fields.push((field.name(), value.to_string()));
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.fields.push((field.name(), value.to_string()));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.fields.push((field.name(), value.to_string()));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.fields.push((field.name(), value.to_string()));
    }

    fn record_error(&mut self, _field: &Field, value: &(dyn std::error::Error + 'static)) {
        self.throwables.extend(throwable_chain(value));
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = Some(format!("{:?}", value));
        } else {
            self.fields.push((field.name(), format!("{:?}", value)));
        }
    }
}
