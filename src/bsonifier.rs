use std::borrow::Cow;
use std::error::Error;

use crate::class_identity::ClassIdentity;
use crate::document::{Document, Value};
use crate::event::{LogEvent, StackFrame, Throwable};

/// Error produced by a [`LogEventBsonifier`].
pub type BsonifyError = Box<dyn Error + Send + Sync>;

/// Turns a [`LogEvent`] into a [`Document`].
///
/// Implementations must be pure: no shared mutable state, and the same
/// event always yields the same document. Alternate implementations can
/// rename or redact fields without touching the sink.
pub trait LogEventBsonifier: Send + Sync {
    fn bsonify(&self, event: &LogEvent) -> Result<Document, BsonifyError>;
}

impl<B: LogEventBsonifier + ?Sized> LogEventBsonifier for Box<B> {
    fn bsonify(&self, event: &LogEvent) -> Result<Document, BsonifyError> {
        (**self).bsonify(event)
    }
}

/// The standard document layout:
///
/// ```text
/// {
///   "timestamp"  : <date>,
///   "level"      : "ERROR",
///   "thread"     : "main",
///   "message"    : "Error entry",
///   "fileName"   : "lib.rs",            // only with location info
///   "method"     : "handle",            // only with location info
///   "lineNumber" : 147,                 // only with location info
///   "loggerName" : { "fullyQualifiedClassName", "package", "className" },
///   "class"      : { ... },             // only with location info
///   "throwables" : [                    // only when the chain is non-empty
///     { "message"?, "stackTrace": [ { "fileName"?, "method", "lineNumber", "class" } ] }
///   ]
/// }
/// ```
#[derive(Debug, Clone)]
pub struct DefaultBsonifier {
    separator: Cow<'static, str>,
}

impl Default for DefaultBsonifier {
    fn default() -> Self {
        Self {
            separator: Cow::Borrowed(ClassIdentity::DOT),
        }
    }
}

impl DefaultBsonifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `separator` to split logger and class names into packages.
    pub fn with_separator(separator: impl Into<Cow<'static, str>>) -> Self {
        Self {
            separator: separator.into(),
        }
    }

    pub fn separator(&self) -> &str {
        &self.separator
    }

    fn class_identity(&self, name: &str) -> Document {
        ClassIdentity::parse_with(name, &self.separator).to_document()
    }

    fn bsonify_throwable(&self, throwable: &Throwable) -> Document {
        let mut doc = Document::new();
        if let Some(message) = &throwable.message {
            doc.insert("message", message.as_str());
        }
        let frames: Vec<Value> = throwable
            .stack_trace
            .iter()
            .map(|frame| Value::Document(self.bsonify_stack_frame(frame)))
            .collect();
        doc.insert("stackTrace", Value::Array(frames));
        doc
    }

    fn bsonify_stack_frame(&self, frame: &StackFrame) -> Document {
        let mut doc = Document::new();
        if let Some(file_name) = &frame.file_name {
            doc.insert("fileName", file_name.as_str());
        }
        doc.insert("method", frame.method_name.as_str());
        doc.insert("lineNumber", frame.line_number);
        doc.insert("class", self.class_identity(&frame.declaring_class));
        doc
    }
}

impl LogEventBsonifier for DefaultBsonifier {
    fn bsonify(&self, event: &LogEvent) -> Result<Document, BsonifyError> {
        let mut doc = Document::new();
        doc.insert("timestamp", event.timestamp);
        doc.insert("level", event.level.as_str());
        doc.insert("thread", event.thread_name.as_str());
        doc.insert("message", event.message.as_str());

        if let Some(location) = &event.location {
            doc.insert("fileName", location.file_name.as_str());
            doc.insert("method", location.method_name.as_str());
            doc.insert("lineNumber", location.line_number);
        }

        doc.insert("loggerName", self.class_identity(&event.logger_name));

        if let Some(location) = &event.location {
            doc.insert("class", self.class_identity(&location.class_name));
        }

        if !event.throwables.is_empty() {
            let throwables: Vec<Value> = event
                .throwables
                .iter()
                .map(|t| Value::Document(self.bsonify_throwable(t)))
                .collect();
            doc.insert("throwables", Value::Array(throwables));
        }

        Ok(doc)
    }
}
