use crate::bsonifier::{BsonifyError, DefaultBsonifier, LogEventBsonifier};
use crate::event::LogEvent;
use crate::sink::{DocumentSink, SinkError};

/// Error returned by [`BsonAppender::append`].
#[derive(thiserror::Error, Debug)]
pub enum AppendError {
    #[error("failed to convert log event into a document: {0}")]
    Bsonify(#[source] BsonifyError),

    /// The sink's own error, passed through untouched.
    #[error("document sink failed: {0}")]
    Sink(#[source] SinkError),
}

/// Converts each [`LogEvent`] into a document and hands it to a sink.
///
/// The appender consumes structured events directly and never needs a
/// text layout. It keeps no state besides its two collaborators, so one
/// instance can be shared across threads. Every call to [`append`] makes
/// exactly one call to the sink: nothing is buffered, batched, retried
/// or dropped.
///
/// [`append`]: BsonAppender::append
#[derive(Debug, Clone)]
pub struct BsonAppender<S, B = DefaultBsonifier> {
    bsonifier: B,
    sink: S,
}

impl<S: DocumentSink> BsonAppender<S> {
    /// Appender with the [`DefaultBsonifier`] document layout.
    pub fn new(sink: S) -> Self {
        Self::with_bsonifier(sink, DefaultBsonifier::default())
    }
}

impl<S, B> BsonAppender<S, B> {
    pub fn with_bsonifier(sink: S, bsonifier: B) -> Self {
        Self { bsonifier, sink }
    }

    /// Always `false`: events are never pre-rendered to text.
    pub const fn requires_layout(&self) -> bool {
        false
    }

    pub fn bsonifier(&self) -> &B {
        &self.bsonifier
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }
}

impl<S: DocumentSink, B: LogEventBsonifier> BsonAppender<S, B> {
    /// Convert `event` and append the resulting document to the sink.
    ///
    /// **Returns**
    /// - `Ok(())` once the sink accepted the document.
    /// - `Err(AppendError::Bsonify)` if the bsonifier rejected the event;
    ///   the sink is not called.
    /// - `Err(AppendError::Sink)` carrying the sink's error unchanged.
    pub fn append(&self, event: &LogEvent) -> Result<(), AppendError> {
        let document = self.bsonifier.bsonify(event).map_err(AppendError::Bsonify)?;
        self.sink.append(document).map_err(AppendError::Sink)
    }

    pub fn flush(&self) -> Result<(), AppendError> {
        self.sink.flush().map_err(AppendError::Sink)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;
    use crate::event::Level;
    use crate::memory_sink::MemorySink;
    use std::error::Error;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[derive(Debug, thiserror::Error)]
    #[error("collection is read-only")]
    struct ReadOnly;

    #[derive(Default)]
    struct FailingSink {
        calls: AtomicUsize,
    }

    impl DocumentSink for FailingSink {
        fn append(&self, _document: Document) -> Result<(), SinkError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(Box::new(ReadOnly))
        }
    }

    struct Rejecting;

    impl LogEventBsonifier for Rejecting {
        fn bsonify(&self, _event: &LogEvent) -> Result<Document, BsonifyError> {
            Err("redaction policy rejected event".into())
        }
    }

    fn event() -> LogEvent {
        LogEvent::builder()
            .level(Level::Warn)
            .message("disk almost full")
            .thread_name("worker-1")
            .logger_name("storage.Disk")
            .build()
            .unwrap()
    }

    #[test]
    fn does_not_require_layout() {
        assert!(!BsonAppender::new(MemorySink::new()).requires_layout());
    }

    #[test]
    fn appends_one_document_per_event() {
        let sink = Arc::new(MemorySink::new());
        let appender = BsonAppender::new(Arc::clone(&sink));

        appender.append(&event()).unwrap();
        appender.append(&event()).unwrap();

        let docs = sink.take();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].get_str("level"), Some("WARN"));
        assert_eq!(docs[0].get_str("thread"), Some("worker-1"));
    }

    #[test]
    fn sink_error_is_propagated_once() {
        let sink = Arc::new(FailingSink::default());
        let appender = BsonAppender::new(Arc::clone(&sink));

        let err = appender.append(&event()).unwrap_err();
        assert!(matches!(err, AppendError::Sink(_)));
        assert!(err.source().unwrap().downcast_ref::<ReadOnly>().is_some());
        assert_eq!(sink.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn bsonify_error_skips_sink() {
        let sink = Arc::new(MemorySink::new());
        let appender = BsonAppender::with_bsonifier(Arc::clone(&sink), Rejecting);

        let err = appender.append(&event()).unwrap_err();
        assert!(matches!(err, AppendError::Bsonify(_)));
        assert!(sink.is_empty());
    }
}
