use crate::document::Document;
use std::error::Error;
use std::sync::Arc;

/// Error reported by a [`DocumentSink`].
pub type SinkError = Box<dyn Error + Send + Sync>;

/// Destination for [`Document`]s produced by the appender.
///
/// Implementations are responsible for persisting documents to a concrete
/// backend (a database collection, a file, an in-memory buffer). The
/// appender calls `append` synchronously on the thread that emitted the
/// event, once per event, and never retries.
pub trait DocumentSink: Send + Sync {
    /// Store a single document.
    ///
    /// **Parameters**
    /// - `document`: fully-populated [`Document`]; ownership passes to the sink.
    ///
    /// **Returns**
    /// - `Ok(())` if the backend accepted the document.
    /// - `Err(..)` if the backend failed. The error reaches the caller of
    ///   the appender unchanged.
    ///
    /// Any locking, pooling or blocking I/O is the implementation's own
    /// business; calls may arrive from several threads at once.
    fn append(&self, document: Document) -> Result<(), SinkError>;

    /// Flush any buffered documents, if the backend implements buffering.
    ///
    /// Default implementation is a no-op.
    fn flush(&self) -> Result<(), SinkError> {
        Ok(())
    }
}

impl<S: DocumentSink + ?Sized> DocumentSink for Arc<S> {
    fn append(&self, document: Document) -> Result<(), SinkError> {
        (**self).append(document)
    }

    fn flush(&self) -> Result<(), SinkError> {
        (**self).flush()
    }
}

impl<S: DocumentSink + ?Sized> DocumentSink for Box<S> {
    fn append(&self, document: Document) -> Result<(), SinkError> {
        (**self).append(document)
    }

    fn flush(&self) -> Result<(), SinkError> {
        (**self).flush()
    }
}
