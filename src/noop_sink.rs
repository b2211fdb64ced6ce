use crate::document::Document;
use crate::sink::{DocumentSink, SinkError};

/// A sink that simply drops all documents.
///
/// Useful for measuring the overhead of the layer itself without any
/// external I/O, and for unit tests that don't care about persistence.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl DocumentSink for NoopSink {
    fn append(&self, _document: Document) -> Result<(), SinkError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_everything() {
        assert!(NoopSink.append(Document::new()).is_ok());
        assert!(NoopSink.flush().is_ok());
    }
}
