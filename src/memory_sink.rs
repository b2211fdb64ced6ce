use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::document::Document;
use crate::sink::{DocumentSink, SinkError};

/// Sink that keeps every appended document in memory, in append order.
///
/// Meant for tests and for inspecting the produced documents.
#[derive(Debug, Default)]
pub struct MemorySink {
    documents: Mutex<Vec<Document>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the documents appended so far.
    pub fn documents(&self) -> Vec<Document> {
        self.lock().clone()
    }

    /// Remove and return every document appended so far.
    pub fn take(&self) -> Vec<Document> {
        std::mem::take(&mut *self.lock())
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    // A panic while holding the lock cannot leave the Vec half-written.
    fn lock(&self) -> MutexGuard<'_, Vec<Document>> {
        self.documents.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl DocumentSink for MemorySink {
    fn append(&self, document: Document) -> Result<(), SinkError> {
        self.lock().push(document);
        Ok(())
    }
}
