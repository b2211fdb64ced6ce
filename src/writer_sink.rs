use std::io::{self, Write};
use std::sync::{Mutex, PoisonError};

use crate::document::Document;
use crate::sink::{DocumentSink, SinkError};

/// Sink that writes every document as one JSON line to a writer.
///
/// Each line is flushed before `append` returns. If a write fails partway
/// through a line, the next append first terminates the broken line, so
/// every later document still starts on a line of its own.
#[derive(Debug)]
pub struct WriterSink<W> {
    state: Mutex<WriterState<W>>,
}

#[derive(Debug)]
struct WriterState<W> {
    writer: W,
    /// The last line may have been written only in part.
    torn: bool,
}

impl<W: Write + Send> WriterSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            state: Mutex::new(WriterState {
                writer,
                torn: false,
            }),
        }
    }

    /// Return the underlying writer.
    pub fn into_inner(self) -> W {
        self.state
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
            .writer
    }
}

impl WriterSink<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send> DocumentSink for WriterSink<W> {
    fn append(&self, document: Document) -> Result<(), SinkError> {
        let mut line = serde_json::to_vec(&document)?;
        line.push(b'\n');

        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if state.torn {
            line.insert(0, b'\n');
        }
        state.torn = true;
        state.writer.write_all(&line)?;
        state.torn = false;
        state.writer.flush()?;
        Ok(())
    }

    fn flush(&self) -> Result<(), SinkError> {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .writer
            .flush()?;
        Ok(())
    }
}
