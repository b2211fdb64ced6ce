//! Maps structured log events into documents for document-oriented
//! databases.
//!
//! A [`LogEvent`] goes through a [`LogEventBsonifier`] which produces a
//! [`Document`]; the [`BsonAppender`] then hands that document to a
//! [`DocumentSink`]. Both collaborators can be replaced independently: the
//! bsonifier decides the document shape, the sink decides where it goes.
//! [`BsonLayer`] plugs the appender into `tracing`.

pub mod appender;
pub mod bsonifier;
pub mod class_identity;
pub mod document;
pub mod event;
pub mod sink;
pub mod layer;

#[cfg(feature = "json")]
pub mod writer_sink;

pub mod env;
pub mod init;
pub mod memory_sink;
pub mod noop_sink;

pub use appender::{AppendError, BsonAppender};
pub use bsonifier::{BsonifyError, DefaultBsonifier, LogEventBsonifier};
pub use class_identity::ClassIdentity;
pub use document::{Document, Value};
pub use event::{Level, LocationInfo, LogEvent, StackFrame, Throwable};
pub use layer::BsonLayer;
pub use sink::{DocumentSink, SinkError};
