use std::sync::Arc;

use tracing_bson_appender::document::Document;
use tracing_bson_appender::init::{build_layer, LayerConfig};
use tracing_bson_appender::layer::BsonLayer;
use tracing_bson_appender::memory_sink::MemorySink;
use tracing_bson_appender::sink::{DocumentSink, SinkError};
use tracing_bson_appender::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::Registry;

#[derive(Debug, thiserror::Error)]
#[error("write concern failed")]
pub struct WriteConcernFailed;

/// Sink that refuses every document.
#[derive(Debug, Default)]
pub struct FailingSink;

impl DocumentSink for FailingSink {
    fn append(&self, _document: Document) -> Result<(), SinkError> {
        Err(Box::new(WriteConcernFailed))
    }
}

pub fn config(min_level: Level) -> LayerConfig {
    LayerConfig {
        min_level,
        enable_stdout: false,
        ..LayerConfig::default()
    }
}

/// Run `f` with a thread-local subscriber writing into a fresh
/// [`MemorySink`], and return every captured document.
pub fn capture<F: FnOnce()>(min_level: Level, f: F) -> Vec<Document> {
    let sink = Arc::new(MemorySink::new());
    let layer = build_layer(Arc::clone(&sink), &config(min_level));
    with_layer(layer, f);
    sink.take()
}

pub fn with_layer<S, F>(layer: BsonLayer<S>, f: F)
where
    S: DocumentSink + 'static,
    F: FnOnce(),
{
    let subscriber = Registry::default().with(layer);
    tracing::subscriber::with_default(subscriber, f);
}
