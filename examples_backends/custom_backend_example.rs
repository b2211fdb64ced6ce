use std::sync::Arc;

use tracing::{error, info};
use tracing_bson_appender::{
    init::init_tracing,
    sink::{DocumentSink, SinkError},
    Document,
};

/// Example of integrating a completely custom backend by implementing
/// the `DocumentSink` trait directly. Imagine this talks to some
/// document database for which this crate does not provide a sink.
struct MyCustomDbSink;

impl DocumentSink for MyCustomDbSink {
    fn append(&self, document: Document) -> Result<(), SinkError> {
        // Here you would call your own client library for the target DB.
        // For the sake of example we just print the document.
        println!("[my-custom-db] {:?}", document);
        Ok(())
    }
}

fn main() {
    let sink: Arc<dyn DocumentSink> = Arc::new(MyCustomDbSink);

    init_tracing(sink);

    info!("custom backend example started");
    error!(db = "my-custom-db", "simulated error sent via custom backend");
}
