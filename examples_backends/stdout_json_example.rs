use std::sync::Arc;

use tracing::{error, instrument, warn};
use tracing_bson_appender::{
    init::{init_tracing_with_config, LayerConfig},
    writer_sink::WriterSink,
};

#[derive(Debug, thiserror::Error)]
#[error("order {0} not found")]
struct OrderNotFound(u64);

#[derive(Debug, thiserror::Error)]
#[error("checkout failed")]
struct CheckoutFailed(#[source] OrderNotFound);

#[instrument]
fn checkout(order_id: u64) {
    let err = CheckoutFailed(OrderNotFound(order_id));
    error!(error = &err as &dyn std::error::Error, "could not check out");
}

fn main() {
    // One JSON document per line on stdout.
    let config = LayerConfig::from_env().expect("invalid BSON_APPENDER_* variables");
    init_tracing_with_config(
        Arc::new(WriterSink::stdout()),
        LayerConfig {
            enable_stdout: false,
            ..config
        },
    );

    warn!(free_mb = 120, "disk almost full");
    checkout(123);
}
