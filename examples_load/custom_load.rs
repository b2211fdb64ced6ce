use std::sync::atomic::Ordering;
use std::time::Instant;
use tracing::{error, info_span};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::Registry;

use tracing_bson_appender::init::{build_layer, LayerConfig};
use tracing_bson_appender::noop_sink::NoopSink;
use tracing_bson_appender::Level;

#[derive(Debug, thiserror::Error)]
#[error("upstream timed out")]
struct Timeout;

fn main() {
    let config = LayerConfig {
        min_level: Level::Error,
        separator: "::".to_string(),
        enable_stdout: false,
    };
    let layer = build_layer(NoopSink, &config);
    let appended = layer.appended_events.clone();

    let subscriber = Registry::default().with(layer);
    tracing::subscriber::set_global_default(subscriber).expect("set global subscriber");

    let n: u64 = 100_000;
    let start = Instant::now();

    let span = info_span!("handle_request");
    let _guard = span.enter();
    for i in 0..n {
        let err = Timeout;
        error!(iteration = i, error = &err as &dyn std::error::Error, "custom load test error");
    }

    let elapsed = start.elapsed();
    println!("custom config: appended {} of {} events in {:?} (~{:.0} ev/s)",
        appended.load(Ordering::Relaxed),
        n,
        elapsed,
        n as f64 / elapsed.as_secs_f64()
    );
}
