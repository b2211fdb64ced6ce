use std::sync::Arc;
use std::time::Instant;
use tracing::error;

use tracing_bson_appender::init::{init_tracing_with_config, LayerConfig};
use tracing_bson_appender::noop_sink::NoopSink;

fn main() {
    let sink = Arc::new(NoopSink);
    init_tracing_with_config(
        sink,
        LayerConfig {
            enable_stdout: false,
            ..LayerConfig::default()
        },
    );

    let n: u64 = 100_000;
    let start = Instant::now();

    for i in 0..n {
        error!(iteration = i, "default load test error");
    }

    let elapsed = start.elapsed();
    println!("default config: appended {} events in {:?} (~{:.0} ev/s)",
        n,
        elapsed,
        n as f64 / elapsed.as_secs_f64()
    );
}
