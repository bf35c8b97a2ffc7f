use lazy_static::lazy_static;
use prometheus::{Counter, Encoder, Histogram, HistogramOpts, Opts, Registry, TextEncoder};

lazy_static! {
    pub static ref REGISTRY: Registry = Registry::new();
    pub static ref COMMANDS_TOTAL: Counter = Counter::with_opts(Opts::new(
        "bridge_commands_total",
        "Total gesture events translated into device commands"
    ))
    .unwrap();
    pub static ref UNMAPPED_COMMANDS_TOTAL: Counter = Counter::with_opts(Opts::new(
        "bridge_unmapped_commands_total",
        "Total gesture events with no matching device command"
    ))
    .unwrap();
    pub static ref PUBLISH_FAILURES_TOTAL: Counter = Counter::with_opts(Opts::new(
        "bridge_publish_failures_total",
        "Total commands the MQTT client refused to queue"
    ))
    .unwrap();
    pub static ref READINGS_STORED_TOTAL: Counter = Counter::with_opts(Opts::new(
        "bridge_readings_stored_total",
        "Total sensor readings written to the store"
    ))
    .unwrap();
    pub static ref DB_FAILURES_TOTAL: Counter = Counter::with_opts(Opts::new(
        "bridge_db_failures_total",
        "Total failed store reads and writes"
    ))
    .unwrap();
    pub static ref DB_LATENCY_SECONDS: Histogram = Histogram::with_opts(
        HistogramOpts::new(
            "bridge_db_latency_seconds",
            "Time taken by a store read or write"
        )
        .buckets(vec![0.0005, 0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0])
    )
    .unwrap();
}

pub fn init_metrics() -> Result<(), prometheus::Error> {
    REGISTRY.register(Box::new(COMMANDS_TOTAL.clone()))?;
    REGISTRY.register(Box::new(UNMAPPED_COMMANDS_TOTAL.clone()))?;
    REGISTRY.register(Box::new(PUBLISH_FAILURES_TOTAL.clone()))?;
    REGISTRY.register(Box::new(READINGS_STORED_TOTAL.clone()))?;
    REGISTRY.register(Box::new(DB_FAILURES_TOTAL.clone()))?;
    REGISTRY.register(Box::new(DB_LATENCY_SECONDS.clone()))?;
    Ok(())
}

pub fn gather_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!("Failed to encode metrics: {}", e);
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}
