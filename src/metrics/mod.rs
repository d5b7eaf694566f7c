//! Prometheus metrics for the engine and HTTP surface

use prometheus::{
    Encoder, Gauge, Histogram, HistogramOpts, IntCounter, IntGauge, Opts, Registry, TextEncoder,
};

pub struct Metrics {
    registry: Registry,
    pub signal_evaluations_total: IntCounter,
    pub signal_evaluations_active: IntGauge,
    pub signal_evaluation_duration_seconds: Histogram,
    pub insufficient_data_total: IntCounter,
    pub http_requests_total: IntCounter,
    pub http_requests_in_flight: IntGauge,
    pub http_request_duration_seconds: Histogram,
    pub database_connected: Gauge,
    pub cache_connected: Gauge,
}

impl Metrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let signal_evaluations_total = IntCounter::with_opts(Opts::new(
            "signal_evaluations_total",
            "Total number of snapshot evaluations that produced a signal",
        ))?;
        registry.register(Box::new(signal_evaluations_total.clone()))?;

        let signal_evaluations_active = IntGauge::with_opts(Opts::new(
            "signal_evaluations_active",
            "Number of evaluations currently in progress",
        ))?;
        registry.register(Box::new(signal_evaluations_active.clone()))?;

        let signal_evaluation_duration_seconds = Histogram::with_opts(HistogramOpts::new(
            "signal_evaluation_duration_seconds",
            "Duration of one snapshot evaluation",
        ))?;
        registry.register(Box::new(signal_evaluation_duration_seconds.clone()))?;

        let insufficient_data_total = IntCounter::with_opts(Opts::new(
            "insufficient_data_total",
            "Total number of evaluations that returned insufficient data",
        ))?;
        registry.register(Box::new(insufficient_data_total.clone()))?;

        let http_requests_total = IntCounter::with_opts(Opts::new(
            "http_requests_total",
            "Total number of HTTP requests served",
        ))?;
        registry.register(Box::new(http_requests_total.clone()))?;

        let http_requests_in_flight = IntGauge::with_opts(Opts::new(
            "http_requests_in_flight",
            "Number of HTTP requests currently being served",
        ))?;
        registry.register(Box::new(http_requests_in_flight.clone()))?;

        let http_request_duration_seconds = Histogram::with_opts(HistogramOpts::new(
            "http_request_duration_seconds",
            "Duration of HTTP request handling",
        ))?;
        registry.register(Box::new(http_request_duration_seconds.clone()))?;

        let database_connected = Gauge::with_opts(Opts::new(
            "database_connected",
            "1 when the QuestDB connection is established, 0 otherwise",
        ))?;
        registry.register(Box::new(database_connected.clone()))?;

        let cache_connected = Gauge::with_opts(Opts::new(
            "cache_connected",
            "1 when the Redis connection is established, 0 otherwise",
        ))?;
        registry.register(Box::new(cache_connected.clone()))?;

        Ok(Self {
            registry,
            signal_evaluations_total,
            signal_evaluations_active,
            signal_evaluation_duration_seconds,
            insufficient_data_total,
            http_requests_total,
            http_requests_in_flight,
            http_request_duration_seconds,
            database_connected,
            cache_connected,
        })
    }

    /// Render the registry in Prometheus text exposition format
    pub fn export(&self) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer).map_err(|e| {
            Box::new(std::io::Error::other(format!("Failed to encode metrics: {}", e)))
                as Box<dyn std::error::Error + Send + Sync>
        })?;
        String::from_utf8(buffer).map_err(|e| {
            Box::new(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("Metrics buffer is not valid UTF-8: {}", e),
            )) as Box<dyn std::error::Error + Send + Sync>
        })
    }
}
