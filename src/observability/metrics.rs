use prometheus::{
    Encoder, HistogramVec, IntCounter, IntCounterVec, IntGauge, Opts, Registry, TextEncoder,
};

#[derive(Clone)]
pub struct Metrics {
    registry: Registry,
    pub quotes_total: IntCounterVec,
    pub quote_latency_seconds: HistogramVec,
    pub free_deliveries_total: IntCounter,
    pub configs_stored: IntGauge,
}

impl Metrics {
    pub fn new() -> Self {
        let registry = Registry::new();

        let quotes_total = IntCounterVec::new(
            Opts::new("delivery_quotes_total", "Total delivery quotes by outcome"),
            &["outcome"],
        )
        .expect("valid delivery_quotes_total metric");

        let quote_latency_seconds = HistogramVec::new(
            prometheus::HistogramOpts::new(
                "delivery_quote_latency_seconds",
                "Latency of delivery quote computation in seconds",
            ),
            &["outcome"],
        )
        .expect("valid delivery_quote_latency_seconds metric");

        let free_deliveries_total = IntCounter::new(
            "free_deliveries_total",
            "Quotes where the free delivery override applied",
        )
        .expect("valid free_deliveries_total metric");

        let configs_stored = IntGauge::new(
            "delivery_configs_stored",
            "Current number of shops with a delivery configuration",
        )
        .expect("valid delivery_configs_stored metric");

        registry
            .register(Box::new(quotes_total.clone()))
            .expect("register delivery_quotes_total");
        registry
            .register(Box::new(quote_latency_seconds.clone()))
            .expect("register delivery_quote_latency_seconds");
        registry
            .register(Box::new(free_deliveries_total.clone()))
            .expect("register free_deliveries_total");
        registry
            .register(Box::new(configs_stored.clone()))
            .expect("register delivery_configs_stored");

        Self {
            registry,
            quotes_total,
            quote_latency_seconds,
            free_deliveries_total,
            configs_stored,
        }
    }

    pub fn record_quote(&self, outcome: &str, elapsed_seconds: f64) {
        self.quotes_total.with_label_values(&[outcome]).inc();
        self.quote_latency_seconds
            .with_label_values(&[outcome])
            .observe(elapsed_seconds);
    }

    pub fn encode(&self) -> Result<String, String> {
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();

        TextEncoder::new()
            .encode(&metric_families, &mut buffer)
            .map_err(|err| format!("failed to encode metrics: {err}"))?;

        String::from_utf8(buffer).map_err(|err| format!("metrics are not valid utf8: {err}"))
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
