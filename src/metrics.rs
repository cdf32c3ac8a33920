use crate::{Error, Result};
use prometheus::{Encoder, IntCounter, Registry, TextEncoder};

pub const REQUESTS_TOTAL: &str = "sentiment_analysis_requests_total";

/// Prometheus registry owned by one service instance.
pub struct Metrics {
    registry: Registry,
    requests: IntCounter,
}

impl Metrics {
    pub fn new() -> Result<Self> {
        let registry = Registry::new();
        let requests = IntCounter::new(REQUESTS_TOTAL, "Total sentiment analysis requests")?;
        registry.register(Box::new(requests.clone()))?;

        Ok(Self { registry, requests })
    }

    pub fn record_request(&self) {
        self.requests.inc();
    }

    pub fn requests_total(&self) -> u64 {
        self.requests.get()
    }

    /// Text exposition of every registered metric.
    pub fn render(&self) -> Result<String> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer)
            .map_err(|e| Error::internal(format!("Invalid metrics output: {}", e)))
    }

    pub fn content_type(&self) -> String {
        TextEncoder::new().format_type().to_string()
    }
}
