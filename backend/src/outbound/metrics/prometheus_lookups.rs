//! Prometheus adapter for lookup outcome counters.
//!
//! Registered against the same registry the `/metrics` endpoint exposes.

use async_trait::async_trait;
use prometheus::{CounterVec, Opts, Registry};

use crate::domain::ports::{LookupMetrics, LookupMetricsError, LookupOutcome};

/// Prometheus-backed lookup recorder.
///
/// # Metric Specification
///
/// - **Name**: `frame_lookups_total`
/// - **Type**: Counter
/// - **Labels**:
///   - `stage`: `identity`, `ownership`, or `metadata`
///   - `status`: `hit`, `miss`, `cache_hit`, or `failed`
pub struct PrometheusLookupMetrics {
    lookups_total: CounterVec,
}

impl PrometheusLookupMetrics {
    /// Create and register the counter with `registry`.
    ///
    /// # Errors
    ///
    /// Returns an error if a metric with the same name is already registered.
    pub fn new(registry: &Registry) -> Result<Self, prometheus::Error> {
        let lookups_total = CounterVec::new(
            Opts::new(
                "frame_lookups_total",
                "Identity, ownership and metadata lookups by outcome",
            ),
            &["stage", "status"],
        )?;
        registry.register(Box::new(lookups_total.clone()))?;
        Ok(Self { lookups_total })
    }
}

#[async_trait]
impl LookupMetrics for PrometheusLookupMetrics {
    async fn record(&self, outcome: &LookupOutcome) -> Result<(), LookupMetricsError> {
        self.lookups_total
            .get_metric_with_label_values(&[outcome.stage.as_str(), outcome.status.as_str()])
            .map_err(|err| LookupMetricsError::export(err.to_string()))?
            .inc();
        Ok(())
    }
}
