//! Prometheus-backed metrics adapters, compiled with the `metrics` feature.

mod prometheus_lookups;

pub use prometheus_lookups::PrometheusLookupMetrics;
