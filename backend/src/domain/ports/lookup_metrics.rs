//! Domain port for lookup outcome counters.
//!
//! Services report each identity, ownership and metadata lookup here; the
//! Prometheus adapter turns them into labelled counters.

use async_trait::async_trait;

use super::define_port_error;

define_port_error! {
    /// Errors exposed when recording lookup metrics.
    pub enum LookupMetricsError {
        /// Metric exporter rejected the write.
        Export { message: String } =>
            "lookup metrics exporter failed: {message}",
    }
}

/// Pipeline stage a lookup belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LookupStage {
    /// Social identity to wallet resolution.
    Identity,
    /// Wallet ownership query.
    Ownership,
    /// Token metadata enrichment.
    Metadata,
}

impl LookupStage {
    /// Metric label value.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Identity => "identity",
            Self::Ownership => "ownership",
            Self::Metadata => "metadata",
        }
    }
}

/// How a lookup ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LookupStatus {
    /// The provider returned data.
    Hit,
    /// The provider answered with nothing.
    Miss,
    /// Served from the in-process cache.
    CacheHit,
    /// The provider call failed and the lookup degraded.
    Failed,
}

impl LookupStatus {
    /// Metric label value.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Hit => "hit",
            Self::Miss => "miss",
            Self::CacheHit => "cache_hit",
            Self::Failed => "failed",
        }
    }
}

/// One recorded lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LookupOutcome {
    /// Stage label.
    pub stage: LookupStage,
    /// Status label.
    pub status: LookupStatus,
}

impl LookupOutcome {
    /// Pair a stage with a status.
    pub fn new(stage: LookupStage, status: LookupStatus) -> Self {
        Self { stage, status }
    }
}

/// Metrics recording port for lookup counters.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LookupMetrics: Send + Sync {
    /// Count one lookup.
    async fn record(&self, outcome: &LookupOutcome) -> Result<(), LookupMetricsError>;
}

/// Record a lookup, logging exporter failures instead of returning them.
pub(crate) async fn record_lookup(
    metrics: &dyn LookupMetrics,
    stage: LookupStage,
    status: LookupStatus,
) {
    if let Err(error) = metrics.record(&LookupOutcome::new(stage, status)).await {
        tracing::warn!(%error, stage = stage.as_str(), "failed to record lookup metric");
    }
}

/// No-op implementation used when metrics are disabled or in tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpLookupMetrics;

#[async_trait]
impl LookupMetrics for NoOpLookupMetrics {
    async fn record(&self, _outcome: &LookupOutcome) -> Result<(), LookupMetricsError> {
        Ok(())
    }
}
