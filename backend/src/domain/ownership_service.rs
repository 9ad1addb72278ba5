//! Cached ownership lookups.
//!
//! Successful results are cached per wallet so the gallery can page through a
//! listing without re-querying the provider on every click. Failures are
//! never cached.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::ports::{
    LookupMetrics, LookupStage, LookupStatus, OwnershipSource, OwnershipSourceError,
    record_lookup,
};
use crate::domain::{ContractAddress, OwnershipResult, TtlCache, WalletAddress};

/// Outcome of an ownership lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OwnershipLookup {
    /// The provider answered.
    Found(OwnershipResult),
    /// The provider failed; callers degrade to an empty result.
    Unavailable {
        /// Provider error.
        reason: OwnershipSourceError,
    },
}

impl OwnershipLookup {
    /// Result with failures mapped to nothing owned.
    pub fn into_result(self) -> OwnershipResult {
        match self {
            Self::Found(result) => result,
            Self::Unavailable { .. } => OwnershipResult::empty(),
        }
    }

    /// Whether the provider failed.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable { .. })
    }
}

/// Ownership queries against the configured collection.
pub struct OwnershipService {
    source: Arc<dyn OwnershipSource>,
    contract: ContractAddress,
    cache: TtlCache<WalletAddress, OwnershipResult>,
    metrics: Arc<dyn LookupMetrics>,
}

impl OwnershipService {
    /// Create a service over `source` for `contract`.
    pub fn new(
        source: Arc<dyn OwnershipSource>,
        contract: ContractAddress,
        cache: TtlCache<WalletAddress, OwnershipResult>,
        metrics: Arc<dyn LookupMetrics>,
    ) -> Self {
        if source.kind().is_approximate() {
            info!(
                provider = source.kind().as_str(),
                "ownership reflects tokens ever received, not tokens currently held"
            );
        }
        Self {
            source,
            contract,
            cache,
            metrics,
        }
    }

    /// Tokens of the collection held by `owner`.
    pub async fn query(&self, owner: &WalletAddress) -> OwnershipLookup {
        if let Some(cached) = self.cache.get(owner) {
            debug!(%owner, "ownership cache hit");
            record_lookup(
                self.metrics.as_ref(),
                LookupStage::Ownership,
                LookupStatus::CacheHit,
            )
            .await;
            return OwnershipLookup::Found(cached);
        }

        let provider = self.source.kind().as_str();
        match self.source.query_ownership(owner, &self.contract).await {
            Ok(result) => {
                let status = if result.is_empty() {
                    LookupStatus::Miss
                } else {
                    LookupStatus::Hit
                };
                debug!(%owner, provider, total = result.total_count(), "ownership resolved");
                record_lookup(self.metrics.as_ref(), LookupStage::Ownership, status).await;
                self.cache.insert(owner.clone(), result.clone());
                OwnershipLookup::Found(result)
            }
            Err(error) => {
                warn!(%owner, provider, %error, kind = error.label(), "ownership lookup failed");
                record_lookup(
                    self.metrics.as_ref(),
                    LookupStage::Ownership,
                    LookupStatus::Failed,
                )
                .await;
                OwnershipLookup::Unavailable { reason: error }
            }
        }
    }
}
