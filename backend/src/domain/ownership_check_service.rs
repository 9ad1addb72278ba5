//! Ownership check service.
//!
//! Implements the [`OwnershipCheck`] driving port by composing identity
//! resolution, cached ownership lookups, pagination and metadata enrichment.

use async_trait::async_trait;
use pagination::{PageSize, PaginationPolicy, window};
use tracing::info;

use crate::domain::ports::{
    CheckOutcome, CheckRequest, GalleryOutcome, GalleryPage, GalleryRequest, OwnershipCheck,
};
use crate::domain::{IdentityService, MetadataEnricher, OwnershipLookup, OwnershipService};

/// Gallery layout options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GallerySettings {
    /// Tokens per page.
    pub page_size: PageSize,
    /// Behaviour at the first and last page.
    pub policy: PaginationPolicy,
}

/// Service implementing [`OwnershipCheck`].
pub struct OwnershipCheckService {
    identities: IdentityService,
    ownership: OwnershipService,
    enricher: MetadataEnricher,
    gallery: GallerySettings,
}

impl OwnershipCheckService {
    /// Compose the service from its collaborators.
    pub fn new(
        identities: IdentityService,
        ownership: OwnershipService,
        enricher: MetadataEnricher,
        gallery: GallerySettings,
    ) -> Self {
        Self {
            identities,
            ownership,
            enricher,
            gallery,
        }
    }
}

#[async_trait]
impl OwnershipCheck for OwnershipCheckService {
    async fn check(&self, request: CheckRequest) -> CheckOutcome {
        let owner = match (request.verified_address, request.identity) {
            (Some(address), _) => Some(address),
            (None, Some(identity)) => self.identities.resolve_first(&identity).await,
            (None, None) => None,
        };
        let Some(owner) = owner else {
            info!("no wallet linked to identity");
            return CheckOutcome::NoIdentity;
        };

        let outcome = match self.ownership.query(&owner).await {
            OwnershipLookup::Found(result) if result.is_empty() => CheckOutcome::NotOwned { owner },
            OwnershipLookup::Found(result) => CheckOutcome::Owned { owner, result },
            OwnershipLookup::Unavailable { .. } => CheckOutcome::Failed { owner },
        };
        info!(
            owner = outcome.owner().map(|owner| owner.as_str()),
            owned = outcome.owned_count(),
            "ownership checked"
        );
        outcome
    }

    async fn gallery(&self, request: GalleryRequest) -> GalleryOutcome {
        let GalleryRequest { owner, page } = request;
        let result = match self.ownership.query(&owner).await {
            OwnershipLookup::Found(result) => result,
            OwnershipLookup::Unavailable { .. } => return GalleryOutcome::Unavailable { owner },
        };
        let tokens = result.tokens();
        if result.is_empty() {
            return GalleryOutcome::Empty { owner };
        }
        if tokens.is_empty() {
            info!(
                owner = owner.as_str(),
                total = result.total_count(),
                "balance known but no listing to page through"
            );
            return GalleryOutcome::Unlisted {
                owner,
                total_count: result.total_count(),
            };
        }

        let window = window(
            tokens.len(),
            self.gallery.page_size,
            page,
            self.gallery.policy,
        );
        let visible = self.enricher.enrich_page(window.slice(tokens)).await;
        GalleryOutcome::Page(GalleryPage {
            owner,
            tokens: visible,
            window,
            total_count: result.total_count(),
        })
    }
}

#[cfg(test)]
#[path = "ownership_check_service_tests.rs"]
mod tests;
