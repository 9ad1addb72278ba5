//! Token display metadata with caching and placeholder fallback.

use std::sync::Arc;

use futures_util::future::join_all;
use tracing::{debug, warn};

use crate::domain::ports::{
    LookupMetrics, LookupStage, LookupStatus, TokenMetadataSource, record_lookup,
};
use crate::domain::{ContractAddress, OwnedToken, TokenId, TokenMetadata, TtlCache, UrlTemplate};

/// Attaches images and names to owned tokens.
///
/// Lookups never fail: a missing source or a failed fetch yields the
/// placeholder URL, which is not cached.
pub struct MetadataEnricher {
    source: Option<Arc<dyn TokenMetadataSource>>,
    contract: ContractAddress,
    placeholder: UrlTemplate,
    cache: TtlCache<TokenId, OwnedToken>,
    metrics: Arc<dyn LookupMetrics>,
}

impl MetadataEnricher {
    /// Create an enricher. With no `source` every token gets the placeholder.
    pub fn new(
        source: Option<Arc<dyn TokenMetadataSource>>,
        contract: ContractAddress,
        placeholder: UrlTemplate,
        cache: TtlCache<TokenId, OwnedToken>,
        metrics: Arc<dyn LookupMetrics>,
    ) -> Self {
        Self {
            source,
            contract,
            placeholder,
            cache,
            metrics,
        }
    }

    /// Display data for one token.
    pub async fn enrich(&self, token_id: &TokenId) -> OwnedToken {
        if let Some(cached) = self.cache.get(token_id) {
            debug!(%token_id, "metadata cache hit");
            record_lookup(
                self.metrics.as_ref(),
                LookupStage::Metadata,
                LookupStatus::CacheHit,
            )
            .await;
            return cached;
        }

        let Some(source) = self.source.as_ref() else {
            return self.placeholder_token(token_id);
        };

        match source.fetch_metadata(token_id).await {
            Ok(metadata) => {
                let token = OwnedToken::bare(token_id.clone()).with_metadata(metadata);
                if token.image_url.is_none() {
                    record_lookup(self.metrics.as_ref(), LookupStage::Metadata, LookupStatus::Miss)
                        .await;
                    return self.with_placeholder(token);
                }
                record_lookup(self.metrics.as_ref(), LookupStage::Metadata, LookupStatus::Hit)
                    .await;
                self.cache.insert(token_id.clone(), token.clone());
                token
            }
            Err(error) => {
                warn!(%token_id, %error, kind = error.label(), "metadata lookup failed");
                record_lookup(
                    self.metrics.as_ref(),
                    LookupStage::Metadata,
                    LookupStatus::Failed,
                )
                .await;
                self.placeholder_token(token_id)
            }
        }
    }

    /// Enrich a page of tokens concurrently, preserving order.
    ///
    /// Tokens that already carry an image are returned unchanged.
    pub async fn enrich_page(&self, tokens: &[OwnedToken]) -> Vec<OwnedToken> {
        join_all(tokens.iter().map(|token| self.enrich_one(token))).await
    }

    async fn enrich_one(&self, token: &OwnedToken) -> OwnedToken {
        if token.image_url.is_some() {
            return token.clone();
        }
        let enriched = self.enrich(&token.token_id).await;
        token.clone().with_metadata(TokenMetadata {
            image_url: enriched.image_url,
            name: enriched.name,
            description: enriched.description,
        })
    }

    fn placeholder_token(&self, token_id: &TokenId) -> OwnedToken {
        self.with_placeholder(OwnedToken::bare(token_id.clone()))
    }

    fn with_placeholder(&self, token: OwnedToken) -> OwnedToken {
        let url = self.placeholder.render(&self.contract, &token.token_id);
        token.with_image(Some(url))
    }
}
