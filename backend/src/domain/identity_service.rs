//! Identity resolution with fail-open semantics.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::ports::{IdentityResolver, LookupMetrics, LookupStage, LookupStatus, record_lookup};
use crate::domain::{Identity, WalletAddress};

/// Resolves identities to wallets, never failing the caller.
#[derive(Clone)]
pub struct IdentityService {
    resolver: Arc<dyn IdentityResolver>,
    metrics: Arc<dyn LookupMetrics>,
}

impl IdentityService {
    /// Create a service over `resolver`.
    pub fn new(resolver: Arc<dyn IdentityResolver>, metrics: Arc<dyn LookupMetrics>) -> Self {
        Self { resolver, metrics }
    }

    /// Linked wallets in provider order.
    ///
    /// Addresses are used as-is without a social-graph call. Resolver errors
    /// are logged and yield an empty list.
    pub async fn resolve(&self, identity: &Identity) -> Vec<WalletAddress> {
        if let Identity::Address(address) = identity {
            return vec![address.clone()];
        }

        match self.resolver.resolve(identity).await {
            Ok(wallets) => {
                let status = if wallets.is_empty() {
                    LookupStatus::Miss
                } else {
                    LookupStatus::Hit
                };
                debug!(%identity, linked = wallets.len(), "identity resolved");
                record_lookup(self.metrics.as_ref(), LookupStage::Identity, status).await;
                wallets
            }
            Err(error) => {
                warn!(%identity, %error, kind = error.label(), "identity resolution failed");
                record_lookup(
                    self.metrics.as_ref(),
                    LookupStage::Identity,
                    LookupStatus::Failed,
                )
                .await;
                Vec::new()
            }
        }
    }

    /// First linked wallet, if any.
    pub async fn resolve_first(&self, identity: &Identity) -> Option<WalletAddress> {
        self.resolve(identity).await.into_iter().next()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::EvmAddress;
    use crate::domain::ports::{
        IdentityResolverError, MockIdentityResolver, MockLookupMetrics, NoOpLookupMetrics,
    };
    use rstest::rstest;

    fn wallet(hex_char: char) -> WalletAddress {
        EvmAddress::parse(&format!("0x{}", hex_char.to_string().repeat(40))).expect("valid")
    }

    fn service(resolver: MockIdentityResolver) -> IdentityService {
        IdentityService::new(Arc::new(resolver), Arc::new(NoOpLookupMetrics))
    }

    #[rstest]
    #[tokio::test]
    async fn address_identity_skips_resolver() {
        let mut resolver = MockIdentityResolver::new();
        resolver.expect_resolve().never();

        let address = wallet('a');
        let wallets = service(resolver)
            .resolve(&Identity::Address(address.clone()))
            .await;
        assert_eq!(wallets, vec![address]);
    }

    #[rstest]
    #[tokio::test]
    async fn first_wallet_follows_provider_order() {
        let mut resolver = MockIdentityResolver::new();
        resolver
            .expect_resolve()
            .times(1)
            .returning(|_| Ok(vec![wallet('b'), wallet('c')]));

        let first = service(resolver)
            .resolve_first(&Identity::SocialId(123))
            .await;
        assert_eq!(first, Some(wallet('b')));
    }

    #[rstest]
    #[case(IdentityResolverError::transport("connection reset"))]
    #[case(IdentityResolverError::timeout("5s elapsed"))]
    #[case(IdentityResolverError::decode("missing data"))]
    #[tokio::test]
    async fn resolver_errors_become_empty(#[case] error: IdentityResolverError) {
        let mut resolver = MockIdentityResolver::new();
        resolver
            .expect_resolve()
            .returning(move |_| Err(error.clone()));
        let mut metrics = MockLookupMetrics::new();
        metrics
            .expect_record()
            .withf(|outcome| {
                outcome.stage == LookupStage::Identity && outcome.status == LookupStatus::Failed
            })
            .times(1)
            .returning(|_| Ok(()));

        let service = IdentityService::new(Arc::new(resolver), Arc::new(metrics));
        assert!(
            service
                .resolve(&Identity::Handle("dwr".to_owned()))
                .await
                .is_empty()
        );
    }
}
