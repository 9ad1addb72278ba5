//! Driven port for mapping social identities to linked wallets.

use std::collections::HashMap;

use async_trait::async_trait;

use super::define_port_error;
use crate::domain::{Identity, WalletAddress};

define_port_error! {
    /// Errors surfaced while querying the social graph.
    pub enum IdentityResolverError {
        /// Network transport failed before receiving a response.
        Transport { message: String } =>
            "social graph transport failed: {message}",
        /// The call exceeded its timeout.
        Timeout { message: String } =>
            "social graph timeout: {message}",
        /// The service refused the query.
        Rejected { message: String } =>
            "social graph rejected query: {message}",
        /// The response could not be decoded.
        Decode { message: String } =>
            "social graph response decode failed: {message}",
    }
}

/// Port resolving an identity to the wallets linked to it.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityResolver: Send + Sync {
    /// Return linked wallets in provider order; empty when none are linked.
    ///
    /// ```rust,ignore
    /// use nft_frames::domain::Identity;
    /// use nft_frames::domain::ports::{FixtureIdentityResolver, IdentityResolver};
    ///
    /// let wallets = FixtureIdentityResolver.resolve(&Identity::SocialId(3)).await?;
    /// assert!(wallets.is_empty());
    /// # Ok::<(), nft_frames::domain::ports::IdentityResolverError>(())
    /// ```
    async fn resolve(
        &self,
        identity: &Identity,
    ) -> Result<Vec<WalletAddress>, IdentityResolverError>;
}

/// Fixture implementation that links nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureIdentityResolver;

#[async_trait]
impl IdentityResolver for FixtureIdentityResolver {
    async fn resolve(
        &self,
        _identity: &Identity,
    ) -> Result<Vec<WalletAddress>, IdentityResolverError> {
        Ok(Vec::new())
    }
}

/// In-memory resolver keyed by social-graph identity key.
#[derive(Debug, Clone, Default)]
pub struct StaticIdentityResolver {
    links: HashMap<String, Vec<WalletAddress>>,
}

impl StaticIdentityResolver {
    /// Link `identity` to `wallets`, replacing earlier links.
    pub fn with_link(mut self, identity: &Identity, wallets: Vec<WalletAddress>) -> Self {
        self.links.insert(identity.social_graph_key(), wallets);
        self
    }
}

#[async_trait]
impl IdentityResolver for StaticIdentityResolver {
    async fn resolve(
        &self,
        identity: &Identity,
    ) -> Result<Vec<WalletAddress>, IdentityResolverError> {
        Ok(self
            .links
            .get(&identity.social_graph_key())
            .cloned()
            .unwrap_or_default())
    }
}
