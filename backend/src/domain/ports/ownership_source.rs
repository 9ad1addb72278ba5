//! Driven port for querying which tokens of a collection a wallet owns.
//!
//! Node providers, marketplaces, block explorers and direct contract calls all
//! implement this one contract; the server picks one from configuration.

use std::collections::HashMap;

use async_trait::async_trait;

use super::define_port_error;
use crate::domain::{ContractAddress, OwnedToken, OwnershipResult, WalletAddress};

define_port_error! {
    /// Errors surfaced while querying an ownership provider.
    pub enum OwnershipSourceError {
        /// Network transport failed before receiving a response.
        Transport { message: String } =>
            "ownership provider transport failed: {message}",
        /// The call exceeded its timeout.
        Timeout { message: String } =>
            "ownership provider timeout: {message}",
        /// The provider rate-limited the request.
        RateLimited { message: String } =>
            "ownership provider rate limited request: {message}",
        /// The provider refused the request.
        Rejected { message: String } =>
            "ownership provider rejected request: {message}",
        /// The response could not be decoded.
        Decode { message: String } =>
            "ownership provider response decode failed: {message}",
    }
}

/// Which family of provider answers ownership queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OwnershipSourceKind {
    /// Node-provider NFT listing API.
    NodeProvider,
    /// Marketplace asset listing API.
    Marketplace,
    /// Block-explorer transfer history.
    ExplorerTransferHistory,
    /// Direct `balanceOf`/`tokenOfOwnerByIndex` contract reads.
    ContractCall,
    /// In-memory data.
    Static,
}

impl OwnershipSourceKind {
    /// Stable label for logs and metrics.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NodeProvider => "node_provider",
            Self::Marketplace => "marketplace",
            Self::ExplorerTransferHistory => "explorer_transfer_history",
            Self::ContractCall => "contract_call",
            Self::Static => "static",
        }
    }

    /// Whether results report tokens ever received rather than tokens held.
    ///
    /// Transfer history lists every inbound transfer; tokens sent away later
    /// are still reported.
    pub fn is_approximate(self) -> bool {
        matches!(self, Self::ExplorerTransferHistory)
    }
}

/// Port for ownership lookups against one collection contract.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OwnershipSource: Send + Sync {
    /// Tokens of `contract` held by `owner`.
    async fn query_ownership(
        &self,
        owner: &WalletAddress,
        contract: &ContractAddress,
    ) -> Result<OwnershipResult, OwnershipSourceError>;

    /// Provider family.
    fn kind(&self) -> OwnershipSourceKind;
}

/// Fixture implementation reporting nothing owned.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureOwnershipSource;

#[async_trait]
impl OwnershipSource for FixtureOwnershipSource {
    async fn query_ownership(
        &self,
        _owner: &WalletAddress,
        _contract: &ContractAddress,
    ) -> Result<OwnershipResult, OwnershipSourceError> {
        Ok(OwnershipResult::empty())
    }

    fn kind(&self) -> OwnershipSourceKind {
        OwnershipSourceKind::Static
    }
}

/// In-memory source mapping wallets to owned tokens, or to a failure.
///
/// The contract argument is ignored; every entry belongs to the configured
/// collection.
#[derive(Debug, Clone, Default)]
pub struct StaticOwnershipSource {
    holdings: HashMap<WalletAddress, Result<OwnershipResult, OwnershipSourceError>>,
}

impl StaticOwnershipSource {
    /// Record `tokens` as held by `owner`.
    pub fn with_tokens(self, owner: WalletAddress, tokens: Vec<OwnedToken>) -> Self {
        self.with_result(owner, OwnershipResult::from_tokens(tokens))
    }

    /// Record a prepared result, such as a balance without a listing.
    pub fn with_result(mut self, owner: WalletAddress, result: OwnershipResult) -> Self {
        self.holdings.insert(owner, Ok(result));
        self
    }

    /// Make lookups for `owner` fail with `error`.
    pub fn with_failure(mut self, owner: WalletAddress, error: OwnershipSourceError) -> Self {
        self.holdings.insert(owner, Err(error));
        self
    }
}

#[async_trait]
impl OwnershipSource for StaticOwnershipSource {
    async fn query_ownership(
        &self,
        owner: &WalletAddress,
        _contract: &ContractAddress,
    ) -> Result<OwnershipResult, OwnershipSourceError> {
        match self.holdings.get(owner) {
            Some(Ok(result)) => Ok(result.clone()),
            Some(Err(error)) => Err(error.clone()),
            None => Ok(OwnershipResult::empty()),
        }
    }

    fn kind(&self) -> OwnershipSourceKind {
        OwnershipSourceKind::Static
    }
}
