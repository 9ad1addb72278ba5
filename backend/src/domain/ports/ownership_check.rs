//! Driving port for the frame's two interactions: checking ownership and
//! paging through owned tokens.
//!
//! Both operations are infallible from the caller's point of view. Provider
//! failures come back as outcome variants the presentation layer renders.

use async_trait::async_trait;
use pagination::PageWindow;

use crate::domain::{Identity, OwnedToken, OwnershipResult, WalletAddress};

/// Input for an ownership check.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckRequest {
    /// Identity typed or implied by the interaction.
    pub identity: Option<Identity>,
    /// Wallet already verified by the client. Takes precedence over
    /// `identity`.
    pub verified_address: Option<WalletAddress>,
}

/// Result of an ownership check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    /// The wallet holds at least one token.
    Owned {
        /// Wallet that was queried.
        owner: WalletAddress,
        /// What it holds.
        result: OwnershipResult,
    },
    /// The wallet holds none.
    NotOwned {
        /// Wallet that was queried.
        owner: WalletAddress,
    },
    /// No wallet could be linked to the identity.
    NoIdentity,
    /// The ownership provider failed.
    Failed {
        /// Wallet that was queried.
        owner: WalletAddress,
    },
}

impl CheckOutcome {
    /// Wallet the outcome refers to.
    pub fn owner(&self) -> Option<&WalletAddress> {
        match self {
            Self::Owned { owner, .. } | Self::NotOwned { owner } | Self::Failed { owner } => {
                Some(owner)
            }
            Self::NoIdentity => None,
        }
    }

    /// Tokens owned; zero for every non-owning outcome.
    pub fn owned_count(&self) -> u64 {
        match self {
            Self::Owned { result, .. } => result.total_count(),
            _ => 0,
        }
    }
}

/// Input for one gallery page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GalleryRequest {
    /// Wallet whose tokens are shown.
    pub owner: WalletAddress,
    /// Requested zero-based page; normalised by the pagination policy.
    pub page: usize,
}

/// One visible page of owned tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GalleryPage {
    /// Wallet whose tokens are shown.
    pub owner: WalletAddress,
    /// Enriched tokens on this page.
    pub tokens: Vec<OwnedToken>,
    /// Page position and navigation.
    pub window: PageWindow,
    /// Total tokens owned.
    pub total_count: u64,
}

/// Result of a gallery request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GalleryOutcome {
    /// A page of tokens.
    Page(GalleryPage),
    /// Nothing is owned.
    Empty {
        /// Wallet whose tokens were requested.
        owner: WalletAddress,
    },
    /// Tokens are owned but the provider only reported a balance.
    Unlisted {
        /// Wallet whose tokens were requested.
        owner: WalletAddress,
        /// Balance reported by the provider.
        total_count: u64,
    },
    /// The ownership provider failed.
    Unavailable {
        /// Wallet whose tokens were requested.
        owner: WalletAddress,
    },
}

/// Driving port consumed by the HTTP adapter.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OwnershipCheck: Send + Sync {
    /// Resolve the wallet and report what it holds.
    async fn check(&self, request: CheckRequest) -> CheckOutcome;

    /// Produce one page of the owner's tokens.
    async fn gallery(&self, request: GalleryRequest) -> GalleryOutcome;
}

/// Fixture implementation that never finds a wallet.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureOwnershipCheck;

#[async_trait]
impl OwnershipCheck for FixtureOwnershipCheck {
    async fn check(&self, _request: CheckRequest) -> CheckOutcome {
        CheckOutcome::NoIdentity
    }

    async fn gallery(&self, request: GalleryRequest) -> GalleryOutcome {
        GalleryOutcome::Empty {
            owner: request.owner,
        }
    }
}
