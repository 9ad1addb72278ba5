//! Outbound adapters implementing domain ports over external providers.
//!
//! - **alchemy**, **opensea**, **etherscan**, **contract_rpc**: ownership
//!   sources, one per provider family
//! - **metadata**: token metadata sources
//! - **airstack**: social-graph identity resolution
//! - **metrics**: Prometheus-backed lookup counters (feature-gated)
//!
//! Adapters translate between provider payloads and domain types. They
//! contain no business logic.

pub mod airstack;
pub mod alchemy;
pub mod contract_rpc;
pub mod etherscan;
pub(crate) mod http_support;
pub mod metadata;
#[cfg(feature = "metrics")]
pub mod metrics;
pub mod opensea;
