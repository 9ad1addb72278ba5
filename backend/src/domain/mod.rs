//! Domain primitives, ports and services.
//!
//! Purpose: model wallets, tokens and ownership independently of any
//! provider or transport, and compose the check and gallery flows behind the
//! [`ports::OwnershipCheck`] driving port.
//!
//! Public surface:
//! - Error (alias to `error::Error`): API error response payload.
//! - EvmAddress, Identity, TokenId, OwnershipResult: value types.
//! - TtlCache: injectable expiring cache.
//! - FramePresenter: pure view builders.

mod address;
mod cache;
pub mod error;
mod identity;
mod identity_service;
mod metadata_enricher;
mod ownership_check_service;
mod ownership_service;
pub mod ports;
pub mod presentation;
mod token;
pub mod trace_id;
mod url_template;

pub use self::address::{AddressError, ContractAddress, EvmAddress, WalletAddress};
pub use self::cache::TtlCache;
pub use self::error::{Error, ErrorCode};
pub use self::identity::{Identity, IdentityError};
pub use self::identity_service::IdentityService;
pub use self::metadata_enricher::MetadataEnricher;
pub use self::ownership_check_service::{GallerySettings, OwnershipCheckService};
pub use self::ownership_service::{OwnershipLookup, OwnershipService};
pub use self::presentation::{
    Backgrounds, FrameButton, FrameImage, FramePresenter, FrameRoute, FrameTarget, FrameView,
    FrameViewError, GalleryCursor,
};
pub use self::token::{OwnedToken, OwnershipResult, TokenId, TokenIdError, TokenMetadata};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::url_template::UrlTemplate;

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use nft_frames::domain::{ApiResult, Error};
///
/// fn parse_cursor(raw: &str) -> ApiResult<usize> {
///     raw.parse().map_err(|_| Error::invalid_request("cursor is not valid"))
/// }
/// assert!(parse_cursor("x").is_err());
/// ```
pub type ApiResult<T> = Result<T, Error>;
