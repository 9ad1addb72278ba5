//! Driven port for per-token display metadata.

use async_trait::async_trait;

use super::define_port_error;
use crate::domain::{TokenId, TokenMetadata};

define_port_error! {
    /// Errors surfaced while fetching token metadata.
    pub enum TokenMetadataSourceError {
        /// Network transport failed before receiving a response.
        Transport { message: String } =>
            "metadata transport failed: {message}",
        /// The call exceeded its timeout.
        Timeout { message: String } =>
            "metadata timeout: {message}",
        /// No metadata exists for the token.
        NotFound { token_id: String } =>
            "metadata for token {token_id} not found",
        /// The metadata document could not be decoded.
        Decode { message: String } =>
            "metadata decode failed: {message}",
    }
}

/// Port for resolving a token's image, name and description.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TokenMetadataSource: Send + Sync {
    /// Metadata for `token_id` in the configured collection.
    async fn fetch_metadata(
        &self,
        token_id: &TokenId,
    ) -> Result<TokenMetadata, TokenMetadataSourceError>;
}

/// Fixture implementation that knows no metadata.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureTokenMetadataSource;

#[async_trait]
impl TokenMetadataSource for FixtureTokenMetadataSource {
    async fn fetch_metadata(
        &self,
        token_id: &TokenId,
    ) -> Result<TokenMetadata, TokenMetadataSourceError> {
        Err(TokenMetadataSourceError::not_found(token_id.as_str()))
    }
}
