//! Metadata derived by string templating, without a network call.

use async_trait::async_trait;

use crate::domain::ports::{TokenMetadataSource, TokenMetadataSourceError};
use crate::domain::{ContractAddress, TokenId, TokenMetadata, UrlTemplate};

/// Fills `{contract}` and `{tokenId}` in an image URL template.
#[derive(Debug, Clone)]
pub struct TemplatedMetadataSource {
    template: UrlTemplate,
    contract: ContractAddress,
}

impl TemplatedMetadataSource {
    pub fn new(template: UrlTemplate, contract: ContractAddress) -> Self {
        Self { template, contract }
    }
}

#[async_trait]
impl TokenMetadataSource for TemplatedMetadataSource {
    async fn fetch_metadata(
        &self,
        token_id: &TokenId,
    ) -> Result<TokenMetadata, TokenMetadataSourceError> {
        Ok(TokenMetadata {
            image_url: Some(self.template.render(&self.contract, token_id)),
            ..TokenMetadata::default()
        })
    }
}
