//! DTOs for marketplace asset listings.
//!
//! The listing arrives either wrapped as `{ "assets": [...] }` or as a bare
//! array depending on API version.

use serde::Deserialize;

use crate::domain::{OwnedToken, TokenId};

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(super) enum AssetListingDto {
    Wrapped { assets: Vec<AssetDto> },
    Bare(Vec<AssetDto>),
}

#[derive(Debug, Deserialize)]
pub(super) struct AssetDto {
    pub(super) token_id: String,
    pub(super) image_url: Option<String>,
    pub(super) name: Option<String>,
    pub(super) description: Option<String>,
}

impl AssetListingDto {
    pub(super) fn into_domain_tokens(self) -> Result<Vec<OwnedToken>, String> {
        let assets = match self {
            Self::Wrapped { assets } | Self::Bare(assets) => assets,
        };
        assets.into_iter().map(AssetDto::into_domain_token).collect()
    }
}

impl AssetDto {
    fn into_domain_token(self) -> Result<OwnedToken, String> {
        let token_id = TokenId::parse(&self.token_id)
            .map_err(|err| format!("invalid token id '{}': {err}", self.token_id))?;
        let mut token = OwnedToken::bare(token_id).with_image(self.image_url);
        token.name = self.name;
        token.description = self.description;
        Ok(token)
    }
}
