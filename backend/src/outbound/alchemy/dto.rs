//! DTOs for decoding node-provider `getNFTs` responses.

use serde::Deserialize;

use crate::domain::{OwnedToken, TokenId};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct GetNftsResponseDto {
    #[serde(default)]
    pub(super) owned_nfts: Vec<OwnedNftDto>,
    pub(super) page_key: Option<String>,
    pub(super) total_count: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub(super) struct OwnedNftDto {
    pub(super) id: NftIdDto,
    pub(super) title: Option<String>,
    pub(super) description: Option<String>,
    pub(super) metadata: Option<NftMetadataDto>,
    #[serde(default)]
    pub(super) media: Vec<NftMediaDto>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct NftIdDto {
    pub(super) token_id: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct NftMetadataDto {
    pub(super) image: Option<String>,
    pub(super) name: Option<String>,
    pub(super) description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct NftMediaDto {
    pub(super) gateway: Option<String>,
}

impl GetNftsResponseDto {
    pub(super) fn into_domain_tokens(self) -> Result<Vec<OwnedToken>, String> {
        self.owned_nfts
            .into_iter()
            .map(OwnedNftDto::into_domain_token)
            .collect()
    }
}

impl OwnedNftDto {
    fn into_domain_token(self) -> Result<OwnedToken, String> {
        let token_id = TokenId::parse(&self.id.token_id)
            .map_err(|err| format!("invalid token id '{}': {err}", self.id.token_id))?;
        let (image, name, description) = match self.metadata {
            Some(metadata) => (metadata.image, metadata.name, metadata.description),
            None => (None, None, None),
        };
        let image = image
            .filter(|url| !url.trim().is_empty())
            .or_else(|| self.media.into_iter().find_map(|media| media.gateway));

        let mut token = OwnedToken::bare(token_id).with_image(image);
        token.name = name.or(self.title).filter(|name| !name.is_empty());
        token.description = description.or(self.description).filter(|d| !d.is_empty());
        Ok(token)
    }
}
