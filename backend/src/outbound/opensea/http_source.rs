//! Reqwest-backed marketplace ownership adapter.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};

use super::dto::AssetListingDto;
use crate::domain::ports::{OwnershipSource, OwnershipSourceError, OwnershipSourceKind};
use crate::domain::{ContractAddress, OwnershipResult, WalletAddress};
use crate::outbound::http_support::{build_client, send};

const LISTING_LIMIT: &str = "50";

/// Marketplace adapter for the `assets` listing endpoint.
pub struct OpenSeaAssetSource {
    client: Client,
    endpoint: Url,
    api_key: Option<String>,
}

impl OpenSeaAssetSource {
    /// Build an adapter for `{base_url}/assets`.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed or the
    /// endpoint URL is invalid.
    pub fn new(
        base_url: &Url,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, OwnershipSourceError> {
        let base = base_url.as_str().trim_end_matches('/');
        let endpoint = Url::parse(&format!("{base}/assets"))
            .map_err(|err| OwnershipSourceError::rejected(format!("invalid endpoint: {err}")))?;
        let client = build_client(timeout)
            .map_err(|err| OwnershipSourceError::transport(format!("client build failed: {err}")))?;
        Ok(Self {
            client,
            endpoint,
            api_key: api_key.filter(|key| !key.trim().is_empty()),
        })
    }
}

#[async_trait]
impl OwnershipSource for OpenSeaAssetSource {
    async fn query_ownership(
        &self,
        owner: &WalletAddress,
        contract: &ContractAddress,
    ) -> Result<OwnershipResult, OwnershipSourceError> {
        let mut request = self.client.get(self.endpoint.clone()).query(&[
            ("owner", owner.as_str()),
            ("asset_contract_address", contract.as_str()),
            ("limit", LISTING_LIMIT),
        ]);
        if let Some(key) = self.api_key.as_deref() {
            request = request.header("X-API-KEY", key);
        }
        let body = send(request).await?;
        parse_listing(&body).map(OwnershipResult::from_tokens)
    }

    fn kind(&self) -> OwnershipSourceKind {
        OwnershipSourceKind::Marketplace
    }
}

fn parse_listing(body: &[u8]) -> Result<Vec<crate::domain::OwnedToken>, OwnershipSourceError> {
    let listing: AssetListingDto = serde_json::from_slice(body).map_err(|error| {
        OwnershipSourceError::decode(format!("invalid asset listing JSON payload: {error}"))
    })?;
    listing
        .into_domain_tokens()
        .map_err(OwnershipSourceError::decode)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::wrapped(r#"{ "assets": [{ "token_id": "7", "image_url": "https://img/7.png" }] }"#)]
    #[case::bare(r#"[{ "token_id": "7", "image_url": "https://img/7.png", "name": null }]"#)]
    fn accepts_both_listing_shapes(#[case] body: &str) {
        let tokens = parse_listing(body.as_bytes()).expect("listing decodes");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].token_id.as_str(), "7");
        assert_eq!(tokens[0].image_url.as_deref(), Some("https://img/7.png"));
    }

    #[test]
    fn empty_listing_is_empty() {
        let tokens = parse_listing(br#"{ "assets": [] }"#).expect("listing decodes");
        assert!(tokens.is_empty());
    }

    #[test]
    fn unexpected_shape_is_decode_error() {
        let error = parse_listing(br#"{ "detail": "Invalid API key" }"#).expect_err("fails");
        assert!(matches!(error, OwnershipSourceError::Decode { .. }));
    }
}
