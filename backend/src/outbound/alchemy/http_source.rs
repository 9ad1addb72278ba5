//! Reqwest-backed node-provider ownership adapter.
//!
//! Calls `getNFTs` filtered to the collection contract and follows `pageKey`
//! pagination up to a fixed number of pages.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use tracing::debug;

use super::dto::GetNftsResponseDto;
use crate::domain::ports::{OwnershipSource, OwnershipSourceError, OwnershipSourceKind};
use crate::domain::{ContractAddress, OwnershipResult, WalletAddress};
use crate::outbound::http_support::{build_client, send};

const DEFAULT_PAGE_LIMIT: usize = 10;

/// Node-provider adapter for the `getNFTs` endpoint.
pub struct AlchemyNftSource {
    client: Client,
    endpoint: Url,
    page_limit: usize,
}

impl AlchemyNftSource {
    /// Build an adapter for `{base_url}/{api_key}/getNFTs/`.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed or the
    /// endpoint URL is invalid.
    pub fn new(
        base_url: &Url,
        api_key: &str,
        timeout: Duration,
    ) -> Result<Self, OwnershipSourceError> {
        let endpoint = endpoint_url(base_url, api_key)?;
        let client = build_client(timeout)
            .map_err(|err| OwnershipSourceError::transport(format!("client build failed: {err}")))?;
        Ok(Self {
            client,
            endpoint,
            page_limit: DEFAULT_PAGE_LIMIT,
        })
    }

    /// Cap how many result pages one lookup follows.
    pub fn with_page_limit(mut self, page_limit: usize) -> Self {
        self.page_limit = page_limit.max(1);
        self
    }

    async fn fetch_page(
        &self,
        owner: &WalletAddress,
        contract: &ContractAddress,
        page_key: Option<&str>,
    ) -> Result<GetNftsResponseDto, OwnershipSourceError> {
        let mut query = vec![
            ("owner", owner.as_str()),
            ("contractAddresses[]", contract.as_str()),
            ("withMetadata", "true"),
        ];
        if let Some(key) = page_key {
            query.push(("pageKey", key));
        }
        let body = send(self.client.get(self.endpoint.clone()).query(&query)).await?;
        parse_page(&body)
    }
}

#[async_trait]
impl OwnershipSource for AlchemyNftSource {
    async fn query_ownership(
        &self,
        owner: &WalletAddress,
        contract: &ContractAddress,
    ) -> Result<OwnershipResult, OwnershipSourceError> {
        let mut tokens = Vec::new();
        let mut reported_total = None;
        let mut page_key: Option<String> = None;

        for _ in 0..self.page_limit {
            let page = self.fetch_page(owner, contract, page_key.as_deref()).await?;
            reported_total = reported_total.or(page.total_count);
            let next_key = page.page_key.clone().filter(|key| !key.is_empty());
            tokens.extend(page.into_domain_tokens().map_err(OwnershipSourceError::decode)?);
            match next_key {
                Some(key) => page_key = Some(key),
                None => {
                    page_key = None;
                    break;
                }
            }
        }
        if page_key.is_some() {
            debug!(%owner, pages = self.page_limit, "page limit reached; listing truncated");
        }

        Ok(match reported_total {
            Some(total) => OwnershipResult::with_total(tokens, total),
            None => OwnershipResult::from_tokens(tokens),
        })
    }

    fn kind(&self) -> OwnershipSourceKind {
        OwnershipSourceKind::NodeProvider
    }
}

fn endpoint_url(base_url: &Url, api_key: &str) -> Result<Url, OwnershipSourceError> {
    let base = base_url.as_str().trim_end_matches('/');
    Url::parse(&format!("{base}/{}/getNFTs/", api_key.trim()))
        .map_err(|err| OwnershipSourceError::rejected(format!("invalid endpoint: {err}")))
}

fn parse_page(body: &[u8]) -> Result<GetNftsResponseDto, OwnershipSourceError> {
    serde_json::from_slice(body).map_err(|error| {
        OwnershipSourceError::decode(format!("invalid getNFTs JSON payload: {error}"))
    })
}
