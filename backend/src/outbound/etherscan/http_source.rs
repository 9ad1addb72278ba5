//! Reqwest-backed block-explorer ownership adapter.
//!
//! Ownership is derived from NFT transfer history: every token ever
//! transferred to the owner is reported, including tokens later sent away.
//! The adapter reports [`OwnershipSourceKind::ExplorerTransferHistory`] so
//! callers know the result is approximate.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};

use super::dto::{ExplorerResponseDto, ExplorerResultDto};
use crate::domain::ports::{OwnershipSource, OwnershipSourceError, OwnershipSourceKind};
use crate::domain::{ContractAddress, OwnedToken, OwnershipResult, TokenId, WalletAddress};
use crate::outbound::http_support::{build_client, send};

const NO_TRANSACTIONS: &str = "No transactions found";

/// Block-explorer adapter for the `account/tokennfttx` action.
pub struct EtherscanTransferHistorySource {
    client: Client,
    endpoint: Url,
    api_key: Option<String>,
}

impl EtherscanTransferHistorySource {
    /// Build an adapter for `{base_url}/api`.
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
        let endpoint = Url::parse(&format!("{base}/api"))
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
impl OwnershipSource for EtherscanTransferHistorySource {
    async fn query_ownership(
        &self,
        owner: &WalletAddress,
        contract: &ContractAddress,
    ) -> Result<OwnershipResult, OwnershipSourceError> {
        let mut query = vec![
            ("module", "account"),
            ("action", "tokennfttx"),
            ("contractaddress", contract.as_str()),
            ("address", owner.as_str()),
            ("sort", "asc"),
        ];
        if let Some(key) = self.api_key.as_deref() {
            query.push(("apikey", key));
        }
        let body = send(self.client.get(self.endpoint.clone()).query(&query)).await?;
        received_tokens(&body, owner).map(OwnershipResult::from_tokens)
    }

    fn kind(&self) -> OwnershipSourceKind {
        OwnershipSourceKind::ExplorerTransferHistory
    }
}

/// Tokens transferred to `owner`, in event order. Repeats are left for
/// `OwnershipResult::from_tokens` to collapse.
fn received_tokens(
    body: &[u8],
    owner: &WalletAddress,
) -> Result<Vec<OwnedToken>, OwnershipSourceError> {
    let response: ExplorerResponseDto = serde_json::from_slice(body).map_err(|error| {
        OwnershipSourceError::decode(format!("invalid explorer JSON payload: {error}"))
    })?;

    let events = match (response.status.as_str(), response.result) {
        ("1", ExplorerResultDto::Events(events)) => events,
        ("0", _) if response.message == NO_TRANSACTIONS => return Ok(Vec::new()),
        ("0", ExplorerResultDto::Events(events)) if events.is_empty() => return Ok(Vec::new()),
        ("0", ExplorerResultDto::Message(detail)) => {
            return Err(OwnershipSourceError::rejected(format!(
                "{}: {detail}",
                response.message
            )));
        }
        (status, _) => {
            return Err(OwnershipSourceError::decode(format!(
                "unexpected explorer status '{status}': {}",
                response.message
            )));
        }
    };

    events
        .into_iter()
        .filter(|event| owner.matches(&event.to))
        .map(|event| {
            TokenId::parse(&event.token_id)
                .map(OwnedToken::bare)
                .map_err(|err| OwnershipSourceError::decode(err.to_string()))
        })
        .collect()
}
