//! Reqwest-backed metadata adapters.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use super::document::load_document;
use crate::domain::ports::{TokenMetadataSource, TokenMetadataSourceError};
use crate::domain::{ContractAddress, TokenId, TokenMetadata};
use crate::outbound::contract_rpc::ContractRpcClient;
use crate::outbound::http_support::build_client;

fn metadata_client(timeout: Duration) -> Result<Client, TokenMetadataSourceError> {
    build_client(timeout)
        .map_err(|err| TokenMetadataSourceError::transport(format!("client build failed: {err}")))
}

/// Fetches `{base_uri}/{tokenId}` from a metadata service.
pub struct HttpMetadataSource {
    client: Client,
    base_uri: String,
    gateway: String,
}

impl HttpMetadataSource {
    /// Build an adapter rooted at `base_uri`; `ipfs://` URIs go through
    /// `gateway`.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(
        base_uri: &str,
        gateway: &str,
        timeout: Duration,
    ) -> Result<Self, TokenMetadataSourceError> {
        Ok(Self {
            client: metadata_client(timeout)?,
            base_uri: base_uri.trim_end_matches('/').to_owned(),
            gateway: gateway.to_owned(),
        })
    }

    fn document_uri(&self, token_id: &TokenId) -> String {
        format!("{}/{}", self.base_uri, token_id)
    }
}

#[async_trait]
impl TokenMetadataSource for HttpMetadataSource {
    async fn fetch_metadata(
        &self,
        token_id: &TokenId,
    ) -> Result<TokenMetadata, TokenMetadataSourceError> {
        load_document(
            &self.client,
            &self.document_uri(token_id),
            token_id,
            &self.gateway,
        )
        .await
    }
}

/// Resolves `tokenURI` on the contract, then loads that document.
pub struct ContractUriMetadataSource {
    rpc: Arc<ContractRpcClient>,
    client: Client,
    contract: ContractAddress,
    gateway: String,
}

impl ContractUriMetadataSource {
    /// Build an adapter sharing `rpc` with the ownership source.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(
        rpc: Arc<ContractRpcClient>,
        contract: ContractAddress,
        gateway: &str,
        timeout: Duration,
    ) -> Result<Self, TokenMetadataSourceError> {
        Ok(Self {
            rpc,
            client: metadata_client(timeout)?,
            contract,
            gateway: gateway.to_owned(),
        })
    }
}

#[async_trait]
impl TokenMetadataSource for ContractUriMetadataSource {
    async fn fetch_metadata(
        &self,
        token_id: &TokenId,
    ) -> Result<TokenMetadata, TokenMetadataSourceError> {
        let uri = self
            .rpc
            .token_uri(&self.contract, token_id)
            .await
            .map_err(|err| err.into_metadata_error(token_id))?;
        load_document(&self.client, uri.trim(), token_id, &self.gateway).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_uri_joins_without_double_slash() {
        let source = HttpMetadataSource::new(
            "https://meta.example/tokens/",
            "https://ipfs.io/ipfs",
            Duration::from_secs(1),
        )
        .expect("client builds");
        assert_eq!(
            source.document_uri(&TokenId::from_u128(42)),
            "https://meta.example/tokens/42"
        );
    }
}
