//! JSON-RPC `eth_call` client for ERC-721 reads.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use reqwest::{Client, Url};
use thiserror::Error;

use super::abi;
use super::dto::{EthCallRequestDto, JsonRpcResponseDto};
use crate::domain::ports::{OwnershipSourceError, TokenMetadataSourceError};
use crate::domain::{ContractAddress, TokenId, WalletAddress};
use crate::outbound::http_support::{HttpFailure, build_client, send};

/// Failure of one contract read.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub(crate) enum ContractCallError {
    /// The HTTP exchange failed.
    #[error("rpc transport failed: {0:?}")]
    Http(HttpFailure),
    /// The node returned a JSON-RPC error, typically a revert.
    #[error("rpc error {code}: {message}")]
    Rpc { code: i64, message: String },
    /// The response or return data could not be decoded.
    #[error("rpc decode failed: {0}")]
    Decode(String),
}

impl From<HttpFailure> for ContractCallError {
    fn from(failure: HttpFailure) -> Self {
        Self::Http(failure)
    }
}

impl From<ContractCallError> for OwnershipSourceError {
    fn from(error: ContractCallError) -> Self {
        match error {
            ContractCallError::Http(failure) => failure.into(),
            ContractCallError::Rpc { .. } => Self::rejected(error.to_string()),
            ContractCallError::Decode(message) => Self::decode(message),
        }
    }
}

impl ContractCallError {
    pub(crate) fn into_metadata_error(self, token_id: &TokenId) -> TokenMetadataSourceError {
        match self {
            Self::Http(failure) => failure.into_metadata_error(token_id),
            Self::Rpc { .. } => TokenMetadataSourceError::not_found(token_id.as_str()),
            Self::Decode(message) => TokenMetadataSourceError::decode(message),
        }
    }
}

/// Reads ERC-721 state through a JSON-RPC node.
pub struct ContractRpcClient {
    client: Client,
    endpoint: Url,
    next_id: AtomicU64,
}

impl ContractRpcClient {
    /// Build a client with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(endpoint: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_client(timeout)?,
            endpoint,
            next_id: AtomicU64::new(1),
        })
    }

    /// `balanceOf(owner)`.
    pub(crate) async fn balance_of(
        &self,
        contract: &ContractAddress,
        owner: &WalletAddress,
    ) -> Result<u64, ContractCallError> {
        let result = self.eth_call(contract, &abi::balance_of(owner)).await?;
        abi::decode_u64(&result).map_err(ContractCallError::Decode)
    }

    /// `tokenOfOwnerByIndex(owner, index)`.
    pub(crate) async fn token_of_owner_by_index(
        &self,
        contract: &ContractAddress,
        owner: &WalletAddress,
        index: u64,
    ) -> Result<TokenId, ContractCallError> {
        let data = abi::token_of_owner_by_index(owner, index);
        let result = self.eth_call(contract, &data).await?;
        abi::decode_token_id(&result).map_err(ContractCallError::Decode)
    }

    /// `tokenURI(token_id)`.
    pub(crate) async fn token_uri(
        &self,
        contract: &ContractAddress,
        token_id: &TokenId,
    ) -> Result<String, ContractCallError> {
        let data = abi::token_uri(token_id).ok_or_else(|| {
            ContractCallError::Decode(format!("token id {token_id} exceeds uint256"))
        })?;
        let result = self.eth_call(contract, &data).await?;
        abi::decode_string(&result).map_err(ContractCallError::Decode)
    }

    async fn eth_call(
        &self,
        contract: &ContractAddress,
        data: &str,
    ) -> Result<String, ContractCallError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let request = EthCallRequestDto::new(id, contract.as_str(), data);
        let body = send(self.client.post(self.endpoint.clone()).json(&request)).await?;
        parse_call_result(&body)
    }
}

fn parse_call_result(body: &[u8]) -> Result<String, ContractCallError> {
    let response: JsonRpcResponseDto = serde_json::from_slice(body).map_err(|error| {
        ContractCallError::Decode(format!("invalid JSON-RPC payload: {error}"))
    })?;
    match (response.result, response.error) {
        (_, Some(error)) => Err(ContractCallError::Rpc {
            code: error.code,
            message: error.message,
        }),
        (Some(result), None) => Ok(result),
        (None, None) => Err(ContractCallError::Decode(
            "JSON-RPC response has neither result nor error".to_owned(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn surfaces_rpc_errors() {
        let body = br#"{"jsonrpc":"2.0","id":1,"error":{"code":3,"message":"execution reverted"}}"#;
        assert_eq!(
            parse_call_result(body),
            Err(ContractCallError::Rpc {
                code: 3,
                message: "execution reverted".to_owned(),
            })
        );
    }

    #[test]
    fn returns_result_data() {
        let body = br#"{"jsonrpc":"2.0","id":1,"result":"0x01"}"#;
        assert_eq!(parse_call_result(body).as_deref(), Ok("0x01"));
    }

    #[test]
    fn reverts_map_to_not_found_metadata() {
        let error = ContractCallError::Rpc {
            code: 3,
            message: "execution reverted".to_owned(),
        };
        assert_eq!(
            error.into_metadata_error(&TokenId::from_u128(9)),
            TokenMetadataSourceError::not_found("9")
        );
    }

    #[test]
    fn request_envelope_serialises_as_eth_call() {
        let request = EthCallRequestDto::new(7, "0xabc", "0x70a08231");
        let value = serde_json::to_value(&request).expect("serialises");
        assert_eq!(value["method"], "eth_call");
        assert_eq!(value["params"][0]["to"], "0xabc");
        assert_eq!(value["params"][1], "latest");
    }
}
