//! Fetching and decoding metadata documents.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use reqwest::{Client, Url};

use super::dto::MetadataDocumentDto;
use crate::domain::ports::TokenMetadataSourceError;
use crate::domain::{TokenId, TokenMetadata};
use crate::outbound::http_support::{resolve_ipfs, send};

const INLINE_JSON_PREFIX: &str = "data:application/json;base64,";
const INLINE_JSON_UTF8_PREFIX: &str = "data:application/json;utf8,";

/// Load the document at `uri`, which may be HTTP(S), `ipfs://` or an inline
/// `data:` JSON URI.
pub(super) async fn load_document(
    client: &Client,
    uri: &str,
    token_id: &TokenId,
    gateway: &str,
) -> Result<TokenMetadata, TokenMetadataSourceError> {
    if let Some(encoded) = uri.strip_prefix(INLINE_JSON_PREFIX) {
        let body = STANDARD.decode(encoded.trim()).map_err(|err| {
            TokenMetadataSourceError::decode(format!("invalid inline metadata: {err}"))
        })?;
        return parse_document(&body, gateway);
    }
    if let Some(raw) = uri.strip_prefix(INLINE_JSON_UTF8_PREFIX) {
        return parse_document(raw.as_bytes(), gateway);
    }

    let url = Url::parse(&resolve_ipfs(uri, gateway)).map_err(|err| {
        TokenMetadataSourceError::decode(format!("invalid metadata uri '{uri}': {err}"))
    })?;
    let body = send(client.get(url))
        .await
        .map_err(|failure| failure.into_metadata_error(token_id))?;
    parse_document(&body, gateway)
}

pub(super) fn parse_document(
    body: &[u8],
    gateway: &str,
) -> Result<TokenMetadata, TokenMetadataSourceError> {
    let document: MetadataDocumentDto = serde_json::from_slice(body).map_err(|error| {
        TokenMetadataSourceError::decode(format!("invalid metadata JSON payload: {error}"))
    })?;
    let image_url = document
        .image
        .or(document.image_url)
        .map(|image| image.trim().to_owned())
        .filter(|image| !image.is_empty())
        .map(|image| resolve_ipfs(&image, gateway));
    Ok(TokenMetadata {
        image_url,
        name: non_blank(document.name),
        description: non_blank(document.description),
    })
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.trim().is_empty())
}
