//! Transport plumbing shared by the reqwest adapters.
//!
//! Adapters send through [`send`], which returns the body on success and an
//! [`HttpFailure`] otherwise. Each adapter converts `HttpFailure` into its own
//! port error so the status mapping lives in one place.

use std::time::Duration;

use reqwest::{Client, RequestBuilder, StatusCode};

use crate::domain::TokenId;
use crate::domain::ports::{IdentityResolverError, OwnershipSourceError, TokenMetadataSourceError};

const USER_AGENT: &str = concat!("nft-frames/", env!("CARGO_PKG_VERSION"));
const PREVIEW_CHAR_LIMIT: usize = 160;

/// Provider-agnostic failure of one HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum HttpFailure {
    /// Connection, TLS or body read failure, or a 5xx.
    Transport { message: String },
    /// Client-side timeout, 408 or 504.
    Timeout { message: String },
    /// 429.
    RateLimited { message: String },
    /// Any other 4xx.
    Rejected { status: u16, message: String },
}

impl HttpFailure {
    pub(crate) fn from_transport(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout {
                message: error.to_string(),
            }
        } else {
            Self::Transport {
                message: error.to_string(),
            }
        }
    }

    pub(crate) fn from_status(status: StatusCode, body: &[u8]) -> Self {
        let preview = body_preview(body);
        let message = if preview.is_empty() {
            format!("status {}", status.as_u16())
        } else {
            format!("status {}: {}", status.as_u16(), preview)
        };

        match status {
            StatusCode::TOO_MANY_REQUESTS => Self::RateLimited { message },
            StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => Self::Timeout { message },
            _ if status.is_client_error() => Self::Rejected {
                status: status.as_u16(),
                message,
            },
            _ => Self::Transport { message },
        }
    }
}

impl From<HttpFailure> for OwnershipSourceError {
    fn from(failure: HttpFailure) -> Self {
        match failure {
            HttpFailure::Transport { message } => Self::transport(message),
            HttpFailure::Timeout { message } => Self::timeout(message),
            HttpFailure::RateLimited { message } => Self::rate_limited(message),
            HttpFailure::Rejected { message, .. } => Self::rejected(message),
        }
    }
}

impl From<HttpFailure> for IdentityResolverError {
    fn from(failure: HttpFailure) -> Self {
        match failure {
            HttpFailure::Transport { message } => Self::transport(message),
            HttpFailure::Timeout { message } => Self::timeout(message),
            HttpFailure::RateLimited { message } | HttpFailure::Rejected { message, .. } => {
                Self::rejected(message)
            }
        }
    }
}

/// Metadata failures need the token id to report a 404, so the caller
/// converts through [`HttpFailure::into_metadata_error`].
impl HttpFailure {
    pub(crate) fn into_metadata_error(self, token_id: &TokenId) -> TokenMetadataSourceError {
        match self {
            Self::Rejected { status: 404, .. } => {
                TokenMetadataSourceError::not_found(token_id.as_str())
            }
            Self::Timeout { message } => TokenMetadataSourceError::timeout(message),
            Self::Transport { message }
            | Self::RateLimited { message }
            | Self::Rejected { message, .. } => TokenMetadataSourceError::transport(message),
        }
    }
}

/// Build a client with an explicit per-request timeout.
pub(crate) fn build_client(timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()
}

/// Send `request` and return the body of a 2xx response.
pub(crate) async fn send(request: RequestBuilder) -> Result<Vec<u8>, HttpFailure> {
    let response = request.send().await.map_err(HttpFailure::from_transport)?;
    let status = response.status();
    let body = response.bytes().await.map_err(HttpFailure::from_transport)?;
    if !status.is_success() {
        return Err(HttpFailure::from_status(status, body.as_ref()));
    }
    Ok(body.to_vec())
}

/// Whitespace-compacted, length-limited view of a response body.
pub(crate) fn body_preview(body: &[u8]) -> String {
    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}

/// Rewrite `ipfs://` URIs onto an HTTP gateway; other URLs pass through.
pub(crate) fn resolve_ipfs(url: &str, gateway: &str) -> String {
    match url.strip_prefix("ipfs://") {
        Some(path) => {
            let path = path.trim_start_matches("ipfs/");
            format!("{}/{}", gateway.trim_end_matches('/'), path)
        }
        None => url.to_owned(),
    }
}
