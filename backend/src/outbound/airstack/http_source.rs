//! Reqwest-backed social-graph identity resolver.
//!
//! Posts a GraphQL `Socials` query keyed by the identity and collects the
//! EVM addresses associated with each matching profile.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, Url};
use tracing::debug;

use super::dto::{GraphQlRequestDto, GraphQlResponseDto, IdentityVariablesDto};
use crate::domain::ports::{IdentityResolver, IdentityResolverError};
use crate::domain::{EvmAddress, Identity, WalletAddress};
use crate::outbound::http_support::{build_client, send};

const SOCIALS_QUERY: &str = r"query LinkedWallets($identity: Identity!) {
  Socials(input: { filter: { identity: { _eq: $identity } }, blockchain: ethereum }) {
    Social { userAssociatedAddresses }
  }
}";

/// GraphQL social-graph adapter.
pub struct AirstackIdentityResolver {
    client: Client,
    endpoint: Url,
    api_key: Option<String>,
}

impl AirstackIdentityResolver {
    /// Build a resolver posting to `endpoint`.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(
        endpoint: Url,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, IdentityResolverError> {
        let client = build_client(timeout).map_err(|err| {
            IdentityResolverError::transport(format!("client build failed: {err}"))
        })?;
        Ok(Self {
            client,
            endpoint,
            api_key: api_key.filter(|key| !key.trim().is_empty()),
        })
    }
}

#[async_trait]
impl IdentityResolver for AirstackIdentityResolver {
    async fn resolve(
        &self,
        identity: &Identity,
    ) -> Result<Vec<WalletAddress>, IdentityResolverError> {
        let key = identity.social_graph_key();
        let payload = GraphQlRequestDto {
            query: SOCIALS_QUERY,
            variables: IdentityVariablesDto { identity: &key },
        };
        let mut request = self.client.post(self.endpoint.clone()).json(&payload);
        if let Some(api_key) = self.api_key.as_deref() {
            request = request.header(AUTHORIZATION, api_key);
        }
        let body = send(request).await?;
        linked_wallets(&body)
    }
}

fn linked_wallets(body: &[u8]) -> Result<Vec<WalletAddress>, IdentityResolverError> {
    let response: GraphQlResponseDto = serde_json::from_slice(body).map_err(|error| {
        IdentityResolverError::decode(format!("invalid social graph JSON payload: {error}"))
    })?;

    if let Some(errors) = response.errors.filter(|errors| !errors.is_empty()) {
        let joined = errors
            .into_iter()
            .map(|error| error.message)
            .collect::<Vec<_>>()
            .join("; ");
        return Err(IdentityResolverError::rejected(joined));
    }

    let socials = response
        .data
        .and_then(|data| data.socials)
        .and_then(|socials| socials.social)
        .unwrap_or_default();

    let mut wallets: Vec<WalletAddress> = Vec::new();
    for raw in socials
        .into_iter()
        .flat_map(|social| social.user_associated_addresses.unwrap_or_default())
    {
        match EvmAddress::parse(&raw) {
            Ok(address) if !wallets.contains(&address) => wallets.push(address),
            Ok(_) => {}
            Err(error) => debug!(address = %raw, %error, "skipping non-EVM associated address"),
        }
    }
    Ok(wallets)
}
