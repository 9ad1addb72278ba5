//! Builders wiring outbound adapters into the frame HTTP state.

use std::io;
use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock};

use nft_frames::domain::ports::{
    IdentityResolver, LookupMetrics, OwnershipCheck, OwnershipSource, TokenMetadataSource,
};
use nft_frames::domain::{
    FramePresenter, GallerySettings, IdentityService, MetadataEnricher, OwnershipCheckService,
    OwnershipService, TtlCache,
};
use nft_frames::inbound::http::{FrameLinks, HttpState};
use nft_frames::outbound::airstack::AirstackIdentityResolver;
use nft_frames::outbound::alchemy::AlchemyNftSource;
use nft_frames::outbound::contract_rpc::{ContractRpcClient, ContractRpcSource};
use nft_frames::outbound::etherscan::EtherscanTransferHistorySource;
use nft_frames::outbound::metadata::{
    ContractUriMetadataSource, HttpMetadataSource, TemplatedMetadataSource,
};
use nft_frames::outbound::opensea::OpenSeaAssetSource;
use nft_frames::settings::{FrameConfig, MetadataStrategy, OwnershipProviderConfig};
use tracing::info;

fn startup_error(what: &str, err: impl std::fmt::Display) -> io::Error {
    io::Error::other(format!("{what}: {err}"))
}

/// Shared JSON-RPC client, built only when an RPC URL is configured.
fn build_rpc_client(config: &FrameConfig) -> io::Result<Option<Arc<ContractRpcClient>>> {
    config
        .rpc_url
        .as_ref()
        .map(|url| {
            ContractRpcClient::new(url.clone(), config.request_timeout)
                .map(Arc::new)
                .map_err(|err| startup_error("contract RPC client", err))
        })
        .transpose()
}

fn build_ownership_source(
    config: &FrameConfig,
    rpc: Option<&Arc<ContractRpcClient>>,
) -> io::Result<Arc<dyn OwnershipSource>> {
    let timeout = config.request_timeout;
    let source: Arc<dyn OwnershipSource> = match &config.provider {
        OwnershipProviderConfig::Alchemy {
            url,
            api_key,
            page_limit,
        } => Arc::new(
            AlchemyNftSource::new(url, api_key, timeout)
                .map_err(|err| startup_error("alchemy source", err))?
                .with_page_limit(*page_limit),
        ),
        OwnershipProviderConfig::OpenSea { url, api_key } => Arc::new(
            OpenSeaAssetSource::new(url, api_key.clone(), timeout)
                .map_err(|err| startup_error("opensea source", err))?,
        ),
        OwnershipProviderConfig::Etherscan { url, api_key } => Arc::new(
            EtherscanTransferHistorySource::new(url, api_key.clone(), timeout)
                .map_err(|err| startup_error("etherscan source", err))?,
        ),
        OwnershipProviderConfig::Contract { enumeration_limit } => {
            let client = rpc.ok_or_else(|| {
                startup_error("contract source", "rpc_url is not configured")
            })?;
            Arc::new(
                ContractRpcSource::new(Arc::clone(client))
                    .with_enumeration_limit(*enumeration_limit),
            )
        }
    };
    Ok(source)
}

fn build_metadata_source(
    config: &FrameConfig,
    rpc: Option<&Arc<ContractRpcClient>>,
) -> io::Result<Option<Arc<dyn TokenMetadataSource>>> {
    let timeout = config.request_timeout;
    let gateway = config.ipfs_gateway.as_str();
    let source: Option<Arc<dyn TokenMetadataSource>> = match &config.metadata {
        MetadataStrategy::None => None,
        MetadataStrategy::Http { base_uri } => Some(Arc::new(
            HttpMetadataSource::new(base_uri, gateway, timeout)
                .map_err(|err| startup_error("metadata source", err))?,
        )),
        MetadataStrategy::Template { template } => Some(Arc::new(TemplatedMetadataSource::new(
            template.clone(),
            config.contract.clone(),
        ))),
        MetadataStrategy::Contract => {
            let client = rpc.ok_or_else(|| {
                startup_error("metadata source", "rpc_url is not configured")
            })?;
            Some(Arc::new(
                ContractUriMetadataSource::new(
                    Arc::clone(client),
                    config.contract.clone(),
                    gateway,
                    timeout,
                )
                .map_err(|err| startup_error("metadata source", err))?,
            ))
        }
    };
    Ok(source)
}

fn build_identity_resolver(config: &FrameConfig) -> io::Result<Arc<dyn IdentityResolver>> {
    AirstackIdentityResolver::new(
        config.social_graph_url.clone(),
        config.social_graph_api_key.clone(),
        config.request_timeout,
    )
    .map(|resolver| Arc::new(resolver) as Arc<dyn IdentityResolver>)
    .map_err(|err| startup_error("identity resolver", err))
}

/// Compose the ownership check service from configuration.
pub(super) fn build_ownership_check(
    config: &FrameConfig,
    metrics: Arc<dyn LookupMetrics>,
    clock: Arc<dyn Clock>,
) -> io::Result<Arc<dyn OwnershipCheck>> {
    let rpc = build_rpc_client(config)?;
    let source = build_ownership_source(config, rpc.as_ref())?;
    let metadata = build_metadata_source(config, rpc.as_ref())?;
    info!(
        provider = config.provider.name(),
        metadata = metadata.is_some(),
        contract = config.contract.as_str(),
        "ownership check configured"
    );

    let identities = IdentityService::new(build_identity_resolver(config)?, Arc::clone(&metrics));
    let ownership = OwnershipService::new(
        source,
        config.contract.clone(),
        TtlCache::new(config.cache_ttl, Arc::clone(&clock)),
        Arc::clone(&metrics),
    );
    let enricher = MetadataEnricher::new(
        metadata,
        config.contract.clone(),
        config.placeholder.clone(),
        TtlCache::new(config.cache_ttl, clock),
        metrics,
    );
    Ok(Arc::new(OwnershipCheckService::new(
        identities,
        ownership,
        enricher,
        GallerySettings {
            page_size: config.page_size,
            policy: config.pagination_policy,
        },
    )))
}

/// Build the shared HTTP state for the frame handlers.
pub(super) fn build_http_state(
    config: &FrameConfig,
    metrics: Arc<dyn LookupMetrics>,
) -> io::Result<web::Data<HttpState>> {
    let check = build_ownership_check(config, metrics, Arc::new(DefaultClock))?;
    Ok(web::Data::new(HttpState::new(
        check,
        FramePresenter::new(config.collection_name.clone(), config.backgrounds.clone()),
        FrameLinks::new(config.public_url.as_str(), &config.base_path),
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use nft_frames::domain::ports::NoOpLookupMetrics;
    use nft_frames::settings::FrameSettings;
    use rstest::rstest;

    fn config(settings: FrameSettings) -> FrameConfig {
        settings.validate().expect("valid settings")
    }

    #[rstest]
    #[case("alchemy")]
    #[case("opensea")]
    #[case("etherscan")]
    fn builds_each_http_provider(#[case] provider: &str) {
        let config = config(FrameSettings {
            ownership_provider: Some(provider.to_owned()),
            alchemy_api_key: Some("key".to_owned()),
            ..FrameSettings::default()
        });

        assert!(build_ownership_source(&config, None).is_ok());
        assert!(
            build_metadata_source(&config, None)
                .expect("metadata source")
                .is_none()
        );
    }

    #[rstest]
    fn contract_provider_shares_the_rpc_client() {
        let config = config(FrameSettings {
            ownership_provider: Some("contract".to_owned()),
            metadata_strategy: Some("contract".to_owned()),
            rpc_url: Some("https://rpc.example".to_owned()),
            ..FrameSettings::default()
        });
        let rpc = build_rpc_client(&config)
            .expect("rpc client")
            .expect("rpc configured");

        let _source = build_ownership_source(&config, Some(&rpc)).expect("ownership source");
        let metadata = build_metadata_source(&config, Some(&rpc)).expect("metadata source");

        assert!(metadata.is_some());
        assert_eq!(Arc::strong_count(&rpc), 3);
    }

    #[rstest]
    fn contract_provider_without_client_fails() {
        let config = config(FrameSettings {
            ownership_provider: Some("contract".to_owned()),
            rpc_url: Some("https://rpc.example".to_owned()),
            ..FrameSettings::default()
        });

        let error = build_ownership_source(&config, None)
            .err()
            .expect("missing client is an error");
        assert!(error.to_string().contains("rpc_url"));
    }

    #[rstest]
    fn builds_http_state_from_defaults() {
        let config = config(FrameSettings {
            alchemy_api_key: Some("key".to_owned()),
            image_template: Some("https://img.example/{tokenId}.png".to_owned()),
            metadata_strategy: Some("template".to_owned()),
            ..FrameSettings::default()
        });

        let state = build_http_state(&config, Arc::new(NoOpLookupMetrics)).expect("state");
        assert_eq!(
            state.links.target_url(&nft_frames::domain::FrameTarget::to(
                nft_frames::domain::FrameRoute::Check
            )),
            "http://localhost:8080/api/check"
        );
    }
}
