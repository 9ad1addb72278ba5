//! Runtime configuration loaded via OrthoConfig.
//!
//! [`FrameSettings`] is the raw layer (CLI, `NFT_FRAME_*` environment, config
//! file). Accessors supply defaults. [`FrameSettings::validate`] turns it into
//! a typed [`FrameConfig`] or a [`SettingsError`] naming the offending field.

use std::net::SocketAddr;
use std::time::Duration;

use ortho_config::OrthoConfig;
use pagination::{PageSize, PaginationPolicy};
use serde::Deserialize;
use thiserror::Error;
use url::Url;

use crate::domain::{AddressError, Backgrounds, ContractAddress, EvmAddress, UrlTemplate};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_PUBLIC_URL: &str = "http://localhost:8080";
const DEFAULT_BASE_PATH: &str = "/api";
const DEFAULT_COLLECTION_NAME: &str = "Scary Garys";
const DEFAULT_CONTRACT: &str = "0xd652Eeb3431f1113312E5c763CE1d0846Aa4d7BC";
const DEFAULT_PROVIDER: &str = "alchemy";
const DEFAULT_ALCHEMY_URL: &str = "https://eth-mainnet.g.alchemy.com/v2";
const DEFAULT_ALCHEMY_PAGE_LIMIT: usize = 10;
const DEFAULT_OPENSEA_URL: &str = "https://api.opensea.io/api/v1";
const DEFAULT_ETHERSCAN_URL: &str = "https://api.etherscan.io";
const DEFAULT_ENUMERATION_LIMIT: u64 = 50;
const DEFAULT_SOCIAL_GRAPH_URL: &str = "https://api.airstack.xyz/gql";
const DEFAULT_METADATA_STRATEGY: &str = "none";
const DEFAULT_IPFS_GATEWAY: &str = "https://ipfs.io/ipfs";
const DEFAULT_CACHE_TTL_SECS: u64 = 300;
const MAX_CACHE_TTL_SECS: u64 = 86_400;
const DEFAULT_PAGE_SIZE: usize = 1;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 5;
const MAX_REQUEST_TIMEOUT_SECS: u64 = 60;

/// Raw configuration values.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "NFT_FRAME")]
pub struct FrameSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// Externally visible origin used in button targets.
    pub public_url: Option<String>,
    /// Mount point of the frame routes.
    pub base_path: Option<String>,
    /// Display name of the collection.
    pub collection_name: Option<String>,
    /// ERC-721 contract address.
    pub contract_address: Option<String>,
    /// `alchemy`, `opensea`, `etherscan` or `contract`.
    pub ownership_provider: Option<String>,
    /// Base URL of the Alchemy NFT API.
    pub alchemy_url: Option<String>,
    /// Alchemy API key; required for the `alchemy` provider.
    pub alchemy_api_key: Option<String>,
    /// Most `getNFTs` pages followed per lookup.
    pub alchemy_page_limit: Option<usize>,
    /// Base URL of the OpenSea API.
    pub opensea_url: Option<String>,
    /// Optional OpenSea API key sent as `X-API-KEY`.
    pub opensea_api_key: Option<String>,
    /// Base URL of the Etherscan API.
    pub etherscan_url: Option<String>,
    /// Optional Etherscan API key.
    pub etherscan_api_key: Option<String>,
    /// JSON-RPC node for the `contract` provider and metadata strategy.
    pub rpc_url: Option<String>,
    /// Most `tokenOfOwnerByIndex` calls per lookup.
    pub enumeration_limit: Option<u64>,
    /// Social graph GraphQL endpoint.
    pub social_graph_url: Option<String>,
    /// Social graph API key sent as `Authorization`.
    pub social_graph_api_key: Option<String>,
    /// `http`, `template`, `contract` or `none`.
    pub metadata_strategy: Option<String>,
    /// Metadata document base URI for the `http` strategy.
    pub metadata_base_uri: Option<String>,
    /// Image URL template for the `template` strategy.
    pub image_template: Option<String>,
    /// Image URL template used when no metadata is found.
    pub placeholder_template: Option<String>,
    /// Gateway that `ipfs://` URLs are rewritten to.
    pub ipfs_gateway: Option<String>,
    /// Background of the initial and neutral screens.
    pub background_default: Option<String>,
    /// Background shown when tokens are owned.
    pub background_confirm: Option<String>,
    /// Background shown when the provider fails.
    pub background_error: Option<String>,
    /// Background shown when no wallet is linked.
    pub background_no_result: Option<String>,
    /// Lifetime of cached lookups, in seconds.
    #[ortho_config(default = 300)]
    pub cache_ttl_secs: u64,
    /// Tokens per gallery page.
    pub page_size: Option<usize>,
    /// `clamp` or `wrap`.
    pub pagination_policy: Option<String>,
    /// Timeout applied to every outbound request, in seconds.
    pub request_timeout_secs: Option<u64>,
}

impl Default for FrameSettings {
    fn default() -> Self {
        Self {
            bind_addr: None,
            public_url: None,
            base_path: None,
            collection_name: None,
            contract_address: None,
            ownership_provider: None,
            alchemy_url: None,
            alchemy_api_key: None,
            alchemy_page_limit: None,
            opensea_url: None,
            opensea_api_key: None,
            etherscan_url: None,
            etherscan_api_key: None,
            rpc_url: None,
            enumeration_limit: None,
            social_graph_url: None,
            social_graph_api_key: None,
            metadata_strategy: None,
            metadata_base_uri: None,
            image_template: None,
            placeholder_template: None,
            ipfs_gateway: None,
            background_default: None,
            background_confirm: None,
            background_error: None,
            background_no_result: None,
            cache_ttl_secs: DEFAULT_CACHE_TTL_SECS,
            page_size: None,
            pagination_policy: None,
            request_timeout_secs: None,
        }
    }
}

/// Validation failures for [`FrameSettings`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingsError {
    /// Configuration sources could not be read or merged.
    #[error("failed to load configuration: {0}")]
    Load(String),
    /// The bind address is not `host:port`.
    #[error("bind address '{value}' is not a socket address")]
    BindAddress { value: String },
    /// A URL setting does not parse.
    #[error("{field} '{value}' is not a valid URL: {reason}")]
    Url {
        field: &'static str,
        value: String,
        reason: String,
    },
    /// The contract address is malformed.
    #[error("contract address '{value}' is invalid: {source}")]
    ContractAddress {
        value: String,
        #[source]
        source: AddressError,
    },
    /// The ownership provider name is unknown.
    #[error("unknown ownership provider '{0}'; expected alchemy|opensea|etherscan|contract")]
    UnknownProvider(String),
    /// The metadata strategy name is unknown.
    #[error("unknown metadata strategy '{0}'; expected http|template|contract|none")]
    UnknownMetadataStrategy(String),
    /// The pagination policy name is unknown.
    #[error("unknown pagination policy '{0}'; expected clamp|wrap")]
    UnknownPaginationPolicy(String),
    /// A setting required by the chosen provider or strategy is absent.
    #[error("{field} is required when {reason}")]
    Missing {
        field: &'static str,
        reason: &'static str,
    },
    /// A numeric setting is outside its allowed range.
    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        value: u64,
        min: u64,
        max: u64,
    },
}

/// Which ownership backend to call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OwnershipProviderConfig {
    /// Node-provider NFT listing.
    Alchemy {
        url: Url,
        api_key: String,
        page_limit: usize,
    },
    /// Marketplace asset listing.
    OpenSea { url: Url, api_key: Option<String> },
    /// Block-explorer transfer history (approximate).
    Etherscan { url: Url, api_key: Option<String> },
    /// Direct contract reads over JSON-RPC.
    Contract { enumeration_limit: u64 },
}

impl OwnershipProviderConfig {
    /// Short name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Alchemy { .. } => "alchemy",
            Self::OpenSea { .. } => "opensea",
            Self::Etherscan { .. } => "etherscan",
            Self::Contract { .. } => "contract",
        }
    }
}

/// How token metadata is resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetadataStrategy {
    /// Placeholder only.
    None,
    /// `GET {base_uri}/{tokenId}`.
    Http { base_uri: String },
    /// Deterministic image URL.
    Template { template: UrlTemplate },
    /// `tokenURI` on the contract.
    Contract,
}

/// Validated configuration.
#[derive(Debug, Clone)]
pub struct FrameConfig {
    pub bind_addr: SocketAddr,
    pub public_url: Url,
    pub base_path: String,
    pub collection_name: String,
    pub contract: ContractAddress,
    pub provider: OwnershipProviderConfig,
    /// Required by the `contract` provider and metadata strategy.
    pub rpc_url: Option<Url>,
    pub social_graph_url: Url,
    pub social_graph_api_key: Option<String>,
    pub metadata: MetadataStrategy,
    pub placeholder: UrlTemplate,
    pub ipfs_gateway: String,
    pub backgrounds: Backgrounds,
    pub cache_ttl: Duration,
    pub page_size: PageSize,
    pub pagination_policy: PaginationPolicy,
    pub request_timeout: Duration,
}

fn parse_url(field: &'static str, value: &str) -> Result<Url, SettingsError> {
    Url::parse(value).map_err(|err| SettingsError::Url {
        field,
        value: value.to_owned(),
        reason: err.to_string(),
    })
}

fn non_blank(value: Option<&String>) -> Option<String> {
    value
        .map(|text| text.trim().to_owned())
        .filter(|text| !text.is_empty())
}

fn in_range(field: &'static str, value: u64, min: u64, max: u64) -> Result<u64, SettingsError> {
    if (min..=max).contains(&value) {
        Ok(value)
    } else {
        Err(SettingsError::OutOfRange {
            field,
            value,
            min,
            max,
        })
    }
}

impl FrameSettings {
    /// Load from CLI arguments, environment and config files.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Load`] when a source cannot be merged.
    pub fn load_from_env() -> Result<Self, SettingsError> {
        Self::load().map_err(|err| SettingsError::Load(err.to_string()))
    }

    pub fn bind_addr(&self) -> &str {
        self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR)
    }

    pub fn public_url(&self) -> &str {
        self.public_url.as_deref().unwrap_or(DEFAULT_PUBLIC_URL)
    }

    /// Base path normalised to a leading slash and no trailing slash.
    pub fn base_path(&self) -> String {
        let raw = self.base_path.as_deref().unwrap_or(DEFAULT_BASE_PATH).trim();
        let trimmed = raw.trim_matches('/');
        if trimmed.is_empty() {
            String::new()
        } else {
            format!("/{trimmed}")
        }
    }

    pub fn collection_name(&self) -> &str {
        self.collection_name
            .as_deref()
            .unwrap_or(DEFAULT_COLLECTION_NAME)
    }

    pub fn contract_address(&self) -> &str {
        self.contract_address.as_deref().unwrap_or(DEFAULT_CONTRACT)
    }

    pub fn ownership_provider(&self) -> &str {
        self.ownership_provider
            .as_deref()
            .unwrap_or(DEFAULT_PROVIDER)
    }

    pub fn metadata_strategy(&self) -> &str {
        self.metadata_strategy
            .as_deref()
            .unwrap_or(DEFAULT_METADATA_STRATEGY)
    }

    pub fn ipfs_gateway(&self) -> &str {
        self.ipfs_gateway.as_deref().unwrap_or(DEFAULT_IPFS_GATEWAY)
    }

    pub fn cache_ttl_secs(&self) -> u64 {
        self.cache_ttl_secs
    }

    pub fn page_size(&self) -> usize {
        self.page_size.unwrap_or(DEFAULT_PAGE_SIZE)
    }

    pub fn request_timeout_secs(&self) -> u64 {
        self.request_timeout_secs
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS)
    }

    /// Validate into a typed [`FrameConfig`].
    ///
    /// # Errors
    ///
    /// Returns the first [`SettingsError`] found.
    pub fn validate(&self) -> Result<FrameConfig, SettingsError> {
        let bind_addr = self
            .bind_addr()
            .parse()
            .map_err(|_| SettingsError::BindAddress {
                value: self.bind_addr().to_owned(),
            })?;
        let contract = EvmAddress::parse(self.contract_address()).map_err(|source| {
            SettingsError::ContractAddress {
                value: self.contract_address().to_owned(),
                source,
            }
        })?;
        let rpc_url = non_blank(self.rpc_url.as_ref())
            .map(|raw| parse_url("rpc_url", &raw))
            .transpose()?;
        let provider = self.provider_config(rpc_url.is_some())?;
        let metadata = self.metadata_config(rpc_url.is_some())?;

        let cache_ttl = in_range("cache_ttl_secs", self.cache_ttl_secs(), 1, MAX_CACHE_TTL_SECS)?;
        let request_timeout = in_range(
            "request_timeout_secs",
            self.request_timeout_secs(),
            1,
            MAX_REQUEST_TIMEOUT_SECS,
        )?;
        let page_size = PageSize::new(self.page_size()).map_err(|_| SettingsError::OutOfRange {
            field: "page_size",
            value: 0,
            min: 1,
            max: u64::MAX,
        })?;
        let pagination_policy = match non_blank(self.pagination_policy.as_ref()) {
            Some(raw) => raw
                .parse()
                .map_err(|_| SettingsError::UnknownPaginationPolicy(raw))?,
            None => PaginationPolicy::default(),
        };

        Ok(FrameConfig {
            bind_addr,
            public_url: parse_url("public_url", self.public_url())?,
            base_path: self.base_path(),
            collection_name: self.collection_name().to_owned(),
            contract,
            provider,
            rpc_url,
            social_graph_url: parse_url(
                "social_graph_url",
                self.social_graph_url
                    .as_deref()
                    .unwrap_or(DEFAULT_SOCIAL_GRAPH_URL),
            )?,
            social_graph_api_key: non_blank(self.social_graph_api_key.as_ref()),
            metadata,
            placeholder: non_blank(self.placeholder_template.as_ref())
                .map(UrlTemplate::new)
                .unwrap_or_default(),
            ipfs_gateway: self.ipfs_gateway().to_owned(),
            backgrounds: Backgrounds {
                default: self.background_default.clone().unwrap_or_default(),
                confirm: self.background_confirm.clone().unwrap_or_default(),
                error: self.background_error.clone().unwrap_or_default(),
                no_result: self.background_no_result.clone().unwrap_or_default(),
            },
            cache_ttl: Duration::from_secs(cache_ttl),
            page_size,
            pagination_policy,
            request_timeout: Duration::from_secs(request_timeout),
        })
    }

    fn provider_config(&self, has_rpc: bool) -> Result<OwnershipProviderConfig, SettingsError> {
        match self.ownership_provider().trim().to_ascii_lowercase().as_str() {
            "alchemy" => Ok(OwnershipProviderConfig::Alchemy {
                url: parse_url(
                    "alchemy_url",
                    self.alchemy_url.as_deref().unwrap_or(DEFAULT_ALCHEMY_URL),
                )?,
                api_key: non_blank(self.alchemy_api_key.as_ref()).ok_or(
                    SettingsError::Missing {
                        field: "alchemy_api_key",
                        reason: "ownership_provider is alchemy",
                    },
                )?,
                page_limit: self
                    .alchemy_page_limit
                    .unwrap_or(DEFAULT_ALCHEMY_PAGE_LIMIT)
                    .max(1),
            }),
            "opensea" => Ok(OwnershipProviderConfig::OpenSea {
                url: parse_url(
                    "opensea_url",
                    self.opensea_url.as_deref().unwrap_or(DEFAULT_OPENSEA_URL),
                )?,
                api_key: non_blank(self.opensea_api_key.as_ref()),
            }),
            "etherscan" => Ok(OwnershipProviderConfig::Etherscan {
                url: parse_url(
                    "etherscan_url",
                    self.etherscan_url
                        .as_deref()
                        .unwrap_or(DEFAULT_ETHERSCAN_URL),
                )?,
                api_key: non_blank(self.etherscan_api_key.as_ref()),
            }),
            "contract" if has_rpc => Ok(OwnershipProviderConfig::Contract {
                enumeration_limit: self
                    .enumeration_limit
                    .unwrap_or(DEFAULT_ENUMERATION_LIMIT),
            }),
            "contract" => Err(SettingsError::Missing {
                field: "rpc_url",
                reason: "ownership_provider is contract",
            }),
            _ => Err(SettingsError::UnknownProvider(
                self.ownership_provider().to_owned(),
            )),
        }
    }

    fn metadata_config(&self, has_rpc: bool) -> Result<MetadataStrategy, SettingsError> {
        match self.metadata_strategy().trim().to_ascii_lowercase().as_str() {
            "none" => Ok(MetadataStrategy::None),
            "http" => {
                let base_uri = non_blank(self.metadata_base_uri.as_ref()).ok_or(
                    SettingsError::Missing {
                        field: "metadata_base_uri",
                        reason: "metadata_strategy is http",
                    },
                )?;
                // Accept ipfs:// bases; only check that HTTP bases parse.
                if !base_uri.starts_with("ipfs://") {
                    parse_url("metadata_base_uri", &base_uri)?;
                }
                Ok(MetadataStrategy::Http { base_uri })
            }
            "template" => non_blank(self.image_template.as_ref())
                .map(|template| MetadataStrategy::Template {
                    template: UrlTemplate::new(template),
                })
                .ok_or(SettingsError::Missing {
                    field: "image_template",
                    reason: "metadata_strategy is template",
                }),
            "contract" if has_rpc => Ok(MetadataStrategy::Contract),
            "contract" => Err(SettingsError::Missing {
                field: "rpc_url",
                reason: "metadata_strategy is contract",
            }),
            _ => Err(SettingsError::UnknownMetadataStrategy(
                self.metadata_strategy().to_owned(),
            )),
        }
    }
}
