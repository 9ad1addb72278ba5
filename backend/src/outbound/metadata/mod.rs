//! Token metadata adapters: metadata service, contract `tokenURI`, and
//! pure templating.

mod document;
mod dto;
mod http_source;
mod templated;

pub use http_source::{ContractUriMetadataSource, HttpMetadataSource};
pub use templated::TemplatedMetadataSource;
