//! Marketplace asset listing adapter.

mod dto;
mod http_source;

pub use http_source::OpenSeaAssetSource;
