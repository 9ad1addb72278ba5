//! Block-explorer transfer history adapter.

mod dto;
mod http_source;

pub use http_source::EtherscanTransferHistorySource;
