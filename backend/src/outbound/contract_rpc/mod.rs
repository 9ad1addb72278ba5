//! ERC-721 reads over a JSON-RPC node.

mod abi;
mod client;
mod dto;
mod http_source;

pub use client::ContractRpcClient;
pub use http_source::{ContractRpcSource, DEFAULT_ENUMERATION_LIMIT};
