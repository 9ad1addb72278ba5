//! JSON-RPC envelopes for `eth_call`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub(super) struct EthCallRequestDto<'a> {
    pub(super) jsonrpc: &'static str,
    pub(super) id: u64,
    pub(super) method: &'static str,
    pub(super) params: (CallObjectDto<'a>, &'static str),
}

#[derive(Debug, Serialize)]
pub(super) struct CallObjectDto<'a> {
    pub(super) to: &'a str,
    pub(super) data: &'a str,
}

impl<'a> EthCallRequestDto<'a> {
    pub(super) fn new(id: u64, to: &'a str, data: &'a str) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            method: "eth_call",
            params: (CallObjectDto { to, data }, "latest"),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct JsonRpcResponseDto {
    pub(super) result: Option<String>,
    pub(super) error: Option<JsonRpcErrorDto>,
}

#[derive(Debug, Deserialize)]
pub(super) struct JsonRpcErrorDto {
    pub(super) code: i64,
    pub(super) message: String,
}
