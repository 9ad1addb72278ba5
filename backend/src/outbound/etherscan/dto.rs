//! DTOs for block-explorer `tokennfttx` responses.

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub(super) struct ExplorerResponseDto {
    pub(super) status: String,
    #[serde(default)]
    pub(super) message: String,
    pub(super) result: ExplorerResultDto,
}

/// `result` is an event array on success and an error string otherwise.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(super) enum ExplorerResultDto {
    Events(Vec<TransferEventDto>),
    Message(String),
}

#[derive(Debug, Deserialize)]
pub(super) struct TransferEventDto {
    pub(super) to: String,
    #[serde(rename = "tokenID")]
    pub(super) token_id: String,
}
