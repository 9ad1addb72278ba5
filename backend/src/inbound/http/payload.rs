//! Frame action payload posted by the social client on a button press.

use serde::Deserialize;
use tracing::debug;
use utoipa::ToSchema;

use crate::domain::ports::CheckRequest;
use crate::domain::{EvmAddress, Identity};

/// Body of a frame button POST.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FrameActionPayload {
    /// Client-asserted interaction details.
    #[serde(default)]
    pub untrusted_data: Option<UntrustedData>,
    /// Signed form of the same interaction.
    #[serde(default)]
    pub trusted_data: Option<TrustedData>,
}

/// Client-asserted fields; not signature-checked.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UntrustedData {
    /// Social id of the user who pressed the button.
    #[serde(default)]
    pub fid: Option<u64>,
    /// One-based index of the pressed button.
    #[serde(default)]
    pub button_index: Option<u8>,
    /// Text typed into the frame input.
    #[serde(default)]
    pub input_text: Option<String>,
    /// Wallet address the client has verified for the user.
    #[serde(default)]
    pub address: Option<String>,
    /// URL of the frame that was interacted with.
    #[serde(default)]
    pub url: Option<String>,
    /// Client timestamp of the interaction.
    #[serde(default)]
    pub timestamp: Option<u64>,
}

/// Signed message bytes; carried through but not validated.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TrustedData {
    /// Hex-encoded signed message.
    #[serde(default)]
    pub message_bytes: Option<String>,
}

impl FrameActionPayload {
    /// Identity from the typed input when present and valid, else the
    /// verified wallet, else the presser's social id.
    pub fn check_request(&self) -> CheckRequest {
        let Some(data) = self.untrusted_data.as_ref() else {
            return CheckRequest::default();
        };

        let typed = data
            .input_text
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .and_then(|text| match Identity::parse(text) {
                Ok(identity) => Some(identity),
                Err(error) => {
                    debug!(%error, input = text, "ignoring unusable input text");
                    None
                }
            });

        if let Some(identity) = typed {
            return CheckRequest {
                identity: Some(identity),
                verified_address: None,
            };
        }

        let verified_address = data
            .address
            .as_deref()
            .and_then(|raw| EvmAddress::parse(raw).ok());

        CheckRequest {
            identity: data.fid.map(Identity::SocialId),
            verified_address,
        }
    }
}
