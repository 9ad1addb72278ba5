//! URL templates with `{contract}` and `{tokenId}` placeholders.

use super::{ContractAddress, TokenId};

/// A URL pattern rendered per token.
///
/// # Examples
/// ```
/// use nft_frames::domain::{EvmAddress, TokenId, UrlTemplate};
///
/// let template = UrlTemplate::new("https://etherscan.io/nft/{contract}/{tokenId}");
/// let contract = EvmAddress::parse("0xd652Eeb3431f1113312E5c763CE1d0846Aa4d7BC").expect("valid");
/// assert_eq!(
///     template.render(&contract, &TokenId::from_u128(7)),
///     "https://etherscan.io/nft/0xd652eeb3431f1113312e5c763ce1d0846aa4d7bc/7"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlTemplate(String);

impl UrlTemplate {
    /// Wrap a pattern. Unknown placeholders are left as written.
    pub fn new(pattern: impl Into<String>) -> Self {
        Self(pattern.into())
    }

    /// Raw pattern.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Substitute both placeholders.
    pub fn render(&self, contract: &ContractAddress, token_id: &TokenId) -> String {
        self.0
            .replace("{contract}", contract.as_str())
            .replace("{tokenId}", token_id.as_str())
    }
}

impl Default for UrlTemplate {
    fn default() -> Self {
        Self::new("https://etherscan.io/nft/{contract}/{tokenId}")
    }
}
