//! Tokens and ownership results.

use std::collections::HashSet;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Token identifier in canonical decimal form.
///
/// Providers disagree on representation: node providers return 32-byte hex,
/// marketplaces and explorers return decimal. Both parse to the same value.
///
/// # Examples
/// ```
/// use nft_frames::domain::TokenId;
///
/// let hex = TokenId::parse("0x000000000000000000000000000000000000000000000000000000000000002a")
///     .expect("valid hex");
/// assert_eq!(hex, TokenId::parse("42").expect("valid decimal"));
/// assert_eq!(hex.as_str(), "42");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TokenId(String);

/// Validation errors raised when parsing a [`TokenId`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenIdError {
    /// Input is blank.
    #[error("token id must not be empty")]
    Empty,
    /// Input is neither decimal nor `0x` hex.
    #[error("token id '{0}' is not an unsigned integer")]
    NotAnInteger(String),
}

impl TokenId {
    /// Parse decimal or `0x`-prefixed hex input of any width.
    pub fn parse(raw: &str) -> Result<Self, TokenIdError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(TokenIdError::Empty);
        }
        let not_integer = || TokenIdError::NotAnInteger(trimmed.to_owned());
        let decimal = match trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
        {
            Some(digits) => hex_to_decimal(digits).ok_or_else(not_integer)?,
            None if trimmed.bytes().all(|b| b.is_ascii_digit()) => trimmed.to_owned(),
            None => return Err(not_integer()),
        };
        Ok(Self(strip_leading_zeros(&decimal)))
    }

    /// Build from a non-negative machine integer.
    pub fn from_u128(value: u128) -> Self {
        Self(value.to_string())
    }

    /// Decimal form.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

fn strip_leading_zeros(digits: &str) -> String {
    let stripped = digits.trim_start_matches('0');
    if stripped.is_empty() {
        "0".to_owned()
    } else {
        stripped.to_owned()
    }
}

/// Convert arbitrary-width hex digits to decimal digits.
///
/// Returns `None` for empty or non-hex input.
fn hex_to_decimal(digits: &str) -> Option<String> {
    if digits.is_empty() {
        return None;
    }
    // Little-endian base-10 digits.
    let mut decimal: Vec<u8> = vec![0];
    for ch in digits.chars() {
        let mut carry = ch.to_digit(16)?;
        for digit in &mut decimal {
            let value = u32::from(*digit) * 16 + carry;
            *digit = (value % 10) as u8;
            carry = value / 10;
        }
        while carry > 0 {
            decimal.push((carry % 10) as u8);
            carry /= 10;
        }
    }
    Some(
        decimal
            .iter()
            .rev()
            .map(|d| char::from(b'0' + d))
            .collect(),
    )
}

impl FromStr for TokenId {
    type Err = TokenIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for TokenId {
    type Error = TokenIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<TokenId> for String {
    fn from(value: TokenId) -> Self {
        value.0
    }
}

impl std::fmt::Display for TokenId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Display metadata for one token.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenMetadata {
    /// Image URL, if the metadata document names one.
    pub image_url: Option<String>,
    /// Display name.
    pub name: Option<String>,
    /// Free-form description.
    pub description: Option<String>,
}

/// A token owned by the queried wallet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnedToken {
    /// Token identifier.
    pub token_id: TokenId,
    /// Image URL. Absent until enriched when the provider omits it.
    pub image_url: Option<String>,
    /// Display name.
    pub name: Option<String>,
    /// Free-form description.
    pub description: Option<String>,
}

impl OwnedToken {
    /// A token with no display metadata yet.
    pub fn bare(token_id: TokenId) -> Self {
        Self {
            token_id,
            image_url: None,
            name: None,
            description: None,
        }
    }

    /// Attach an image URL, ignoring blank values.
    pub fn with_image(mut self, image_url: Option<String>) -> Self {
        self.image_url = image_url.filter(|url| !url.trim().is_empty());
        self
    }

    /// Merge metadata over this token, keeping existing values the metadata
    /// leaves unset.
    pub fn with_metadata(mut self, metadata: TokenMetadata) -> Self {
        let TokenMetadata {
            image_url,
            name,
            description,
        } = metadata;
        if let Some(url) = image_url.filter(|url| !url.trim().is_empty()) {
            self.image_url = Some(url);
        }
        self.name = name.or(self.name);
        self.description = description.or(self.description);
        self
    }
}

/// Tokens of the configured collection owned by one wallet.
///
/// ## Invariants
/// - `total_count >= tokens.len()`.
/// - Token identifiers are unique.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnershipResult {
    tokens: Vec<OwnedToken>,
    total_count: u64,
}

impl OwnershipResult {
    /// Nothing owned.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A complete listing; the count is the number of distinct tokens.
    pub fn from_tokens(tokens: Vec<OwnedToken>) -> Self {
        let tokens = dedupe_tokens(tokens);
        let total_count = tokens.len() as u64;
        Self {
            tokens,
            total_count,
        }
    }

    /// A balance without a listing.
    pub fn count_only(total_count: u64) -> Self {
        Self {
            tokens: Vec::new(),
            total_count,
        }
    }

    /// A partial listing with a provider-reported total. The total is raised
    /// to the listing length when the provider under-reports it.
    pub fn with_total(tokens: Vec<OwnedToken>, total_count: u64) -> Self {
        let tokens = dedupe_tokens(tokens);
        let total_count = total_count.max(tokens.len() as u64);
        Self {
            tokens,
            total_count,
        }
    }

    /// Listed tokens.
    pub fn tokens(&self) -> &[OwnedToken] {
        &self.tokens
    }

    /// Number of tokens owned.
    pub fn total_count(&self) -> u64 {
        self.total_count
    }

    /// Whether nothing is owned.
    pub fn is_empty(&self) -> bool {
        self.total_count == 0
    }

    /// Whether the listing covers every owned token.
    pub fn is_complete(&self) -> bool {
        self.tokens.len() as u64 == self.total_count
    }
}

fn dedupe_tokens(tokens: Vec<OwnedToken>) -> Vec<OwnedToken> {
    let mut seen = HashSet::with_capacity(tokens.len());
    tokens
        .into_iter()
        .filter(|token| seen.insert(token.token_id.clone()))
        .collect()
}
