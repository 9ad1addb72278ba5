//! EVM account addresses.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

const ADDRESS_BYTES: usize = 20;

/// A 20-byte EVM address held in lowercase `0x`-prefixed hex.
///
/// Parsing accepts any letter case, so two spellings of the same address
/// (checksummed or not) compare equal once parsed.
///
/// # Examples
/// ```
/// use nft_frames::domain::EvmAddress;
///
/// let a: EvmAddress = "0xd652Eeb3431f1113312E5c763CE1d0846Aa4d7BC".parse().expect("valid");
/// let b: EvmAddress = "0xd652eeb3431f1113312e5c763ce1d0846aa4d7bc".parse().expect("valid");
/// assert_eq!(a, b);
/// assert_eq!(a.as_str(), "0xd652eeb3431f1113312e5c763ce1d0846aa4d7bc");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EvmAddress(String);

/// Wallet that may own tokens.
pub type WalletAddress = EvmAddress;

/// Token collection contract.
pub type ContractAddress = EvmAddress;

/// Validation errors raised when parsing an [`EvmAddress`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    /// Input is blank.
    #[error("address must not be empty")]
    Empty,
    /// Input lacks the `0x` prefix.
    #[error("address must start with 0x")]
    MissingPrefix,
    /// Input has the wrong number of hex digits.
    #[error("address must have 40 hex digits, got {length}")]
    InvalidLength { length: usize },
    /// Input contains non-hex characters.
    #[error("address contains non-hex characters")]
    InvalidHex,
}

impl EvmAddress {
    /// Parse and normalise an address.
    pub fn parse(raw: &str) -> Result<Self, AddressError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(AddressError::Empty);
        }
        let digits = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .ok_or(AddressError::MissingPrefix)?;
        if digits.len() != ADDRESS_BYTES * 2 {
            return Err(AddressError::InvalidLength {
                length: digits.len(),
            });
        }
        let bytes = hex::decode(digits).map_err(|_| AddressError::InvalidHex)?;
        Ok(Self(format!("0x{}", hex::encode(bytes))))
    }

    /// Whether `raw` parses as an address.
    pub fn is_valid(raw: &str) -> bool {
        Self::parse(raw).is_ok()
    }

    /// Lowercase `0x`-prefixed form.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// The 40 hex digits without the prefix.
    pub fn hex_digits(&self) -> &str {
        self.0.trim_start_matches("0x")
    }

    /// Whether `other` names the same address, ignoring case.
    pub fn matches(&self, other: &str) -> bool {
        other.trim().eq_ignore_ascii_case(self.as_str())
    }
}

impl FromStr for EvmAddress {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for EvmAddress {
    type Error = AddressError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<EvmAddress> for String {
    fn from(value: EvmAddress) -> Self {
        value.0
    }
}

impl AsRef<str> for EvmAddress {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl std::fmt::Display for EvmAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", AddressError::Empty)]
    #[case("   ", AddressError::Empty)]
    #[case("d652eeb3431f1113312e5c763ce1d0846aa4d7bc", AddressError::MissingPrefix)]
    #[case("0xd652", AddressError::InvalidLength { length: 4 })]
    #[case("0xz652eeb3431f1113312e5c763ce1d0846aa4d7bc", AddressError::InvalidHex)]
    fn rejects_malformed_addresses(#[case] raw: &str, #[case] expected: AddressError) {
        assert_eq!(EvmAddress::parse(raw), Err(expected));
    }

    #[rstest]
    fn normalises_case_and_whitespace() {
        let address =
            EvmAddress::parse(" 0XD652EEB3431F1113312E5C763CE1D0846AA4D7BC ").expect("valid");
        assert_eq!(address.as_str(), "0xd652eeb3431f1113312e5c763ce1d0846aa4d7bc");
        assert_eq!(address.hex_digits().len(), 40);
    }

    #[rstest]
    fn matches_ignores_case() {
        let address = EvmAddress::parse("0xd652eeb3431f1113312e5c763ce1d0846aa4d7bc").expect("valid");
        assert!(address.matches("0xD652Eeb3431f1113312E5c763CE1d0846Aa4d7BC"));
        assert!(!address.matches("0x0000000000000000000000000000000000000000"));
    }

    #[rstest]
    fn deserialises_through_validation() {
        let parsed: Result<EvmAddress, _> = serde_json::from_str("\"0x12\"");
        assert!(parsed.is_err());
    }
}
