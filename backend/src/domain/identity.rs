//! Social identities accepted as input for wallet resolution.

use std::str::FromStr;

use thiserror::Error;

use super::EvmAddress;

/// Identity supplied by the user pressing a frame button.
///
/// # Examples
/// ```
/// use nft_frames::domain::Identity;
///
/// assert_eq!("123".parse::<Identity>().expect("valid"), Identity::SocialId(123));
/// assert_eq!(
///     "@dwr".parse::<Identity>().expect("valid").social_graph_key(),
///     "fc_fname:dwr"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Identity {
    /// Numeric social-platform user identifier.
    SocialId(u64),
    /// A wallet address typed directly.
    Address(EvmAddress),
    /// An ENS name such as `vitalik.eth`.
    Ens(String),
    /// A social-platform username, without the leading `@`.
    Handle(String),
}

/// Errors raised when parsing an [`Identity`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentityError {
    /// Input is blank.
    #[error("identity must not be empty")]
    Empty,
    /// Numeric input does not fit a social identifier.
    #[error("social id '{0}' is out of range")]
    SocialIdOutOfRange(String),
    /// Input contains whitespace inside the value.
    #[error("identity '{0}' must not contain whitespace")]
    ContainsWhitespace(String),
}

impl Identity {
    /// Parse free-form input.
    pub fn parse(raw: &str) -> Result<Self, IdentityError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(IdentityError::Empty);
        }
        if trimmed.chars().any(char::is_whitespace) {
            return Err(IdentityError::ContainsWhitespace(trimmed.to_owned()));
        }
        if trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return trimmed
                .parse()
                .map(Self::SocialId)
                .map_err(|_| IdentityError::SocialIdOutOfRange(trimmed.to_owned()));
        }
        if let Ok(address) = EvmAddress::parse(trimmed) {
            return Ok(Self::Address(address));
        }
        let lowered = trimmed.to_ascii_lowercase();
        if lowered.ends_with(".eth") {
            return Ok(Self::Ens(lowered));
        }
        let handle = lowered.trim_start_matches('@');
        if handle.is_empty() {
            return Err(IdentityError::Empty);
        }
        Ok(Self::Handle(handle.to_owned()))
    }

    /// Key understood by the social-graph service.
    pub fn social_graph_key(&self) -> String {
        match self {
            Self::SocialId(id) => format!("fc_fid:{id}"),
            Self::Address(address) => address.to_string(),
            Self::Ens(name) => name.clone(),
            Self::Handle(handle) => format!("fc_fname:{handle}"),
        }
    }
}

impl FromStr for Identity {
    type Err = IdentityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl std::fmt::Display for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SocialId(id) => write!(f, "{id}"),
            Self::Address(address) => write!(f, "{address}"),
            Self::Ens(name) => f.write_str(name),
            Self::Handle(handle) => write!(f, "@{handle}"),
        }
    }
}
