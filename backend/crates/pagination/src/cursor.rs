//! Opaque cursor codec.
//!
//! A cursor is a serde value serialised to JSON and encoded as URL-safe
//! base64 without padding, so it can travel in a query string untouched.

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Longest encoded cursor accepted by [`Cursor::decode`].
const MAX_ENCODED_LEN: usize = 1024;

/// Errors raised while encoding or decoding cursors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CursorError {
    /// The cursor payload could not be serialised.
    #[error("cursor encoding failed: {message}")]
    Encoding {
        /// Serialiser failure description.
        message: String,
    },
    /// The token is not a cursor produced by [`Cursor::encode`].
    #[error("cursor decoding failed: {message}")]
    Decoding {
        /// Decoder failure description.
        message: String,
    },
}

/// Opaque pagination cursor wrapping a serde payload.
///
/// # Examples
///
/// ```
/// use pagination::Cursor;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Debug, PartialEq, Serialize, Deserialize)]
/// struct Position {
///     page: usize,
/// }
///
/// let token = Cursor::new(Position { page: 3 }).encode().expect("encodes");
/// let decoded = Cursor::<Position>::decode(&token).expect("decodes");
/// assert_eq!(decoded.into_inner(), Position { page: 3 });
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cursor<T> {
    value: T,
}

impl<T> Cursor<T> {
    /// Wrap a payload.
    pub const fn new(value: T) -> Self {
        Self { value }
    }

    /// Borrow the payload.
    pub const fn value(&self) -> &T {
        &self.value
    }

    /// Unwrap the payload.
    pub fn into_inner(self) -> T {
        self.value
    }
}

impl<T: Serialize> Cursor<T> {
    /// Encode the payload into an opaque, URL-safe token.
    ///
    /// # Errors
    ///
    /// Returns [`CursorError::Encoding`] when the payload cannot be serialised.
    pub fn encode(&self) -> Result<String, CursorError> {
        let json = serde_json::to_vec(&self.value).map_err(|err| CursorError::Encoding {
            message: err.to_string(),
        })?;
        Ok(URL_SAFE_NO_PAD.encode(json))
    }
}

impl<T: DeserializeOwned> Cursor<T> {
    /// Decode a token produced by [`Cursor::encode`].
    ///
    /// # Errors
    ///
    /// Returns [`CursorError::Decoding`] when the token is oversized, not
    /// base64, or not a JSON document matching `T`.
    pub fn decode(token: &str) -> Result<Self, CursorError> {
        if token.len() > MAX_ENCODED_LEN {
            return Err(CursorError::Decoding {
                message: format!("cursor exceeds {MAX_ENCODED_LEN} characters"),
            });
        }
        let bytes = URL_SAFE_NO_PAD
            .decode(token.trim())
            .map_err(|err| CursorError::Decoding {
                message: err.to_string(),
            })?;
        let value = serde_json::from_slice(&bytes).map_err(|err| CursorError::Decoding {
            message: err.to_string(),
        })?;
        Ok(Self { value })
    }
}
