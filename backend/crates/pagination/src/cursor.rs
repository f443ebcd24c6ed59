//! Opaque cursor encoding.
//!
//! A cursor wraps the sort key of the last row a client has seen. The key is
//! serialised as JSON and encoded with URL-safe base64 without padding so the
//! token can travel in query strings untouched.

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Errors raised while encoding or decoding cursors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CursorError {
    /// The token is not valid URL-safe base64.
    #[error("cursor is not valid base64: {message}")]
    Encoding {
        /// Decoder failure description.
        message: String,
    },
    /// The decoded payload does not match the expected key shape.
    #[error("cursor payload is malformed: {message}")]
    Payload {
        /// Deserialiser failure description.
        message: String,
    },
    /// The key could not be serialised.
    #[error("cursor key could not be serialised: {message}")]
    Serialize {
        /// Serialiser failure description.
        message: String,
    },
}

/// Opaque keyset cursor wrapping a sort key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cursor<K> {
    key: K,
}

impl<K> Cursor<K> {
    /// Wrap a sort key.
    #[must_use]
    pub const fn new(key: K) -> Self {
        Self { key }
    }

    /// Borrow the wrapped sort key.
    #[must_use]
    pub const fn key(&self) -> &K {
        &self.key
    }

    /// Consume the cursor and return the sort key.
    #[must_use]
    pub fn into_key(self) -> K {
        self.key
    }
}

impl<K: Serialize> Cursor<K> {
    /// Encode the cursor as an opaque token.
    ///
    /// # Errors
    ///
    /// Returns [`CursorError::Serialize`] when the key cannot be serialised.
    pub fn encode(&self) -> Result<String, CursorError> {
        let payload = serde_json::to_vec(&self.key).map_err(|err| CursorError::Serialize {
            message: err.to_string(),
        })?;
        Ok(URL_SAFE_NO_PAD.encode(payload))
    }
}

impl<K: DeserializeOwned> Cursor<K> {
    /// Decode an opaque token produced by [`Cursor::encode`].
    ///
    /// # Errors
    ///
    /// Returns [`CursorError::Encoding`] for invalid base64 and
    /// [`CursorError::Payload`] when the JSON does not match `K`.
    pub fn decode(token: &str) -> Result<Self, CursorError> {
        let bytes = URL_SAFE_NO_PAD
            .decode(token.trim())
            .map_err(|err| CursorError::Encoding {
                message: err.to_string(),
            })?;
        let key = serde_json::from_slice(&bytes).map_err(|err| CursorError::Payload {
            message: err.to_string(),
        })?;
        Ok(Self { key })
    }
}
