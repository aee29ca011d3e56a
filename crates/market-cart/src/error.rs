//! Cart store error types.

use market_kv::KvError;
use thiserror::Error;

/// Errors returned to callers of the cart store.
#[derive(Error, Debug)]
pub enum CartError {
    /// The cart was looked up outside of a [`crate::CartProvider`] scope.
    #[error("use_cart must be used within a CartProvider")]
    MissingProvider,

    /// The backing store could not be opened.
    #[error("Storage error: {0}")]
    Storage(#[from] KvError),
}

/// A failed read or write of the persisted cart.
///
/// Carried in [`crate::PersistStatus`] and handed to the error handler, so it
/// only keeps the rendered cause.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PersistError {
    /// Reading the stored cart failed.
    #[error("Failed to read {key}: {message}")]
    Read { key: String, message: String },

    /// The stored cart exists but is not a list of cart items.
    #[error("Stored cart under {key} is unreadable: {message}")]
    Decode { key: String, message: String },

    /// The cart could not be encoded.
    #[error("Failed to encode cart: {message}")]
    Encode { message: String },

    /// Writing the cart failed.
    #[error("Failed to write {key}: {message}")]
    Write { key: String, message: String },

    /// The background writer is no longer running.
    #[error("Persistence writer has stopped")]
    WriterClosed,
}

impl PersistError {
    pub(crate) fn from_read(key: &str, err: KvError) -> Self {
        match err {
            KvError::SerializeError(e) => PersistError::Decode {
                key: key.to_string(),
                message: e.to_string(),
            },
            other => PersistError::Read {
                key: key.to_string(),
                message: other.to_string(),
            },
        }
    }

    pub(crate) fn from_write(key: &str, err: KvError) -> Self {
        match err {
            KvError::SerializeError(e) => PersistError::Encode {
                message: e.to_string(),
            },
            other => PersistError::Write {
                key: key.to_string(),
                message: other.to_string(),
            },
        }
    }
}
