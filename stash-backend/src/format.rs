//! Value serialization formats.
//!
//! A cached response is serialized completely before it is handed to the
//! backend, so a backend only ever sees whole values.

use bincode::config::{Configuration, standard};
use bytes::Bytes;
use serde::{Serialize, de::DeserializeOwned};
use stash_core::Raw;
use thiserror::Error;

/// Error produced while encoding or decoding cached values.
#[derive(Error, Debug)]
pub enum FormatError {
    /// The value could not be encoded.
    #[error(transparent)]
    Serialize(Box<dyn std::error::Error + Send + Sync>),

    /// The stored bytes could not be decoded.
    #[error(transparent)]
    Deserialize(Box<dyn std::error::Error + Send + Sync>),
}

/// Serialization format for cache values.
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValueFormat {
    /// JSON via `serde_json`. Human readable, the default.
    #[default]
    Json,
    /// Compact binary encoding via `bincode`.
    Bincode,
}

const BINCODE: Configuration = standard();

impl ValueFormat {
    /// Encode `value` into a complete byte buffer.
    pub fn serialize<T>(&self, value: &T) -> Result<Raw, FormatError>
    where
        T: Serialize + ?Sized,
    {
        let buf = match self {
            ValueFormat::Json => {
                serde_json::to_vec(value).map_err(|err| FormatError::Serialize(Box::new(err)))?
            }
            ValueFormat::Bincode => bincode::serde::encode_to_vec(value, BINCODE)
                .map_err(|err| FormatError::Serialize(Box::new(err)))?,
        };
        Ok(Bytes::from(buf))
    }

    /// Decode a value previously produced by [`serialize`](Self::serialize).
    ///
    /// Trailing bytes are rejected: a truncated or concatenated buffer is a
    /// corrupted entry, not a valid one.
    pub fn deserialize<T>(&self, data: &[u8]) -> Result<T, FormatError>
    where
        T: DeserializeOwned,
    {
        match self {
            ValueFormat::Json => {
                serde_json::from_slice(data).map_err(|err| FormatError::Deserialize(Box::new(err)))
            }
            ValueFormat::Bincode => {
                let (value, read) = bincode::serde::decode_from_slice(data, BINCODE)
                    .map_err(|err| FormatError::Deserialize(Box::new(err)))?;
                if read != data.len() {
                    return Err(FormatError::Deserialize(
                        format!("{} trailing bytes after value", data.len() - read).into(),
                    ));
                }
                Ok(value)
            }
        }
    }
}
