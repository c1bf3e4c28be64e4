//! Byte encodings of [`CacheKey`] for backends addressed by byte strings.
//!
//! [`Bitcode`](CacheKeyFormat::Bitcode) is compact and the default.
//! [`UrlEncoded`](CacheKeyFormat::UrlEncoded) is readable in `redis-cli`:
//!
//! ```text
//! _prefix=api&_version=1&method=GET&header:accept&header:x-tenant=
//! ```
//!
//! A part without `=` has no value (`header:accept` above was absent from
//! the request); `name=` is a present but empty value. Both formats decode
//! back to an equal key.

use std::str::from_utf8;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};
use stash_core::{CacheKey, KeyPart};

use crate::format::FormatError;

const PREFIX_NAME: &str = "_prefix";
const VERSION_NAME: &str = "_version";

/// Characters kept verbatim in readable keys. `:` keeps part names such as
/// `header:accept` legible.
const READABLE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'*')
    .remove(b':');

/// Cache key serialization format.
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
pub enum CacheKeyFormat {
    /// Compact binary format using bitcode.
    #[default]
    Bitcode,

    /// `&`-separated, percent-encoded `name=value` segments.
    UrlEncoded,
}

impl CacheKeyFormat {
    /// Serialize a cache key to bytes.
    pub fn serialize(&self, key: &CacheKey) -> Result<Vec<u8>, FormatError> {
        match self {
            CacheKeyFormat::Bitcode => {
                bitcode::serialize(key).map_err(|err| FormatError::Serialize(Box::new(err)))
            }
            CacheKeyFormat::UrlEncoded => Ok(readable_key(key).into_bytes()),
        }
    }

    /// Deserialize bytes back to a cache key.
    pub fn deserialize(&self, data: &[u8]) -> Result<CacheKey, FormatError> {
        match self {
            CacheKeyFormat::Bitcode => {
                bitcode::deserialize(data).map_err(|err| FormatError::Deserialize(Box::new(err)))
            }
            CacheKeyFormat::UrlEncoded => {
                let text = from_utf8(data).map_err(|err| FormatError::Deserialize(Box::new(err)))?;
                parse_readable_key(text)
            }
        }
    }
}

fn push_segment(out: &mut String, name: &str, value: Option<&str>) {
    if !out.is_empty() {
        out.push('&');
    }
    out.extend(utf8_percent_encode(name, READABLE));
    if let Some(value) = value {
        out.push('=');
        out.extend(utf8_percent_encode(value, READABLE));
    }
}

fn readable_key(key: &CacheKey) -> String {
    let mut out = String::new();
    push_segment(&mut out, PREFIX_NAME, Some(key.prefix()));
    push_segment(&mut out, VERSION_NAME, Some(&key.version().to_string()));
    for part in key.parts() {
        push_segment(&mut out, part.key(), part.value());
    }
    out
}

fn decode(component: &str) -> Result<String, FormatError> {
    percent_decode_str(component)
        .decode_utf8()
        .map(|text| text.into_owned())
        .map_err(|err| FormatError::Deserialize(Box::new(err)))
}

fn parse_readable_key(text: &str) -> Result<CacheKey, FormatError> {
    let mut prefix = String::new();
    let mut version = 0u32;
    let mut parts = Vec::new();

    for segment in text.split('&').filter(|segment| !segment.is_empty()) {
        let (name, value) = match segment.split_once('=') {
            Some((name, value)) => (decode(name)?, Some(decode(value)?)),
            None => (decode(segment)?, None),
        };
        match (name.as_str(), value) {
            (PREFIX_NAME, Some(value)) => prefix = value,
            (VERSION_NAME, Some(value)) => {
                version = value
                    .parse()
                    .map_err(|err| FormatError::Deserialize(Box::new(err)))?;
            }
            (_, value) => parts.push(KeyPart::new(&name, value)),
        }
    }

    Ok(CacheKey::new(prefix, version, parts))
}
