//! YAML configuration.
//!
//! ```yaml
//! key:
//!   prefix: api
//!   version: 1
//!   headers: [accept-language]
//!   body: false
//! replay:
//!   unsafe_headers: [set-cookie, set-cookie2]
//! backend:
//!   type: Moka
//!   max_capacity: 10000
//!   value_format: Json
//! ```
//!
//! Every section is optional. Without `key.headers` and `key.body` the
//! fingerprint is method plus normalized URL.

use std::sync::Arc;

use http::HeaderName;
use serde::{Deserialize, Serialize};
use stash_backend::{Backend as BackendTrait, CacheKeyFormat, ValueFormat};
use stash_http::ReplayFilter;
use stash_http::extractors::{BodyExtractor, BoxExtractor, HeaderExtractor, default_fingerprint};

use crate::error::ConfigError;
use crate::storage::CacheStorage;

/// Backend shared behind a trait object, as built from configuration.
pub type DynBackend = Arc<dyn BackendTrait + Send + 'static>;

/// Root of the YAML configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct StashConfig {
    #[serde(default)]
    pub key: KeyConfig,
    #[serde(default)]
    pub replay: ReplayConfig,
    #[serde(default)]
    pub backend: Backend,
}

/// Fingerprint settings.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct KeyConfig {
    #[serde(default)]
    pub prefix: String,
    #[serde(default)]
    pub version: u32,
    /// Request headers added to the fingerprint, in order.
    #[serde(default)]
    pub headers: Vec<String>,
    /// Hash the request body into the fingerprint.
    #[serde(default)]
    pub body: bool,
}

/// Headers stripped from responses served from cache.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ReplayConfig {
    pub unsafe_headers: Vec<String>,
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            unsafe_headers: ReplayFilter::default()
                .headers()
                .iter()
                .map(|name| name.as_str().to_owned())
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
pub enum ValueSerialization {
    #[default]
    Json,
    Bincode,
}

impl ValueSerialization {
    pub fn to_value_format(self) -> ValueFormat {
        match self {
            ValueSerialization::Json => ValueFormat::Json,
            ValueSerialization::Bincode => ValueFormat::Bincode,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
pub enum KeySerialization {
    #[default]
    Bitcode,
    UrlEncoded,
}

impl KeySerialization {
    pub fn to_cache_key_format(self) -> CacheKeyFormat {
        match self {
            KeySerialization::Bitcode => CacheKeyFormat::Bitcode,
            KeySerialization::UrlEncoded => CacheKeyFormat::UrlEncoded,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct Moka {
    pub max_capacity: u64,
    #[serde(default)]
    pub value_format: ValueSerialization,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct Redis {
    pub connection_string: String,
    #[serde(default)]
    pub key_format: KeySerialization,
    #[serde(default = "Redis::default_value_format")]
    pub value_format: ValueSerialization,
}

impl Redis {
    fn default_value_format() -> ValueSerialization {
        ValueSerialization::Bincode
    }
}

/// Storage backend selection.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum Backend {
    Moka(Moka),
    Redis(Redis),
}

impl Default for Backend {
    fn default() -> Self {
        Backend::Moka(Moka {
            max_capacity: 10_000,
            value_format: ValueSerialization::default(),
        })
    }
}

impl Backend {
    pub fn into_backend(self) -> Result<DynBackend, ConfigError> {
        match self {
            #[cfg(feature = "moka")]
            Backend::Moka(config) => {
                use stash_moka::MokaBackend;

                let backend = MokaBackend::builder(config.max_capacity)
                    .value_format(config.value_format.to_value_format())
                    .build();
                Ok(Arc::new(backend))
            }
            #[cfg(not(feature = "moka"))]
            Backend::Moka(_) => Err(ConfigError::BackendNotAvailable("Moka".to_string())),
            #[cfg(feature = "redis")]
            Backend::Redis(config) => {
                use stash_redis::RedisBackend;

                let backend = RedisBackend::builder()
                    .server(config.connection_string)
                    .key_format(config.key_format.to_cache_key_format())
                    .value_format(config.value_format.to_value_format())
                    .build()
                    .map_err(|e| ConfigError::BackendNotAvailable(format!("Redis: {}", e)))?;
                Ok(Arc::new(backend))
            }
            #[cfg(not(feature = "redis"))]
            Backend::Redis(_) => Err(ConfigError::BackendNotAvailable("Redis".to_string())),
        }
    }
}

fn header_name(name: &str) -> Result<HeaderName, ConfigError> {
    HeaderName::from_bytes(name.as_bytes()).map_err(|source| ConfigError::InvalidHeader {
        name: name.to_owned(),
        source,
    })
}

impl StashConfig {
    /// Parses a YAML document.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        serde_saphyr::from_str(yaml).map_err(|e| ConfigError::Yaml(e.to_string()))
    }

    /// Builds the fingerprint chain: method, normalized URL, then the
    /// configured headers and the body hash.
    pub fn extractor(&self) -> Result<BoxExtractor, ConfigError> {
        let mut extractor: BoxExtractor = Box::new(default_fingerprint());
        for name in &self.key.headers {
            extractor = Box::new(extractor.header(header_name(name)?));
        }
        if self.key.body {
            extractor = Box::new(extractor.body());
        }
        Ok(extractor)
    }

    pub fn replay_filter(&self) -> Result<ReplayFilter, ConfigError> {
        let headers = self
            .replay
            .unsafe_headers
            .iter()
            .map(|name| header_name(name))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ReplayFilter::new(headers))
    }

    /// Builds the backend and the storage on top of it.
    pub fn storage(&self) -> Result<CacheStorage<DynBackend, BoxExtractor>, ConfigError> {
        let backend = self.backend.clone().into_backend()?;
        Ok(CacheStorage::new(backend)
            .with_extractor(self.extractor()?)
            .with_prefix(self.key.prefix.clone())
            .with_version(self.key.version))
    }
}

#[cfg(test)]
mod tests {
    use http::Method;
    use stash_core::Extractor;
    use stash_http::RequestContext;

    use super::*;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = StashConfig::from_yaml("{}").unwrap();
        assert_eq!(config, StashConfig::default());
        assert_eq!(config.replay_filter().unwrap(), ReplayFilter::default());
    }

    #[test]
    fn test_full_document() {
        let yaml = r#"
key:
  prefix: api
  version: 2
  headers: [Accept-Language]
  body: true
replay:
  unsafe_headers: [set-cookie, x-session]
backend:
  type: Redis
  connection_string: "redis://127.0.0.1:6379/1"
  key_format: UrlEncoded
"#;
        let config = StashConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.key.prefix, "api");
        assert_eq!(config.key.version, 2);
        assert!(config.key.body);
        assert_eq!(
            config.backend,
            Backend::Redis(Redis {
                connection_string: "redis://127.0.0.1:6379/1".to_owned(),
                key_format: KeySerialization::UrlEncoded,
                value_format: ValueSerialization::Bincode,
            })
        );

        let filter = config.replay_filter().unwrap();
        assert!(filter.is_unsafe(&HeaderName::from_static("x-session")));
        assert!(!filter.is_unsafe(&HeaderName::from_static("set-cookie2")));

        let request = RequestContext::new(Method::GET, "http://example.com/".parse().unwrap());
        let key = config.extractor().unwrap().get(&request).into_cache_key("", 0);
        let names: Vec<_> = key.parts().map(|part| part.key().to_owned()).collect();
        assert_eq!(names, ["method", "url", "header:accept-language", "body"]);
    }

    #[test]
    fn test_invalid_header_is_reported() {
        let yaml = "key:\n  headers: [\"bad header\"]\n";
        let config = StashConfig::from_yaml(yaml).unwrap();
        assert!(matches!(
            config.extractor(),
            Err(ConfigError::InvalidHeader { name, .. }) if name == "bad header"
        ));
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        assert!(matches!(
            StashConfig::from_yaml("cache_everything: true\n"),
            Err(ConfigError::Yaml(_))
        ));
    }

    #[cfg(feature = "moka")]
    #[test]
    fn test_storage_from_config() {
        let config = StashConfig::from_yaml("key:\n  prefix: demo\n  version: 3\n").unwrap();
        let storage = config.storage().unwrap();
        assert_eq!(storage.backend().name(), "moka");
        let request = RequestContext::new(Method::GET, "http://example.com/".parse().unwrap());
        assert_eq!(
            storage.fingerprint(&request).to_string(),
            "demo:v3:method=GET&url=http://example.com/"
        );
    }
}
