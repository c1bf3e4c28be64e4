//! Response storage on a Redis server.

use async_trait::async_trait;
use bytes::Bytes;
use redis::{Client, aio::ConnectionManager};
use stash_backend::{
    Backend, BackendError, BackendResult, CacheBackend, CacheKeyFormat, DeleteStatus, ValueFormat,
};
use stash_core::{CacheKey, Raw};
use tokio::sync::OnceCell;
use tracing::trace;

use crate::error::Error;

/// Stores cached responses on a Redis server.
///
/// Every operation is a single `GET`, `SET` or `DEL` command sent through a
/// shared [`ConnectionManager`], which is opened on first use rather than in
/// [`RedisBackendBuilder::build`].
///
/// [`ConnectionManager`]: redis::aio::ConnectionManager
#[derive(Clone)]
pub struct RedisBackend {
    client: Client,
    connection: OnceCell<ConnectionManager>,
    value_format: ValueFormat,
    key_format: CacheKeyFormat,
    name: String,
}

impl std::fmt::Debug for RedisBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisBackend")
            .field("name", &self.name)
            .field("connected", &self.connection.initialized())
            .field("value_format", &self.value_format)
            .field("key_format", &self.key_format)
            .finish()
    }
}

impl RedisBackend {
    /// Backend for `redis://127.0.0.1/` with the default formats.
    ///
    /// # Examples
    /// ```
    /// use stash_redis::RedisBackend;
    ///
    /// let backend = RedisBackend::new().unwrap();
    /// ```
    pub fn new() -> Result<Self, BackendError> {
        Ok(Self::builder().build()?)
    }

    /// Starts a [`RedisBackendBuilder`].
    #[must_use]
    pub fn builder() -> RedisBackendBuilder {
        RedisBackendBuilder::default()
    }

    /// Lazily opens the shared [`ConnectionManager`].
    pub async fn connection(&self) -> Result<&ConnectionManager, BackendError> {
        let manager = self
            .connection
            .get_or_try_init(|| {
                trace!(backend = %self.name, "initialize redis connection manager");
                self.client.get_connection_manager()
            })
            .await
            .map_err(Error::from)?;
        Ok(manager)
    }
}

/// Configures a [`RedisBackend`].
#[derive(Debug, Clone)]
pub struct RedisBackendBuilder {
    connection_info: String,
    value_format: ValueFormat,
    key_format: CacheKeyFormat,
    name: String,
}

impl Default for RedisBackendBuilder {
    fn default() -> Self {
        Self {
            connection_info: "redis://127.0.0.1/".to_owned(),
            value_format: ValueFormat::Bincode,
            key_format: CacheKeyFormat::default(),
            name: "redis".to_owned(),
        }
    }
}

impl RedisBackendBuilder {
    /// Redis URL, e.g. `redis://host:6379/2`.
    pub fn server(mut self, connection_info: impl Into<String>) -> Self {
        self.connection_info = connection_info.into();
        self
    }

    /// Set value serialization format. Defaults to bincode.
    pub fn value_format(mut self, value_format: ValueFormat) -> Self {
        self.value_format = value_format;
        self
    }

    /// Set key serialization format.
    pub fn key_format(mut self, key_format: CacheKeyFormat) -> Self {
        self.key_format = key_format;
        self
    }

    /// Set a custom name for this backend, used in logs.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Validates the URL. No connection is made yet.
    pub fn build(self) -> Result<RedisBackend, Error> {
        Ok(RedisBackend {
            client: Client::open(self.connection_info)?,
            connection: OnceCell::new(),
            value_format: self.value_format,
            key_format: self.key_format,
            name: self.name,
        })
    }
}

#[async_trait]
impl Backend for RedisBackend {
    async fn read(&self, key: &CacheKey) -> BackendResult<Option<Raw>> {
        let mut con = self.connection().await?.clone();
        let cache_key = self.key_format.serialize(key)?;

        let data: Option<Vec<u8>> = redis::cmd("GET")
            .arg(&cache_key)
            .query_async(&mut con)
            .await
            .map_err(Error::from)?;

        Ok(data.map(Bytes::from))
    }

    async fn write(&self, key: &CacheKey, value: Raw) -> BackendResult<()> {
        let mut con = self.connection().await?.clone();
        let cache_key = self.key_format.serialize(key)?;

        redis::cmd("SET")
            .arg(&cache_key)
            .arg(value.as_ref())
            .query_async::<()>(&mut con)
            .await
            .map_err(Error::from)?;
        Ok(())
    }

    async fn remove(&self, key: &CacheKey) -> BackendResult<DeleteStatus> {
        let mut con = self.connection().await?.clone();
        let cache_key = self.key_format.serialize(key)?;

        let deleted: u32 = redis::cmd("DEL")
            .arg(cache_key)
            .query_async(&mut con)
            .await
            .map_err(Error::from)?;

        if deleted > 0 {
            Ok(DeleteStatus::Deleted(deleted))
        } else {
            Ok(DeleteStatus::Missing)
        }
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn value_format(&self) -> &ValueFormat {
        &self.value_format
    }

    fn key_format(&self) -> &CacheKeyFormat {
        &self.key_format
    }
}

impl CacheBackend for RedisBackend {}
