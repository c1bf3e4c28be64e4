//! Builder for configuring [`MokaBackend`].

use moka::future::CacheBuilder;
use moka::policy::EvictionPolicy;
use stash_backend::ValueFormat;
use tracing::debug;

use crate::backend::MokaBackend;

/// Builder for [`MokaBackend`]. Created by [`MokaBackend::builder`].
#[derive(Debug, Clone)]
pub struct MokaBackendBuilder {
    max_capacity: u64,
    value_format: ValueFormat,
    eviction_policy: Option<EvictionPolicy>,
    name: String,
}

impl MokaBackendBuilder {
    pub(crate) fn new(max_capacity: u64) -> Self {
        Self {
            max_capacity,
            value_format: ValueFormat::default(),
            eviction_policy: None,
            name: "moka".to_owned(),
        }
    }

    /// Sets the value serialization format. Defaults to JSON.
    pub fn value_format(mut self, format: ValueFormat) -> Self {
        self.value_format = format;
        self
    }

    /// Sets Moka's eviction policy. Defaults to TinyLFU.
    pub fn eviction_policy(mut self, policy: EvictionPolicy) -> Self {
        self.eviction_policy = Some(policy);
        self
    }

    /// Sets the name reported in logs and errors. Defaults to `moka`.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Builds the backend.
    pub fn build(self) -> MokaBackend {
        let mut builder = CacheBuilder::new(self.max_capacity);
        if let Some(policy) = self.eviction_policy {
            builder = builder.eviction_policy(policy);
        }
        debug!(
            name = %self.name,
            max_capacity = self.max_capacity,
            "building moka backend"
        );
        MokaBackend {
            cache: builder.build(),
            value_format: self.value_format,
            name: self.name,
        }
    }
}
