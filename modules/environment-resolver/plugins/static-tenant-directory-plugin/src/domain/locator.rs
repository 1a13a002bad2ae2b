//! Fixed-URL cluster locator.

use async_trait::async_trait;
use environment_resolver_sdk::{ClusterLocator, ClusterLocatorError};

use crate::config::StaticTenantDirectoryPluginConfig;

/// Cluster locator returning the configured `cluster_url`.
#[derive(Debug, Clone)]
pub struct StaticClusterLocator {
    url: String,
}

impl StaticClusterLocator {
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    #[must_use]
    pub fn from_config(cfg: &StaticTenantDirectoryPluginConfig) -> Self {
        Self::new(cfg.cluster_url.clone())
    }
}

#[async_trait]
impl ClusterLocator for StaticClusterLocator {
    async fn url(&self) -> Result<String, ClusterLocatorError> {
        if self.url.is_empty() {
            return Err(ClusterLocatorError::NotConfigured);
        }
        Ok(self.url.clone())
    }
}
