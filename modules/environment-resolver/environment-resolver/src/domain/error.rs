//! Domain errors for the environment resolver.

use std::time::Duration;

use environment_resolver_sdk::{
    ClusterLocatorError, EnvironmentResolverError, TenantDirectoryError,
};

/// Internal domain errors.
#[derive(thiserror::Error, Debug)]
pub enum DomainError {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("service account token acquisition failed: {0}")]
    TokenAcquisition(String),

    #[error("delegated strategy selected for '{user_id}' but no service account token is configured")]
    ServiceAccountTokenMissing { user_id: String },

    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("cannot start a workspace: cluster is out of capacity for namespace '{namespace}'")]
    CapacityExhausted { namespace: String },

    #[error("tenant directory lookup failed: {0}")]
    TenantDirectory(#[from] TenantDirectoryError),

    #[error("cluster locator failed: {0}")]
    ClusterLocator(#[from] ClusterLocatorError),

    #[error("{operation} timed out after {}ms", .timeout.as_millis())]
    Timeout {
        operation: &'static str,
        timeout: Duration,
    },

    #[error("invalid tenant data: {0}")]
    InvalidTenantData(String),
}

impl DomainError {
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized(message.into())
    }
}

impl From<DomainError> for EnvironmentResolverError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::Configuration(msg) => Self::Configuration(msg),
            DomainError::TokenAcquisition(_) | DomainError::ServiceAccountTokenMissing { .. } => {
                Self::Configuration(e.to_string())
            }
            DomainError::Unauthorized(msg) => Self::Unauthorized(msg),
            DomainError::CapacityExhausted { namespace } => Self::CapacityExhausted { namespace },
            DomainError::TenantDirectory(_)
            | DomainError::ClusterLocator(_)
            | DomainError::Timeout { .. }
            | DomainError::InvalidTenantData(_) => Self::Infrastructure(e.to_string()),
        }
    }
}
