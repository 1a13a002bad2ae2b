//! Error types for the environment resolver module.

use thiserror::Error;

/// Errors surfaced to callers of [`crate::EnvironmentResolverClient`].
///
/// Each variant is a distinct condition so callers can tell "denied" from
/// "unavailable" from "over capacity".
#[derive(Debug, Error)]
pub enum EnvironmentResolverError {
    /// The resolver is misconfigured (fatal at startup, or a delegated
    /// strategy with no service-account token).
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The subject is absent, anonymous, or lacks what the selected
    /// strategy needs.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// The tenant's cluster has no capacity left. Not retried automatically.
    #[error("cluster capacity exhausted for namespace '{namespace}'")]
    CapacityExhausted { namespace: String },

    /// A collaborator (tenant directory, cluster locator) failed or timed out.
    #[error("infrastructure failure: {0}")]
    Infrastructure(String),
}

/// Errors returned by a [`crate::TenantDirectoryClient`].
#[derive(Debug, Error)]
pub enum TenantDirectoryError {
    #[error("no tenant found for user '{user_id}'")]
    TenantNotFound { user_id: String },

    #[error("unsupported tenant kind '{kind}'")]
    UnsupportedTenantKind { kind: String },

    #[error("subject cannot be looked up: {0}")]
    InvalidSubject(String),

    #[error("tenant directory unavailable: {0}")]
    Unavailable(String),
}

/// Errors returned by a [`crate::ClusterLocator`].
#[derive(Debug, Error)]
pub enum ClusterLocatorError {
    #[error("cluster URL is not configured")]
    NotConfigured,

    #[error("cluster locator unavailable: {0}")]
    Unavailable(String),
}
