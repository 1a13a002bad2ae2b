//! Collaborator traits consumed by the environment resolver.
//!
//! Implementations live outside the resolver (tenant service clients,
//! service discovery, feature toggles). The static plugins in this workspace
//! provide config-driven implementations for development and testing.

use async_trait::async_trait;
use tenant_env_security::Subject;

use crate::error::{ClusterLocatorError, TenantDirectoryError};
use crate::models::TenantRecord;

/// Looks up tenant metadata for a subject.
#[async_trait]
pub trait TenantDirectoryClient: Send + Sync {
    /// Return the tenant record of `subject` for the given tenant kind.
    ///
    /// # Errors
    ///
    /// - `TenantNotFound` if the subject has no tenant
    /// - `UnsupportedTenantKind` if `tenant_kind` is not served
    /// - `Unavailable` for transport failures
    async fn get_tenant_data(
        &self,
        subject: &Subject,
        tenant_kind: &str,
    ) -> Result<TenantRecord, TenantDirectoryError>;
}

/// Yields the base URL of the cluster-facing proxy.
#[async_trait]
pub trait ClusterLocator: Send + Sync {
    /// Current cluster proxy base URL.
    ///
    /// # Errors
    ///
    /// - `NotConfigured` if no URL is known
    /// - `Unavailable` for discovery failures
    async fn url(&self) -> Result<String, ClusterLocatorError>;
}

/// Per-user toggle selecting the delegated credential strategy.
///
/// The resolver treats the answer as authoritative and does not cache it.
#[async_trait]
pub trait DelegationPolicy: Send + Sync {
    /// `true` to use the service-account token with impersonation,
    /// `false` to use the user's own token.
    async fn use_service_account_token(&self, user_id: &str) -> bool;
}
