//! Public API trait for the environment resolver.
//!
//! Consumers (workspace provisioning) call this to learn which namespace and
//! which cluster credentials to use for a subject.

use async_trait::async_trait;
use tenant_env_security::Subject;

use crate::error::EnvironmentResolverError;
use crate::models::ConnectionConfig;

/// Public API trait for the environment resolver.
///
/// `subject` is `None` when the caller could not be identified at all. Both
/// `None` and [`Subject::Anonymous`] are rejected before any collaborator is
/// consulted.
#[async_trait]
pub trait EnvironmentResolverClient: Send + Sync {
    /// Resolve the full cluster connection configuration for `subject`.
    ///
    /// # Errors
    ///
    /// - `Unauthorized` for an absent or anonymous subject
    /// - `CapacityExhausted` if the tenant's cluster is out of capacity
    /// - `Configuration` if the delegated strategy is selected but no
    ///   service-account token is configured
    /// - `Infrastructure` if the tenant directory or cluster locator fails
    async fn resolve_connection_config(
        &self,
        subject: Option<&Subject>,
    ) -> Result<ConnectionConfig, EnvironmentResolverError>;

    /// Resolve only the namespace for `subject`. No capacity check is made.
    ///
    /// # Errors
    ///
    /// - `Unauthorized` for an absent or anonymous subject
    /// - `Infrastructure` if the tenant directory or cluster locator fails
    async fn resolve_namespace(
        &self,
        subject: Option<&Subject>,
    ) -> Result<String, EnvironmentResolverError>;
}
