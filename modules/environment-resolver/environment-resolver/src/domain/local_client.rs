//! Local (in-process) client for the environment resolver.

use std::sync::Arc;

use async_trait::async_trait;
use environment_resolver_sdk::{
    ConnectionConfig, EnvironmentResolverClient, EnvironmentResolverError,
};
use tenant_env_security::Subject;

use super::{DomainError, Service};

/// Local client wrapping the service.
///
/// Handed out by the module during `init()`.
pub struct EnvironmentResolverLocalClient {
    svc: Arc<Service>,
}

impl EnvironmentResolverLocalClient {
    #[must_use]
    pub fn new(svc: Arc<Service>) -> Self {
        Self { svc }
    }
}

fn log_and_convert(op: &str, e: DomainError) -> EnvironmentResolverError {
    match &e {
        DomainError::Unauthorized(_) | DomainError::CapacityExhausted { .. } => {
            tracing::warn!(operation = op, error = %e, "environment_resolver call rejected");
        }
        _ => {
            tracing::error!(operation = op, error = %e, "environment_resolver call failed");
        }
    }
    e.into()
}

#[async_trait]
impl EnvironmentResolverClient for EnvironmentResolverLocalClient {
    async fn resolve_connection_config(
        &self,
        subject: Option<&Subject>,
    ) -> Result<ConnectionConfig, EnvironmentResolverError> {
        self.svc
            .resolve_connection_config(subject)
            .await
            .map_err(|e| log_and_convert("resolve_connection_config", e))
    }

    async fn resolve_namespace(
        &self,
        subject: Option<&Subject>,
    ) -> Result<String, EnvironmentResolverError> {
        self.svc
            .resolve_namespace(subject)
            .await
            .map_err(|e| log_and_convert("resolve_namespace", e))
    }
}
