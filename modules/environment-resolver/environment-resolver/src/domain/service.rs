//! Domain service for the environment resolver.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use environment_resolver_sdk::{
    CHE_TENANT_KIND, ClusterLocator, ConnectionConfig, DelegationPolicy, TenantData,
    TenantDirectoryClient, UNKNOWN_ROUTE_BASE_SUFFIX,
};
use secrecy::SecretString;
use tenant_env_security::Subject;
use tracing::debug;

use super::error::DomainError;
use super::sa_token::ServiceAccountToken;
use crate::config::EnvironmentResolverConfig;

/// External collaborators consulted on every resolution.
#[derive(Clone)]
pub struct Collaborators {
    pub tenant_directory: Arc<dyn TenantDirectoryClient>,
    pub cluster_locator: Arc<dyn ClusterLocator>,
    pub delegation_policy: Arc<dyn DelegationPolicy>,
}

/// Credential strategy chosen for one subject.
enum CredentialStrategy<'a> {
    /// Service-account token, impersonating `user_id`.
    Delegated { user_id: &'a str },
    /// The subject's own bearer token.
    Direct { token: &'a SecretString },
}

/// Environment resolver service.
pub struct Service {
    collaborators: Collaborators,
    service_account_token: Arc<ServiceAccountToken>,
    standalone: bool,
    lookup_timeout: Duration,
}

impl Service {
    /// # Errors
    ///
    /// Returns `DomainError::Configuration` if `cfg` does not enable
    /// multi-tenancy.
    pub fn new(
        cfg: &EnvironmentResolverConfig,
        collaborators: Collaborators,
        service_account_token: Arc<ServiceAccountToken>,
    ) -> Result<Self, DomainError> {
        cfg.validate()?;
        Ok(Self {
            collaborators,
            service_account_token,
            standalone: cfg.standalone,
            lookup_timeout: cfg.lookup_timeout(),
        })
    }

    /// Resolve the cluster connection configuration for `subject`.
    ///
    /// # Errors
    ///
    /// - `Unauthorized` for absent or anonymous subjects, or subjects lacking
    ///   what the selected strategy needs
    /// - `CapacityExhausted` if the tenant's cluster is full
    /// - `ServiceAccountTokenMissing` if delegation is selected without a token
    /// - collaborator failures and timeouts
    #[tracing::instrument(skip_all, fields(user_id = tracing::field::Empty))]
    pub async fn resolve_connection_config(
        &self,
        subject: Option<&Subject>,
    ) -> Result<ConnectionConfig, DomainError> {
        let subject = check_subject(subject)?;
        if let Some(user_id) = subject.user_id() {
            tracing::Span::current().record("user_id", user_id);
        }

        let tenant = self.tenant_data(subject).await?;
        check_cluster_capacity(&tenant)?;

        if self.standalone {
            debug!(namespace = tenant.namespace(), "Standalone mode, namespace only");
            return Ok(ConnectionConfig::namespace_only(tenant.namespace()));
        }

        match self.select_strategy(subject).await? {
            CredentialStrategy::Delegated { user_id } => {
                let token = self.service_account_token.get().ok_or_else(|| {
                    DomainError::ServiceAccountTokenMissing {
                        user_id: user_id.to_owned(),
                    }
                })?;
                debug!(user_id, "Using service account token with impersonation");
                Ok(ConnectionConfig::delegated(
                    tenant.namespace(),
                    tenant.cluster_url(),
                    token.clone(),
                    user_id,
                ))
            }
            CredentialStrategy::Direct { token } => {
                debug!("Using subject's own token");
                Ok(ConnectionConfig::direct(
                    tenant.namespace(),
                    tenant.cluster_url(),
                    token.clone(),
                ))
            }
        }
    }

    /// Resolve only the namespace for `subject`. Capacity is not checked.
    ///
    /// # Errors
    ///
    /// - `Unauthorized` for absent or anonymous subjects
    /// - collaborator failures and timeouts
    #[tracing::instrument(skip_all)]
    pub async fn resolve_namespace(&self, subject: Option<&Subject>) -> Result<String, DomainError> {
        let subject = check_subject(subject)?;
        let tenant = self.tenant_data(subject).await?;
        Ok(tenant.namespace().to_owned())
    }

    async fn tenant_data(&self, subject: &Subject) -> Result<TenantData, DomainError> {
        let tenant = if let Subject::Guessed(guessed) = subject {
            let cluster_url = self.cluster_url().await?;
            TenantData::new(
                guessed.namespace(),
                cluster_url,
                UNKNOWN_ROUTE_BASE_SUFFIX,
                false,
            )
        } else {
            let directory = &self.collaborators.tenant_directory;
            let record = self
                .bounded(
                    "tenant directory lookup",
                    directory.get_tenant_data(subject, CHE_TENANT_KIND),
                )
                .await?;
            let cluster_url = self.cluster_url().await?;
            TenantData::from_record(record, cluster_url)
        };

        if tenant.namespace().is_empty() {
            return Err(DomainError::InvalidTenantData(
                "tenant namespace is empty".to_owned(),
            ));
        }
        Ok(tenant)
    }

    async fn cluster_url(&self) -> Result<String, DomainError> {
        self.bounded(
            "cluster locator lookup",
            self.collaborators.cluster_locator.url(),
        )
        .await
    }

    async fn select_strategy<'a>(
        &self,
        subject: &'a Subject,
    ) -> Result<CredentialStrategy<'a>, DomainError> {
        match subject {
            Subject::Authenticated(auth) => {
                let user_id = auth.user_id();
                if self
                    .collaborators
                    .delegation_policy
                    .use_service_account_token(user_id)
                    .await
                {
                    delegated(user_id)
                } else if auth.has_empty_token() {
                    Err(DomainError::unauthorized(
                        "subject presented an empty bearer token",
                    ))
                } else {
                    Ok(CredentialStrategy::Direct {
                        token: auth.token(),
                    })
                }
            }
            // Guessed subjects carry no token of their own.
            Subject::Guessed(guessed) => {
                let user_id = guessed.user_id().ok_or_else(|| {
                    DomainError::unauthorized("guessed subject has no user id to impersonate")
                })?;
                delegated(user_id)
            }
            Subject::Anonymous => Err(anonymous_error()),
        }
    }

    async fn bounded<T, E>(
        &self,
        operation: &'static str,
        call: impl Future<Output = Result<T, E>>,
    ) -> Result<T, DomainError>
    where
        DomainError: From<E>,
    {
        match tokio::time::timeout(self.lookup_timeout, call).await {
            Ok(result) => result.map_err(DomainError::from),
            Err(_) => Err(DomainError::Timeout {
                operation,
                timeout: self.lookup_timeout,
            }),
        }
    }
}

fn delegated(user_id: &str) -> Result<CredentialStrategy<'_>, DomainError> {
    if user_id.is_empty() {
        return Err(DomainError::unauthorized(
            "cannot impersonate a subject with an empty user id",
        ));
    }
    Ok(CredentialStrategy::Delegated { user_id })
}

fn anonymous_error() -> DomainError {
    DomainError::unauthorized("the anonymous subject is used and cannot perform this action")
}

fn check_subject(subject: Option<&Subject>) -> Result<&Subject, DomainError> {
    let subject = subject
        .ok_or_else(|| DomainError::unauthorized("no subject is found to perform this action"))?;
    if subject.is_anonymous() {
        return Err(anonymous_error());
    }
    Ok(subject)
}

fn check_cluster_capacity(tenant: &TenantData) -> Result<(), DomainError> {
    if tenant.is_cluster_capacity_exhausted() {
        return Err(DomainError::CapacityExhausted {
            namespace: tenant.namespace().to_owned(),
        });
    }
    Ok(())
}
