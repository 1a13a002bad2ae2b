//! Environment resolver module.

use std::sync::{Arc, OnceLock};

use environment_resolver_sdk::EnvironmentResolverClient;
use tracing::info;

use crate::config::EnvironmentResolverConfig;
use crate::domain::{Collaborators, EnvironmentResolverLocalClient, Service, ServiceAccountToken};

/// Environment Resolver module.
///
/// `init()`:
/// 1. Validates the configuration (multi-tenancy must be enabled)
/// 2. Acquires the service-account token once, if configured
/// 3. Builds the service and returns the local client
///
/// The token is never refreshed for the lifetime of the module.
pub struct EnvironmentResolver {
    service: OnceLock<Arc<Service>>,
}

impl Default for EnvironmentResolver {
    fn default() -> Self {
        Self {
            service: OnceLock::new(),
        }
    }
}

impl EnvironmentResolver {
    pub const MODULE_NAME: &'static str = "environment-resolver";

    /// Initialize the module.
    ///
    /// # Errors
    ///
    /// Fails if multi-tenancy is disabled, if the service-account token cannot
    /// be acquired, or if the module was already initialized.
    #[tracing::instrument(skip_all, fields(standalone = cfg.standalone))]
    pub async fn init(
        &self,
        cfg: &EnvironmentResolverConfig,
        collaborators: Collaborators,
    ) -> anyhow::Result<Arc<dyn EnvironmentResolverClient>> {
        info!("Initializing {} module", Self::MODULE_NAME);
        cfg.validate()?;

        let token = ServiceAccountToken::acquire(cfg).await?;
        info!(
            delegation_available = token.is_set(),
            "Service account token configured"
        );

        let svc = Arc::new(Service::new(cfg, collaborators, Arc::new(token))?);
        self.service
            .set(svc.clone())
            .map_err(|_| anyhow::anyhow!("{} module already initialized", Self::MODULE_NAME))?;

        let api: Arc<dyn EnvironmentResolverClient> =
            Arc::new(EnvironmentResolverLocalClient::new(svc));

        info!("{} module initialized successfully", Self::MODULE_NAME);
        Ok(api)
    }

    /// Whether `init()` has completed.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.service.get().is_some()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use httpmock::prelude::*;
    use serde_json::json;
    use static_delegation_plugin::{
        DelegationMode, StaticDelegationPluginConfig, StaticDelegationPolicy,
    };
    use static_tenant_directory_plugin::{
        StaticClusterLocator, StaticTenantDirectory, StaticTenantDirectoryPluginConfig,
    };
    use tenant_env_security::Subject;
    use tracing_test::traced_test;

    use super::*;
    use crate::config::ServiceAccountConfig;

    fn collaborators() -> Collaborators {
        let directory_cfg = StaticTenantDirectoryPluginConfig {
            cluster_url: "https://cluster-proxy.example".to_owned(),
            namespace_template: Some("{user_id}-che".to_owned()),
            ..StaticTenantDirectoryPluginConfig::default()
        };
        Collaborators {
            tenant_directory: Arc::new(StaticTenantDirectory::from_config(&directory_cfg)),
            cluster_locator: Arc::new(StaticClusterLocator::from_config(&directory_cfg)),
            delegation_policy: Arc::new(StaticDelegationPolicy::from_config(
                &StaticDelegationPluginConfig {
                    mode: DelegationMode::All,
                    users: Vec::new(),
                },
            )),
        }
    }

    #[tokio::test]
    #[traced_test]
    async fn init_logs_success_without_secrets() {
        let idp = MockServer::start_async().await;
        idp.mock_async(|when, then| {
            when.method(POST).path("/token");
            then.status(200)
                .json_body(json!({ "access_token": "very-secret-sa-token" }));
        })
        .await;

        let cfg = EnvironmentResolverConfig {
            multitenant: true,
            service_account: ServiceAccountConfig {
                client_id: Some("che-sa".to_owned()),
                client_secret: Some("very-secret-client-secret".to_owned().into()),
            },
            oidc_provider_url: Some(idp.base_url()),
            ..EnvironmentResolverConfig::default()
        };

        let module = EnvironmentResolver::default();
        let client = module.init(&cfg, collaborators()).await.unwrap();
        let subject = Subject::authenticated("alice", "very-secret-user-token".to_owned());
        client
            .resolve_connection_config(Some(&subject))
            .await
            .unwrap();

        assert!(logs_contain(
            "Service account token has been successfully retrieved"
        ));
        assert!(!logs_contain("very-secret-sa-token"));
        assert!(!logs_contain("very-secret-client-secret"));
        assert!(!logs_contain("very-secret-user-token"));
    }

    #[tokio::test]
    #[traced_test]
    async fn rejected_resolution_is_logged_as_warning() {
        let cfg = EnvironmentResolverConfig {
            multitenant: true,
            ..EnvironmentResolverConfig::default()
        };
        let module = EnvironmentResolver::default();
        let client = module.init(&cfg, collaborators()).await.unwrap();

        let result = client.resolve_namespace(Some(&Subject::anonymous())).await;

        assert!(result.is_err());
        assert!(logs_contain("environment_resolver call rejected"));
    }
}
