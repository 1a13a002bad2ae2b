//! Configuration for the environment resolver.

use std::path::Path;
use std::time::Duration;

use figment::Figment;
use figment::providers::{Env, Format, Yaml};
use secrecy::SecretString;
use serde::Deserialize;

use crate::domain::DomainError;

/// Prefix of environment variables overriding file configuration.
///
/// Nested keys use `__`, e.g. `ENVRES_SERVICE_ACCOUNT__CLIENT_ID`.
pub const ENV_PREFIX: &str = "ENVRES_";

fn default_token_request_timeout_secs() -> u64 {
    10
}

fn default_lookup_timeout_secs() -> u64 {
    5
}

/// Environment resolver configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EnvironmentResolverConfig {
    /// Multi-tenant mode. Must be enabled; the resolver refuses to start
    /// otherwise.
    #[serde(default)]
    pub multitenant: bool,

    /// Single-tenant deployment: only the namespace is resolved and callers
    /// use their ambient cluster connection.
    #[serde(default)]
    pub standalone: bool,

    /// Service-account client credentials.
    #[serde(default)]
    pub service_account: ServiceAccountConfig,

    /// Identity-provider base URL. The token endpoint is `{url}/token`.
    #[serde(default)]
    pub oidc_provider_url: Option<String>,

    /// Upper bound for the one-time service-account token request.
    #[serde(default = "default_token_request_timeout_secs")]
    pub token_request_timeout_secs: u64,

    /// Upper bound for each tenant directory and cluster locator call.
    #[serde(default = "default_lookup_timeout_secs")]
    pub lookup_timeout_secs: u64,
}

impl Default for EnvironmentResolverConfig {
    fn default() -> Self {
        Self {
            multitenant: false,
            standalone: false,
            service_account: ServiceAccountConfig::default(),
            oidc_provider_url: None,
            token_request_timeout_secs: default_token_request_timeout_secs(),
            lookup_timeout_secs: default_lookup_timeout_secs(),
        }
    }
}

/// Client credentials of the privileged service account.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServiceAccountConfig {
    pub client_id: Option<String>,
    pub client_secret: Option<SecretString>,
}

impl EnvironmentResolverConfig {
    /// Load configuration from an optional YAML file, then apply
    /// `ENVRES_`-prefixed environment overrides.
    ///
    /// # Errors
    ///
    /// Returns a `figment::Error` if a source cannot be parsed or a value has
    /// the wrong type.
    pub fn load(path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::new();
        if let Some(path) = path {
            figment = figment.merge(Yaml::file(path));
        }
        figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
    }

    /// Reject configurations the resolver cannot serve with.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Configuration` if multi-tenancy is disabled.
    pub fn validate(&self) -> Result<(), DomainError> {
        if !self.multitenant {
            return Err(DomainError::Configuration(
                "multi-tenancy is disabled; set `multitenant: true` to enable the \
                 environment resolver"
                    .to_owned(),
            ));
        }
        Ok(())
    }

    #[must_use]
    pub fn token_request_timeout(&self) -> Duration {
        Duration::from_secs(self.token_request_timeout_secs)
    }

    #[must_use]
    pub fn lookup_timeout(&self) -> Duration {
        Duration::from_secs(self.lookup_timeout_secs)
    }
}
