//! One-time service-account token acquisition.
//!
//! The token is fetched with an OAuth2 client-credentials grant while the
//! module initializes and is never refreshed afterwards. The resolver holds
//! the result as an immutable value behind an `Arc`, so every resolution call
//! observes either the complete token or no token at all.

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::info;
use url::Url;

use super::DomainError;
use crate::config::EnvironmentResolverConfig;

const CLIENT_CREDENTIALS_GRANT: &str = "client_credentials";

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
}

/// Service-account bearer token, or its absence.
#[derive(Debug, Clone, Default)]
pub struct ServiceAccountToken {
    token: Option<SecretString>,
}

impl ServiceAccountToken {
    /// No token: the delegated strategy is unavailable.
    #[must_use]
    pub fn unset() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from_secret(token: SecretString) -> Self {
        Self { token: Some(token) }
    }

    #[must_use]
    pub fn get(&self) -> Option<&SecretString> {
        self.token.as_ref()
    }

    #[must_use]
    pub fn is_set(&self) -> bool {
        self.token.is_some()
    }

    /// Acquire the token described by `cfg`.
    ///
    /// Returns an unset token without any network call when the client id or
    /// the identity-provider URL is missing or empty.
    ///
    /// # Errors
    ///
    /// - `Configuration` if the client secret is missing or the URL is invalid
    /// - `TokenAcquisition` on transport failure, timeout, non-success status,
    ///   or a response without a usable `access_token`
    #[tracing::instrument(skip_all)]
    pub async fn acquire(cfg: &EnvironmentResolverConfig) -> Result<Self, DomainError> {
        let client_id = cfg
            .service_account
            .client_id
            .as_deref()
            .filter(|id| !id.is_empty());
        let provider_url = cfg.oidc_provider_url.as_deref().filter(|u| !u.is_empty());

        let (Some(client_id), Some(provider_url)) = (client_id, provider_url) else {
            info!("Service account settings are incomplete; delegated strategy is disabled");
            return Ok(Self::unset());
        };

        let client_secret = cfg.service_account.client_secret.as_ref().ok_or_else(|| {
            DomainError::Configuration(format!(
                "service account '{client_id}' has no client secret configured"
            ))
        })?;

        let token_url = token_endpoint(provider_url)?;
        let http = reqwest::Client::builder()
            .timeout(cfg.token_request_timeout())
            .build()
            .map_err(|e| DomainError::TokenAcquisition(e.to_string()))?;

        let response = http
            .post(token_url)
            .form(&[
                ("grant_type", CLIENT_CREDENTIALS_GRANT),
                ("client_id", client_id),
                ("client_secret", client_secret.expose_secret()),
            ])
            .send()
            .await
            .map_err(|e| DomainError::TokenAcquisition(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DomainError::TokenAcquisition(format!(
                "identity provider responded with status {status}"
            )));
        }

        let body: TokenResponse = response
            .json()
            .await
            .map_err(|e| DomainError::TokenAcquisition(format!("invalid token response: {e}")))?;

        let token = body
            .access_token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                DomainError::TokenAcquisition("token response has no access_token".to_owned())
            })?;

        info!(client_id, "Service account token has been successfully retrieved");
        Ok(Self::from_secret(token.into()))
    }
}

fn token_endpoint(provider_url: &str) -> Result<Url, DomainError> {
    let raw = format!("{}/token", provider_url.trim_end_matches('/'));
    Url::parse(&raw).map_err(|e| {
        DomainError::Configuration(format!("invalid identity provider URL '{provider_url}': {e}"))
    })
}
