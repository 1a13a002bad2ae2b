//! `DelegationPolicy` implementation backed by the domain service.

use async_trait::async_trait;
use environment_resolver_sdk::DelegationPolicy;

use super::service::Service;

#[async_trait]
impl DelegationPolicy for Service {
    async fn use_service_account_token(&self, user_id: &str) -> bool {
        self.is_delegated(user_id)
    }
}
