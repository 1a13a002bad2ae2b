//! `TenantDirectoryClient` implementation backed by the domain service.

use async_trait::async_trait;
use environment_resolver_sdk::{TenantDirectoryClient, TenantDirectoryError, TenantRecord};
use tenant_env_security::Subject;

use super::service::Service;

#[async_trait]
impl TenantDirectoryClient for Service {
    async fn get_tenant_data(
        &self,
        subject: &Subject,
        tenant_kind: &str,
    ) -> Result<TenantRecord, TenantDirectoryError> {
        let user_id = subject
            .user_id()
            .filter(|id| !id.is_empty())
            .ok_or_else(|| {
                TenantDirectoryError::InvalidSubject("subject has no user id".to_owned())
            })?;
        self.lookup(user_id, tenant_kind)
    }
}
