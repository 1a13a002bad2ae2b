//! Service implementation for the static tenant directory plugin.

use std::collections::HashMap;

use environment_resolver_sdk::{CHE_TENANT_KIND, TenantDirectoryError, TenantRecord};

use crate::config::{StaticTenantDirectoryPluginConfig, USER_ID_PLACEHOLDER};

/// Static tenant directory.
///
/// Explicit entries take precedence over the namespace template.
#[derive(Debug, Clone)]
pub struct Service {
    tenants: HashMap<String, TenantRecord>,
    namespace_template: Option<String>,
    route_base_suffix: String,
}

impl Service {
    /// Create a service from plugin configuration.
    ///
    /// Later entries for the same user id replace earlier ones.
    #[must_use]
    pub fn from_config(cfg: &StaticTenantDirectoryPluginConfig) -> Self {
        let tenants = cfg
            .tenants
            .iter()
            .map(|t| {
                let record = TenantRecord {
                    namespace: t.namespace.clone(),
                    route_base_suffix: t
                        .route_base_suffix
                        .clone()
                        .unwrap_or_else(|| cfg.route_base_suffix.clone()),
                    cluster_capacity_exhausted: t.cluster_capacity_exhausted,
                };
                (t.user_id.clone(), record)
            })
            .collect();

        if let Some(template) = &cfg.namespace_template
            && !template.contains(USER_ID_PLACEHOLDER)
        {
            tracing::warn!(
                template = %template,
                "Namespace template has no `{{user_id}}` placeholder; all users share one namespace"
            );
        }

        Self {
            tenants,
            namespace_template: cfg.namespace_template.clone(),
            route_base_suffix: cfg.route_base_suffix.clone(),
        }
    }

    /// Look up the tenant of `user_id` for `tenant_kind`.
    ///
    /// # Errors
    ///
    /// - `UnsupportedTenantKind` unless `tenant_kind` is `che`
    /// - `TenantNotFound` if `user_id` has no entry and no template is set
    pub fn lookup(
        &self,
        user_id: &str,
        tenant_kind: &str,
    ) -> Result<TenantRecord, TenantDirectoryError> {
        if tenant_kind != CHE_TENANT_KIND {
            return Err(TenantDirectoryError::UnsupportedTenantKind {
                kind: tenant_kind.to_owned(),
            });
        }

        if let Some(record) = self.tenants.get(user_id) {
            return Ok(record.clone());
        }

        let template = self
            .namespace_template
            .as_deref()
            .ok_or_else(|| TenantDirectoryError::TenantNotFound {
                user_id: user_id.to_owned(),
            })?;

        Ok(TenantRecord {
            namespace: template.replace(USER_ID_PLACEHOLDER, user_id),
            route_base_suffix: self.route_base_suffix.clone(),
            cluster_capacity_exhausted: false,
        })
    }
}
