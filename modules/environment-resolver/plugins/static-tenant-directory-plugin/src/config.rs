//! Configuration for the static tenant directory plugin.

use serde::Deserialize;

/// Placeholder substituted with the user id in `namespace_template`.
pub const USER_ID_PLACEHOLDER: &str = "{user_id}";

/// Plugin configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StaticTenantDirectoryPluginConfig {
    /// Cluster proxy base URL returned by the cluster locator.
    pub cluster_url: String,

    /// Route suffix for tenants that do not set their own.
    pub route_base_suffix: String,

    /// Namespace for users without an explicit entry, e.g. `{user_id}-che`.
    pub namespace_template: Option<String>,

    /// Explicit tenant entries.
    pub tenants: Vec<TenantMapping>,
}

/// Maps a user id to its tenant.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TenantMapping {
    pub user_id: String,
    pub namespace: String,
    #[serde(default)]
    pub route_base_suffix: Option<String>,
    #[serde(default)]
    pub cluster_capacity_exhausted: bool,
}
