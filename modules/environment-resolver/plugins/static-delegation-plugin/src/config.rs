//! Configuration for the static delegation plugin.

use serde::Deserialize;

/// Plugin configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StaticDelegationPluginConfig {
    /// Delegation mode.
    pub mode: DelegationMode,

    /// User ids delegated in `users` mode. Ignored by the other modes.
    pub users: Vec<String>,
}

/// Delegation mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DelegationMode {
    /// Never delegate.
    #[default]
    Disabled,
    /// Always delegate.
    All,
    /// Delegate the configured allow-list.
    Users,
}
