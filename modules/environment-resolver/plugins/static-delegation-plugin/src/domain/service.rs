//! Service implementation for the static delegation plugin.

use std::collections::HashSet;

use crate::config::{DelegationMode, StaticDelegationPluginConfig};

/// Static delegation policy.
#[derive(Debug, Clone)]
pub struct Service {
    mode: DelegationMode,
    users: HashSet<String>,
}

impl Service {
    /// Create a service from plugin configuration.
    #[must_use]
    pub fn from_config(cfg: &StaticDelegationPluginConfig) -> Self {
        if cfg.mode != DelegationMode::Users && !cfg.users.is_empty() {
            tracing::warn!(
                mode = ?cfg.mode,
                "Delegation user list is ignored outside `users` mode"
            );
        }

        Self {
            mode: cfg.mode,
            users: cfg.users.iter().cloned().collect(),
        }
    }

    /// Whether `user_id` should be served through the service account.
    #[must_use]
    pub fn is_delegated(&self, user_id: &str) -> bool {
        match self.mode {
            DelegationMode::Disabled => false,
            DelegationMode::All => true,
            DelegationMode::Users => self.users.contains(user_id),
        }
    }
}
