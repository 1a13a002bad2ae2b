//! Domain models for the environment resolver module.

use secrecy::SecretString;
use serde::{Deserialize, Serialize};

/// Tenant kind passed to the tenant directory when looking up workspace
/// tenants.
pub const CHE_TENANT_KIND: &str = "che";

/// Route suffix assigned to guessed subjects, which are never looked up.
pub const UNKNOWN_ROUTE_BASE_SUFFIX: &str = "unknown";

/// Group sent alongside every impersonated user.
///
/// The cluster client rejects impersonation requests whose group list is
/// empty. This value carries no group membership semantics.
pub const IMPERSONATION_PLACEHOLDER_GROUP: &str = "dummyGroup";

/// Tenant record as returned by the tenant directory.
///
/// The directory does not know the cluster URL; the resolver layers it in
/// when building [`TenantData`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TenantRecord {
    pub namespace: String,
    pub route_base_suffix: String,
    #[serde(default)]
    pub cluster_capacity_exhausted: bool,
}

/// Tenant data for a single resolution call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TenantData {
    namespace: String,
    cluster_url: String,
    route_base_suffix: String,
    cluster_capacity_exhausted: bool,
}

impl TenantData {
    #[must_use]
    pub fn new(
        namespace: impl Into<String>,
        cluster_url: impl Into<String>,
        route_base_suffix: impl Into<String>,
        cluster_capacity_exhausted: bool,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            cluster_url: cluster_url.into(),
            route_base_suffix: route_base_suffix.into(),
            cluster_capacity_exhausted,
        }
    }

    /// Merge a directory record with the current cluster URL.
    #[must_use]
    pub fn from_record(record: TenantRecord, cluster_url: impl Into<String>) -> Self {
        Self {
            namespace: record.namespace,
            cluster_url: cluster_url.into(),
            route_base_suffix: record.route_base_suffix,
            cluster_capacity_exhausted: record.cluster_capacity_exhausted,
        }
    }

    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    #[must_use]
    pub fn cluster_url(&self) -> &str {
        &self.cluster_url
    }

    #[must_use]
    pub fn route_base_suffix(&self) -> &str {
        &self.route_base_suffix
    }

    #[must_use]
    pub fn is_cluster_capacity_exhausted(&self) -> bool {
        self.cluster_capacity_exhausted
    }
}

/// Master URL and bearer token used to reach the cluster API.
#[derive(Debug, Clone)]
pub struct ClusterAccess {
    master_url: String,
    bearer_token: SecretString,
}

impl ClusterAccess {
    #[must_use]
    pub fn master_url(&self) -> &str {
        &self.master_url
    }

    #[must_use]
    pub fn bearer_token(&self) -> &SecretString {
        &self.bearer_token
    }
}

/// Identity the cluster API should act as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Impersonation {
    username: String,
    groups: Vec<String>,
}

impl Impersonation {
    /// Impersonate `username` with the placeholder group list.
    #[must_use]
    pub fn user(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            groups: vec![IMPERSONATION_PLACEHOLDER_GROUP.to_owned()],
        }
    }

    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    #[must_use]
    pub fn groups(&self) -> &[String] {
        &self.groups
    }
}

/// Cluster connection configuration for one subject.
///
/// Built once per resolution call and handed to the cluster client. Never
/// cached or shared across subjects. TLS trust is always on; certificate
/// trust is handled by deployment-level configuration.
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    namespace: String,
    trust_certs: bool,
    access: Option<ClusterAccess>,
    impersonation: Option<Impersonation>,
}

impl ConnectionConfig {
    /// Namespace only: the caller uses its ambient cluster connection.
    #[must_use]
    pub fn namespace_only(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            trust_certs: true,
            access: None,
            impersonation: None,
        }
    }

    /// Connect with the caller's own token.
    #[must_use]
    pub fn direct(
        namespace: impl Into<String>,
        master_url: impl Into<String>,
        user_token: SecretString,
    ) -> Self {
        Self {
            access: Some(ClusterAccess {
                master_url: master_url.into(),
                bearer_token: user_token,
            }),
            ..Self::namespace_only(namespace)
        }
    }

    /// Connect with the service-account token, impersonating `username`.
    #[must_use]
    pub fn delegated(
        namespace: impl Into<String>,
        master_url: impl Into<String>,
        service_account_token: SecretString,
        username: impl Into<String>,
    ) -> Self {
        Self {
            access: Some(ClusterAccess {
                master_url: master_url.into(),
                bearer_token: service_account_token,
            }),
            impersonation: Some(Impersonation::user(username)),
            ..Self::namespace_only(namespace)
        }
    }

    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    #[must_use]
    pub fn trust_certs(&self) -> bool {
        self.trust_certs
    }

    #[must_use]
    pub fn access(&self) -> Option<&ClusterAccess> {
        self.access.as_ref()
    }

    #[must_use]
    pub fn master_url(&self) -> Option<&str> {
        self.access.as_ref().map(ClusterAccess::master_url)
    }

    #[must_use]
    pub fn bearer_token(&self) -> Option<&SecretString> {
        self.access.as_ref().map(ClusterAccess::bearer_token)
    }

    #[must_use]
    pub fn impersonation(&self) -> Option<&Impersonation> {
        self.impersonation.as_ref()
    }
}
