//! Tests for the environment resolver service.
//!
//! Collaborators are in-memory mocks that count their calls, so tests can
//! assert which lookups a resolution performed.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use environment_resolver_sdk::{
    ClusterLocator, ClusterLocatorError, DelegationPolicy, IMPERSONATION_PLACEHOLDER_GROUP,
    TenantDirectoryClient, TenantDirectoryError, TenantRecord,
};
use secrecy::ExposeSecret;
use tenant_env_security::Subject;

use crate::config::EnvironmentResolverConfig;
use crate::domain::error::DomainError;
use crate::domain::sa_token::ServiceAccountToken;
use crate::domain::service::{Collaborators, Service};

const PROXY_URL: &str = "https://proxy.example";
const SA_TOKEN: &str = "sa-token";

#[derive(Default)]
struct MockDirectory {
    records: HashMap<String, TenantRecord>,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl MockDirectory {
    fn with(user_id: &str, namespace: &str, exhausted: bool) -> Self {
        let mut dir = Self::default();
        dir.insert(user_id, namespace, exhausted);
        dir
    }

    fn insert(&mut self, user_id: &str, namespace: &str, exhausted: bool) {
        self.records.insert(
            user_id.to_owned(),
            TenantRecord {
                namespace: namespace.to_owned(),
                route_base_suffix: "apps.example".to_owned(),
                cluster_capacity_exhausted: exhausted,
            },
        );
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TenantDirectoryClient for MockDirectory {
    async fn get_tenant_data(
        &self,
        subject: &Subject,
        tenant_kind: &str,
    ) -> Result<TenantRecord, TenantDirectoryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        assert_eq!(tenant_kind, "che");
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let user_id = subject.user_id().unwrap_or_default();
        self.records
            .get(user_id)
            .cloned()
            .ok_or_else(|| TenantDirectoryError::Unavailable(format!("no record for {user_id}")))
    }
}

struct MockLocator {
    url: Option<&'static str>,
    calls: AtomicUsize,
}

impl MockLocator {
    fn new(url: Option<&'static str>) -> Self {
        Self {
            url,
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl ClusterLocator for MockLocator {
    async fn url(&self) -> Result<String, ClusterLocatorError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.url
            .map(str::to_owned)
            .ok_or(ClusterLocatorError::NotConfigured)
    }
}

struct MockPolicy {
    delegate: bool,
    calls: AtomicUsize,
}

impl MockPolicy {
    fn new(delegate: bool) -> Self {
        Self {
            delegate,
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl DelegationPolicy for MockPolicy {
    async fn use_service_account_token(&self, _user_id: &str) -> bool {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.delegate
    }
}

struct Fixture {
    directory: Arc<MockDirectory>,
    locator: Arc<MockLocator>,
    policy: Arc<MockPolicy>,
    service: Service,
}

fn multitenant_config(standalone: bool) -> EnvironmentResolverConfig {
    EnvironmentResolverConfig {
        multitenant: true,
        standalone,
        lookup_timeout_secs: 1,
        ..EnvironmentResolverConfig::default()
    }
}

fn build(
    directory: MockDirectory,
    delegate: bool,
    standalone: bool,
    token: ServiceAccountToken,
) -> Fixture {
    let directory = Arc::new(directory);
    let locator = Arc::new(MockLocator::new(Some(PROXY_URL)));
    let policy = Arc::new(MockPolicy::new(delegate));
    let collaborators = Collaborators {
        tenant_directory: directory.clone(),
        cluster_locator: locator.clone(),
        delegation_policy: policy.clone(),
    };
    let service = Service::new(
        &multitenant_config(standalone),
        collaborators,
        Arc::new(token),
    )
    .unwrap();
    Fixture {
        directory,
        locator,
        policy,
        service,
    }
}

fn sa_token() -> ServiceAccountToken {
    ServiceAccountToken::from_secret(SA_TOKEN.to_owned().into())
}

fn alice() -> Subject {
    Subject::authenticated("alice", "alice-token".to_owned())
}

// =========================================================================
// subject validation
// =========================================================================

#[tokio::test]
async fn absent_subject_is_unauthorized_without_lookup() {
    let fx = build(MockDirectory::with("alice", "alice-che", false), false, false, sa_token());

    let cfg = fx.service.resolve_connection_config(None).await;
    let ns = fx.service.resolve_namespace(None).await;

    assert!(matches!(cfg, Err(DomainError::Unauthorized(_))));
    assert!(matches!(ns, Err(DomainError::Unauthorized(_))));
    assert_eq!(fx.directory.calls(), 0);
    assert_eq!(fx.locator.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn anonymous_subject_is_unauthorized_without_lookup() {
    let fx = build(MockDirectory::with("alice", "alice-che", false), false, false, sa_token());
    let anonymous = Subject::anonymous();

    let cfg = fx.service.resolve_connection_config(Some(&anonymous)).await;
    let ns = fx.service.resolve_namespace(Some(&anonymous)).await;

    match cfg {
        Err(DomainError::Unauthorized(msg)) => assert!(msg.contains("anonymous")),
        other => panic!("Expected Unauthorized, got: {other:?}"),
    }
    assert!(matches!(ns, Err(DomainError::Unauthorized(_))));
    assert_eq!(fx.directory.calls(), 0);
}

// =========================================================================
// capacity admission
// =========================================================================

#[tokio::test]
async fn exhausted_capacity_rejects_connection_config() {
    let fx = build(MockDirectory::with("alice", "alice-che", true), false, false, sa_token());

    match fx.service.resolve_connection_config(Some(&alice())).await {
        Err(DomainError::CapacityExhausted { namespace }) => assert_eq!(namespace, "alice-che"),
        other => panic!("Expected CapacityExhausted, got: {other:?}"),
    }
    assert_eq!(fx.policy.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn exhausted_capacity_still_resolves_namespace() {
    let fx = build(MockDirectory::with("alice", "alice-che", true), false, false, sa_token());

    let ns = fx.service.resolve_namespace(Some(&alice())).await.unwrap();
    assert_eq!(ns, "alice-che");
}

#[tokio::test]
async fn exhausted_capacity_rejects_in_standalone_mode() {
    let fx = build(MockDirectory::with("alice", "alice-che", true), false, true, sa_token());

    let result = fx.service.resolve_connection_config(Some(&alice())).await;
    assert!(matches!(result, Err(DomainError::CapacityExhausted { .. })));
}

// =========================================================================
// credential strategies
// =========================================================================

#[tokio::test]
async fn standalone_returns_namespace_only_regardless_of_policy() {
    for delegate in [true, false] {
        let fx = build(MockDirectory::with("alice", "alice-che", false), delegate, true, sa_token());

        let cfg = fx
            .service
            .resolve_connection_config(Some(&alice()))
            .await
            .unwrap();

        assert_eq!(cfg.namespace(), "alice-che");
        assert!(cfg.trust_certs());
        assert!(cfg.master_url().is_none());
        assert!(cfg.bearer_token().is_none());
        assert!(cfg.impersonation().is_none());
        assert_eq!(fx.policy.calls.load(Ordering::SeqCst), 0);
    }
}

#[tokio::test]
async fn delegated_strategy_impersonates_with_service_account_token() {
    let fx = build(MockDirectory::with("alice", "alice-che", false), true, false, sa_token());

    let cfg = fx
        .service
        .resolve_connection_config(Some(&alice()))
        .await
        .unwrap();

    assert_eq!(cfg.namespace(), "alice-che");
    assert_eq!(cfg.master_url(), Some(PROXY_URL));
    assert_eq!(
        cfg.bearer_token().map(ExposeSecret::expose_secret),
        Some(SA_TOKEN)
    );
    let imp = cfg.impersonation().unwrap();
    assert_eq!(imp.username(), "alice");
    assert!(!imp.groups().is_empty());
    assert_eq!(imp.groups(), &[IMPERSONATION_PLACEHOLDER_GROUP]);
}

#[tokio::test]
async fn direct_strategy_uses_subject_token() {
    let fx = build(MockDirectory::with("alice", "alice-che", false), false, false, sa_token());

    let cfg = fx
        .service
        .resolve_connection_config(Some(&alice()))
        .await
        .unwrap();

    assert_eq!(cfg.master_url(), Some(PROXY_URL));
    assert_eq!(
        cfg.bearer_token().map(ExposeSecret::expose_secret),
        Some("alice-token")
    );
    assert!(cfg.impersonation().is_none());
    assert_eq!(fx.policy.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn delegated_without_service_account_token_fails() {
    let fx = build(
        MockDirectory::with("alice", "alice-che", false),
        true,
        false,
        ServiceAccountToken::unset(),
    );

    match fx.service.resolve_connection_config(Some(&alice())).await {
        Err(DomainError::ServiceAccountTokenMissing { user_id }) => assert_eq!(user_id, "alice"),
        other => panic!("Expected ServiceAccountTokenMissing, got: {other:?}"),
    }
}

#[tokio::test]
async fn direct_with_empty_user_token_is_unauthorized() {
    let fx = build(MockDirectory::with("alice", "alice-che", false), false, false, sa_token());
    let subject = Subject::authenticated("alice", String::new());

    let result = fx.service.resolve_connection_config(Some(&subject)).await;
    assert!(matches!(result, Err(DomainError::Unauthorized(_))));
}

// =========================================================================
// guessed subjects
// =========================================================================

#[tokio::test]
async fn guessed_subject_namespace_skips_directory() {
    let fx = build(MockDirectory::default(), false, false, sa_token());
    let subject = Subject::guessed(Some("bob".to_owned()), "ns-42");

    let ns = fx.service.resolve_namespace(Some(&subject)).await.unwrap();

    assert_eq!(ns, "ns-42");
    assert_eq!(fx.directory.calls(), 0);
}

#[tokio::test]
async fn guessed_subject_is_always_delegated() {
    let fx = build(MockDirectory::default(), false, false, sa_token());
    let subject = Subject::guessed(Some("bob".to_owned()), "ns-42");

    let cfg = fx
        .service
        .resolve_connection_config(Some(&subject))
        .await
        .unwrap();

    assert_eq!(cfg.namespace(), "ns-42");
    assert_eq!(cfg.master_url(), Some(PROXY_URL));
    assert_eq!(
        cfg.bearer_token().map(ExposeSecret::expose_secret),
        Some(SA_TOKEN)
    );
    assert_eq!(cfg.impersonation().map(|i| i.username()), Some("bob"));
    assert_eq!(fx.directory.calls(), 0);
    assert_eq!(fx.policy.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn guessed_subject_without_service_account_token_fails() {
    let fx = build(MockDirectory::default(), false, false, ServiceAccountToken::unset());
    let subject = Subject::guessed(Some("bob".to_owned()), "ns-42");

    let result = fx.service.resolve_connection_config(Some(&subject)).await;
    assert!(matches!(
        result,
        Err(DomainError::ServiceAccountTokenMissing { .. })
    ));
}

#[tokio::test]
async fn guessed_subject_without_user_id_is_unauthorized() {
    let fx = build(MockDirectory::default(), true, false, sa_token());
    let subject = Subject::guessed(None, "ns-42");

    let result = fx.service.resolve_connection_config(Some(&subject)).await;
    assert!(matches!(result, Err(DomainError::Unauthorized(_))));

    // namespace resolution does not need an identity to impersonate
    let ns = fx.service.resolve_namespace(Some(&subject)).await.unwrap();
    assert_eq!(ns, "ns-42");
}

// =========================================================================
// collaborator failures
// =========================================================================

#[tokio::test]
async fn directory_failure_propagates() {
    let fx = build(MockDirectory::default(), false, false, sa_token());

    let result = fx.service.resolve_connection_config(Some(&alice())).await;
    assert!(matches!(result, Err(DomainError::TenantDirectory(_))));
}

#[tokio::test(start_paused = true)]
async fn slow_directory_times_out() {
    let mut directory = MockDirectory::with("alice", "alice-che", false);
    directory.delay = Some(Duration::from_secs(60));
    let fx = build(directory, false, false, sa_token());

    match fx.service.resolve_namespace(Some(&alice())).await {
        Err(DomainError::Timeout { operation, .. }) => {
            assert_eq!(operation, "tenant directory lookup");
        }
        other => panic!("Expected Timeout, got: {other:?}"),
    }
}

#[tokio::test]
async fn empty_namespace_from_directory_is_rejected() {
    let fx = build(MockDirectory::with("alice", "", false), false, false, sa_token());

    let result = fx.service.resolve_namespace(Some(&alice())).await;
    assert!(matches!(result, Err(DomainError::InvalidTenantData(_))));
}

#[tokio::test]
async fn locator_failure_propagates() {
    let directory = Arc::new(MockDirectory::with("alice", "alice-che", false));
    let collaborators = Collaborators {
        tenant_directory: directory,
        cluster_locator: Arc::new(MockLocator::new(None)),
        delegation_policy: Arc::new(MockPolicy::new(false)),
    };
    let service = Service::new(
        &multitenant_config(false),
        collaborators,
        Arc::new(sa_token()),
    )
    .unwrap();

    let result = service.resolve_namespace(Some(&alice())).await;
    assert!(matches!(
        result,
        Err(DomainError::ClusterLocator(ClusterLocatorError::NotConfigured))
    ));
}

// =========================================================================
// construction and isolation
// =========================================================================

#[test]
fn construction_requires_multitenancy() {
    let collaborators = Collaborators {
        tenant_directory: Arc::new(MockDirectory::default()),
        cluster_locator: Arc::new(MockLocator::new(Some(PROXY_URL))),
        delegation_policy: Arc::new(MockPolicy::new(false)),
    };

    let result = Service::new(
        &EnvironmentResolverConfig::default(),
        collaborators,
        Arc::new(ServiceAccountToken::unset()),
    );
    assert!(matches!(result, Err(DomainError::Configuration(_))));
}

#[tokio::test]
async fn concurrent_subjects_get_their_own_namespace_and_token() {
    let mut directory = MockDirectory::with("alice", "alice-che", false);
    directory.insert("carol", "carol-che", false);
    let fx = build(directory, false, false, sa_token());
    let carol = Subject::authenticated("carol", "carol-token".to_owned());
    let alice = alice();

    let (a, c) = tokio::join!(
        fx.service.resolve_connection_config(Some(&alice)),
        fx.service.resolve_connection_config(Some(&carol)),
    );
    let (a, c) = (a.unwrap(), c.unwrap());

    assert_eq!(a.namespace(), "alice-che");
    assert_eq!(c.namespace(), "carol-che");
    assert_eq!(
        a.bearer_token().map(ExposeSecret::expose_secret),
        Some("alice-token")
    );
    assert_eq!(
        c.bearer_token().map(ExposeSecret::expose_secret),
        Some("carol-token")
    );
}
