#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Environment Resolver SDK
//!
//! This crate provides the public API for the `environment_resolver` module:
//!
//! - [`EnvironmentResolverClient`] - Public API trait for consumers
//! - [`TenantDirectoryClient`], [`ClusterLocator`], [`DelegationPolicy`] -
//!   collaborator traits the resolver consumes
//! - [`ConnectionConfig`], [`TenantData`], [`TenantRecord`] - models
//! - [`EnvironmentResolverError`] - Error types
//!
//! ## Usage
//!
//! ```ignore
//! use environment_resolver_sdk::EnvironmentResolverClient;
//!
//! let config = resolver.resolve_connection_config(Some(&subject)).await?;
//! let namespace = config.namespace();
//! ```

pub mod api;
pub mod error;
pub mod models;
pub mod plugin_api;

// Re-export main types at crate root
pub use api::EnvironmentResolverClient;
pub use error::{ClusterLocatorError, EnvironmentResolverError, TenantDirectoryError};
pub use models::{
    CHE_TENANT_KIND, ClusterAccess, ConnectionConfig, IMPERSONATION_PLACEHOLDER_GROUP,
    Impersonation, TenantData, TenantRecord, UNKNOWN_ROUTE_BASE_SUFFIX,
};
pub use plugin_api::{ClusterLocator, DelegationPolicy, TenantDirectoryClient};
