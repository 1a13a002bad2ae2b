#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Static Tenant Directory Plugin
//!
//! Serves tenant records and the cluster proxy URL from configuration, for
//! development and testing without a tenant service.
//!
//! ## Configuration
//!
//! ```yaml
//! tenant_directory:
//!   cluster_url: "https://cluster-proxy.example"
//!   route_base_suffix: "apps.example"
//!   namespace_template: "{user_id}-che"
//!   tenants:
//!     - user_id: alice
//!       namespace: alice-che
//!     - user_id: bob
//!       namespace: bob-che
//!       cluster_capacity_exhausted: true
//! ```
//!
//! Users without an explicit entry get a namespace rendered from
//! `namespace_template`; without a template they are not found.

pub mod config;
pub mod domain;

pub use config::{StaticTenantDirectoryPluginConfig, TenantMapping};
pub use domain::{Service as StaticTenantDirectory, StaticClusterLocator};
