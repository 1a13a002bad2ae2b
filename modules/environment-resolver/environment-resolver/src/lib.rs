//! Environment Resolver Module
//!
//! Resolves, for an authenticated subject, the namespace and cluster
//! credentials that workspace provisioning must use on its behalf:
//!
//! 1. rejects absent and anonymous subjects
//! 2. looks up tenant data (or synthesizes it for guessed subjects)
//! 3. refuses tenants whose cluster is out of capacity
//! 4. picks the delegated (service account + impersonation) or direct
//!    (user token) credential strategy
//!
//! The module hands out an `EnvironmentResolverClient` from `init()`.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod config;
pub mod domain;
pub mod module;

pub use config::EnvironmentResolverConfig;
pub use domain::{Collaborators, ServiceAccountToken};
pub use module::EnvironmentResolver;
