//! Domain layer for the environment resolver.

pub mod error;
pub mod local_client;
pub mod sa_token;
pub mod service;

#[cfg(test)]
mod service_test;

pub use error::DomainError;
pub use local_client::EnvironmentResolverLocalClient;
pub use sa_token::ServiceAccountToken;
pub use service::{Collaborators, Service};
