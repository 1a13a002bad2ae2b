#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Static Delegation Policy Plugin
//!
//! Decides per user whether the environment resolver connects with the
//! service-account token and impersonation, or with the user's own token.
//!
//! ## Modes
//!
//! - **`disabled`** (default): every user connects with their own token.
//! - **`all`**: every user is delegated.
//! - **`users`**: only users listed in `users` are delegated.
//!
//! ## Configuration
//!
//! ```yaml
//! delegation:
//!   mode: users
//!   users: ["alice", "bob"]
//! ```

pub mod config;
pub mod domain;

pub use config::{DelegationMode, StaticDelegationPluginConfig};
pub use domain::Service as StaticDelegationPolicy;
