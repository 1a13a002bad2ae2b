mod client;
pub mod locator;
pub mod service;

pub use locator::StaticClusterLocator;
pub use service::Service;
