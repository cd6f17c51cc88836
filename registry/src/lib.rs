//! Registry core: the service object behind the publisher-registry UI.
//!
//! Coordinates the subsystems the UI never sees directly:
//! - resolves and caches domain lifecycle stages from raw ledger state
//! - serializes operations per domain
//! - wires parameter store, validator, submitter, and voting together
//! - publishes stage changes on the event bus

pub mod config;
pub mod error;
pub mod locks;
pub mod logging;
pub mod registry;
pub mod resolver;

pub use config::RegistryConfig;
pub use error::RegistryError;
pub use locks::DomainLocks;
pub use logging::{init_logging, LogFormat};
pub use registry::Registry;
pub use resolver::{StatusError, StatusResolver};
