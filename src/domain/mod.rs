//! Domain layer - Core business entities
//!
//! Disconnected value objects: created in memory (usually decoded from a
//! request body), persisted through the repositories, and free of any
//! storage types.

pub mod instance;
pub mod service;

pub use instance::Instance;
pub use service::Service;
