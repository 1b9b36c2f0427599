//! Repository layer - Data access abstraction
//!
//! Each store reads through the pooled connection and writes through its own
//! transaction. The `Tx*` repositories run the same statements against a
//! transaction opened by someone else.

pub(crate) mod entities;
mod instance_repository;
mod service_repository;

pub use instance_repository::{InstanceRepository, InstanceStore, TxInstanceRepository};
pub use service_repository::{ServiceRepository, ServiceStore, TxServiceRepository};

// Export mocks for tests (both unit and integration)
#[cfg(any(test, feature = "test-utils"))]
pub use instance_repository::MockInstanceRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use service_repository::MockServiceRepository;
