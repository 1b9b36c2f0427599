//! Infrastructure layer - Storage concerns
//!
//! - Database pool and schema bootstrap
//! - Row entities and repositories
//! - Storage session (transactional scope) and Unit of Work

pub mod db;
pub mod repositories;
pub mod unit_of_work;

pub use db::{Database, Migrator};
pub use repositories::{InstanceRepository, InstanceStore, ServiceRepository, ServiceStore};
pub use unit_of_work::{Persistence, Session, TransactionContext, UnitOfWork};

#[cfg(any(test, feature = "test-utils"))]
pub use repositories::{MockInstanceRepository, MockServiceRepository};
