//! Application state - Dependency injection container.

use std::sync::Arc;

use crate::infra::{Database, InstanceRepository, Persistence, ServiceRepository, UnitOfWork};

/// Application state shared by every handler.
#[derive(Clone)]
pub struct AppState {
    /// Service repository
    pub services: Arc<dyn ServiceRepository>,
    /// Instance repository
    pub instances: Arc<dyn InstanceRepository>,
    /// Database pool, for health checks
    pub database: Arc<Database>,
}

impl AppState {
    /// Create application state with repositories backed by the database.
    pub fn from_database(database: Arc<Database>) -> Self {
        let uow = Persistence::new(database.get_connection());

        Self {
            services: uow.services(),
            instances: uow.instances(),
            database,
        }
    }

    /// Create application state with manually injected repositories.
    pub fn new(
        services: Arc<dyn ServiceRepository>,
        instances: Arc<dyn InstanceRepository>,
        database: Arc<Database>,
    ) -> Self {
        Self {
            services,
            instances,
            database,
        }
    }
}
