//! Database connection and schema bootstrap.

use std::time::Duration;

use sea_orm::{
    ConnectOptions, ConnectionTrait, Database as SeaDatabase, DatabaseConnection, DbErr, Statement,
};
use sea_orm_migration::MigratorTrait;

use crate::config::Config;

pub mod migrations;

pub use migrations::Migrator;

/// Database wrapper around the shared, bounded connection pool
#[derive(Clone)]
pub struct Database {
    connection: DatabaseConnection,
}

impl Database {
    /// Open the pool and create the tables if they do not exist yet.
    pub async fn connect(config: &Config) -> Result<Self, DbErr> {
        let db = Self::connect_without_schema(config).await?;
        db.ensure_schema().await?;
        tracing::info!("Database connected and schema ready");
        Ok(db)
    }

    /// Open the pool only.
    pub async fn connect_without_schema(config: &Config) -> Result<Self, DbErr> {
        let mut options = ConnectOptions::new(config.database_url.clone());
        options
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(8))
            .sqlx_logging(false);

        let connection = SeaDatabase::connect(options).await?;
        Ok(Self { connection })
    }

    /// Get a reference to the database connection.
    pub fn connection(&self) -> &DatabaseConnection {
        &self.connection
    }

    /// Get a clone of the database connection.
    pub fn get_connection(&self) -> DatabaseConnection {
        self.connection.clone()
    }

    /// Apply the table definitions that are not yet applied.
    pub async fn ensure_schema(&self) -> Result<(), DbErr> {
        Migrator::up(&self.connection, None).await
    }

    /// Private in-memory SQLite database with the schema applied.
    #[cfg(test)]
    pub(crate) async fn memory() -> Result<Self, DbErr> {
        let config = Config {
            max_connections: 1,
            min_connections: 1,
            ..Config::with_database_url("sqlite::memory:")
        };
        Self::connect(&config).await
    }

    /// Check database connectivity by executing a simple query.
    pub async fn ping(&self) -> Result<(), DbErr> {
        self.connection
            .execute(Statement::from_string(
                self.connection.get_database_backend(),
                "SELECT 1".to_string(),
            ))
            .await?;
        Ok(())
    }
}
