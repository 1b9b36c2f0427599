//! Schema bootstrap.
//!
//! A single migration creates both tables; it runs at startup and is a no-op
//! once applied.

use sea_orm_migration::prelude::*;

mod m20240101_000001_create_service_tables;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(m20240101_000001_create_service_tables::Migration)]
    }
}
