//! Shared fixtures: a private in-memory SQLite database per test.

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;

use pika::api::{create_router, AppState};
use pika::config::Config;
use pika::infra::{Database, Persistence, UnitOfWork};

/// Fresh database with the schema applied.
///
/// Every in-memory SQLite connection is its own database, so the pool is
/// pinned to a single connection.
pub async fn database() -> Arc<Database> {
    let config = Config {
        max_connections: 1,
        min_connections: 1,
        ..Config::with_database_url("sqlite::memory:")
    };
    let db = Database::connect(&config)
        .await
        .expect("in-memory database should open");
    Arc::new(db)
}

/// Repositories over a fresh database.
pub async fn persistence() -> Persistence {
    let db = database().await;
    Persistence::new(db.get_connection())
}

/// Full router over a fresh database.
pub async fn app() -> Router {
    create_router(AppState::from_database(database().await))
}

/// Router and the unit of work it shares, for seeding through repositories.
pub async fn app_with_persistence() -> (Router, Persistence) {
    let db = database().await;
    let persistence = Persistence::new(db.get_connection());
    let state = AppState::new(persistence.services(), persistence.instances(), db);
    (create_router(state), persistence)
}
