//! Pika - REST registry of services and their deployed instances.
//!
//! A service is a named logical application; an instance is one running
//! deployment of it, with a health-check URL and a free-form status.
//!
//! # Architecture Layers
//!
//! - **cli**: Command-line interface
//! - **commands**: CLI command implementations
//! - **config**: Application configuration and constants
//! - **domain**: Service and instance records
//! - **infra**: Connection pool, storage session and repositories
//! - **api**: HTTP handlers, extractors and routes
//! - **errors**: Centralized error handling
//!
//! # CLI Usage
//!
//! ```bash
//! # Start the server
//! cargo run -- serve --port 3000
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;

// Re-export commonly used types at crate root
pub use api::{create_router, AppState};
pub use config::Config;
pub use domain::{Instance, Service};
pub use errors::{AppError, AppResult};
pub use infra::Database;
