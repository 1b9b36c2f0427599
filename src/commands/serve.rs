//! Serve command - Starts the HTTP server.

use std::path::Path;
use std::sync::Arc;

use crate::api::{create_router, AppState};
use crate::cli::args::ServeArgs;
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::infra::Database;

/// Execute the serve command
pub async fn execute(args: ServeArgs, config: Config) -> AppResult<()> {
    display_banner(&config.banner_path);
    tracing::info!("Starting server...");

    // A database that cannot be reached at startup is fatal.
    let db = Database::connect_without_schema(&config)
        .await
        .map_err(AppError::Connect)?;
    db.ensure_schema().await.map_err(AppError::Schema)?;
    tracing::info!("Database connected and schema ready");
    let app_state = AppState::from_database(Arc::new(db));

    let app = create_router(app_state);

    let addr = format!("{}:{}", args.host, args.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind to {}: {}", addr, e)))?;

    tracing::info!("Server running on http://{}", addr);

    axum::serve(listener, app)
        .await
        .map_err(|e| AppError::internal(format!("Server error: {}", e)))?;

    Ok(())
}

/// Log the startup banner line by line; a missing banner only warns.
fn display_banner(path: &str) {
    let banner = match std::fs::read_to_string(Path::new(path)) {
        Ok(banner) => banner,
        Err(e) => {
            tracing::warn!("Could not open banner file '{}': {}", path, e);
            return;
        }
    };

    tracing::info!("-------------------------------------");
    tracing::info!("PIKACHU! I CHOOSE YOU!");
    tracing::info!("-------------------------------------");
    for line in banner.lines() {
        tracing::info!("{}", line);
    }
}
