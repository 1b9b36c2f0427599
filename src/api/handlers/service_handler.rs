//! Service handlers.

use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};

use crate::api::extractors::{IdPath, JsonBody};
use crate::api::AppState;
use crate::domain::Service;
use crate::errors::{AppError, AppResult};

/// Create service routes
pub fn service_routes() -> Router<AppState> {
    Router::new()
        .route("/service", get(list_services).post(create_service))
        .route(
            "/service/:service_id",
            get(get_service).put(update_service).delete(delete_service),
        )
}

/// List every service with its instances
#[utoipa::path(
    get,
    path = "/service",
    tag = "Services",
    responses(
        (status = 200, description = "All services, possibly none", body = [Service]),
        (status = 500, description = "Storage failure", body = JsonErr)
    )
)]
pub async fn list_services(State(state): State<AppState>) -> AppResult<Json<Vec<Service>>> {
    tracing::info!("Fetching services");
    let services = state.services.list_all().await?;
    Ok(Json(services))
}

/// Get a service by ID
#[utoipa::path(
    get,
    path = "/service/{service_id}",
    tag = "Services",
    params(("service_id" = i32, Path, description = "Service ID")),
    responses(
        (status = 200, description = "Service found", body = Service),
        (status = 404, description = "Service not found", body = JsonErr)
    )
)]
pub async fn get_service(
    State(state): State<AppState>,
    IdPath(service_id): IdPath,
) -> AppResult<Json<Service>> {
    tracing::info!(service_id, "Fetching service");
    let service = state
        .services
        .find_by_id(service_id)
        .await?
        .ok_or_else(|| AppError::service_not_found(service_id))?;

    Ok(Json(service))
}

/// Create a service, together with the instances given in the body
#[utoipa::path(
    post,
    path = "/service",
    tag = "Services",
    request_body = Service,
    responses(
        (status = 201, description = "Service created", body = Service),
        (status = 422, description = "Malformed body", body = JsonErr)
    )
)]
pub async fn create_service(
    State(state): State<AppState>,
    JsonBody(mut service): JsonBody<Service>,
) -> AppResult<(StatusCode, Json<Service>)> {
    tracing::info!(name = %service.name, "Creating new service");
    state.services.save(&mut service).await?;

    Ok((StatusCode::CREATED, Json(service)))
}

/// Rename a service; the path ID wins over the body
#[utoipa::path(
    put,
    path = "/service/{service_id}",
    tag = "Services",
    params(("service_id" = i32, Path, description = "Service ID")),
    request_body = Service,
    responses(
        (status = 200, description = "Service updated", body = Service),
        (status = 404, description = "Service not found", body = JsonErr),
        (status = 422, description = "Malformed body", body = JsonErr)
    )
)]
pub async fn update_service(
    State(state): State<AppState>,
    IdPath(service_id): IdPath,
    JsonBody(mut service): JsonBody<Service>,
) -> AppResult<Json<Service>> {
    let existing = state
        .services
        .find_by_id(service_id)
        .await?
        .ok_or_else(|| AppError::service_not_found(service_id))?;

    tracing::info!(service_id, "Updating service");
    service.service_id = service_id;
    state.services.update(&service).await?;

    // Instances are managed through their own endpoints.
    service.instances = existing.instances;
    Ok(Json(service))
}

/// Delete a service and all of its instances
#[utoipa::path(
    delete,
    path = "/service/{service_id}",
    tag = "Services",
    params(("service_id" = i32, Path, description = "Service ID")),
    responses(
        (status = 204, description = "Service deleted, or already absent")
    )
)]
pub async fn delete_service(
    State(state): State<AppState>,
    IdPath(service_id): IdPath,
) -> AppResult<StatusCode> {
    tracing::info!(service_id, "Deleting service");
    let service = Service {
        service_id,
        ..Service::default()
    };
    state.services.delete(&service).await?;

    Ok(StatusCode::NO_CONTENT)
}
