//! Instance handlers.

use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};

use crate::api::extractors::{IdPath, JsonBody};
use crate::api::AppState;
use crate::domain::Instance;
use crate::errors::{AppError, AppResult};

/// Create instance routes
pub fn instance_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/service/:service_id/instance",
            get(list_instances).post(create_instance),
        )
        .route(
            "/instance/:instance_id",
            get(get_instance).put(update_instance).delete(delete_instance),
        )
}

/// List the instances of a service
#[utoipa::path(
    get,
    path = "/service/{service_id}/instance",
    tag = "Instances",
    params(("service_id" = i32, Path, description = "Owning service ID")),
    responses(
        (status = 200, description = "Instances of the service, possibly none", body = [Instance]),
        (status = 404, description = "Service not found", body = JsonErr)
    )
)]
pub async fn list_instances(
    State(state): State<AppState>,
    IdPath(service_id): IdPath,
) -> AppResult<Json<Vec<Instance>>> {
    let service = state
        .services
        .find_by_id(service_id)
        .await?
        .ok_or_else(|| AppError::service_not_found(service_id))?;

    tracing::info!(service_id, count = service.instances.len(), "Found instances");
    Ok(Json(service.instances))
}

/// Register an instance under a service; the path ID wins over the body
#[utoipa::path(
    post,
    path = "/service/{service_id}/instance",
    tag = "Instances",
    params(("service_id" = i32, Path, description = "Owning service ID")),
    request_body = Instance,
    responses(
        (status = 201, description = "Instance created", body = Instance),
        (status = 404, description = "Service not found", body = JsonErr),
        (status = 422, description = "Malformed body", body = JsonErr)
    )
)]
pub async fn create_instance(
    State(state): State<AppState>,
    IdPath(service_id): IdPath,
    JsonBody(mut instance): JsonBody<Instance>,
) -> AppResult<(StatusCode, Json<Instance>)> {
    if state.services.find_by_id(service_id).await?.is_none() {
        return Err(AppError::service_not_found(service_id));
    }

    tracing::info!(service_id, name = %instance.name, "Creating new instance");
    instance.service_id = service_id;
    state.instances.save(&mut instance).await?;

    Ok((StatusCode::CREATED, Json(instance)))
}

/// Get an instance by ID
#[utoipa::path(
    get,
    path = "/instance/{instance_id}",
    tag = "Instances",
    params(("instance_id" = i32, Path, description = "Instance ID")),
    responses(
        (status = 200, description = "Instance found", body = Instance),
        (status = 404, description = "Instance not found", body = JsonErr)
    )
)]
pub async fn get_instance(
    State(state): State<AppState>,
    IdPath(instance_id): IdPath,
) -> AppResult<Json<Instance>> {
    let instance = state
        .instances
        .find_by_id(instance_id)
        .await?
        .ok_or_else(|| AppError::instance_not_found(instance_id))?;

    tracing::info!(instance_id, "Found instance");
    Ok(Json(instance))
}

/// Update name, health-check URL and status of an instance
#[utoipa::path(
    put,
    path = "/instance/{instance_id}",
    tag = "Instances",
    params(("instance_id" = i32, Path, description = "Instance ID")),
    request_body = Instance,
    responses(
        (status = 200, description = "Instance updated", body = Instance),
        (status = 404, description = "Instance not found", body = JsonErr),
        (status = 422, description = "Malformed body", body = JsonErr)
    )
)]
pub async fn update_instance(
    State(state): State<AppState>,
    IdPath(instance_id): IdPath,
    JsonBody(mut instance): JsonBody<Instance>,
) -> AppResult<Json<Instance>> {
    let existing = state
        .instances
        .find_by_id(instance_id)
        .await?
        .ok_or_else(|| AppError::instance_not_found(instance_id))?;

    tracing::info!(instance_id, "Updating instance");
    instance.instance_id = instance_id;
    instance.service_id = existing.service_id;
    state.instances.update(&instance).await?;

    Ok(Json(instance))
}

/// Delete an instance
#[utoipa::path(
    delete,
    path = "/instance/{instance_id}",
    tag = "Instances",
    params(("instance_id" = i32, Path, description = "Instance ID")),
    responses(
        (status = 204, description = "Instance deleted, or already absent")
    )
)]
pub async fn delete_instance(
    State(state): State<AppState>,
    IdPath(instance_id): IdPath,
) -> AppResult<StatusCode> {
    tracing::info!(instance_id, "Deleting instance");
    let instance = Instance {
        instance_id,
        ..Instance::default()
    };
    state.instances.delete(&instance).await?;

    Ok(StatusCode::NO_CONTENT)
}
