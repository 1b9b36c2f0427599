//! OpenAPI documentation configuration.
//!
//! Provides Swagger UI for API exploration and testing.

use utoipa::OpenApi;

use crate::api::handlers::{instance_handler, service_handler};
use crate::domain::{Instance, Service};
use crate::errors::JsonErr;

/// OpenAPI documentation for the registry
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Pika",
        version = "0.1.0",
        description = "Registry of services and their deployed instances",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server")
    ),
    paths(
        // Service endpoints
        service_handler::list_services,
        service_handler::get_service,
        service_handler::create_service,
        service_handler::update_service,
        service_handler::delete_service,
        // Instance endpoints
        instance_handler::list_instances,
        instance_handler::create_instance,
        instance_handler::get_instance,
        instance_handler::update_instance,
        instance_handler::delete_instance,
    ),
    components(schemas(Service, Instance, JsonErr)),
    tags(
        (name = "Services", description = "Business capabilities"),
        (name = "Instances", description = "Deployed endpoints of a service")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_every_resource_path() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();

        for expected in [
            "/service",
            "/service/{service_id}",
            "/service/{service_id}/instance",
            "/instance/{instance_id}",
        ] {
            assert!(paths.iter().any(|p| p.as_str() == expected), "missing {}", expected);
        }
    }
}
