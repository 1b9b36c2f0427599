//! HTTP request handlers.

pub mod instance_handler;
pub mod service_handler;

pub use instance_handler::instance_routes;
pub use service_handler::service_routes;
