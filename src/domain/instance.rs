//! Instance entity: one deployed endpoint of a service.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A deployed endpoint belonging to exactly one [`Service`](super::Service).
///
/// An instance decoded from a request body carries `instance_id == 0` until
/// it is saved; the id is assigned by storage and never changes afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct Instance {
    #[schema(example = 1)]
    pub instance_id: i32,
    #[schema(example = 1)]
    pub service_id: i32,
    #[schema(example = "billing-1")]
    pub name: String,
    #[schema(example = "http://billing-1.internal/health")]
    pub url_health_check: String,
    #[schema(example = "UP")]
    pub status: String,
}

impl Instance {
    pub fn new(
        service_id: i32,
        name: impl Into<String>,
        url_health_check: impl Into<String>,
        status: impl Into<String>,
    ) -> Self {
        Self {
            instance_id: 0,
            service_id,
            name: name.into(),
            url_health_check: url_health_check.into(),
            status: status.into(),
        }
    }

    /// Not yet persisted
    pub fn is_new(&self) -> bool {
        self.instance_id == 0
    }
}
