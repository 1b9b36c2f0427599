//! Service entity: a named business capability and its instances.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::Instance;

/// A logical business capability.
///
/// `instances` is a read-time view: repositories fill it with a follow-up
/// fetch keyed on `service_id` and never store it on the service row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct Service {
    #[schema(example = 1)]
    pub service_id: i32,
    #[schema(example = "billing")]
    pub name: String,
    pub instances: Vec<Instance>,
}

impl Service {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            service_id: 0,
            name: name.into(),
            instances: Vec::new(),
        }
    }

    pub fn add_instance(&mut self, instance: Instance) {
        self.instances.push(instance);
    }

    /// Not yet persisted
    pub fn is_new(&self) -> bool {
        self.service_id == 0
    }
}
