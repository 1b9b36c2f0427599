//! Service row entity for SeaORM.

use sea_orm::entity::prelude::*;

use crate::domain::Service;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "pika_service")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub service_id: i32,
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Convert a row to a service whose instances are not loaded yet
impl From<Model> for Service {
    fn from(model: Model) -> Self {
        Service {
            service_id: model.service_id,
            name: model.name,
            instances: Vec::new(),
        }
    }
}
