//! Instance row entity for SeaORM.

use sea_orm::entity::prelude::*;

use crate::domain::Instance;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "pika_instance")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub instance_id: i32,
    pub service_id: i32,
    pub name: String,
    pub url_health_check: String,
    pub status: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Instance {
    fn from(model: Model) -> Self {
        Instance {
            instance_id: model.instance_id,
            service_id: model.service_id,
            name: model.name,
            url_health_check: model.url_health_check,
            status: model.status,
        }
    }
}
