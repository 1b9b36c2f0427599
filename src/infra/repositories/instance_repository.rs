//! Instance repository: rows of `pika_instance`, by id or by owning service.

use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveValue::NotSet, ColumnTrait, DatabaseTransaction, EntityTrait, QueryFilter, QueryOrder,
    Set,
};

use super::entities::instance::{self, ActiveModel, Entity as InstanceEntity};
use crate::domain::Instance;
use crate::errors::{AppError, AppResult};
use crate::infra::unit_of_work::Session;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Instance repository trait for dependency injection.
///
/// Every mutating operation runs in its own transaction.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait InstanceRepository: Send + Sync {
    /// Instances owned by a service; empty when there are none
    async fn list_by_service(&self, service_id: i32) -> AppResult<Vec<Instance>>;

    /// Find instance by ID
    async fn find_by_id(&self, instance_id: i32) -> AppResult<Option<Instance>>;

    /// Insert the instance and write the generated id back into it
    async fn save(&self, instance: &mut Instance) -> AppResult<()>;

    /// Overwrite name, health-check URL and status of the row with the same instance id
    async fn update(&self, instance: &Instance) -> AppResult<()>;

    /// Delete the row with the same instance id; a missing row is not an error
    async fn delete(&self, instance: &Instance) -> AppResult<()>;

    /// Delete every instance of a service, returning how many were removed
    async fn delete_all_by_service(&self, service_id: i32) -> AppResult<u64>;
}

/// Concrete implementation of InstanceRepository
pub struct InstanceStore {
    session: Session,
}

impl InstanceStore {
    pub fn new(session: Session) -> Self {
        Self { session }
    }
}

#[async_trait]
impl InstanceRepository for InstanceStore {
    async fn list_by_service(&self, service_id: i32) -> AppResult<Vec<Instance>> {
        let models = InstanceEntity::find()
            .filter(instance::Column::ServiceId.eq(service_id))
            .order_by_asc(instance::Column::InstanceId)
            .all(self.session.connection())
            .await
            .map_err(|e| {
                tracing::warn!(service_id, "Error when getting the list of instances: {}", e);
                AppError::from(e)
            })?;

        tracing::debug!(service_id, count = models.len(), "Fetched instances");
        Ok(models.into_iter().map(Instance::from).collect())
    }

    async fn find_by_id(&self, instance_id: i32) -> AppResult<Option<Instance>> {
        let result = InstanceEntity::find_by_id(instance_id)
            .one(self.session.connection())
            .await
            .map_err(AppError::from)?;

        if result.is_none() {
            tracing::debug!(instance_id, "No instance found");
        }
        Ok(result.map(Instance::from))
    }

    async fn save(&self, instance: &mut Instance) -> AppResult<()> {
        let pending = instance.clone();
        let instance_id = crate::with_transaction!(self.session, |ctx| {
            ctx.instances().insert(&pending).await
        })?;

        instance.instance_id = instance_id;
        tracing::debug!(instance_id, service_id = instance.service_id, "Instance saved");
        Ok(())
    }

    async fn update(&self, instance: &Instance) -> AppResult<()> {
        let pending = instance.clone();
        crate::with_transaction!(self.session, |ctx| {
            ctx.instances().update(&pending).await
        })?;

        tracing::debug!(instance_id = instance.instance_id, "Instance updated");
        Ok(())
    }

    async fn delete(&self, instance: &Instance) -> AppResult<()> {
        let instance_id = instance.instance_id;
        let removed = crate::with_transaction!(self.session, |ctx| {
            ctx.instances().delete(instance_id).await
        })?;

        tracing::debug!(instance_id, removed, "Instance deleted");
        Ok(())
    }

    async fn delete_all_by_service(&self, service_id: i32) -> AppResult<u64> {
        let removed = crate::with_transaction!(self.session, |ctx| {
            ctx.instances().delete_all_by_service(service_id).await
        })?;

        tracing::debug!(service_id, removed, "Instances of service deleted");
        Ok(removed)
    }
}

/// Instance statements bound to an open transaction.
///
/// Used by [`InstanceStore`] for its own single-operation transactions and by
/// the service repository to cascade inside the service's transaction.
pub struct TxInstanceRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TxInstanceRepository<'a> {
    pub(crate) fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }

    /// Insert a row and return the id generated by storage
    pub async fn insert(&self, instance: &Instance) -> AppResult<i32> {
        let active_model = ActiveModel {
            instance_id: NotSet,
            service_id: Set(instance.service_id),
            name: Set(instance.name.clone()),
            url_health_check: Set(instance.url_health_check.clone()),
            status: Set(instance.status.clone()),
        };

        let result = InstanceEntity::insert(active_model)
            .exec(self.txn)
            .await
            .map_err(|e| {
                tracing::warn!("Could not insert the instance: {}", e);
                AppError::from(e)
            })?;

        Ok(result.last_insert_id)
    }

    /// Update the row keyed by `instance_id`; the owning service never changes
    pub async fn update(&self, instance: &Instance) -> AppResult<()> {
        let result = InstanceEntity::update_many()
            .col_expr(instance::Column::Name, Expr::value(instance.name.clone()))
            .col_expr(
                instance::Column::UrlHealthCheck,
                Expr::value(instance.url_health_check.clone()),
            )
            .col_expr(instance::Column::Status, Expr::value(instance.status.clone()))
            .filter(instance::Column::InstanceId.eq(instance.instance_id))
            .exec(self.txn)
            .await
            .map_err(AppError::from)?;

        if result.rows_affected == 0 {
            return Err(AppError::instance_not_found(instance.instance_id));
        }

        Ok(())
    }

    pub async fn delete(&self, instance_id: i32) -> AppResult<u64> {
        let result = InstanceEntity::delete_by_id(instance_id)
            .exec(self.txn)
            .await
            .map_err(AppError::from)?;

        Ok(result.rows_affected)
    }

    pub async fn delete_all_by_service(&self, service_id: i32) -> AppResult<u64> {
        let result = InstanceEntity::delete_many()
            .filter(instance::Column::ServiceId.eq(service_id))
            .exec(self.txn)
            .await
            .map_err(AppError::from)?;

        Ok(result.rows_affected)
    }
}
