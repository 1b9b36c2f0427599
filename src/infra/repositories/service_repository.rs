//! Service repository: rows of `pika_service` and the cascade to their instances.
//!
//! Reads hydrate `Service::instances` through the instance repository.
//! Save and delete cover the service row and its instance rows in a single
//! transaction, so a service and its instances appear and disappear together.

use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveValue::NotSet, ColumnTrait, DatabaseTransaction, EntityTrait, QueryFilter, QueryOrder,
    Set,
};

use super::entities::service::{self, ActiveModel, Entity as ServiceEntity};
use super::InstanceRepository;
use crate::domain::Service;
use crate::errors::{AppError, AppResult};
use crate::infra::unit_of_work::Session;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Service repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ServiceRepository: Send + Sync {
    /// List all services with their instances
    async fn list_all(&self) -> AppResult<Vec<Service>>;

    /// Find service by ID, with its instances
    async fn find_by_id(&self, service_id: i32) -> AppResult<Option<Service>>;

    /// Insert the service and its instances, writing every generated id back
    async fn save(&self, service: &mut Service) -> AppResult<()>;

    /// Rename the service; its instances are left untouched
    async fn update(&self, service: &Service) -> AppResult<()>;

    /// Delete the service and all of its instances
    async fn delete(&self, service: &Service) -> AppResult<()>;
}

/// Concrete implementation of ServiceRepository
pub struct ServiceStore {
    session: Session,
    instances: Arc<dyn InstanceRepository>,
}

impl ServiceStore {
    pub fn new(session: Session, instances: Arc<dyn InstanceRepository>) -> Self {
        Self { session, instances }
    }

    async fn hydrate(&self, service: &mut Service) -> AppResult<()> {
        service.instances = self.instances.list_by_service(service.service_id).await?;
        Ok(())
    }
}

#[async_trait]
impl ServiceRepository for ServiceStore {
    async fn list_all(&self) -> AppResult<Vec<Service>> {
        let models = ServiceEntity::find()
            .order_by_asc(service::Column::ServiceId)
            .all(self.session.connection())
            .await
            .map_err(|e| {
                tracing::warn!("Error when getting the list of services: {}", e);
                AppError::from(e)
            })?;

        let mut services: Vec<Service> = models.into_iter().map(Service::from).collect();
        for service in services.iter_mut() {
            self.hydrate(service).await?;
        }

        tracing::debug!(count = services.len(), "Fetched services");
        Ok(services)
    }

    async fn find_by_id(&self, service_id: i32) -> AppResult<Option<Service>> {
        let result = ServiceEntity::find_by_id(service_id)
            .one(self.session.connection())
            .await
            .map_err(AppError::from)?;

        match result {
            Some(model) => {
                let mut service = Service::from(model);
                self.hydrate(&mut service).await?;
                Ok(Some(service))
            }
            None => {
                tracing::debug!(service_id, "No service found");
                Ok(None)
            }
        }
    }

    async fn save(&self, service: &mut Service) -> AppResult<()> {
        let pending = service.clone();
        let saved = crate::with_transaction!(self.session, |ctx| {
            let mut service = pending;
            service.service_id = ctx.services().insert(&service.name).await?;

            // Children follow the freshly assigned parent id.
            let instances = ctx.instances();
            for instance in service.instances.iter_mut() {
                instance.service_id = service.service_id;
                instance.instance_id = instances.insert(instance).await?;
            }

            Ok::<_, AppError>(service)
        })?;

        tracing::debug!(
            service_id = saved.service_id,
            instances = saved.instances.len(),
            "Service saved"
        );
        *service = saved;
        Ok(())
    }

    async fn update(&self, service: &Service) -> AppResult<()> {
        let service_id = service.service_id;
        let name = service.name.clone();
        crate::with_transaction!(self.session, |ctx| {
            ctx.services().update(service_id, name).await
        })?;

        tracing::debug!(service_id, "Service updated");
        Ok(())
    }

    async fn delete(&self, service: &Service) -> AppResult<()> {
        let service_id = service.service_id;
        let removed = crate::with_transaction!(self.session, |ctx| {
            let instances = ctx.instances().delete_all_by_service(service_id).await?;
            ctx.services().delete(service_id).await?;
            Ok::<_, AppError>(instances)
        })?;

        tracing::debug!(service_id, instances = removed, "Service deleted");
        Ok(())
    }
}

/// Service statements bound to an open transaction.
pub struct TxServiceRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TxServiceRepository<'a> {
    pub(crate) fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }

    /// Insert a row and return the id generated by storage
    pub async fn insert(&self, name: &str) -> AppResult<i32> {
        let active_model = ActiveModel {
            service_id: NotSet,
            name: Set(name.to_string()),
        };

        let result = ServiceEntity::insert(active_model)
            .exec(self.txn)
            .await
            .map_err(|e| {
                tracing::warn!("Could not insert the service: {}", e);
                AppError::from(e)
            })?;

        Ok(result.last_insert_id)
    }

    pub async fn update(&self, service_id: i32, name: String) -> AppResult<()> {
        let result = ServiceEntity::update_many()
            .col_expr(service::Column::Name, Expr::value(name))
            .filter(service::Column::ServiceId.eq(service_id))
            .exec(self.txn)
            .await
            .map_err(AppError::from)?;

        if result.rows_affected == 0 {
            return Err(AppError::service_not_found(service_id));
        }

        Ok(())
    }

    pub async fn delete(&self, service_id: i32) -> AppResult<u64> {
        let result = ServiceEntity::delete_by_id(service_id)
            .exec(self.txn)
            .await
            .map_err(AppError::from)?;

        Ok(result.rows_affected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Instance;
    use crate::infra::repositories::MockInstanceRepository;
    use crate::infra::Database;
    use mockall::predicate::eq;

    async fn session() -> Session {
        let db = Database::memory()
            .await
            .expect("in-memory database should open");
        Session::new(db.get_connection())
    }

    #[tokio::test]
    async fn test_save_without_instances_never_touches_instance_repository() {
        // No expectations: any call on the mock panics.
        let store = ServiceStore::new(session().await, Arc::new(MockInstanceRepository::new()));

        let mut service = Service::new("billing");
        store.save(&mut service).await.unwrap();

        assert!(service.service_id > 0);
        assert!(service.instances.is_empty());
    }

    #[tokio::test]
    async fn test_save_persists_instances_in_the_service_transaction() {
        let store = ServiceStore::new(session().await, Arc::new(MockInstanceRepository::new()));

        let mut service = Service::new("billing");
        service.add_instance(Instance::new(0, "billing-1", "http://b1", "UP"));
        service.add_instance(Instance::new(99, "billing-2", "http://b2", "DOWN"));
        store.save(&mut service).await.unwrap();

        for instance in &service.instances {
            assert!(instance.instance_id > 0);
            assert_eq!(instance.service_id, service.service_id);
        }
        assert_ne!(
            service.instances[0].instance_id,
            service.instances[1].instance_id
        );
    }

    #[tokio::test]
    async fn test_list_all_hydrates_each_service() {
        let store = ServiceStore::new(session().await, Arc::new(MockInstanceRepository::new()));
        let mut first = Service::new("billing");
        let mut second = Service::new("search");
        store.save(&mut first).await.unwrap();
        store.save(&mut second).await.unwrap();

        let mut instances = MockInstanceRepository::new();
        let first_id = first.service_id;
        instances
            .expect_list_by_service()
            .with(eq(first_id))
            .times(1)
            .returning(|id| Ok(vec![Instance::new(id, "billing-1", "http://b1", "UP")]));
        instances
            .expect_list_by_service()
            .with(eq(second.service_id))
            .times(1)
            .returning(|_| Ok(vec![]));

        let store = ServiceStore::new(store.session.clone(), Arc::new(instances));
        let services = store.list_all().await.unwrap();

        assert_eq!(services.len(), 2);
        let billing = services.iter().find(|s| s.service_id == first_id).unwrap();
        assert_eq!(billing.instances.len(), 1);
    }

    #[tokio::test]
    async fn test_find_missing_service_skips_hydration() {
        let store = ServiceStore::new(session().await, Arc::new(MockInstanceRepository::new()));

        assert!(store.find_by_id(4242).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_hydration_failure_is_reported() {
        let session = session().await;
        let seed = ServiceStore::new(session.clone(), Arc::new(MockInstanceRepository::new()));
        let mut service = Service::new("billing");
        seed.save(&mut service).await.unwrap();

        let mut instances = MockInstanceRepository::new();
        instances
            .expect_list_by_service()
            .returning(|_| Err(AppError::internal("instance table unavailable")));

        let store = ServiceStore::new(session, Arc::new(instances));
        let result = store.find_by_id(service.service_id).await;

        assert!(matches!(result, Err(AppError::Internal(_))));
    }
}
