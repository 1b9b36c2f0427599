//! Repository tests against a real (in-memory SQLite) database.

mod common;

use sea_orm::ConnectionTrait;
use tokio_test::assert_ok;

use pika::domain::{Instance, Service};
use pika::errors::AppError;
use pika::infra::{Persistence, UnitOfWork};

fn billing() -> Service {
    let mut service = Service::new("billing");
    service.add_instance(Instance::new(0, "billing-1", "http://b1/health", "UP"));
    service.add_instance(Instance::new(0, "billing-2", "http://b2/health", "DOWN"));
    service
}

#[tokio::test]
async fn test_saved_service_reads_back_with_its_instances() {
    let uow = common::persistence().await;
    let services = uow.services();

    let mut service = billing();
    services.save(&mut service).await.unwrap();

    let found = services
        .find_by_id(service.service_id)
        .await
        .unwrap()
        .expect("service should exist");

    assert_eq!(found, service);
    assert_eq!(found.instances.len(), 2);
    assert!(found
        .instances
        .iter()
        .all(|i| i.service_id == service.service_id));
}

#[tokio::test]
async fn test_list_all_returns_every_service() {
    let uow = common::persistence().await;
    let services = uow.services();

    assert!(services.list_all().await.unwrap().is_empty());

    let mut first = billing();
    let mut second = Service::new("search");
    services.save(&mut first).await.unwrap();
    services.save(&mut second).await.unwrap();

    let all = services.list_all().await.unwrap();
    assert_eq!(all, vec![first, second]);
}

#[tokio::test]
async fn test_ids_are_unique_and_stable() {
    let uow = common::persistence().await;
    let services = uow.services();
    let instances = uow.instances();

    let mut service = billing();
    services.save(&mut service).await.unwrap();
    let original_id = service.instances[0].instance_id;

    let mut renamed = service.instances[0].clone();
    renamed.name = "billing-1b".to_string();
    renamed.status = "DOWN".to_string();
    instances.update(&renamed).await.unwrap();

    let found = instances.find_by_id(original_id).await.unwrap().unwrap();
    assert_eq!(found.instance_id, original_id);
    assert_eq!(found.name, "billing-1b");
    assert_ne!(
        service.instances[0].instance_id,
        service.instances[1].instance_id
    );
}

#[tokio::test]
async fn test_instance_update_leaves_siblings_untouched() {
    let uow = common::persistence().await;
    let services = uow.services();
    let instances = uow.instances();

    let mut service = billing();
    services.save(&mut service).await.unwrap();

    let mut changed = service.instances[1].clone();
    changed.url_health_check = "http://b2/ready".to_string();
    instances.update(&changed).await.unwrap();

    let listed = instances.list_by_service(service.service_id).await.unwrap();
    assert_eq!(listed[0], service.instances[0]);
    assert_eq!(listed[1], changed);
}

#[tokio::test]
async fn test_update_of_missing_rows_is_not_found() {
    let uow = common::persistence().await;

    let mut ghost = Service::new("ghost");
    ghost.service_id = 404;
    let result = uow.services().update(&ghost).await;
    assert!(matches!(result, Err(AppError::NotFound(_))));

    let mut instance = Instance::new(1, "ghost-1", "http://g", "UP");
    instance.instance_id = 404;
    let result = uow.instances().update(&instance).await;
    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn test_instance_save_under_existing_service() {
    let uow = common::persistence().await;
    let mut service = Service::new("search");
    uow.services().save(&mut service).await.unwrap();

    let mut instance = Instance::new(service.service_id, "search-1", "http://s1", "UP");
    uow.instances().save(&mut instance).await.unwrap();

    assert!(!instance.is_new());
    let found = uow.services().find_by_id(service.service_id).await.unwrap().unwrap();
    assert_eq!(found.instances, vec![instance]);
}

#[tokio::test]
async fn test_delete_service_removes_its_instances() {
    let uow = common::persistence().await;
    let services = uow.services();
    let instances = uow.instances();

    let mut doomed = billing();
    let mut kept = Service::new("search");
    kept.add_instance(Instance::new(0, "search-1", "http://s1", "UP"));
    services.save(&mut doomed).await.unwrap();
    services.save(&mut kept).await.unwrap();

    services.delete(&doomed).await.unwrap();

    assert!(services.find_by_id(doomed.service_id).await.unwrap().is_none());
    for instance in &doomed.instances {
        assert!(instances.find_by_id(instance.instance_id).await.unwrap().is_none());
    }
    assert_eq!(
        instances.list_by_service(kept.service_id).await.unwrap(),
        kept.instances
    );
}

#[tokio::test]
async fn test_delete_is_idempotent() {
    let uow = common::persistence().await;

    let mut service = billing();
    uow.services().save(&mut service).await.unwrap();
    let instance = service.instances[0].clone();

    assert_ok!(uow.instances().delete(&instance).await);
    assert_ok!(uow.instances().delete(&instance).await);

    assert_ok!(uow.services().delete(&service).await);
    assert_ok!(uow.services().delete(&service).await);
}

#[tokio::test]
async fn test_delete_all_by_service_reports_the_count() {
    let uow = common::persistence().await;
    let mut service = billing();
    uow.services().save(&mut service).await.unwrap();

    let instances = uow.instances();
    assert_eq!(instances.delete_all_by_service(service.service_id).await.unwrap(), 2);
    assert_eq!(instances.delete_all_by_service(service.service_id).await.unwrap(), 0);
    assert!(instances
        .list_by_service(service.service_id)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_unknown_service_has_no_instances() {
    let uow = common::persistence().await;

    assert!(uow.instances().list_by_service(777).await.unwrap().is_empty());
    assert!(uow.instances().find_by_id(777).await.unwrap().is_none());
}

#[tokio::test]
async fn test_failed_instance_insert_leaves_no_service_behind() {
    let db = common::database().await;
    let uow = Persistence::new(db.get_connection());
    db.connection()
        .execute_unprepared("DROP TABLE pika_instance")
        .await
        .unwrap();

    let mut service = billing();
    let result = uow.services().save(&mut service).await;

    assert!(matches!(result, Err(AppError::Database(_))));
    assert!(service.is_new());
    assert!(service.instances.iter().all(Instance::is_new));
    // No service rows, so listing never reaches the missing instance table.
    assert!(uow.services().list_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_failed_service_delete_keeps_its_instances() {
    let db = common::database().await;
    let uow = Persistence::new(db.get_connection());
    let mut service = billing();
    uow.services().save(&mut service).await.unwrap();

    db.connection()
        .execute_unprepared(
            "CREATE TRIGGER keep_services BEFORE DELETE ON pika_service \
             BEGIN SELECT RAISE(ABORT, 'service rows are locked'); END",
        )
        .await
        .unwrap();

    let result = uow.services().delete(&service).await;

    assert!(matches!(result, Err(AppError::Database(_))));
    let found = uow
        .services()
        .find_by_id(service.service_id)
        .await
        .unwrap()
        .expect("service should survive the failed delete");
    assert_eq!(found.instances, service.instances);
}
