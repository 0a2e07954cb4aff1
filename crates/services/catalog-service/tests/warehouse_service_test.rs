//! Warehouse service integration tests over the in-memory store.

mod support;

use catalog_service_lib::infra::MemoryStore;
use catalog_service_lib::service::{WarehouseManager, WarehouseService};
use common::AppError;
use domain::{PaginationParams, WarehouseCreationDto, WarehouseUpdateDto};
use support::factory;

fn creation(name: &str) -> WarehouseCreationDto {
    WarehouseCreationDto {
        name: name.to_string(),
        address: format!("{} Industrial Park", name),
    }
}

#[tokio::test]
async fn test_duplicate_warehouse_name_is_rejected() {
    let store = MemoryStore::new();
    let service = WarehouseManager::new(factory(&store));
    service.add(creation("North")).await.unwrap();

    let result = service.add(creation("North")).await;

    assert!(matches!(result, Err(AppError::AlreadyExists(_))));
    let all = service.retrieve_all(PaginationParams::default()).await.unwrap();
    assert_eq!(all.len(), 1);
}

#[tokio::test]
async fn test_modify_overwrites_all_fields() {
    let store = MemoryStore::new();
    let service = WarehouseManager::new(factory(&store));
    let created = service.add(creation("North")).await.unwrap();

    let result = service
        .modify(WarehouseUpdateDto {
            id: created.id,
            name: "South".to_string(),
            address: "2 Quay Street".to_string(),
        })
        .await
        .unwrap();

    assert_eq!(result.name, "South");
    assert_eq!(result.address, "2 Quay Street");
    assert_eq!(service.retrieve_by_id(created.id).await.unwrap().name, "South");
}

#[tokio::test]
async fn test_missing_warehouse_is_not_found() {
    let store = MemoryStore::new();
    let service = WarehouseManager::new(factory(&store));

    let modify = service
        .modify(WarehouseUpdateDto {
            id: 7,
            name: "Ghost".to_string(),
            address: "Nowhere".to_string(),
        })
        .await;

    assert!(matches!(modify, Err(AppError::NotFound(_))));
    assert!(matches!(service.remove(7).await, Err(AppError::NotFound(_))));
    assert!(matches!(service.retrieve_by_id(7).await, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn test_remove_then_list() {
    let store = MemoryStore::new();
    let service = WarehouseManager::new(factory(&store));
    let north = service.add(creation("North")).await.unwrap();
    service.add(creation("South")).await.unwrap();

    tokio_test::assert_ok!(service.remove(north.id).await);

    let remaining = service.retrieve_all(PaginationParams::new(1, 10)).await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].name, "South");
}
