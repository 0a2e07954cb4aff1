//! Product service integration tests over the in-memory store.

mod support;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use rust_decimal::Decimal;

use catalog_service_lib::infra::{MemoryStore, UnitOfWorkFactory};
use catalog_service_lib::repository::Query;
use catalog_service_lib::service::{
    AttachmentManager, AttachmentService, ProductManager, ProductService,
};
use common::{AppError, AppResult};
use domain::{
    Attachment, AttachmentCreationDto, Filter, OrderItem, PaginationParams, ProductUpdateDto,
};
use support::{factory, product_dto, seed_category, seed_stock};

/// AttachmentService double that records every removal
struct RecordingAttachments {
    next_id: AtomicUsize,
    removed: Mutex<Vec<i64>>,
}

impl RecordingAttachments {
    fn new() -> Self {
        Self {
            next_id: AtomicUsize::new(100),
            removed: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl AttachmentService for RecordingAttachments {
    async fn upload(&self, dto: AttachmentCreationDto) -> AppResult<Attachment> {
        let mut attachment = Attachment::new(dto.file_name, "memory");
        attachment.id = self.next_id.fetch_add(1, Ordering::SeqCst) as i64;
        Ok(attachment)
    }

    async fn remove(&self, attachment: &Attachment) -> AppResult<()> {
        self.removed.lock().push(attachment.id);
        Ok(())
    }
}

fn manager(store: &MemoryStore) -> ProductManager {
    ProductManager::new(factory(store), Arc::new(RecordingAttachments::new()))
}

async fn count_products(store: &MemoryStore) -> usize {
    let uow = store.begin().await.unwrap();
    let products = uow.products().select_all(Query::new()).await.unwrap();
    products.len()
}

#[tokio::test]
async fn test_add_result_matches_input() {
    let store = MemoryStore::new();
    let category = seed_category(&store, "Tea").await;
    let service = manager(&store);

    let result = service
        .add(product_dto("Sencha", 850, category.id))
        .await
        .unwrap();

    assert!(result.id > 0);
    assert_eq!(result.name, "Sencha");
    assert_eq!(result.price, Decimal::new(850, 2));
    assert_eq!(result.category_id, category.id);
    assert_eq!(result.category.map(|c| c.name), Some("Tea".to_string()));
}

#[tokio::test]
async fn test_add_duplicate_name_is_rejected_without_mutation() {
    let store = MemoryStore::new();
    let category = seed_category(&store, "Tea").await;
    let service = manager(&store);
    service
        .add(product_dto("Sencha", 850, category.id))
        .await
        .unwrap();

    let result = service.add(product_dto("Sencha", 900, category.id)).await;

    assert!(matches!(result, Err(AppError::AlreadyExists(_))));
    assert_eq!(count_products(&store).await, 1);
}

#[tokio::test]
async fn test_name_uniqueness_is_case_sensitive() {
    let store = MemoryStore::new();
    let category = seed_category(&store, "Tea").await;
    let service = manager(&store);
    service
        .add(product_dto("Sencha", 850, category.id))
        .await
        .unwrap();

    let result = service.add(product_dto("sencha", 850, category.id)).await;

    assert!(result.is_ok());
}

#[tokio::test]
async fn test_modify_overwrites_fields_and_category() {
    let store = MemoryStore::new();
    let tea = seed_category(&store, "Tea").await;
    let herbal = seed_category(&store, "Herbal").await;
    let service = manager(&store);
    let created = service
        .add(domain::ProductCreationDto {
            description: Some("Green".to_string()),
            ..product_dto("Sencha", 850, tea.id)
        })
        .await
        .unwrap();

    let result = service
        .modify(ProductUpdateDto {
            id: created.id,
            name: "Rooibos".to_string(),
            description: None,
            price: Decimal::new(600, 2),
            category_id: herbal.id,
        })
        .await
        .unwrap();

    assert_eq!(result.name, "Rooibos");
    assert!(result.description.is_none());
    assert_eq!(result.category.map(|c| c.id), Some(herbal.id));

    let stored = service.retrieve_by_id(created.id).await.unwrap();
    assert_eq!(stored.name, "Rooibos");
    assert_eq!(stored.category_id, herbal.id);
}

#[tokio::test]
async fn test_missing_id_is_not_found_without_mutation() {
    let store = MemoryStore::new();
    let category = seed_category(&store, "Tea").await;
    let service = manager(&store);
    service
        .add(product_dto("Sencha", 850, category.id))
        .await
        .unwrap();

    let modify = service
        .modify(ProductUpdateDto {
            id: 999,
            name: "Ghost".to_string(),
            description: None,
            price: Decimal::ONE,
            category_id: category.id,
        })
        .await;
    let remove = service.remove(999).await;
    let retrieve = service.retrieve_by_id(999).await;

    assert!(matches!(modify, Err(AppError::NotFound(_))));
    assert!(matches!(remove, Err(AppError::NotFound(_))));
    assert!(matches!(retrieve, Err(AppError::NotFound(_))));
    assert_eq!(count_products(&store).await, 1);
    assert_eq!(service.retrieve_all_unpaged().await.unwrap()[0].name, "Sencha");
}

#[tokio::test]
async fn test_remove_deletes_product() {
    let store = MemoryStore::new();
    let category = seed_category(&store, "Tea").await;
    let service = manager(&store);
    let created = service
        .add(product_dto("Sencha", 850, category.id))
        .await
        .unwrap();

    assert!(service.remove(created.id).await.unwrap());
    assert_eq!(count_products(&store).await, 0);
}

#[tokio::test]
async fn test_remove_refuses_ordered_product() {
    let store = MemoryStore::new();
    let category = seed_category(&store, "Tea").await;
    let service = manager(&store);
    let created = service
        .add(product_dto("Sencha", 850, category.id))
        .await
        .unwrap();
    {
        let uow = store.begin().await.unwrap();
        uow.order_items()
            .create(OrderItem {
                id: 0,
                order_id: 1,
                product_id: created.id,
                quantity: 2,
                unit_price: Decimal::new(850, 2),
            })
            .await
            .unwrap();
        uow.save().await.unwrap();
    }

    let result = service.remove(created.id).await;

    assert!(matches!(result, Err(AppError::Validation(_))));
    assert_eq!(count_products(&store).await, 1);
}

#[tokio::test]
async fn test_page_far_past_the_end_is_empty() {
    let store = MemoryStore::new();
    let category = seed_category(&store, "Tea").await;
    let service = manager(&store);
    service
        .add(product_dto("Sencha", 850, category.id))
        .await
        .unwrap();

    let results = service
        .retrieve_all(PaginationParams::new(u64::MAX, 10), Filter::default())
        .await
        .unwrap();

    assert!(results.is_empty());
}

#[tokio::test]
async fn test_pagination_windows() {
    let store = MemoryStore::new();
    let category = seed_category(&store, "Tea").await;
    let service = manager(&store);
    for i in 0..5 {
        service
            .add(product_dto(&format!("Tea {}", i), 100 + i, category.id))
            .await
            .unwrap();
    }

    let first = service
        .retrieve_all(PaginationParams::new(1, 2), Filter::default())
        .await
        .unwrap();
    let third = service
        .retrieve_all(PaginationParams::new(3, 2), Filter::default())
        .await
        .unwrap();
    let beyond = service
        .retrieve_all(PaginationParams::new(4, 2), Filter::default())
        .await
        .unwrap();

    assert_eq!(first.len(), 2);
    assert_eq!(first[0].name, "Tea 0");
    assert_eq!(third.len(), 1);
    assert_eq!(third[0].name, "Tea 4");
    assert!(beyond.is_empty());
}

#[tokio::test]
async fn test_retrieve_all_orders_by_field() {
    let store = MemoryStore::new();
    let category = seed_category(&store, "Tea").await;
    let service = manager(&store);
    for (name, price) in [("Oolong", 500), ("Assam", 900), ("Darjeeling", 700)] {
        service
            .add(product_dto(name, price, category.id))
            .await
            .unwrap();
    }

    let by_price_desc = service
        .retrieve_all(PaginationParams::default(), Filter::order_by("Price").descending())
        .await
        .unwrap();
    let by_name = service
        .retrieve_all(PaginationParams::default(), Filter::order_by("name"))
        .await
        .unwrap();

    let names = |items: &[domain::ProductResultDto]| -> Vec<String> {
        items.iter().map(|p| p.name.clone()).collect()
    };
    assert_eq!(names(&by_price_desc), vec!["Assam", "Darjeeling", "Oolong"]);
    assert_eq!(names(&by_name), vec!["Assam", "Darjeeling", "Oolong"]);
}

#[tokio::test]
async fn test_enrichment_availability_rules() {
    let store = MemoryStore::new();
    let category = seed_category(&store, "Tea").await;
    let service = manager(&store);
    let empty = service.add(product_dto("Empty", 100, category.id)).await.unwrap();
    let stocked = service.add(product_dto("Stocked", 100, category.id)).await.unwrap();
    let untracked = service.add(product_dto("Untracked", 100, category.id)).await.unwrap();
    seed_stock(&store, empty.id, 0).await;
    seed_stock(&store, stocked.id, 3).await;

    let results = service
        .retrieve_all(PaginationParams::default(), Filter::default())
        .await
        .unwrap();

    let find = |id: i64| results.iter().find(|p| p.id == id).unwrap();
    assert_eq!(find(empty.id).quantity, Some(0));
    assert!(!find(empty.id).is_available);
    assert_eq!(find(stocked.id).quantity, Some(3));
    assert!(find(stocked.id).is_available);
    assert_eq!(find(untracked.id).quantity, None);
    assert!(!find(untracked.id).is_available);
}

#[tokio::test]
async fn test_retrieve_by_category_filters() {
    let store = MemoryStore::new();
    let tea = seed_category(&store, "Tea").await;
    let coffee = seed_category(&store, "Coffee").await;
    let service = manager(&store);
    service.add(product_dto("Sencha", 850, tea.id)).await.unwrap();
    service.add(product_dto("Mocha", 950, coffee.id)).await.unwrap();

    let results = service.retrieve_by_category(coffee.id).await.unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].name, "Mocha");
}

#[tokio::test]
async fn test_modify_image_replaces_attachment_and_removes_old_once() {
    let store = MemoryStore::new();
    let category = seed_category(&store, "Tea").await;
    let attachments = Arc::new(RecordingAttachments::new());
    let service = ProductManager::new(factory(&store), attachments.clone());
    let created = service
        .add(product_dto("Sencha", 850, category.id))
        .await
        .unwrap();

    // The product has to include its attachment, so the row must exist
    let first = {
        let uow = store.begin().await.unwrap();
        let first = uow
            .attachments()
            .create(Attachment::new("first.png", "memory"))
            .await
            .unwrap();
        uow.save().await.unwrap();
        first
    };
    let mut product = {
        let uow = store.begin().await.unwrap();
        let product = uow
            .products()
            .select(Query::by_id(created.id))
            .await
            .unwrap()
            .unwrap();
        product
    };
    product.assign_attachment(first.clone());
    {
        let uow = store.begin().await.unwrap();
        uow.products().update(product).await.unwrap();
        uow.save().await.unwrap();
    }

    let result = service
        .modify_image(created.id, AttachmentCreationDto::new("second.png", vec![1]))
        .await
        .unwrap();

    let new_id = result.attachment.map(|a| a.id).unwrap();
    assert_ne!(new_id, first.id);
    assert_eq!(*attachments.removed.lock(), vec![first.id]);

    let uow = store.begin().await.unwrap();
    let stored = uow
        .products()
        .select(Query::by_id(created.id))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.attachment_id, Some(new_id));
}

#[tokio::test]
async fn test_image_upload_through_file_storage() {
    let dir = tempfile::tempdir().unwrap();
    let store = MemoryStore::new();
    let category = seed_category(&store, "Tea").await;
    let attachments = Arc::new(AttachmentManager::new(factory(&store), dir.path()));
    let service = ProductManager::new(factory(&store), attachments);
    let created = service
        .add(product_dto("Sencha", 850, category.id))
        .await
        .unwrap();

    let uploaded = service
        .image_upload(created.id, AttachmentCreationDto::new("leaf.jpg", vec![9, 9]))
        .await
        .unwrap();
    let replaced = service
        .modify_image(created.id, AttachmentCreationDto::new("leaf2.jpg", vec![8]))
        .await
        .unwrap();

    let old_path = uploaded.attachment.unwrap().file_path;
    let new_path = replaced.attachment.unwrap().file_path;
    assert!(!std::path::Path::new(&old_path).exists());
    assert!(std::path::Path::new(&new_path).exists());

    let fetched = service.retrieve_by_id(created.id).await.unwrap();
    assert_eq!(fetched.attachment.map(|a| a.file_path), Some(new_path));
}
