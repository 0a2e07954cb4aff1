//! Shared fixtures for catalog service integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use rust_decimal::Decimal;

use catalog_service_lib::infra::{MemoryStore, UnitOfWorkFactory};
use domain::{Inventory, ProductCategory, ProductCreationDto};

pub async fn seed_category(store: &MemoryStore, name: &str) -> ProductCategory {
    let uow = store.begin().await.unwrap();
    let category = uow
        .categories()
        .create(ProductCategory::new(name, None))
        .await
        .unwrap();
    uow.save().await.unwrap();
    category
}

pub async fn seed_stock(store: &MemoryStore, product_id: i64, quantity: i32) {
    let uow = store.begin().await.unwrap();
    uow.inventories()
        .create(Inventory::new(product_id, None, quantity))
        .await
        .unwrap();
    uow.save().await.unwrap();
}

pub fn product_dto(name: &str, price_cents: i64, category_id: i64) -> ProductCreationDto {
    ProductCreationDto {
        name: name.to_string(),
        description: None,
        price: Decimal::new(price_cents, 2),
        category_id,
    }
}

pub fn factory(store: &MemoryStore) -> Arc<dyn UnitOfWorkFactory> {
    Arc::new(store.clone())
}
