//! Warehouse service - Handles warehouse CRUD.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};
use validator::Validate;

use common::{AppResult, OptionExt};
use domain::{
    DomainError, PaginationParams, Warehouse, WarehouseCreationDto, WarehouseResultDto,
    WarehouseUpdateDto,
};

use crate::infra::UnitOfWorkFactory;
use crate::repository::{Query, WarehouseField};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Warehouse service trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait WarehouseService: Send + Sync {
    /// Create a warehouse; names are unique
    async fn add(&self, dto: WarehouseCreationDto) -> AppResult<WarehouseResultDto>;

    async fn modify(&self, dto: WarehouseUpdateDto) -> AppResult<WarehouseResultDto>;

    async fn remove(&self, id: i64) -> AppResult<bool>;

    async fn retrieve_by_id(&self, id: i64) -> AppResult<WarehouseResultDto>;

    async fn retrieve_all(&self, params: PaginationParams) -> AppResult<Vec<WarehouseResultDto>>;
}

/// Concrete implementation of WarehouseService using Unit of Work.
pub struct WarehouseManager {
    uow: Arc<dyn UnitOfWorkFactory>,
}

impl WarehouseManager {
    pub fn new(uow: Arc<dyn UnitOfWorkFactory>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl WarehouseService for WarehouseManager {
    async fn add(&self, dto: WarehouseCreationDto) -> AppResult<WarehouseResultDto> {
        dto.validate().map_err(DomainError::from)?;

        let uow = self.uow.begin().await?;
        let duplicate = uow
            .warehouses()
            .select(Query::new().filter(WarehouseField::Name, &dto.name))
            .await?;
        if duplicate.is_some() {
            return Err(DomainError::already_exists(format!("Warehouse '{}'", dto.name)).into());
        }

        let warehouse = uow.warehouses().create(Warehouse::from(dto)).await?;
        uow.save().await?;

        info!(warehouse_id = warehouse.id, "Warehouse created");
        Ok(WarehouseResultDto::from(warehouse))
    }

    async fn modify(&self, dto: WarehouseUpdateDto) -> AppResult<WarehouseResultDto> {
        dto.validate().map_err(DomainError::from)?;

        let uow = self.uow.begin().await?;
        let mut warehouse = uow
            .warehouses()
            .select(Query::by_id(dto.id))
            .await?
            .ok_or_not_found("Warehouse")?;

        warehouse.apply_update(dto);
        let warehouse = uow.warehouses().update(warehouse).await?;
        uow.save().await?;

        info!(warehouse_id = warehouse.id, "Warehouse updated");
        Ok(WarehouseResultDto::from(warehouse))
    }

    async fn remove(&self, id: i64) -> AppResult<bool> {
        let uow = self.uow.begin().await?;
        let warehouse = uow
            .warehouses()
            .select(Query::by_id(id))
            .await?
            .ok_or_not_found("Warehouse")?;

        uow.warehouses().delete(&warehouse).await?;
        uow.save().await?;

        info!(warehouse_id = id, "Warehouse removed");
        Ok(true)
    }

    async fn retrieve_by_id(&self, id: i64) -> AppResult<WarehouseResultDto> {
        let uow = self.uow.begin().await?;
        let warehouse = uow
            .warehouses()
            .select(Query::by_id(id))
            .await?
            .ok_or_not_found("Warehouse")?;

        debug!(warehouse_id = id, "Warehouse retrieved");
        Ok(WarehouseResultDto::from(warehouse))
    }

    async fn retrieve_all(&self, params: PaginationParams) -> AppResult<Vec<WarehouseResultDto>> {
        params.validate().map_err(DomainError::from)?;

        let uow = self.uow.begin().await?;
        let warehouses = uow
            .warehouses()
            .select_all(Query::new().paginate(&params))
            .await?;

        debug!(page = params.page, count = warehouses.len(), "Warehouses listed");
        Ok(warehouses.iter().map(WarehouseResultDto::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::MemoryStore;
    use common::AppError;

    fn creation(name: &str) -> WarehouseCreationDto {
        WarehouseCreationDto {
            name: name.to_string(),
            address: "1 Dock Road".to_string(),
        }
    }

    #[tokio::test]
    async fn test_add_then_retrieve() {
        let service = WarehouseManager::new(Arc::new(MemoryStore::new()));

        let created = service.add(creation("North")).await.unwrap();
        let found = service.retrieve_by_id(created.id).await.unwrap();

        assert_eq!(found, created);
    }

    #[tokio::test]
    async fn test_add_rejects_blank_address() {
        let service = WarehouseManager::new(Arc::new(MemoryStore::new()));

        let result = service
            .add(WarehouseCreationDto {
                name: "North".to_string(),
                address: String::new(),
            })
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_retrieve_all_rejects_zero_page() {
        let service = WarehouseManager::new(Arc::new(MemoryStore::new()));

        let result = service.retrieve_all(PaginationParams::new(0, 10)).await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}
