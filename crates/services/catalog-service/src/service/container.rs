//! Service container - centralized service access.
//!
//! Depends on service traits, not implementations, so callers and tests can
//! swap in any backing store.

use std::sync::Arc;

use common::StorageConfig;

use super::{
    AttachmentManager, AttachmentService, ProductManager, ProductService, WarehouseManager,
    WarehouseService,
};
use crate::infra::UnitOfWorkFactory;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Service container trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait ServiceContainer: Send + Sync {
    fn products(&self) -> Arc<dyn ProductService>;

    fn warehouses(&self) -> Arc<dyn WarehouseService>;

    fn attachments(&self) -> Arc<dyn AttachmentService>;
}

/// Concrete implementation of ServiceContainer
pub struct Services {
    product_service: Arc<dyn ProductService>,
    warehouse_service: Arc<dyn WarehouseService>,
    attachment_service: Arc<dyn AttachmentService>,
}

impl Services {
    pub fn new(
        product_service: Arc<dyn ProductService>,
        warehouse_service: Arc<dyn WarehouseService>,
        attachment_service: Arc<dyn AttachmentService>,
    ) -> Self {
        Self {
            product_service,
            warehouse_service,
            attachment_service,
        }
    }

    /// Wire every service against one unit of work factory
    pub fn from_store(uow: Arc<dyn UnitOfWorkFactory>, storage: &StorageConfig) -> Self {
        let attachment_service: Arc<dyn AttachmentService> = Arc::new(AttachmentManager::new(
            uow.clone(),
            storage.attachment_root.clone(),
        ));
        let product_service = Arc::new(ProductManager::new(uow.clone(), attachment_service.clone()));
        let warehouse_service = Arc::new(WarehouseManager::new(uow));

        Self {
            product_service,
            warehouse_service,
            attachment_service,
        }
    }
}

impl ServiceContainer for Services {
    fn products(&self) -> Arc<dyn ProductService> {
        self.product_service.clone()
    }

    fn warehouses(&self) -> Arc<dyn WarehouseService> {
        self.warehouse_service.clone()
    }

    fn attachments(&self) -> Arc<dyn AttachmentService> {
        self.attachment_service.clone()
    }
}
