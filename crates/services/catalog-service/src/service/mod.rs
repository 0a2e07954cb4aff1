//! Service layer - Business logic.

mod attachment_service;
mod container;
mod product_service;
mod warehouse_service;

pub use attachment_service::{AttachmentManager, AttachmentService};
pub use container::{ServiceContainer, Services};
pub use product_service::{ProductManager, ProductService};
pub use warehouse_service::{WarehouseManager, WarehouseService};

#[cfg(any(test, feature = "test-utils"))]
pub use attachment_service::MockAttachmentService;
#[cfg(any(test, feature = "test-utils"))]
pub use container::MockServiceContainer;
#[cfg(any(test, feature = "test-utils"))]
pub use product_service::MockProductService;
#[cfg(any(test, feature = "test-utils"))]
pub use warehouse_service::MockWarehouseService;
