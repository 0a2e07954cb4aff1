//! Domain layer - Catalog entities, transport DTOs and their mappings.
//!
//! This crate contains pure domain logic with no infrastructure dependencies.
//! Mapping between DTOs and entities is written out explicitly per pair so the
//! field contracts stay visible.

pub mod attachment;
pub mod category;
pub mod constants;
pub mod error;
pub mod inventory;
pub mod order;
pub mod pagination;
pub mod product;
pub mod warehouse;

pub use attachment::{Attachment, AttachmentCreationDto, AttachmentResultDto};
pub use category::{CategoryResultDto, ProductCategory};
pub use constants::*;
pub use error::DomainError;
pub use inventory::Inventory;
pub use order::OrderItem;
pub use pagination::{Filter, PaginationParams};
pub use product::{Product, ProductCreationDto, ProductResultDto, ProductUpdateDto};
pub use warehouse::{Warehouse, WarehouseCreationDto, WarehouseResultDto, WarehouseUpdateDto};
