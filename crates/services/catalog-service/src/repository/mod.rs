//! Repository layer for data access.

mod base;
pub mod entities;
mod records;
mod sea_table;

pub use base::{Condition, Direction, FieldValue, Query, Record, Repository, Window};
pub use records::{
    AttachmentField, CategoryField, InventoryField, NoRelation, OrderItemField, ProductField,
    ProductRelation, WarehouseField,
};
pub use sea_table::{Persisted, SeaTable};
