//! SeaORM entity definitions
//!
//! These are database-specific entities separate from domain models. Each
//! module also maps its domain record onto the table.

pub mod attachment;
pub mod inventory;
pub mod order_item;
pub mod product;
pub mod product_category;
pub mod warehouse;
