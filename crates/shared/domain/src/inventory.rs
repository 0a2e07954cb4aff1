//! Inventory entity: stock level of a product, optionally per warehouse.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Inventory {
    pub id: i64,
    pub product_id: i64,
    pub warehouse_id: Option<i64>,
    /// Never negative
    pub quantity: i32,
    pub updated_at: DateTime<Utc>,
}

impl Inventory {
    pub fn new(product_id: i64, warehouse_id: Option<i64>, quantity: i32) -> Self {
        Self {
            id: 0,
            product_id,
            warehouse_id,
            quantity: quantity.max(0),
            updated_at: Utc::now(),
        }
    }
}
