//! Warehouse entity and DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Warehouse {
    pub id: i64,
    /// Unique across warehouses
    pub name: String,
    pub address: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Warehouse {
    /// Overlay every field of an update DTO onto this warehouse
    pub fn apply_update(&mut self, dto: WarehouseUpdateDto) {
        self.name = dto.name;
        self.address = dto.address;
        self.updated_at = Utc::now();
    }
}

impl From<WarehouseCreationDto> for Warehouse {
    fn from(dto: WarehouseCreationDto) -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            name: dto.name,
            address: dto.address,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct WarehouseCreationDto {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(length(min = 1, max = 500))]
    pub address: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct WarehouseUpdateDto {
    pub id: i64,
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(length(min = 1, max = 500))]
    pub address: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WarehouseResultDto {
    pub id: i64,
    pub name: String,
    pub address: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Warehouse> for WarehouseResultDto {
    fn from(warehouse: &Warehouse) -> Self {
        Self {
            id: warehouse.id,
            name: warehouse.name.clone(),
            address: warehouse.address.clone(),
            created_at: warehouse.created_at,
            updated_at: warehouse.updated_at,
        }
    }
}

impl From<Warehouse> for WarehouseResultDto {
    fn from(warehouse: Warehouse) -> Self {
        WarehouseResultDto::from(&warehouse)
    }
}
