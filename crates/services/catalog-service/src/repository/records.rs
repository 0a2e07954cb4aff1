//! Column and relation descriptors for every catalog entity.

use std::str::FromStr;

use common::AppError;
use domain::{Attachment, Inventory, OrderItem, Product, ProductCategory, Warehouse};

use super::base::{FieldValue, Record};

/// Relation set for entities that have nothing to include
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoRelation {}

/// Field names match case-insensitively and ignore underscores.
fn normalize(name: &str) -> String {
    name.chars()
        .filter(|c| *c != '_')
        .flat_map(char::to_lowercase)
        .collect()
}

fn unknown_field(entity: &str, name: &str) -> AppError {
    AppError::validation(format!("Unknown {} field '{}'", entity, name))
}

// =============================================================================
// Product
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductField {
    Id,
    Name,
    Price,
    CategoryId,
    AttachmentId,
    CreatedAt,
    UpdatedAt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductRelation {
    Category,
    Attachment,
}

impl FromStr for ProductField {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "id" => Ok(ProductField::Id),
            "name" => Ok(ProductField::Name),
            "price" => Ok(ProductField::Price),
            "categoryid" => Ok(ProductField::CategoryId),
            "attachmentid" => Ok(ProductField::AttachmentId),
            "createdat" => Ok(ProductField::CreatedAt),
            "updatedat" => Ok(ProductField::UpdatedAt),
            _ => Err(unknown_field("product", s)),
        }
    }
}

impl Record for Product {
    type Field = ProductField;
    type Relation = ProductRelation;

    const ID: ProductField = ProductField::Id;
    const NAME: &'static str = "Product";

    fn id(&self) -> i64 {
        self.id
    }

    fn value(&self, field: ProductField) -> FieldValue {
        match field {
            ProductField::Id => self.id.into(),
            ProductField::Name => (&self.name).into(),
            ProductField::Price => self.price.into(),
            ProductField::CategoryId => self.category_id.into(),
            ProductField::AttachmentId => self.attachment_id.into(),
            ProductField::CreatedAt => self.created_at.into(),
            ProductField::UpdatedAt => self.updated_at.into(),
        }
    }
}

// =============================================================================
// ProductCategory
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryField {
    Id,
    Name,
    CreatedAt,
}

impl FromStr for CategoryField {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "id" => Ok(CategoryField::Id),
            "name" => Ok(CategoryField::Name),
            "createdat" => Ok(CategoryField::CreatedAt),
            _ => Err(unknown_field("category", s)),
        }
    }
}

impl Record for ProductCategory {
    type Field = CategoryField;
    type Relation = NoRelation;

    const ID: CategoryField = CategoryField::Id;
    const NAME: &'static str = "Category";

    fn id(&self) -> i64 {
        self.id
    }

    fn value(&self, field: CategoryField) -> FieldValue {
        match field {
            CategoryField::Id => self.id.into(),
            CategoryField::Name => (&self.name).into(),
            CategoryField::CreatedAt => self.created_at.into(),
        }
    }
}

// =============================================================================
// Attachment
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachmentField {
    Id,
    FileName,
    CreatedAt,
}

impl FromStr for AttachmentField {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "id" => Ok(AttachmentField::Id),
            "filename" => Ok(AttachmentField::FileName),
            "createdat" => Ok(AttachmentField::CreatedAt),
            _ => Err(unknown_field("attachment", s)),
        }
    }
}

impl Record for Attachment {
    type Field = AttachmentField;
    type Relation = NoRelation;

    const ID: AttachmentField = AttachmentField::Id;
    const NAME: &'static str = "Attachment";

    fn id(&self) -> i64 {
        self.id
    }

    fn value(&self, field: AttachmentField) -> FieldValue {
        match field {
            AttachmentField::Id => self.id.into(),
            AttachmentField::FileName => (&self.file_name).into(),
            AttachmentField::CreatedAt => self.created_at.into(),
        }
    }
}

// =============================================================================
// Inventory
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InventoryField {
    Id,
    ProductId,
    WarehouseId,
    Quantity,
    UpdatedAt,
}

impl FromStr for InventoryField {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "id" => Ok(InventoryField::Id),
            "productid" => Ok(InventoryField::ProductId),
            "warehouseid" => Ok(InventoryField::WarehouseId),
            "quantity" => Ok(InventoryField::Quantity),
            "updatedat" => Ok(InventoryField::UpdatedAt),
            _ => Err(unknown_field("inventory", s)),
        }
    }
}

impl Record for Inventory {
    type Field = InventoryField;
    type Relation = NoRelation;

    const ID: InventoryField = InventoryField::Id;
    const NAME: &'static str = "Inventory";

    fn id(&self) -> i64 {
        self.id
    }

    fn value(&self, field: InventoryField) -> FieldValue {
        match field {
            InventoryField::Id => self.id.into(),
            InventoryField::ProductId => self.product_id.into(),
            InventoryField::WarehouseId => self.warehouse_id.into(),
            InventoryField::Quantity => self.quantity.into(),
            InventoryField::UpdatedAt => self.updated_at.into(),
        }
    }
}

// =============================================================================
// Warehouse
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarehouseField {
    Id,
    Name,
    Address,
    CreatedAt,
    UpdatedAt,
}

impl FromStr for WarehouseField {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "id" => Ok(WarehouseField::Id),
            "name" => Ok(WarehouseField::Name),
            "address" => Ok(WarehouseField::Address),
            "createdat" => Ok(WarehouseField::CreatedAt),
            "updatedat" => Ok(WarehouseField::UpdatedAt),
            _ => Err(unknown_field("warehouse", s)),
        }
    }
}

impl Record for Warehouse {
    type Field = WarehouseField;
    type Relation = NoRelation;

    const ID: WarehouseField = WarehouseField::Id;
    const NAME: &'static str = "Warehouse";

    fn id(&self) -> i64 {
        self.id
    }

    fn value(&self, field: WarehouseField) -> FieldValue {
        match field {
            WarehouseField::Id => self.id.into(),
            WarehouseField::Name => (&self.name).into(),
            WarehouseField::Address => (&self.address).into(),
            WarehouseField::CreatedAt => self.created_at.into(),
            WarehouseField::UpdatedAt => self.updated_at.into(),
        }
    }
}

// =============================================================================
// OrderItem
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderItemField {
    Id,
    OrderId,
    ProductId,
    Quantity,
}

impl FromStr for OrderItemField {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "id" => Ok(OrderItemField::Id),
            "orderid" => Ok(OrderItemField::OrderId),
            "productid" => Ok(OrderItemField::ProductId),
            "quantity" => Ok(OrderItemField::Quantity),
            _ => Err(unknown_field("order item", s)),
        }
    }
}

impl Record for OrderItem {
    type Field = OrderItemField;
    type Relation = NoRelation;

    const ID: OrderItemField = OrderItemField::Id;
    const NAME: &'static str = "Order item";

    fn id(&self) -> i64 {
        self.id
    }

    fn value(&self, field: OrderItemField) -> FieldValue {
        match field {
            OrderItemField::Id => self.id.into(),
            OrderItemField::OrderId => self.order_id.into(),
            OrderItemField::ProductId => self.product_id.into(),
            OrderItemField::Quantity => self.quantity.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_names_ignore_case_and_underscores() {
        assert_eq!("CategoryId".parse::<ProductField>().unwrap(), ProductField::CategoryId);
        assert_eq!("category_id".parse::<ProductField>().unwrap(), ProductField::CategoryId);
        assert_eq!("NAME".parse::<WarehouseField>().unwrap(), WarehouseField::Name);
    }

    #[test]
    fn test_unknown_field_is_validation_error() {
        let err = "colour".parse::<ProductField>().unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
