//! Product entity, its DTOs and the mappings between them.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::attachment::{Attachment, AttachmentResultDto};
use crate::category::{CategoryResultDto, ProductCategory};

/// Product aggregate root.
///
/// `category` and `attachment` are only populated when the product was loaded
/// with the matching include. Stock figures never live here; they are derived
/// from inventory rows when results are built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    /// Unique across the catalog
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub category_id: i64,
    pub attachment_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip)]
    pub category: Option<ProductCategory>,
    #[serde(skip)]
    pub attachment: Option<Attachment>,
}

impl Product {
    /// Point the product at a category, replacing any loaded one
    pub fn assign_category(&mut self, category: ProductCategory) {
        self.category_id = category.id;
        self.category = Some(category);
    }

    /// Point the product at an attachment, replacing any loaded one
    pub fn assign_attachment(&mut self, attachment: Attachment) {
        self.attachment_id = Some(attachment.id);
        self.attachment = Some(attachment);
        self.updated_at = Utc::now();
    }

    /// Overlay every field of an update DTO onto this product.
    ///
    /// Fields absent from the DTO are cleared, not preserved.
    pub fn apply_update(&mut self, dto: ProductUpdateDto) {
        self.name = dto.name;
        self.description = dto.description;
        self.price = dto.price;
        self.category_id = dto.category_id;
        self.updated_at = Utc::now();
    }
}

impl From<ProductCreationDto> for Product {
    fn from(dto: ProductCreationDto) -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            name: dto.name,
            description: dto.description,
            price: dto.price,
            category_id: dto.category_id,
            attachment_id: None,
            created_at: now,
            updated_at: now,
            category: None,
            attachment: None,
        }
    }
}

/// Product creation payload
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ProductCreationDto {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    #[validate(custom(function = "validate_price"))]
    pub price: Decimal,
    pub category_id: i64,
}

/// Product update payload; carries every writable field
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ProductUpdateDto {
    pub id: i64,
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    #[validate(custom(function = "validate_price"))]
    pub price: Decimal,
    pub category_id: i64,
}

fn validate_price(price: &Decimal) -> Result<(), ValidationError> {
    if *price < Decimal::ZERO {
        let mut err = ValidationError::new("negative");
        err.message = Some("price must not be negative".into());
        return Err(err);
    }
    Ok(())
}

/// Product as returned to callers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductResultDto {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub category_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<CategoryResultDto>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attachment: Option<AttachmentResultDto>,
    /// Stock on hand; unset when no inventory row exists
    pub quantity: Option<i32>,
    pub is_available: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProductResultDto {
    /// Fill the derived stock fields from an inventory quantity
    pub fn apply_stock(&mut self, quantity: i32) {
        self.quantity = Some(quantity);
        self.is_available = quantity > 0;
    }
}

impl From<&Product> for ProductResultDto {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id,
            name: product.name.clone(),
            description: product.description.clone(),
            price: product.price,
            category_id: product.category_id,
            category: product.category.as_ref().map(CategoryResultDto::from),
            attachment: product.attachment.as_ref().map(AttachmentResultDto::from),
            quantity: None,
            is_available: false,
            created_at: product.created_at,
            updated_at: product.updated_at,
        }
    }
}

impl From<Product> for ProductResultDto {
    fn from(product: Product) -> Self {
        ProductResultDto::from(&product)
    }
}
