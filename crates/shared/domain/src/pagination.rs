//! Pagination and ordering parameters for list operations.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::constants::{DEFAULT_PAGE_NUMBER, DEFAULT_PAGE_SIZE, MAX_OFFSET, MAX_PAGE_SIZE};

/// Pagination query parameters (1-based page number, positive page size)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct PaginationParams {
    #[serde(default = "default_page")]
    #[validate(range(min = 1, message = "page must be at least 1"))]
    pub page: u64,
    #[serde(default = "default_per_page")]
    #[validate(range(min = 1, message = "page size must be positive"))]
    pub per_page: u64,
}

fn default_page() -> u64 {
    DEFAULT_PAGE_NUMBER
}

fn default_per_page() -> u64 {
    DEFAULT_PAGE_SIZE
}

impl PaginationParams {
    pub fn new(page: u64, per_page: u64) -> Self {
        Self { page, per_page }
    }

    /// Calculate offset for database query; pages past the end saturate
    pub fn offset(&self) -> u64 {
        self.page
            .saturating_sub(1)
            .saturating_mul(self.limit())
            .min(MAX_OFFSET)
    }

    /// Get limit capped at maximum
    pub fn limit(&self) -> u64 {
        self.per_page.min(MAX_PAGE_SIZE)
    }
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE_NUMBER,
            per_page: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Ordering specification keyed by field name.
///
/// Field names are matched case-insensitively and ignore underscores, so
/// `"CategoryId"` and `"category_id"` address the same column.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filter {
    #[serde(default)]
    pub order_by: Option<String>,
    #[serde(default)]
    pub is_desc: bool,
}

impl Filter {
    pub fn order_by(field: impl Into<String>) -> Self {
        Self {
            order_by: Some(field.into()),
            is_desc: false,
        }
    }

    pub fn descending(mut self) -> Self {
        self.is_desc = true;
        self
    }
}
