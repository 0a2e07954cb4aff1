//! Product category entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Product category; referenced by many products
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductCategory {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProductCategory {
    /// Create a new, not yet persisted category
    pub fn new(name: impl Into<String>, description: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            name: name.into(),
            description,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Category summary embedded in product results
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryResultDto {
    pub id: i64,
    pub name: String,
}

impl From<&ProductCategory> for CategoryResultDto {
    fn from(category: &ProductCategory) -> Self {
        Self {
            id: category.id,
            name: category.name.clone(),
        }
    }
}
