//! Unified error handling for the catalog services.
//!
//! `NotFound` and `AlreadyExists` are client-correctable and propagate to the
//! boundary unchanged. Persistence and storage failures are fatal to the
//! current unit of work.

use domain::DomainError;
use thiserror::Error;

/// Application error types.
#[derive(Error, Debug)]
pub enum AppError {
    // Resource errors
    #[error("{0} not found")]
    NotFound(String),

    #[error("{0} already exists")]
    AlreadyExists(String),

    // Validation
    #[error("{0}")]
    Validation(String),

    // External service errors
    #[cfg(feature = "database")]
    #[error("Database error")]
    Database(#[from] sea_orm::DbErr),

    #[error("Storage error")]
    Storage(#[from] std::io::Error),

    // Internal
    #[error("Internal server error")]
    Internal(String),
}

impl AppError {
    /// Get error code for client
    pub fn code(&self) -> &'static str {
        match self {
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::AlreadyExists(_) => "ALREADY_EXISTS",
            AppError::Validation(_) => "VALIDATION_ERROR",
            #[cfg(feature = "database")]
            AppError::Database(_) => "DATABASE_ERROR",
            AppError::Storage(_) => "STORAGE_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Whether the caller can fix the request and try again
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            AppError::NotFound(_) | AppError::AlreadyExists(_) | AppError::Validation(_)
        )
    }

    /// Get user-facing message (hides internal details)
    pub fn user_message(&self) -> String {
        match self {
            // Hide details for internal errors
            #[cfg(feature = "database")]
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                "A database error occurred".to_string()
            }
            AppError::Storage(e) => {
                tracing::error!("Storage error: {:?}", e);
                "A storage error occurred".to_string()
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                "An internal error occurred".to_string()
            }

            // Client errors carry their own message
            _ => self.to_string(),
        }
    }
}

// =============================================================================
// Domain Error Conversion
// =============================================================================

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(msg) => AppError::Validation(msg),
            DomainError::NotFound(entity) => AppError::NotFound(entity),
            DomainError::AlreadyExists(entity) => AppError::AlreadyExists(entity),
        }
    }
}

/// Result type alias
pub type AppResult<T> = Result<T, AppError>;

/// Extension trait for Option -> AppError conversion
pub trait OptionExt<T> {
    fn ok_or_not_found(self, entity: &str) -> AppResult<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_not_found(self, entity: &str) -> AppResult<T> {
        self.ok_or_else(|| DomainError::not_found(entity).into())
    }
}

/// Convenience constructors
impl AppError {
    pub fn not_found(entity: impl Into<String>) -> Self {
        AppError::NotFound(entity.into())
    }

    pub fn already_exists(entity: impl Into<String>) -> Self {
        AppError::AlreadyExists(entity.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_errors_keep_their_message() {
        let err = AppError::already_exists("Product 'Tea'");
        assert_eq!(err.code(), "ALREADY_EXISTS");
        assert!(err.is_client_error());
        assert_eq!(err.user_message(), "Product 'Tea' already exists");
    }

    #[test]
    fn test_internal_errors_are_hidden() {
        let err = AppError::internal("connection pool exhausted");
        assert!(!err.is_client_error());
        assert_eq!(err.user_message(), "An internal error occurred");
    }

    #[test]
    fn test_option_ext_not_found() {
        let missing: Option<i64> = None;
        let err = missing.ok_or_not_found("Category").unwrap_err();
        assert!(matches!(err, AppError::NotFound(ref e) if e == "Category"));
        assert_eq!(err.to_string(), "Category not found");
    }

    #[test]
    fn test_domain_error_conversion() {
        let err: AppError = DomainError::validation("name: length").into();
        assert!(matches!(err, AppError::Validation(_)));

        let err: AppError = DomainError::already_exists("Warehouse 'North'").into();
        assert_eq!(err.code(), "ALREADY_EXISTS");
        assert_eq!(err.user_message(), "Warehouse 'North' already exists");
    }
}
