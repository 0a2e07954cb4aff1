//! Domain-level constants.
//!
//! These constants define business rules and validation requirements.

// =============================================================================
// Pagination
// =============================================================================

/// Default number of items per page
pub const DEFAULT_PAGE_SIZE: u64 = 10;

/// Maximum allowed items per page to prevent excessive queries
pub const MAX_PAGE_SIZE: u64 = 100;

/// Default starting page number (1-indexed)
pub const DEFAULT_PAGE_NUMBER: u64 = 1;

/// Largest row offset a query may carry (SQL OFFSET is a signed bigint)
pub const MAX_OFFSET: u64 = i64::MAX as u64;

// =============================================================================
// Validation
// =============================================================================

/// Maximum size of a single uploaded attachment in bytes (10 MiB)
pub const MAX_ATTACHMENT_BYTES: usize = 10 * 1024 * 1024;
