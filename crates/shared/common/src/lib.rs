//! Common utilities shared across the catalog crates.
//!
//! This crate provides:
//! - Unified error handling
//! - Configuration structures

pub mod config;
pub mod error;

pub use config::*;
pub use error::{AppError, AppResult, OptionExt};
