//! Till Core Library
//!
//! This crate provides the foundational types, traits, and error handling
//! for the Till point-of-sale helper. It includes:
//!
//! - Domain models (CustomerProfile, ServiceCatalog, Bill, TransactionRecord)
//! - Storage seams for the customer store, transaction log and receipts
//! - Unified error handling with stable error codes
//! - Application configuration

pub mod config;
pub mod error;
pub mod models;
pub mod money;
pub mod traits;

pub use config::AppConfig;
pub use error::AppError;

/// Result type alias using AppError
pub type AppResult<T> = Result<T, AppError>;
