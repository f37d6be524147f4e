//! Unified error handling for Till
//!
//! Every failure the core can report is expressed as an [`AppError`]. None of
//! them is fatal to the process: the front-end reports the error and returns
//! to an input-ready state.

use thiserror::Error;

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    // ==================== Persisted State Errors ====================
    #[error("Customer store is corrupt: {0}")]
    CorruptStore(String),

    // ==================== Validation Errors ====================
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Unknown service: {0}")]
    UnknownService(String),

    #[error("No services selected")]
    NoServicesSelected,

    #[error("Invalid customer id: {0}")]
    InvalidCustomerId(String),

    // ==================== Resource Errors ====================
    #[error("Customer not found: {0}")]
    CustomerNotFound(String),

    #[error("No customer ids left to assign")]
    IdSpaceExhausted,

    // ==================== I/O Errors ====================
    #[error("I/O error: {0}")]
    Io(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    // ==================== Internal Errors ====================
    #[error("Configuration error: {0}")]
    Config(String),
}

impl AppError {
    /// Returns the stable error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::CorruptStore(_) => "corrupt_store",
            AppError::Validation(_) => "validation_error",
            AppError::MissingField(_) => "missing_field",
            AppError::UnknownService(_) => "unknown_service",
            AppError::NoServicesSelected => "no_services_selected",
            AppError::InvalidCustomerId(_) => "invalid_customer_id",
            AppError::CustomerNotFound(_) => "customer_not_found",
            AppError::IdSpaceExhausted => "id_space_exhausted",
            AppError::Io(_) => "io_error",
            AppError::Serialization(_) => "serialization_error",
            AppError::Config(_) => "config_error",
        }
    }

    /// Whether the operator can fix the problem and retry the same interaction
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            AppError::Validation(_)
                | AppError::MissingField(_)
                | AppError::UnknownService(_)
                | AppError::NoServicesSelected
                | AppError::InvalidCustomerId(_)
        )
    }

    /// Whether processing can continue after this error without operator action
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, AppError::Config(_) | AppError::IdSpaceExhausted)
    }
}

// ==================== From implementations ====================

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Io(err.to_string())
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Config(err.to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Validation(err.to_string())
    }
}
