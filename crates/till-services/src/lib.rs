//! Business logic services for Till
//!
//! This crate contains the services that carry one customer interaction from
//! identification to a confirmed, logged sale.
//!
//! # Architecture
//!
//! - Each service owns its storage adapter through a trait from `till-core`
//! - All state lives in explicitly owned values; there is no global state
//! - All operations are instrumented with tracing
//!
//! # Services
//!
//! - `CustomerDirectory` - Customer lookup, id minting and persistence
//! - `Interaction` - Per-customer context holding the in-progress id
//! - `BillingCalculator` - Pricing, receipts and transaction logging
//! - `CheckoutDesk` - Orchestrates identify → quote → confirm
//! - `JsonFileStore`, `FileTransactionLog`, `ReceiptWriter` - Flat-file adapters

pub mod billing;
pub mod checkout;
pub mod directory;
pub mod file_store;
pub mod receipt;
pub mod session;
pub mod transaction_log;

pub use billing::BillingCalculator;
pub use checkout::{CheckoutDesk, Confirmation, FileCheckoutDesk};
pub use directory::CustomerDirectory;
pub use file_store::JsonFileStore;
pub use receipt::{ParsedReceipt, ReceiptContent, ReceiptField, ReceiptWriter};
pub use session::Interaction;
pub use transaction_log::FileTransactionLog;

/// Business logic constants
pub mod constants {
    /// Random draws attempted before falling back to a sequential scan
    pub const ID_RANDOM_ATTEMPTS: usize = 1000;

    /// Suffix appended to the sanitised customer name for receipt files
    pub const RECEIPT_FILE_SUFFIX: &str = "_receipt.txt";

    /// File stem used when a customer name has no usable characters
    pub const FALLBACK_RECEIPT_STEM: &str = "customer";
}
