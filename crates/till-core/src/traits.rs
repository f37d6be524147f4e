//! Storage seams
//!
//! The services talk to durable storage only through these traits, so the
//! flat-file adapters can be swapped for in-memory fakes in tests.

use crate::models::{CustomerMap, TransactionRecord};
use crate::AppResult;

/// Keyed customer record set, read and written in full
pub trait CustomerStore {
    /// Read every stored customer
    ///
    /// A missing backing store yields an empty map. Malformed contents yield
    /// `AppError::CorruptStore`.
    fn load(&self) -> AppResult<CustomerMap>;

    /// Replace the stored contents with `customers`
    fn save(&self, customers: &CustomerMap) -> AppResult<()>;
}

/// Append-only sink for confirmed transactions
pub trait TransactionSink {
    /// Append one record; prior entries are never rewritten
    fn append(&self, record: &TransactionRecord) -> AppResult<()>;
}

/// Destination for rendered receipt documents
pub trait ReceiptSink {
    /// Store a rendered receipt for `customer_name`, returning where it went
    fn store_receipt(&self, customer_name: &str, document: &str) -> AppResult<String>;
}
