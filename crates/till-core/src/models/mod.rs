//! Domain models for Till
//!
//! This module contains all the core domain models used throughout the application.

pub mod catalog;
pub mod customer;
pub mod transaction;

pub use catalog::{ServiceCatalog, ServiceEntry};
pub use customer::{CustomerDetails, CustomerId, CustomerMap, CustomerProfile};
pub use transaction::{Bill, SelectionLine, Selections, TransactionRecord};
