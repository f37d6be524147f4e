//! Billing calculator
//!
//! Turns per-service quantities into a priced [`Bill`], builds receipt
//! content for confirmed sales and appends them to the transaction log.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use till_core::{
    models::{Bill, CustomerProfile, SelectionLine, Selections, ServiceCatalog, TransactionRecord},
    traits::TransactionSink,
    AppError, AppResult,
};
use tracing::{debug, error, info, instrument};

use crate::receipt::ReceiptContent;

/// Default heading printed on receipts
pub const DEFAULT_RECEIPT_TITLE: &str = "Payment Receipt";

/// Billing calculator
///
/// Owns the price list, the flat fee and the transaction log it appends to.
pub struct BillingCalculator<L: TransactionSink> {
    catalog: ServiceCatalog,
    flat_fee: Decimal,
    receipt_title: String,
    log: L,
}

impl<L: TransactionSink> BillingCalculator<L> {
    /// Create a new billing calculator
    pub fn new(catalog: ServiceCatalog, flat_fee: Decimal, log: L) -> Self {
        Self {
            catalog,
            flat_fee,
            receipt_title: DEFAULT_RECEIPT_TITLE.to_string(),
            log,
        }
    }

    /// Use a custom receipt heading
    pub fn with_receipt_title(mut self, title: impl Into<String>) -> Self {
        self.receipt_title = title.into();
        self
    }

    pub fn catalog(&self) -> &ServiceCatalog {
        &self.catalog
    }

    pub fn flat_fee(&self) -> Decimal {
        self.flat_fee
    }

    /// Price a set of selections
    ///
    /// Lines follow catalog order and only services with a quantity above
    /// zero appear. The flat fee is always added exactly once, so an empty
    /// selection costs exactly the flat fee.
    ///
    /// # Errors
    ///
    /// Returns `AppError::UnknownService` if a selection names a service that
    /// is not in the catalog, and `AppError::Validation` if an amount does not
    /// fit a `Decimal`.
    #[instrument(skip(self, selections))]
    pub fn compute_total(&self, selections: &Selections) -> AppResult<Bill> {
        let mut unknown: Vec<&String> = selections
            .keys()
            .filter(|name| !self.catalog.contains(name))
            .collect();
        if !unknown.is_empty() {
            unknown.sort();
            return Err(AppError::UnknownService(unknown[0].clone()));
        }

        let lines = self
            .catalog
            .iter()
            .filter_map(|entry| {
                let quantity = selections.get(&entry.name).copied().unwrap_or(0);
                (quantity > 0).then(|| SelectionLine::priced(&entry.name, quantity, entry.unit_price))
            })
            .collect::<AppResult<Vec<SelectionLine>>>()?;

        let bill = Bill::from_lines(lines, self.flat_fee)?;

        debug!(
            "Computed bill: {} lines, subtotal {}, flat fee {}, total {}",
            bill.lines.len(),
            bill.subtotal(),
            bill.flat_fee,
            bill.total
        );

        Ok(bill)
    }

    /// Build receipt content for a sale; no I/O
    pub fn build_receipt(
        &self,
        customer: &CustomerProfile,
        bill: &Bill,
        timestamp: NaiveDateTime,
    ) -> ReceiptContent {
        ReceiptContent::build(&self.receipt_title, customer, bill, timestamp)
    }

    /// Append one confirmed transaction to the log
    ///
    /// Write failures are returned to the caller; nothing is retried.
    #[instrument(skip(self, record), fields(customer = %record.customer.id))]
    pub fn append_transaction_log(&self, record: &TransactionRecord) -> AppResult<()> {
        self.log.append(record).map_err(|e| {
            error!("Failed to append transaction for {}: {}", record.customer.id, e);
            e
        })?;

        info!(
            "Transaction recorded for {}: {} lines, total {}",
            record.customer.id,
            record.lines.len(),
            record.total
        );

        Ok(())
    }
}
