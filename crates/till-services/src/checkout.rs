//! Checkout desk
//!
//! Drives one interaction in the order identify → quote → confirm. On
//! confirmation the receipt document is written, the directory persisted and
//! the transaction appended to the log. Validation failures leave all state
//! unchanged; I/O failures are reported without rolling back what already
//! succeeded.

use chrono::NaiveDateTime;
use till_core::{
    models::{Bill, CustomerId, CustomerProfile, Selections, TransactionRecord},
    traits::{CustomerStore, ReceiptSink, TransactionSink},
    AppConfig, AppError, AppResult,
};
use tracing::{info, instrument, warn};

use crate::billing::BillingCalculator;
use crate::directory::CustomerDirectory;
use crate::file_store::JsonFileStore;
use crate::receipt::{ReceiptContent, ReceiptWriter};
use crate::session::Interaction;
use crate::transaction_log::FileTransactionLog;

/// Checkout desk wired to the flat-file adapters
pub type FileCheckoutDesk = CheckoutDesk<JsonFileStore, FileTransactionLog, ReceiptWriter>;

/// Outcome of a confirmed sale
#[derive(Debug, Clone)]
pub struct Confirmation {
    pub record: TransactionRecord,
    pub receipt: ReceiptContent,
    /// Where the receipt document was stored
    pub receipt_location: String,
}

/// Checkout desk
pub struct CheckoutDesk<S: CustomerStore, L: TransactionSink, R: ReceiptSink> {
    directory: CustomerDirectory<S>,
    billing: BillingCalculator<L>,
    receipts: R,
}

impl FileCheckoutDesk {
    /// Build a desk from configuration, loading the customer directory
    pub fn from_config(config: &AppConfig) -> AppResult<Self> {
        let catalog = config.billing.catalog()?;
        let flat_fee = config.billing.flat_fee()?;

        let directory = CustomerDirectory::load(JsonFileStore::new(&config.storage.customer_file));
        let billing = BillingCalculator::new(
            catalog,
            flat_fee,
            FileTransactionLog::new(&config.storage.transaction_log),
        )
        .with_receipt_title(config.shop.title.clone());
        let receipts = ReceiptWriter::new(&config.storage.receipt_dir);

        Ok(Self::new(directory, billing, receipts))
    }
}

impl<S: CustomerStore, L: TransactionSink, R: ReceiptSink> CheckoutDesk<S, L, R> {
    pub fn new(directory: CustomerDirectory<S>, billing: BillingCalculator<L>, receipts: R) -> Self {
        Self {
            directory,
            billing,
            receipts,
        }
    }

    pub fn directory(&self) -> &CustomerDirectory<S> {
        &self.directory
    }

    pub fn billing(&self) -> &BillingCalculator<L> {
        &self.billing
    }

    /// Warning left by loading a corrupt or unreadable customer store
    pub fn take_load_warning(&mut self) -> Option<AppError> {
        self.directory.take_load_warning()
    }

    /// Resolve the customer for this interaction
    ///
    /// A newly registered customer is persisted straight away.
    #[instrument(skip(self, interaction, name, contact))]
    pub fn identify(
        &mut self,
        interaction: &mut Interaction,
        candidate_id: &str,
        name: &str,
        contact: &str,
    ) -> AppResult<CustomerProfile> {
        let known_before = self.directory.len();
        let profile = self
            .directory
            .create_or_reuse(interaction, candidate_id, name, contact)?;

        if self.directory.len() > known_before {
            self.directory.persist()?;
        }

        Ok(profile)
    }

    /// Correct a stored customer's name and contact, then persist the directory
    ///
    /// # Errors
    ///
    /// - `AppError::MissingField` or `AppError::Validation` for unusable details
    /// - `AppError::CustomerNotFound` if `id` is not on file
    /// - `AppError::Io` if the directory cannot be written
    #[instrument(skip(self, name, contact))]
    pub fn update_customer(
        &mut self,
        id: &CustomerId,
        name: &str,
        contact: &str,
    ) -> AppResult<CustomerProfile> {
        let profile = self.directory.update_profile(id, name, contact)?;
        self.directory.persist()?;
        Ok(profile)
    }

    /// Price the current selections for display
    pub fn quote(&self, selections: &Selections) -> AppResult<Bill> {
        self.billing.compute_total(selections)
    }

    /// Confirm payment for the interaction's customer
    ///
    /// # Errors
    ///
    /// - `AppError::MissingField` if no customer has been identified
    /// - `AppError::NoServicesSelected` if every quantity is zero
    /// - `AppError::Io` if the receipt, directory or log cannot be written
    #[instrument(skip(self, interaction, selections))]
    pub fn confirm(
        &mut self,
        interaction: &mut Interaction,
        selections: &Selections,
        timestamp: NaiveDateTime,
    ) -> AppResult<Confirmation> {
        let customer = interaction
            .customer_id()
            .and_then(|id| self.directory.lookup(id.as_str()))
            .ok_or_else(|| AppError::MissingField("customer name and contact".to_string()))?;

        let bill = self.billing.compute_total(selections)?;
        if !bill.has_selections() {
            warn!("Confirmation for {} rejected: no services selected", customer.id);
            return Err(AppError::NoServicesSelected);
        }

        let receipt = self.billing.build_receipt(&customer, &bill, timestamp);
        let receipt_location = self
            .receipts
            .store_receipt(&customer.name, &receipt.render())?;
        info!("Receipt for {} written to {}", customer.id, receipt_location);

        self.directory.persist()?;

        let record = TransactionRecord::new(customer, bill, timestamp);
        self.billing.append_transaction_log(&record)?;

        info!(
            "Payment of {} confirmed for {}",
            record.total, record.customer.name
        );

        interaction.reset();

        Ok(Confirmation {
            record,
            receipt,
            receipt_location,
        })
    }
}
