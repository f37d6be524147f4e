//! Application configuration
//!
//! This module provides centralized configuration management using the `config` crate.
//! Configuration can be loaded from environment variables and config files.

use config::{Config, ConfigError, Environment, File};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::env;
use tracing::debug;

use crate::models::{ServiceCatalog, ServiceEntry};
use crate::money::round_cents;
use crate::{AppError, AppResult};

/// Main application configuration
#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub billing: BillingConfig,
    #[serde(default)]
    pub shop: ShopConfig,
}

/// File locations for the flat-file stores
#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    /// JSON customer directory
    #[serde(default = "default_customer_file")]
    pub customer_file: String,

    /// Append-only transaction log
    #[serde(default = "default_transaction_log")]
    pub transaction_log: String,

    /// Directory receipts are written into
    #[serde(default = "default_receipt_dir")]
    pub receipt_dir: String,
}

fn default_customer_file() -> String {
    "customers.json".to_string()
}

fn default_transaction_log() -> String {
    "transactions.txt".to_string()
}

fn default_receipt_dir() -> String {
    "receipts".to_string()
}

/// Billing-specific configuration
#[derive(Debug, Deserialize, Clone)]
pub struct BillingConfig {
    /// Charged once per transaction regardless of selections
    #[serde(default = "default_flat_fee")]
    pub flat_fee: Decimal,

    /// Services in display order
    #[serde(default = "default_services")]
    pub services: Vec<ServiceEntry>,
}

fn default_flat_fee() -> Decimal {
    Decimal::new(5000, 2)
}

fn default_services() -> Vec<ServiceEntry> {
    ServiceCatalog::reference().iter().cloned().collect()
}

/// Shop presentation settings
#[derive(Debug, Deserialize, Clone)]
pub struct ShopConfig {
    /// Heading printed at the top of every receipt
    #[serde(default = "default_title")]
    pub title: String,
}

fn default_title() -> String {
    "Payment Receipt".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            customer_file: default_customer_file(),
            transaction_log: default_transaction_log(),
            receipt_dir: default_receipt_dir(),
        }
    }
}

impl Default for BillingConfig {
    fn default() -> Self {
        Self {
            flat_fee: default_flat_fee(),
            services: default_services(),
        }
    }
}

impl Default for ShopConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
        }
    }
}

impl BillingConfig {
    /// Validate the configured services into a catalog
    pub fn catalog(&self) -> AppResult<ServiceCatalog> {
        ServiceCatalog::new(self.services.clone())
    }

    /// Validated flat fee
    pub fn flat_fee(&self) -> AppResult<Decimal> {
        if self.flat_fee < Decimal::ZERO {
            return Err(AppError::Config(
                "billing.flat_fee cannot be negative".to_string(),
            ));
        }
        if round_cents(self.flat_fee) != self.flat_fee {
            return Err(AppError::Config(
                "billing.flat_fee must be a whole number of cents".to_string(),
            ));
        }
        Ok(self.flat_fee)
    }
}

impl AppConfig {
    /// Load configuration from environment and optional config file
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());
        debug!("Loading configuration for run mode {}", run_mode);

        let config = Config::builder()
            // Start with default values
            .set_default("storage.customer_file", default_customer_file())?
            .set_default("storage.transaction_log", default_transaction_log())?
            .set_default("storage.receipt_dir", default_receipt_dir())?
            .set_default("billing.flat_fee", "50.00")?
            .set_default("shop.title", default_title())?
            // Load config file if exists
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Load from environment variables with TILL_ prefix
            .add_source(
                Environment::with_prefix("TILL")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Load configuration from a specific file
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let config = Config::builder()
            .add_source(File::with_name(path))
            .add_source(Environment::with_prefix("TILL").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use tempfile::TempDir;

    #[test]
    fn test_default_billing_config() {
        let config = BillingConfig::default();
        assert_eq!(config.flat_fee, dec!(50.00));
        assert_eq!(config.services.len(), 5);
        assert_eq!(config.catalog().unwrap(), ServiceCatalog::reference());
    }

    #[test]
    fn test_default_storage_config() {
        let config = AppConfig::default();
        assert_eq!(config.storage.customer_file, "customers.json");
        assert_eq!(config.storage.transaction_log, "transactions.txt");
        assert_eq!(config.shop.title, "Payment Receipt");
    }

    #[test]
    fn test_negative_flat_fee_rejected() {
        let config = BillingConfig {
            flat_fee: dec!(-1),
            ..Default::default()
        };
        assert!(config.flat_fee().is_err());
    }

    #[test]
    fn test_from_toml_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("shop.toml");
        std::fs::write(
            &path,
            r#"
[storage]
customer_file = "data/customers.json"

[billing]
flat_fee = "25.50"

[[billing.services]]
name = "Coffee"
unit_price = "12.25"

[[billing.services]]
name = "Tea"
unit_price = "9.75"
"#,
        )
        .unwrap();

        let config = AppConfig::from_file(path.to_str().unwrap()).unwrap();
        assert_eq!(config.storage.customer_file, "data/customers.json");
        assert_eq!(config.storage.transaction_log, "transactions.txt");
        assert_eq!(config.billing.flat_fee, dec!(25.50));

        let catalog = config.billing.catalog().unwrap();
        let names: Vec<&str> = catalog.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["Coffee", "Tea"]);
        assert_eq!(catalog.get("Tea").unwrap().unit_price, dec!(9.75));
    }
}
