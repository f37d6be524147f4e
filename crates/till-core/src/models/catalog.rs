//! Service catalog model
//!
//! The catalog is fixed, read-only configuration: an ordered list of services
//! with their unit prices. Definition order drives the order of bill lines and
//! receipt lines.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::money::round_cents;
use crate::{AppError, AppResult};

/// A single billable service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceEntry {
    /// Unique service name
    pub name: String,

    /// Price charged per use
    pub unit_price: Decimal,
}

impl ServiceEntry {
    pub fn new(name: impl Into<String>, unit_price: Decimal) -> Self {
        Self {
            name: name.into(),
            unit_price,
        }
    }
}

/// Ordered, validated list of services
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceCatalog {
    entries: Vec<ServiceEntry>,
}

impl ServiceCatalog {
    /// Build a catalog, rejecting blank or duplicate names and prices that are
    /// negative or not whole cents
    pub fn new(entries: Vec<ServiceEntry>) -> AppResult<Self> {
        if entries.is_empty() {
            return Err(AppError::Config(
                "service catalog must contain at least one service".to_string(),
            ));
        }

        let mut seen = HashSet::with_capacity(entries.len());
        for entry in &entries {
            if entry.name.trim().is_empty() {
                return Err(AppError::Config("service name cannot be blank".to_string()));
            }
            if entry.unit_price < Decimal::ZERO {
                return Err(AppError::Config(format!(
                    "service '{}' has a negative price",
                    entry.name
                )));
            }
            if round_cents(entry.unit_price) != entry.unit_price {
                return Err(AppError::Config(format!(
                    "service '{}' is priced below one cent",
                    entry.name
                )));
            }
            if !seen.insert(entry.name.as_str()) {
                return Err(AppError::Config(format!(
                    "service '{}' is defined more than once",
                    entry.name
                )));
            }
        }

        Ok(Self { entries })
    }

    /// Services offered by the reference deployment
    pub fn reference() -> Self {
        Self {
            entries: vec![
                ServiceEntry::new("Water 2L", Decimal::new(5000, 2)),
                ServiceEntry::new("Water 1L", Decimal::new(3000, 2)),
                ServiceEntry::new("SoftDrink", Decimal::new(8000, 2)),
                ServiceEntry::new("Parking", Decimal::new(5000, 2)),
                ServiceEntry::new("Seat", Decimal::new(5000, 2)),
            ],
        }
    }

    /// Look up a service by exact name
    pub fn get(&self, name: &str) -> Option<&ServiceEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Services in definition order
    pub fn iter(&self) -> impl Iterator<Item = &ServiceEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_reference_catalog_order() {
        let catalog = ServiceCatalog::reference();
        let names: Vec<&str> = catalog.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["Water 2L", "Water 1L", "SoftDrink", "Parking", "Seat"]);
        assert_eq!(catalog.get("SoftDrink").unwrap().unit_price, dec!(80.00));
    }

    #[test]
    fn test_rejects_duplicates() {
        let result = ServiceCatalog::new(vec![
            ServiceEntry::new("Seat", dec!(50)),
            ServiceEntry::new("Seat", dec!(40)),
        ]);
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn test_rejects_negative_price_and_blank_name() {
        assert!(ServiceCatalog::new(vec![ServiceEntry::new("Seat", dec!(-1))]).is_err());
        assert!(ServiceCatalog::new(vec![ServiceEntry::new("  ", dec!(1))]).is_err());
        assert!(ServiceCatalog::new(vec![]).is_err());
        assert!(ServiceCatalog::new(vec![ServiceEntry::new("Seat", dec!(1.005))]).is_err());
    }

    #[test]
    fn test_free_service_allowed() {
        let catalog = ServiceCatalog::new(vec![ServiceEntry::new("Wifi", dec!(0))]).unwrap();
        assert!(catalog.contains("Wifi"));
        assert!(!catalog.contains("wifi"));
    }
}
