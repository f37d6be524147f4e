//! Bill and transaction record models
//!
//! A [`Bill`] is the priced view of one set of selections. A
//! [`TransactionRecord`] freezes a bill together with the customer and the
//! confirmation time; it is written once to the transaction log and never
//! changed afterwards.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::models::CustomerProfile;
use crate::money::display_amount;
use crate::{AppError, AppResult};

/// Per-service quantities entered by the operator
pub type Selections = HashMap<String, u32>;

/// Timestamp layout used in logs and on receipts
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One priced service line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionLine {
    pub service: String,
    pub quantity: u32,
    pub unit_price: Decimal,
    pub line_total: Decimal,
}

impl SelectionLine {
    /// Price a line: `line_total = quantity × unit_price`
    ///
    /// Fails with `AppError::Validation` when the product does not fit a
    /// `Decimal`.
    pub fn priced(service: impl Into<String>, quantity: u32, unit_price: Decimal) -> AppResult<Self> {
        let service = service.into();
        let line_total = Decimal::from(quantity)
            .checked_mul(unit_price)
            .ok_or_else(|| {
                AppError::Validation(format!("line total for {} is out of range", service))
            })?;

        Ok(Self {
            service,
            quantity,
            unit_price,
            line_total,
        })
    }
}

/// Itemised lines plus the flat fee and grand total
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bill {
    /// Lines with quantity > 0, in catalog order
    pub lines: Vec<SelectionLine>,
    pub flat_fee: Decimal,
    pub total: Decimal,
}

impl Bill {
    /// Build a bill from already priced lines; the flat fee is added exactly once
    pub fn from_lines(lines: Vec<SelectionLine>, flat_fee: Decimal) -> AppResult<Self> {
        let total = lines
            .iter()
            .try_fold(flat_fee, |acc, l| acc.checked_add(l.line_total))
            .ok_or_else(|| AppError::Validation("bill total is out of range".to_string()))?;

        Ok(Self {
            lines,
            flat_fee,
            total,
        })
    }

    /// Sum of line totals, excluding the flat fee
    pub fn subtotal(&self) -> Decimal {
        self.total - self.flat_fee
    }

    pub fn has_selections(&self) -> bool {
        !self.lines.is_empty()
    }
}

/// A confirmed sale
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub timestamp: NaiveDateTime,
    pub customer: CustomerProfile,
    pub lines: Vec<SelectionLine>,
    pub flat_fee: Decimal,
    pub total: Decimal,
}

impl TransactionRecord {
    pub fn new(customer: CustomerProfile, bill: Bill, timestamp: NaiveDateTime) -> Self {
        Self {
            timestamp,
            customer,
            lines: bill.lines,
            flat_fee: bill.flat_fee,
            total: bill.total,
        }
    }

    /// Human-readable single-line form used by the transaction log
    ///
    /// `2024-05-01 12:30:00, 1234, Amina, 0711000000, [Water 2L x2 @ $50.00 = $100.00], $150.00`
    pub fn to_log_line(&self) -> String {
        let breakdown = self
            .lines
            .iter()
            .map(|l| {
                format!(
                    "{} x{} @ {} = {}",
                    l.service,
                    l.quantity,
                    display_amount(l.unit_price),
                    display_amount(l.line_total)
                )
            })
            .collect::<Vec<_>>()
            .join("; ");

        format!(
            "{}, {}, {}, {}, [{}], {}",
            self.timestamp.format(TIMESTAMP_FORMAT),
            self.customer.id,
            self.customer.name,
            self.customer.contact,
            breakdown,
            display_amount(self.total)
        )
    }
}
