//! Money formatting helpers
//!
//! Amounts are carried as [`Decimal`] everywhere and only turned into text at
//! the display boundary, always with exactly two fractional digits.

use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

use crate::{AppError, AppResult};

/// Currency marker printed in front of every displayed amount
pub const CURRENCY_SYMBOL: &str = "$";

/// Number of fractional digits shown for money
pub const MONEY_SCALE: u32 = 2;

/// Round an amount to cents
#[inline]
pub fn round_cents(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Format an amount with two fractional digits, without a currency marker
pub fn format_amount(amount: Decimal) -> String {
    format!("{:.2}", round_cents(amount))
}

/// Format an amount for display, e.g. `$200.00`
pub fn display_amount(amount: Decimal) -> String {
    format!("{}{}", CURRENCY_SYMBOL, format_amount(amount))
}

/// Parse an amount previously produced by [`display_amount`] or [`format_amount`]
pub fn parse_amount(text: &str) -> AppResult<Decimal> {
    let trimmed = text.trim();
    let digits = trimmed.strip_prefix(CURRENCY_SYMBOL).unwrap_or(trimmed);

    Decimal::from_str(digits)
        .map_err(|e| AppError::Validation(format!("invalid amount '{}': {}", text, e)))
}
