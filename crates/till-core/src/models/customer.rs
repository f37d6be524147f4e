//! Customer model
//!
//! Customers are identified by a 4-digit decimal id minted on their first
//! visit. The id never changes once assigned.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use validator::Validate;

use crate::{AppError, AppResult};

/// Full customer directory as persisted: id → details
pub type CustomerMap = BTreeMap<CustomerId, CustomerDetails>;

/// Four-digit customer identifier
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CustomerId(String);

impl CustomerId {
    /// Number of decimal digits in every id
    pub const DIGITS: usize = 4;

    /// Smallest id handed out to new customers
    pub const MIN: u16 = 1000;

    /// Largest id handed out to new customers
    pub const MAX: u16 = 9999;

    /// Build an id from a number in `MIN..=MAX`
    pub fn from_number(n: u16) -> AppResult<Self> {
        if !(Self::MIN..=Self::MAX).contains(&n) {
            return Err(AppError::InvalidCustomerId(n.to_string()));
        }
        Ok(Self(n.to_string()))
    }

    /// Parse an id typed by an operator or read from the store
    pub fn parse(raw: &str) -> AppResult<Self> {
        let trimmed = raw.trim();
        if trimmed.len() != Self::DIGITS || !trimmed.chars().all(|c| c.is_ascii_digit()) {
            return Err(AppError::InvalidCustomerId(raw.to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Total number of ids that can be minted
    pub fn capacity() -> usize {
        usize::from(Self::MAX - Self::MIN) + 1
    }
}

impl fmt::Display for CustomerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for CustomerId {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for CustomerId {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<CustomerId> for String {
    fn from(id: CustomerId) -> Self {
        id.0
    }
}

/// Name and contact captured for a customer
///
/// This is both the operator input for a new customer and the value stored
/// against each id in the customer store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct CustomerDetails {
    #[validate(length(min = 1, max = 100, message = "Customer name is required"))]
    pub name: String,

    #[validate(length(min = 1, max = 50, message = "Contact number is required"))]
    pub contact: String,
}

impl CustomerDetails {
    /// Trim and validate operator input
    ///
    /// Both fields must be non-empty after trimming and may not contain
    /// control characters, so they stay on one line in the transaction log.
    pub fn validated(name: &str, contact: &str) -> AppResult<Self> {
        let details = Self {
            name: name.trim().to_string(),
            contact: contact.trim().to_string(),
        };

        if details.name.is_empty() {
            return Err(AppError::MissingField("name".to_string()));
        }
        if details.contact.is_empty() {
            return Err(AppError::MissingField("contact".to_string()));
        }
        details.validate()?;

        if has_control_chars(&details.name) || has_control_chars(&details.contact) {
            return Err(AppError::Validation(
                "name and contact may not contain control characters".to_string(),
            ));
        }

        Ok(details)
    }
}

fn has_control_chars(value: &str) -> bool {
    value.chars().any(char::is_control)
}

/// Customer profile as seen by callers: id plus stored details
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerProfile {
    pub id: CustomerId,
    pub name: String,
    pub contact: String,
}

impl CustomerProfile {
    pub fn new(id: CustomerId, details: CustomerDetails) -> Self {
        Self {
            id,
            name: details.name,
            contact: details.contact,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_customer_id() {
        assert_eq!(CustomerId::parse("1234").unwrap().as_str(), "1234");
        assert_eq!(CustomerId::parse(" 4321 ").unwrap().as_str(), "4321");
        assert!(CustomerId::parse("123").is_err());
        assert!(CustomerId::parse("12345").is_err());
        assert!(CustomerId::parse("12a4").is_err());
        assert!(CustomerId::parse("").is_err());
    }

    #[test]
    fn test_customer_id_from_number_bounds() {
        assert_eq!(CustomerId::from_number(1000).unwrap().as_str(), "1000");
        assert_eq!(CustomerId::from_number(9999).unwrap().as_str(), "9999");
        assert!(CustomerId::from_number(999).is_err());
        assert_eq!(CustomerId::capacity(), 9000);
    }

    #[test]
    fn test_customer_id_serde_as_string() {
        let id = CustomerId::parse("1234").unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"1234\"");

        let parsed: CustomerId = serde_json::from_str("\"5678\"").unwrap();
        assert_eq!(parsed.as_str(), "5678");
        assert!(serde_json::from_str::<CustomerId>("\"nope\"").is_err());
    }

    #[test]
    fn test_details_validation() {
        let details = CustomerDetails::validated("  Amina ", "0711000000").unwrap();
        assert_eq!(details.name, "Amina");

        assert!(matches!(
            CustomerDetails::validated("", "0711000000"),
            Err(AppError::MissingField(f)) if f == "name"
        ));
        assert!(matches!(
            CustomerDetails::validated("Amina", "   "),
            Err(AppError::MissingField(f)) if f == "contact"
        ));
        assert!(CustomerDetails::validated("Ami\nna", "0711000000").is_err());
        assert!(CustomerDetails::validated(&"x".repeat(101), "0711000000").is_err());
    }

    #[test]
    fn test_map_serializes_like_store_file() {
        let mut map = CustomerMap::new();
        map.insert(
            CustomerId::parse("1234").unwrap(),
            CustomerDetails {
                name: "Amina".to_string(),
                contact: "0711000000".to_string(),
            },
        );

        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, r#"{"1234":{"name":"Amina","contact":"0711000000"}}"#);
    }
}
