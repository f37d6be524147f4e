//! Receipt content and receipt documents
//!
//! [`ReceiptContent`] is the ordered list of human-readable fields printed on
//! a receipt. Building it is a pure function of the sale; [`ReceiptWriter`]
//! stores the rendered text as a document named after the customer.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use std::fs;
use std::path::PathBuf;
use till_core::{
    models::{Bill, CustomerId, CustomerProfile, SelectionLine},
    models::transaction::TIMESTAMP_FORMAT,
    money::{display_amount, parse_amount},
    traits::ReceiptSink,
    AppError, AppResult,
};

use crate::constants::{FALLBACK_RECEIPT_STEM, RECEIPT_FILE_SUFFIX};

const NAME_LABEL: &str = "Customer Name: ";
const ID_LABEL: &str = "Customer ID: ";
const CONTACT_LABEL: &str = "Contact Number: ";
const DATE_LABEL: &str = "Date: ";
const SERVICES_LABEL: &str = "Services:";
const FLAT_FEE_LABEL: &str = "Flat Fee: ";
const TOTAL_LABEL: &str = "Total Amount: ";

/// One printed receipt field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReceiptField {
    Header(String),
    CustomerName(String),
    CustomerId(CustomerId),
    Contact(String),
    Date(NaiveDateTime),
    ServicesHeading,
    Service(SelectionLine),
    FlatFee(Decimal),
    Total(Decimal),
}

impl ReceiptField {
    /// Render the field as one line of text
    pub fn render(&self) -> String {
        match self {
            ReceiptField::Header(title) => title.clone(),
            ReceiptField::CustomerName(name) => format!("{}{}", NAME_LABEL, name),
            ReceiptField::CustomerId(id) => format!("{}{}", ID_LABEL, id),
            ReceiptField::Contact(contact) => format!("{}{}", CONTACT_LABEL, contact),
            ReceiptField::Date(at) => format!("{}{}", DATE_LABEL, at.format(TIMESTAMP_FORMAT)),
            ReceiptField::ServicesHeading => SERVICES_LABEL.to_string(),
            ReceiptField::Service(line) => format!(
                "- {} ({} per use) - {} times - Total: {}",
                line.service,
                display_amount(line.unit_price),
                line.quantity,
                display_amount(line.line_total)
            ),
            ReceiptField::FlatFee(fee) => format!("{}{}", FLAT_FEE_LABEL, display_amount(*fee)),
            ReceiptField::Total(total) => format!("{}{}", TOTAL_LABEL, display_amount(*total)),
        }
    }
}

/// Ordered receipt fields for one confirmed sale
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiptContent {
    fields: Vec<ReceiptField>,
}

impl ReceiptContent {
    /// Assemble the receipt fields: header, customer identity, contact,
    /// timestamp, one line per selected service, flat fee and grand total
    pub fn build(
        title: &str,
        customer: &CustomerProfile,
        bill: &Bill,
        timestamp: NaiveDateTime,
    ) -> Self {
        let mut fields = Vec::with_capacity(bill.lines.len() + 8);
        fields.push(ReceiptField::Header(title.to_string()));
        fields.push(ReceiptField::CustomerName(customer.name.clone()));
        fields.push(ReceiptField::CustomerId(customer.id.clone()));
        fields.push(ReceiptField::Contact(customer.contact.clone()));
        fields.push(ReceiptField::Date(timestamp));
        fields.push(ReceiptField::ServicesHeading);
        fields.extend(bill.lines.iter().cloned().map(ReceiptField::Service));
        fields.push(ReceiptField::FlatFee(bill.flat_fee));
        fields.push(ReceiptField::Total(bill.total));

        Self { fields }
    }

    /// Rendered lines, one per field
    pub fn lines(&self) -> Vec<String> {
        self.fields.iter().map(ReceiptField::render).collect()
    }

    /// Full text document
    pub fn render(&self) -> String {
        let mut text = self.lines().join("\n");
        text.push('\n');
        text
    }

    /// Read a rendered receipt back into its values
    pub fn parse(text: &str) -> AppResult<ParsedReceipt> {
        let mut lines = text.lines();

        let title = lines
            .next()
            .ok_or_else(|| AppError::Validation("empty receipt".to_string()))?
            .to_string();
        let lines = lines.filter(|l| !l.trim().is_empty());

        let mut customer_name = None;
        let mut customer_id = None;
        let mut contact = None;
        let mut timestamp = None;
        let mut services = Vec::new();
        let mut flat_fee = None;
        let mut total = None;

        for line in lines {
            if let Some(rest) = line.strip_prefix(NAME_LABEL) {
                customer_name = Some(rest.to_string());
            } else if let Some(rest) = line.strip_prefix(ID_LABEL) {
                customer_id = Some(CustomerId::parse(rest)?);
            } else if let Some(rest) = line.strip_prefix(CONTACT_LABEL) {
                contact = Some(rest.to_string());
            } else if let Some(rest) = line.strip_prefix(DATE_LABEL) {
                let at = NaiveDateTime::parse_from_str(rest, TIMESTAMP_FORMAT).map_err(|e| {
                    AppError::Validation(format!("invalid receipt date '{}': {}", rest, e))
                })?;
                timestamp = Some(at);
            } else if line == SERVICES_LABEL {
                continue;
            } else if let Some(rest) = line.strip_prefix("- ") {
                services.push(parse_service_line(rest)?);
            } else if let Some(rest) = line.strip_prefix(FLAT_FEE_LABEL) {
                flat_fee = Some(parse_amount(rest)?);
            } else if let Some(rest) = line.strip_prefix(TOTAL_LABEL) {
                total = Some(parse_amount(rest)?);
            } else {
                return Err(AppError::Validation(format!(
                    "unrecognised receipt line: {}",
                    line
                )));
            }
        }

        Ok(ParsedReceipt {
            title,
            customer_name: customer_name.ok_or_else(|| missing("customer name"))?,
            customer_id: customer_id.ok_or_else(|| missing("customer id"))?,
            contact: contact.ok_or_else(|| missing("contact"))?,
            timestamp: timestamp.ok_or_else(|| missing("date"))?,
            lines: services,
            flat_fee: flat_fee.ok_or_else(|| missing("flat fee"))?,
            total: total.ok_or_else(|| missing("total"))?,
        })
    }
}

fn missing(field: &str) -> AppError {
    AppError::MissingField(format!("receipt {}", field))
}

/// Parse `<service> ($<price> per use) - <qty> times - Total: $<line total>`
///
/// Splits from the right so service names may contain the separators.
fn parse_service_line(rest: &str) -> AppResult<SelectionLine> {
    let malformed = || AppError::Validation(format!("malformed service line: - {}", rest));

    let (head, line_total) = rest.rsplit_once(" - Total: ").ok_or_else(malformed)?;
    let head = head.strip_suffix(" times").ok_or_else(malformed)?;
    let (head, quantity) = head.rsplit_once(" - ").ok_or_else(malformed)?;
    let head = head.strip_suffix(" per use)").ok_or_else(malformed)?;
    let (service, unit_price) = head.rsplit_once(" (").ok_or_else(malformed)?;

    let quantity: u32 = quantity.parse().map_err(|_| malformed())?;

    Ok(SelectionLine {
        service: service.to_string(),
        quantity,
        unit_price: parse_amount(unit_price)?,
        line_total: parse_amount(line_total)?,
    })
}

/// Values recovered from a rendered receipt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedReceipt {
    pub title: String,
    pub customer_name: String,
    pub customer_id: CustomerId,
    pub contact: String,
    pub timestamp: NaiveDateTime,
    pub lines: Vec<SelectionLine>,
    pub flat_fee: Decimal,
    pub total: Decimal,
}

/// Writes receipt documents into a directory
#[derive(Debug, Clone)]
pub struct ReceiptWriter {
    dir: PathBuf,
}

impl ReceiptWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Deterministic file name for a customer's receipt
    pub fn file_name(customer_name: &str) -> String {
        let stem: String = customer_name
            .trim()
            .chars()
            .map(|c| {
                if c.is_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();

        let stem = if stem.trim_matches('_').is_empty() {
            FALLBACK_RECEIPT_STEM.to_string()
        } else {
            stem
        };

        format!("{}{}", stem, RECEIPT_FILE_SUFFIX)
    }
}

impl ReceiptSink for ReceiptWriter {
    fn store_receipt(&self, customer_name: &str, document: &str) -> AppResult<String> {
        fs::create_dir_all(&self.dir)?;

        let path = self.dir.join(Self::file_name(customer_name));
        fs::write(&path, document)?;

        Ok(path.display().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use tempfile::TempDir;

    fn amina() -> CustomerProfile {
        CustomerProfile {
            id: CustomerId::parse("1234").unwrap(),
            name: "Amina".to_string(),
            contact: "0711000000".to_string(),
        }
    }

    fn at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(18, 45, 10)
            .unwrap()
    }

    fn sample_bill() -> Bill {
        Bill::from_lines(
            vec![
                SelectionLine::priced("Water 2L", 2, dec!(50.00)).unwrap(),
                SelectionLine::priced("Parking", 1, dec!(50.00)).unwrap(),
            ],
            dec!(50.00),
        )
        .unwrap()
    }

    #[test]
    fn test_rendered_lines() {
        let receipt = ReceiptContent::build("Payment Receipt", &amina(), &sample_bill(), at());

        assert_eq!(
            receipt.lines(),
            vec![
                "Payment Receipt",
                "Customer Name: Amina",
                "Customer ID: 1234",
                "Contact Number: 0711000000",
                "Date: 2024-05-01 18:45:10",
                "Services:",
                "- Water 2L ($50.00 per use) - 2 times - Total: $100.00",
                "- Parking ($50.00 per use) - 1 times - Total: $50.00",
                "Flat Fee: $50.00",
                "Total Amount: $200.00",
            ]
        );
    }

    #[test]
    fn test_parse_round_trip() {
        let bill = sample_bill();
        let receipt = ReceiptContent::build("Payment Receipt", &amina(), &bill, at());

        let parsed = ReceiptContent::parse(&receipt.render()).unwrap();
        assert_eq!(parsed.customer_id, amina().id);
        assert_eq!(parsed.customer_name, "Amina");
        assert_eq!(parsed.timestamp, at());
        assert_eq!(parsed.lines, bill.lines);
        assert_eq!(parsed.flat_fee, bill.flat_fee);
        assert_eq!(parsed.total, bill.total);
    }

    #[test]
    fn test_parse_round_trip_with_blank_title() {
        let receipt = ReceiptContent::build("", &amina(), &sample_bill(), at());

        let parsed = ReceiptContent::parse(&receipt.render()).unwrap();
        assert_eq!(parsed.title, "");
        assert_eq!(parsed.customer_name, "Amina");
        assert_eq!(parsed.total, dec!(200.00));
    }

    #[test]
    fn test_parse_service_name_with_separators() {
        let line = parse_service_line("Tour - Day (Guided) ($12.50 per use) - 3 times - Total: $37.50")
            .unwrap();
        assert_eq!(line.service, "Tour - Day (Guided)");
        assert_eq!(line.quantity, 3);
        assert_eq!(line.unit_price, dec!(12.50));
        assert_eq!(line.line_total, dec!(37.50));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(ReceiptContent::parse("").is_err());
        assert!(ReceiptContent::parse("Payment Receipt\nsomething odd\n").is_err());
        assert!(matches!(
            ReceiptContent::parse("Payment Receipt\nCustomer Name: A\n"),
            Err(AppError::MissingField(_))
        ));
    }

    #[test]
    fn test_file_name_is_sanitised() {
        assert_eq!(ReceiptWriter::file_name("Amina"), "Amina_receipt.txt");
        assert_eq!(ReceiptWriter::file_name("Amina W."), "Amina_W__receipt.txt");
        assert_eq!(ReceiptWriter::file_name("../etc/passwd"), "___etc_passwd_receipt.txt");
        assert_eq!(ReceiptWriter::file_name("   "), "customer_receipt.txt");
    }

    #[test]
    fn test_writer_stores_document() {
        let dir = TempDir::new().unwrap();
        let writer = ReceiptWriter::new(dir.path().join("receipts"));

        let location = writer.store_receipt("Amina", "Payment Receipt\n").unwrap();
        assert!(location.ends_with("Amina_receipt.txt"));
        assert_eq!(fs::read_to_string(location).unwrap(), "Payment Receipt\n");
    }
}
