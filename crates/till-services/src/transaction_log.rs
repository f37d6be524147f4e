//! Append-only transaction log
//!
//! One human-readable line per confirmed sale. The log is never read back.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use till_core::{models::TransactionRecord, traits::TransactionSink, AppResult};

/// Transaction log backed by a text file opened in append mode
#[derive(Debug, Clone)]
pub struct FileTransactionLog {
    path: PathBuf,
}

impl FileTransactionLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TransactionSink for FileTransactionLog {
    fn append(&self, record: &TransactionRecord) -> AppResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{}", record.to_log_line())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use tempfile::TempDir;
    use till_core::models::{Bill, CustomerId, CustomerProfile, SelectionLine};

    fn record(name: &str) -> TransactionRecord {
        let customer = CustomerProfile {
            id: CustomerId::parse("1234").unwrap(),
            name: name.to_string(),
            contact: "0711000000".to_string(),
        };
        let line = SelectionLine::priced("Seat", 1, dec!(50)).unwrap();
        let bill = Bill::from_lines(vec![line], dec!(50)).unwrap();
        let at = NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        TransactionRecord::new(customer, bill, at)
    }

    #[test]
    fn test_appends_without_truncating() {
        let dir = TempDir::new().unwrap();
        let log = FileTransactionLog::new(dir.path().join("transactions.txt"));

        log.append(&record("Amina")).unwrap();
        log.append(&record("Baraka")).unwrap();

        let contents = fs::read_to_string(log.path()).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("Amina"));
        assert!(lines[1].contains("Baraka"));
        assert!(lines[1].ends_with("$100.00"));
    }

    #[test]
    fn test_unwritable_path_is_io_error() {
        let dir = TempDir::new().unwrap();
        let log = FileTransactionLog::new(dir.path());

        let err = log.append(&record("Amina")).unwrap_err();
        assert_eq!(err.error_code(), "io_error");
    }
}
