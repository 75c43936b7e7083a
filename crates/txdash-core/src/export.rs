//! CSV export of the filtered transaction view

use csv::{QuoteStyle, Terminator, WriterBuilder};
use thiserror::Error;

use super::models::Record;
use super::CoreError;

/// File name offered to the browser
pub const EXPORT_FILE_NAME: &str = "transactions.csv";

/// MIME type of the exported document
pub const EXPORT_CONTENT_TYPE: &str = "text/csv";

/// Fixed header row
pub const EXPORT_HEADER: [&str; 5] = ["Name", "Email", "Amount", "Type", "Date"];

/// Export error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExportError {
    #[error("No transactions to export")]
    Empty,

    #[error("Failed to write CSV: {message}")]
    Write { message: String },
}

impl From<ExportError> for CoreError {
    fn from(error: ExportError) -> Self {
        match error {
            ExportError::Empty => CoreError::EmptyExport,
            ExportError::Write { message } => CoreError::InternalError { message },
        }
    }
}

impl From<csv::Error> for ExportError {
    fn from(error: csv::Error) -> Self {
        ExportError::Write {
            message: error.to_string(),
        }
    }
}

/// Serialize records to CSV
///
/// Every field is quoted and embedded quotes are doubled. Dates are always
/// written as `yyyy-MM-dd`. Each row, including the last, ends with `\n`.
pub fn export_csv(records: &[Record]) -> Result<String, ExportError> {
    if records.is_empty() {
        return Err(ExportError::Empty);
    }

    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(EXPORT_HEADER)?;
    for record in records {
        let date = record.date.format("%Y-%m-%d").to_string();
        writer.write_record([
            record.name.as_str(),
            record.email.as_str(),
            record.amount.as_str(),
            record.kind.label(),
            date.as_str(),
        ])?;
    }

    let bytes = writer.into_inner().map_err(|e| ExportError::Write {
        message: e.to_string(),
    })?;
    let document = String::from_utf8(bytes).map_err(|e| ExportError::Write {
        message: e.to_string(),
    })?;

    log::debug!(target: "txdash::export", "Exported {} transactions", records.len());
    Ok(document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{date, record};
    use crate::TransactionType;

    #[test]
    fn test_export_two_rows() {
        let records = vec![
            record("Leanne Graham", "Sincere@april.biz", "$1,250.00", TransactionType::Sale, date(2024, 3, 9)),
            record(
                "Dwight \"The Boss\" Schrute",
                "dwight@dundermifflin.com",
                "$42.10",
                TransactionType::Subscription,
                date(2023, 12, 31),
            ),
        ];

        let csv = export_csv(&records).unwrap();
        let expected = concat!(
            "\"Name\",\"Email\",\"Amount\",\"Type\",\"Date\"\n",
            "\"Leanne Graham\",\"Sincere@april.biz\",\"$1,250.00\",\"Sale\",\"2024-03-09\"\n",
            "\"Dwight \"\"The Boss\"\" Schrute\",\"dwight@dundermifflin.com\",\"$42.10\",\"Subscription\",\"2023-12-31\"\n",
        );
        assert_eq!(csv, expected);
    }

    #[test]
    fn test_export_empty_is_aborted() {
        assert_eq!(export_csv(&[]), Err(ExportError::Empty));
        assert_eq!(CoreError::from(ExportError::Empty), CoreError::EmptyExport);
    }

    #[test]
    fn test_export_keeps_row_count() {
        let records = crate::testing::sample_records(7);
        let csv = export_csv(&records).unwrap();
        assert_eq!(csv.lines().count(), 8);
        assert!(csv.lines().skip(1).all(|line| line.starts_with('"') && line.ends_with('"')));
    }
}
