//! Core data models for the dashboard

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::types::TransactionType;

/// One row of the transaction table
///
/// Records carry no id; a record is identified by its position in the
/// fetched list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Customer name
    pub name: String,
    /// Customer email
    pub email: String,
    /// Formatted currency amount (e.g., "$1,234.50")
    pub amount: String,
    /// Sale or subscription
    #[serde(rename = "type")]
    pub kind: TransactionType,
    /// Transaction date
    pub date: NaiveDate,
}

impl Record {
    /// Parsed numeric amount, if the formatted text is a valid currency value
    pub fn amount_value(&self) -> Option<Decimal> {
        txdash_utils::parse_currency(&self.amount)
    }

    /// Case-insensitive substring match against name or email
    ///
    /// `query_lower` must already be lowercase.
    pub fn matches_query(&self, query_lower: &str) -> bool {
        query_lower.is_empty()
            || self.name.to_lowercase().contains(query_lower)
            || self.email.to_lowercase().contains(query_lower)
    }
}

/// User object as returned by the remote endpoint
///
/// Only the fields the dashboard uses are kept; everything else in the
/// payload is ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExternalUser {
    #[serde(default)]
    pub id: Option<u64>,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub username: Option<String>,
}
