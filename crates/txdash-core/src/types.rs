//! Basic types for the transaction view model

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Transaction type enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionType {
    /// One-off sale
    Sale,
    /// Recurring subscription
    Subscription,
}

impl TransactionType {
    /// Display label, also used for sorting and export
    pub fn label(&self) -> &'static str {
        match self {
            TransactionType::Sale => "Sale",
            TransactionType::Subscription => "Subscription",
        }
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Inclusive date range picked in the date filter
///
/// The filter only applies once both bounds are chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DateRange {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl DateRange {
    /// Range with both bounds set
    pub fn between(from: NaiveDate, to: NaiveDate) -> Self {
        Self {
            from: Some(from),
            to: Some(to),
        }
    }

    /// Check if a date is inside the range; incomplete ranges accept everything
    pub fn contains(&self, date: &NaiveDate) -> bool {
        match (self.from, self.to) {
            (Some(from), Some(to)) => *date >= from && *date <= to,
            _ => true,
        }
    }

    /// Get a human-readable description of the range
    pub fn description(&self) -> String {
        match (self.from, self.to) {
            (Some(from), Some(to)) => format!("{} to {}", from, to),
            (Some(from), None) => format!("From {}", from),
            (None, Some(to)) => format!("Until {}", to),
            (None, None) => "All Time".to_string(),
        }
    }
}
