//! Key metrics and chart series for the dashboard cards

use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::models::Record;
use super::types::TransactionType;

/// Values shown in the metric cards
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSummary {
    /// Sum of all parsable amounts, formatted as currency
    pub total_revenue: String,
    pub subscriptions: usize,
    pub sales: usize,
    pub active_now: u64,
    pub record_count: usize,
}

/// One labelled value of a chart series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub label: String,
    pub value: f64,
}

impl ChartPoint {
    pub fn new(label: impl Into<String>, value: f64) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

/// Sum of parsable record amounts; unparsable amounts count as zero
pub fn total_revenue(records: &[Record]) -> Decimal {
    records.iter().filter_map(|r| r.amount_value()).sum()
}

/// Build the metric card values
pub fn summarize(records: &[Record], active_now: u64) -> DashboardSummary {
    let subscriptions = records
        .iter()
        .filter(|r| r.kind == TransactionType::Subscription)
        .count();

    DashboardSummary {
        total_revenue: txdash_utils::format_currency(total_revenue(records)),
        subscriptions,
        sales: records.len() - subscriptions,
        active_now,
        record_count: records.len(),
    }
}

/// Revenue per day, oldest first
pub fn revenue_by_day(records: &[Record]) -> Vec<ChartPoint> {
    let mut by_day: BTreeMap<NaiveDate, Decimal> = BTreeMap::new();
    for record in records {
        let amount = record.amount_value().unwrap_or(Decimal::ZERO);
        *by_day.entry(record.date).or_insert(Decimal::ZERO) += amount;
    }

    by_day
        .into_iter()
        .map(|(day, amount)| ChartPoint::new(day.format("%Y-%m-%d").to_string(), amount.to_f64().unwrap_or(0.0)))
        .collect()
}

/// Fixed traffic source breakdown shown in the pie chart
pub fn traffic_sources() -> Vec<ChartPoint> {
    vec![
        ChartPoint::new("Google", 400.0),
        ChartPoint::new("Facebook", 300.0),
        ChartPoint::new("Twitter", 300.0),
        ChartPoint::new("LinkedIn", 200.0),
    ]
}
