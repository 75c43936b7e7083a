//! Remote fetch adapter
//!
//! - UserSource: where user records come from (HTTP in production)
//! - RecordMapper: how an external user becomes a table [`Record`]
//! - FetchState: the one-shot fetch lifecycle

use async_trait::async_trait;
use chrono::{Days, NaiveDate, Utc};
use rand::Rng;
use rust_decimal::Decimal;

use super::models::{ExternalUser, Record};
use super::types::TransactionType;
use super::{CoreError, CoreResult};

/// Source of external user records
#[async_trait]
pub trait UserSource: Send + Sync {
    /// Fetch the full user list
    async fn fetch_users(&self) -> CoreResult<Vec<ExternalUser>>;

    /// Short description used in log lines
    fn describe(&self) -> String;
}

/// Fetches users with a single GET against a fixed endpoint
pub struct HttpUserSource {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpUserSource {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl UserSource for HttpUserSource {
    async fn fetch_users(&self) -> CoreResult<Vec<ExternalUser>> {
        let response = self
            .client
            .get(&self.endpoint)
            .send()
            .await
            .map_err(|e| CoreError::FetchFailed { message: e.to_string() })?;

        let status = response.status();
        if !status.is_success() {
            return Err(CoreError::FetchFailed {
                message: format!("HTTP {}", status),
            });
        }

        response
            .json::<Vec<ExternalUser>>()
            .await
            .map_err(|e| CoreError::FetchFailed { message: e.to_string() })
    }

    fn describe(&self) -> String {
        self.endpoint.clone()
    }
}

/// Turns an external user and its position into a table record
pub trait RecordMapper: Send + Sync {
    fn map_user(&self, user: &ExternalUser, index: usize) -> Record;

    /// Map a whole list, preserving order
    fn map_all(&self, users: &[ExternalUser]) -> Vec<Record> {
        users
            .iter()
            .enumerate()
            .map(|(index, user)| self.map_user(user, index))
            .collect()
    }
}

fn days_before(anchor: NaiveDate, index: usize) -> NaiveDate {
    anchor
        .checked_sub_days(Days::new(index as u64))
        .unwrap_or(anchor)
}

/// Mock enrichment with random amount and type
///
/// The date is `today - index` days, so the list spans the most recent days.
#[derive(Debug, Clone)]
pub struct RandomizedMapper {
    today: NaiveDate,
}

impl RandomizedMapper {
    pub fn new(today: NaiveDate) -> Self {
        Self { today }
    }
}

impl Default for RandomizedMapper {
    fn default() -> Self {
        Self::new(Utc::now().date_naive())
    }
}

impl RecordMapper for RandomizedMapper {
    fn map_user(&self, user: &ExternalUser, index: usize) -> Record {
        let mut rng = rand::rng();
        let cents: i64 = rng.random_range(1_000..=100_000);
        let kind = if rng.random_bool(0.5) {
            TransactionType::Sale
        } else {
            TransactionType::Subscription
        };

        Record {
            name: user.name.clone(),
            email: user.email.clone(),
            amount: txdash_utils::format_currency(Decimal::new(cents, 2)),
            kind,
            date: days_before(self.today, index),
        }
    }
}

/// Deterministic enrichment derived only from the index
///
/// Amount is `(index + 1) * $37.25`, types alternate starting with a sale,
/// dates step back one day per index from the anchor.
#[derive(Debug, Clone)]
pub struct IndexedMapper {
    anchor: NaiveDate,
}

impl IndexedMapper {
    pub fn new(anchor: NaiveDate) -> Self {
        Self { anchor }
    }
}

impl RecordMapper for IndexedMapper {
    fn map_user(&self, user: &ExternalUser, index: usize) -> Record {
        let kind = if index % 2 == 0 {
            TransactionType::Sale
        } else {
            TransactionType::Subscription
        };

        Record {
            name: user.name.clone(),
            email: user.email.clone(),
            amount: txdash_utils::format_currency(Decimal::new((index as i64 + 1) * 3725, 2)),
            kind,
            date: days_before(self.anchor, index),
        }
    }
}

/// Lifecycle of the one-shot fetch
///
/// Idle -> Loading -> Success | Error. Success and Error are terminal.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchState {
    Idle,
    Loading,
    Success(Vec<Record>),
    Error(String),
}

impl Default for FetchState {
    fn default() -> Self {
        FetchState::Idle
    }
}

impl FetchState {
    /// Fetched records, if the fetch succeeded
    pub fn records(&self) -> Option<&[Record]> {
        match self {
            FetchState::Success(records) => Some(records),
            _ => None,
        }
    }

    /// Short state name for logs and JSON responses
    pub fn name(&self) -> &'static str {
        match self {
            FetchState::Idle => "idle",
            FetchState::Loading => "loading",
            FetchState::Success(_) => "success",
            FetchState::Error(_) => "error",
        }
    }
}
