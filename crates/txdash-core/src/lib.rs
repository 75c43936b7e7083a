//! Transaction view model for the txdash dashboard
//!
//! Modules:
//! - view: filter -> sort -> paginate pipeline over fetched records
//! - export: CSV serialization of the filtered view
//! - source: remote fetch adapter and record mapping
//! - live: "Active Now" refresh task
//! - reports: metric cards and chart series

pub mod error;
pub mod export;
pub mod live;
pub mod models;
pub mod reports;
pub mod source;
pub mod types;
pub mod view;

use tokio::sync::RwLock;

pub use error::{log_error, CoreError, CoreResult, ErrorCode, ErrorContext, ErrorDetails, ErrorSeverity};
pub use export::{export_csv, ExportError, EXPORT_CONTENT_TYPE, EXPORT_FILE_NAME};
pub use live::{random_active_now, spawn_live_metric, LiveMetric, LiveMetricHandle};
pub use models::{ExternalUser, Record};
pub use reports::{revenue_by_day, summarize, traffic_sources, ChartPoint, DashboardSummary};
pub use source::{FetchState, HttpUserSource, IndexedMapper, RandomizedMapper, RecordMapper, UserSource};
pub use txdash_config::{DashboardConfig, SortDirection, SortKey};
pub use types::{DateRange, TransactionType};
pub use view::{
    clamp_page, derive_view, filter_records, paginate, select_records, sort_records, total_pages, DerivedView,
    ViewParameters, PAGE_SIZE,
};

/// Dashboard session state
///
/// Holds the one-shot fetch result and the live metric reader. The record
/// list is written once, when the fetch finishes, and only read afterwards.
pub struct Dashboard {
    state: FetchState,
    page_size: usize,
    default_sort: SortKey,
    default_direction: SortDirection,
    live: LiveMetric,
}

impl Dashboard {
    /// Create an idle dashboard
    pub fn new(config: &DashboardConfig, live: LiveMetric) -> Self {
        Self {
            state: FetchState::Idle,
            page_size: config.page_size,
            default_sort: config.default_sort,
            default_direction: config.default_direction,
            live,
        }
    }

    /// Parameters for the first render
    pub fn default_parameters(&self) -> ViewParameters {
        ViewParameters::new(self.page_size, self.default_sort, self.default_direction)
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn state(&self) -> &FetchState {
        &self.state
    }

    /// Move Idle -> Loading; returns false if a fetch was already started
    pub fn begin_load(&mut self) -> bool {
        match self.state {
            FetchState::Idle => {
                self.state = FetchState::Loading;
                true
            }
            _ => {
                log::warn!(
                    target: "txdash::dashboard",
                    "Ignoring load request: fetch already {}",
                    self.state.name()
                );
                false
            }
        }
    }

    /// Move Loading -> Success | Error
    pub fn finish_load(&mut self, result: CoreResult<Vec<Record>>) {
        if self.state != FetchState::Loading {
            log::warn!(
                target: "txdash::dashboard",
                "Ignoring fetch result while {}",
                self.state.name()
            );
            return;
        }

        self.state = match result {
            Ok(records) => {
                log::info!(target: "txdash::dashboard", "Loaded {} transactions", records.len());
                FetchState::Success(records)
            }
            Err(error) => {
                log_error(&error, &ErrorContext::new("load_transactions"));
                match error {
                    CoreError::FetchFailed { message } => FetchState::Error(message),
                    other => FetchState::Error(other.to_string()),
                }
            }
        };
    }

    /// Fetched records, or why they are not available
    pub fn records(&self) -> CoreResult<&[Record]> {
        if let Some(records) = self.state.records() {
            return Ok(records);
        }
        match &self.state {
            FetchState::Error(message) => Err(CoreError::FetchFailed {
                message: message.clone(),
            }),
            _ => Err(CoreError::NotLoaded),
        }
    }

    /// Derived view for the requested parameters, with the page clamped
    pub fn view(&self, params: &ViewParameters) -> CoreResult<DerivedView> {
        let records = self.records()?;
        let selected = select_records(records, params);
        let pages = total_pages(selected.len(), params.page_size);
        let page = clamp_page(params.page, pages);

        Ok(DerivedView {
            rows: paginate(&selected, page, params.page_size).to_vec(),
            filtered_count: selected.len(),
            page,
            page_size: params.page_size,
            total_pages: pages,
        })
    }

    /// CSV of every record matching the filters, in the current sort order
    pub fn export(&self, params: &ViewParameters) -> CoreResult<String> {
        let records = self.records()?;
        let selected = select_records(records, params);
        export_csv(&selected).map_err(|e| {
            let error = CoreError::from(e);
            log_error(
                &error,
                &ErrorContext::new("export_csv")
                    .with_data("search_term", serde_json::json!(params.search_term))
                    .with_data("date_range", serde_json::json!(params.date_range.description())),
            );
            error
        })
    }

    /// Metric card values; empty until the fetch succeeds
    pub fn summary(&self) -> DashboardSummary {
        summarize(self.records().unwrap_or(&[]), self.live.get())
    }

    /// Daily revenue series over all fetched records
    pub fn revenue_chart(&self) -> Vec<ChartPoint> {
        revenue_by_day(self.records().unwrap_or(&[]))
    }

    pub fn active_now(&self) -> u64 {
        self.live.get()
    }
}

/// Run the one-shot fetch for a shared dashboard
///
/// The lock is only held for the state transitions, so readers see the
/// Loading state while the request is in flight. Returns false when a
/// fetch had already been started.
pub async fn load_dashboard(
    dashboard: &RwLock<Dashboard>,
    source: &dyn UserSource,
    mapper: &dyn RecordMapper,
) -> bool {
    if !dashboard.write().await.begin_load() {
        return false;
    }

    log::info!(target: "txdash::dashboard", "Fetching transactions from {}", source.describe());
    let result = source.fetch_users().await.map(|users| mapper.map_all(&users));
    dashboard.write().await.finish_load(result);
    true
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use chrono::NaiveDate;

    pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    pub fn record(name: &str, email: &str, amount: &str, kind: TransactionType, date: NaiveDate) -> Record {
        Record {
            name: name.to_string(),
            email: email.to_string(),
            amount: amount.to_string(),
            kind,
            date,
        }
    }

    pub fn users(count: usize) -> Vec<ExternalUser> {
        (0..count)
            .map(|i| ExternalUser {
                id: Some(i as u64 + 1),
                name: format!("User {:02}", i),
                email: format!("user{:02}@example.com", i),
                username: None,
            })
            .collect()
    }

    /// Unique names, emails, amounts and dates; dates count back from 2024-06-01
    pub fn sample_records(count: usize) -> Vec<Record> {
        IndexedMapper::new(date(2024, 6, 1)).map_all(&users(count))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use testing::{date, users};

    struct StaticSource(Vec<ExternalUser>);

    #[async_trait]
    impl UserSource for StaticSource {
        async fn fetch_users(&self) -> CoreResult<Vec<ExternalUser>> {
            Ok(self.0.clone())
        }

        fn describe(&self) -> String {
            "static".to_string()
        }
    }

    struct FailingSource;

    #[async_trait]
    impl UserSource for FailingSource {
        async fn fetch_users(&self) -> CoreResult<Vec<ExternalUser>> {
            Err(CoreError::FetchFailed {
                message: "HTTP 500 Internal Server Error".to_string(),
            })
        }

        fn describe(&self) -> String {
            "failing".to_string()
        }
    }

    fn dashboard() -> RwLock<Dashboard> {
        RwLock::new(Dashboard::new(&DashboardConfig::default(), LiveMetric::new(573)))
    }

    fn mapper() -> IndexedMapper {
        IndexedMapper::new(date(2024, 6, 1))
    }

    #[tokio::test]
    async fn test_load_success() {
        let dashboard = dashboard();
        assert_eq!(dashboard.read().await.state(), &FetchState::Idle);

        assert!(load_dashboard(&dashboard, &StaticSource(users(7)), &mapper()).await);

        let guard = dashboard.read().await;
        assert_eq!(guard.state().name(), "success");
        assert_eq!(guard.records().unwrap().len(), 7);
    }

    #[tokio::test]
    async fn test_load_failure_is_terminal() {
        let dashboard = dashboard();
        assert!(load_dashboard(&dashboard, &FailingSource, &mapper()).await);

        {
            let guard = dashboard.read().await;
            match guard.state() {
                FetchState::Error(message) => assert!(message.contains("HTTP 500")),
                other => panic!("unexpected state: {:?}", other),
            }
            assert!(matches!(guard.records(), Err(CoreError::FetchFailed { .. })));
        }

        // no retry
        assert!(!load_dashboard(&dashboard, &StaticSource(users(3)), &mapper()).await);
        assert_eq!(dashboard.read().await.state().name(), "error");
    }

    #[tokio::test]
    async fn test_second_load_is_ignored() {
        let dashboard = dashboard();
        assert!(load_dashboard(&dashboard, &StaticSource(users(3)), &mapper()).await);
        assert!(!load_dashboard(&dashboard, &StaticSource(users(9)), &mapper()).await);
        assert_eq!(dashboard.read().await.records().unwrap().len(), 3);
    }

    #[test]
    fn test_records_before_load() {
        let mut dashboard = Dashboard::new(&DashboardConfig::default(), LiveMetric::new(0));
        assert_eq!(dashboard.records(), Err(CoreError::NotLoaded));
        assert!(dashboard.begin_load());
        assert_eq!(dashboard.records(), Err(CoreError::NotLoaded));
        assert!(matches!(dashboard.view(&ViewParameters::default()), Err(CoreError::NotLoaded)));
    }

    #[test]
    fn test_records_follow_fetch_state() {
        let mut dashboard = Dashboard::new(&DashboardConfig::default(), LiveMetric::new(0));
        dashboard.begin_load();
        dashboard.finish_load(Ok(mapper().map_all(&users(2))));

        assert_eq!(dashboard.records().ok(), dashboard.state().records());
        assert_eq!(dashboard.records().unwrap()[1].name, "User 01");
    }

    #[test]
    fn test_finish_without_begin_is_ignored() {
        let mut dashboard = Dashboard::new(&DashboardConfig::default(), LiveMetric::new(0));
        dashboard.finish_load(Ok(vec![]));
        assert_eq!(dashboard.state(), &FetchState::Idle);
    }

    fn loaded(count: usize) -> Dashboard {
        let mut dashboard = Dashboard::new(&DashboardConfig::default(), LiveMetric::new(640));
        dashboard.begin_load();
        dashboard.finish_load(Ok(testing::sample_records(count)));
        dashboard
    }

    #[test]
    fn test_view_clamps_page() {
        let dashboard = loaded(7);
        let mut params = dashboard.default_parameters();
        params.page = 40;

        let view = dashboard.view(&params).unwrap();
        assert_eq!(view.page, 2);
        assert_eq!(view.rows.len(), 2);

        params.page = 0;
        assert_eq!(dashboard.view(&params).unwrap().page, 1);
    }

    #[test]
    fn test_default_parameters_follow_config() {
        let dashboard = loaded(7);
        let params = dashboard.default_parameters();
        assert_eq!(params.page_size, 5);
        assert_eq!(params.sort_key, SortKey::Date);
        assert_eq!(params.sort_direction, SortDirection::Desc);

        let view = dashboard.view(&params).unwrap();
        assert_eq!(view.rows[0].date, date(2024, 6, 1));
    }

    #[test]
    fn test_export_uses_filtered_unpaginated_rows() {
        let dashboard = loaded(12);
        let mut params = dashboard.default_parameters();
        params.date_range = DateRange::between(date(2024, 5, 23), date(2024, 5, 30));
        params.page = 2;

        let csv = dashboard.export(&params).unwrap();
        // header + 8 matching rows, regardless of page
        assert_eq!(csv.lines().count(), 9);
        assert!(csv.lines().nth(1).unwrap().ends_with("\"2024-05-30\""));
    }

    #[test]
    fn test_export_empty_view() {
        let dashboard = loaded(5);
        let mut params = dashboard.default_parameters();
        params.search_term = "zz-no-match".to_string();
        assert_eq!(dashboard.export(&params), Err(CoreError::EmptyExport));
    }

    #[test]
    fn test_summary() {
        let dashboard = loaded(4);
        let summary = dashboard.summary();
        // 37.25 + 74.50 + 111.75 + 149.00
        assert_eq!(summary.total_revenue, "$372.50");
        assert_eq!(summary.sales, 2);
        assert_eq!(summary.subscriptions, 2);
        assert_eq!(summary.active_now, 640);
        assert_eq!(dashboard.revenue_chart().len(), 4);
    }

    #[test]
    fn test_summary_before_load_is_empty() {
        let dashboard = Dashboard::new(&DashboardConfig::default(), LiveMetric::new(501));
        let summary = dashboard.summary();
        assert_eq!(summary.record_count, 0);
        assert_eq!(summary.active_now, 501);
    }
}
