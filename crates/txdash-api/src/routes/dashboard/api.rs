//! Dashboard API endpoints

use axum::extract::State;
use axum::Json;
use serde::Serialize;
use txdash_core::DashboardSummary;

use crate::AppState;

/// Metric card values (JSON API)
pub async fn api_summary(State(state): State<AppState>) -> Json<DashboardSummary> {
    let dashboard = state.dashboard.read().await;
    Json(dashboard.summary())
}

#[derive(Debug, Serialize)]
pub struct ActiveMetricResponse {
    pub active_now: u64,
    pub refresh_secs: u64,
}

/// Current "Active Now" value (JSON API)
pub async fn api_active_metric(State(state): State<AppState>) -> Json<ActiveMetricResponse> {
    let active_now = state.dashboard.read().await.active_now();
    Json(ActiveMetricResponse {
        active_now,
        refresh_secs: state.config.dashboard.live_metric_interval_secs,
    })
}
