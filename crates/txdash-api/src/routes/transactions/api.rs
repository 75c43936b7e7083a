//! Transactions API endpoints - JSON API, HTMX partial and CSV download
//!
//! Endpoints:
//! - api_transactions: Derived view (JSON)
//! - htmx_transactions_list: Table for the current view (HTML fragment)
//! - export_transactions: Filtered, sorted view as a CSV attachment

use axum::extract::{Query, State};
use axum::http::header;
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use std::collections::HashMap;
use txdash_core::{CoreError, DerivedView, ViewParameters, EXPORT_CONTENT_TYPE, EXPORT_FILE_NAME};

use super::page::{render_error, render_loading, render_table};
use crate::query::view_parameters;
use crate::{ApiError, AppState};

/// JSON body of `/api/transactions`
#[derive(Debug, Serialize)]
pub struct TransactionsResponse {
    #[serde(flatten)]
    pub view: DerivedView,
    pub parameters: ViewParameters,
}

/// Get the derived view with paging metadata (JSON API)
pub async fn api_transactions(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<TransactionsResponse>, ApiError> {
    let dashboard = state.dashboard.read().await;
    let mut parameters = view_parameters(&params, dashboard.default_parameters())?;
    let view = dashboard.view(&parameters)?;
    parameters.page = view.page;

    Ok(Json(TransactionsResponse { view, parameters }))
}

/// Transaction table (HTML fragment)
///
/// Renders the loading placeholder until the fetch settles and the fetch
/// error in place of the table if it failed.
pub async fn htmx_transactions_list(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Html<String>, ApiError> {
    let dashboard = state.dashboard.read().await;
    let mut parameters = view_parameters(&params, dashboard.default_parameters())?;

    let html = match dashboard.view(&parameters) {
        Ok(view) => {
            parameters.page = view.page;
            render_table(&view, &parameters)
        }
        Err(CoreError::NotLoaded) => render_loading(&parameters),
        Err(CoreError::FetchFailed { message }) => render_error(&message),
        Err(other) => return Err(other.into()),
    };

    Ok(Html(html))
}

/// Download the filtered, sorted view as `transactions.csv`
///
/// An empty view answers `204 No Content` so the browser stays on the page.
pub async fn export_transactions(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Response, ApiError> {
    let dashboard = state.dashboard.read().await;
    let parameters = view_parameters(&params, dashboard.default_parameters())?;
    let csv = dashboard.export(&parameters)?;

    log::info!(
        target: "txdash::export",
        "Exporting {} ({} bytes)",
        EXPORT_FILE_NAME,
        csv.len()
    );

    Ok((
        [
            (header::CONTENT_TYPE, format!("{}; charset=utf-8", EXPORT_CONTENT_TYPE)),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", EXPORT_FILE_NAME),
            ),
        ],
        csv,
    )
        .into_response())
}
