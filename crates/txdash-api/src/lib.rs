//! HTTP dashboard server with HTMX support
//!
//! Routes are organized into modules:
//! - routes::dashboard: Dashboard page, summary and live metric
//! - routes::transactions: Transaction table, JSON view and CSV export

pub mod error;
pub mod query;
pub mod routes;

use axum::{routing::get, Router};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use txdash_config::Config;
use txdash_core::Dashboard;

pub use error::ApiError;

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub dashboard: Arc<RwLock<Dashboard>>,
    pub config: Config,
}

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    use routes::dashboard::{api_active_metric, api_summary, htmx_revenue_chart, index_page};
    use routes::transactions::{api_transactions, export_transactions, htmx_transactions_list};

    Router::new()
        // API endpoints
        .route("/api/health", get(health_check))
        .route("/api/transactions", get(api_transactions))
        .route("/api/summary", get(api_summary))
        .route("/api/metrics/active", get(api_active_metric))
        // Pages
        .route("/", get(index_page))
        // HTMX partials
        .route("/transactions/list", get(htmx_transactions_list))
        .route("/transactions/export", get(export_transactions))
        .route("/dashboard/revenue", get(htmx_revenue_chart))
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

// ==================== Template Functions ====================

/// Base HTML template
pub fn base_html(title: &str, content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{} - txdash</title>
    <script src="https://unpkg.com/htmx.org@1.9.10"></script>
    <script src="https://cdn.tailwindcss.com"></script>
    <style>
        .htmx-indicator {{ opacity: 0; transition: opacity 0.3s; }}
        .htmx-request .htmx-indicator {{ opacity: 1; }}
        .htmx-request.htmx-indicator {{ opacity: 1; }}
    </style>
</head>
<body class="bg-gray-50 text-gray-900">
    {}
</body>
</html>"#,
        title, content
    )
}

/// Top bar shown above every full page
pub fn header_bar() -> String {
    r#"<header class='bg-white border-b px-6 py-4 flex items-center justify-between'>
        <h1 class='text-xl font-bold text-indigo-600'>txdash</h1>
        <span class='text-sm text-gray-500'>Transaction analytics</span>
    </header>"#
        .to_string()
}

fn is_htmx_request(headers: &axum::http::HeaderMap) -> bool {
    headers.get("hx-request").is_some()
}

/// Wrap content for full page or HTMX partial
pub fn page_response(headers: &axum::http::HeaderMap, title: &str, inner_content: &str) -> String {
    if is_htmx_request(headers) {
        format!("<main class='p-6'>{}</main>", inner_content)
    } else {
        base_html(
            title,
            &format!(
                r#"<div class='min-h-screen flex flex-col'>
    {}
    <main class='flex-1 p-6'>{}</main>
</div>"#,
                header_bar(),
                inner_content
            ),
        )
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    log::info!("Shutdown signal received");
}

/// Bind the configured address and serve until Ctrl-C or a listener failure
pub async fn start_server(config: Config, dashboard: Arc<RwLock<Dashboard>>) -> std::io::Result<()> {
    let addr = config.bind_address();
    let state = AppState { dashboard, config };

    let router = create_router(state);

    let listener = TcpListener::bind(&addr).await?;
    log::info!("Starting txdash server on http://{}", addr);
    log::info!("Available routes:");
    log::info!("  - / (Dashboard)");
    log::info!("  - /transactions/list (Table partial)");
    log::info!("  - /transactions/export (CSV download)");
    log::info!("  - /api/* (JSON API endpoints)");

    let result = axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await;
    match &result {
        Ok(_) => log::info!("Server stopped gracefully"),
        Err(e) => log::error!("Server error: {}", e),
    }
    result
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::response::Response;
    use tower::ServiceExt;
    use txdash_core::{IndexedMapper, LiveMetric, Record, RecordMapper};

    pub fn state_with(setup: impl FnOnce(&mut Dashboard)) -> AppState {
        let config = Config::default();
        let mut dashboard = Dashboard::new(&config.dashboard, LiveMetric::new(612));
        setup(&mut dashboard);
        AppState {
            dashboard: Arc::new(RwLock::new(dashboard)),
            config,
        }
    }

    pub fn sample_records(count: usize) -> Vec<Record> {
        let users: Vec<txdash_core::ExternalUser> = (0..count)
            .map(|i| txdash_core::ExternalUser {
                id: Some(i as u64 + 1),
                name: format!("User {:02}", i),
                email: format!("user{:02}@example.com", i),
                username: None,
            })
            .collect();
        IndexedMapper::new(chrono::NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()).map_all(&users)
    }

    /// Dashboard whose fetch already succeeded with `count` records
    pub fn loaded_state(count: usize) -> AppState {
        state_with(|d| {
            d.begin_load();
            d.finish_load(Ok(sample_records(count)));
        })
    }

    pub async fn get(state: AppState, uri: &str) -> Response {
        create_router(state)
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    pub async fn get_text(state: AppState, uri: &str) -> (StatusCode, String) {
        let response = get(state, uri).await;
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use testing::{get_text, loaded_state};

    #[tokio::test]
    async fn test_health() {
        let (status, body) = get_text(loaded_state(0), "/api/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "OK");
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let (status, _) = get_text(loaded_state(0), "/nope").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_page_response_htmx_partial() {
        let mut headers = axum::http::HeaderMap::new();
        assert!(page_response(&headers, "Dashboard", "<p>x</p>").starts_with("<!DOCTYPE html>"));

        headers.insert("hx-request", "true".parse().unwrap());
        assert_eq!(page_response(&headers, "Dashboard", "<p>x</p>"), "<main class='p-6'><p>x</p></main>");
    }
}
