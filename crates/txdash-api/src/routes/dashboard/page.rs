//! Dashboard page - metric cards, charts and the transaction table shell

use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::Html;
use txdash_core::{traffic_sources, ChartPoint, Dashboard, DashboardSummary, FetchState};
use txdash_utils::{escape_html, format_number};

use crate::routes::transactions::transactions_section;
use crate::{page_response, AppState};

fn metric_card(title: &str, value: &str, id: &str) -> String {
    format!(
        r#"<div class='bg-white p-4 rounded-lg border shadow-sm'>
            <p class='text-sm text-gray-500'>{}</p>
            <p id='{}' class='text-2xl font-bold'>{}</p>
        </div>"#,
        title,
        id,
        escape_html(value)
    )
}

fn metric_cards(summary: &DashboardSummary) -> String {
    format!(
        "<div class='grid grid-cols-1 md:grid-cols-2 lg:grid-cols-4 gap-4 mb-6'>{}{}{}{}</div>",
        metric_card("Total Revenue", &summary.total_revenue, "metric-revenue"),
        metric_card("Subscriptions", &format!("+{}", format_number(summary.subscriptions)), "metric-subscriptions"),
        metric_card("Sales", &format!("+{}", format_number(summary.sales)), "metric-sales"),
        metric_card("Active Now", &format!("+{}", format_number(summary.active_now)), "metric-active"),
    )
}

/// Horizontal bars scaled to the largest value
fn bar_chart(title: &str, points: &[ChartPoint], empty_text: &str) -> String {
    let max = points.iter().map(|p| p.value).fold(0.0_f64, f64::max);

    let mut bars = String::new();
    for point in points {
        let width = if max > 0.0 { point.value / max * 100.0 } else { 0.0 };
        bars.push_str(&format!(
            r#"<div class='flex items-center gap-3 text-sm'>
                <span class='w-24 text-gray-500'>{}</span>
                <div class='flex-1 bg-gray-100 rounded h-3'><div class='bg-indigo-500 h-3 rounded' style='width:{:.1}%'></div></div>
                <span class='w-20 text-right'>{}</span>
            </div>"#,
            escape_html(&point.label),
            width,
            format_number(point.value.round() as i64)
        ));
    }
    if bars.is_empty() {
        bars = format!("<p class='text-sm text-gray-500'>{}</p>", empty_text);
    }

    format!(
        r#"<div class='bg-white rounded-xl shadow-sm p-6'>
            <h3 class='text-lg font-semibold mb-4'>{}</h3>
            <div class='space-y-2'>{}</div>
        </div>"#,
        title, bars
    )
}

/// Polls the summary endpoint and refreshes every metric card
///
/// Cards rendered before the fetch settled fill in on the next tick.
fn metric_cards_script(refresh_secs: u64) -> String {
    format!(
        r#"<script>
        setInterval(function() {{
            fetch('/api/summary')
                .then(r => r.json())
                .then(s => {{
                    document.getElementById('metric-revenue').textContent = s.total_revenue;
                    document.getElementById('metric-subscriptions').textContent = '+' + s.subscriptions.toLocaleString('en-US');
                    document.getElementById('metric-sales').textContent = '+' + s.sales.toLocaleString('en-US');
                    document.getElementById('metric-active').textContent = '+' + s.active_now.toLocaleString('en-US');
                }})
                .catch(err => console.error('Failed to refresh metrics:', err));
        }}, {});
        </script>"#,
        refresh_secs.saturating_mul(1000)
    )
}

/// Revenue chart; re-requests itself until the fetch settles
fn revenue_panel(dashboard: &Dashboard) -> String {
    let (empty_text, poll) = match dashboard.state() {
        FetchState::Error(_) => ("Revenue unavailable", ""),
        FetchState::Success(_) => ("No revenue recorded", ""),
        FetchState::Idle | FetchState::Loading => (
            "Loading...",
            " hx-get='/dashboard/revenue' hx-trigger='load delay:1s' hx-swap='outerHTML'",
        ),
    };

    format!(
        "<div id='revenue-chart'{}>{}</div>",
        poll,
        bar_chart("Revenue by Day", &dashboard.revenue_chart(), empty_text)
    )
}

/// Revenue chart (HTML fragment)
pub async fn htmx_revenue_chart(State(state): State<AppState>) -> Html<String> {
    let dashboard = state.dashboard.read().await;
    Html(revenue_panel(&dashboard))
}

/// Dashboard page
pub async fn index_page(State(state): State<AppState>, headers: HeaderMap) -> Html<String> {
    let dashboard = state.dashboard.read().await;
    let summary = dashboard.summary();
    let params = dashboard.default_parameters();

    let inner_content = format!(
        r#"<div class='mb-6'><h2 class='text-2xl font-bold'>Dashboard</h2></div>
        {}
        <div class='grid grid-cols-1 lg:grid-cols-2 gap-6 mb-6'>
            {}
            {}
        </div>
        {}
        {}"#,
        metric_cards(&summary),
        revenue_panel(&dashboard),
        bar_chart("Traffic Sources", &traffic_sources(), "No traffic data"),
        transactions_section(&params),
        metric_cards_script(state.config.dashboard.live_metric_interval_secs),
    );

    Html(page_response(&headers, "Dashboard", &inner_content))
}
