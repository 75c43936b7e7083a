//! Dashboard routes - overview page, metric cards and charts
//!
//! Structure:
//! - api.rs: Summary and live metric JSON
//! - page.rs: Full page rendering and the revenue chart partial

pub mod api;
pub mod page;

pub use api::{api_active_metric, api_summary};
pub use page::{htmx_revenue_chart, index_page};
