//! Transaction routes - table, JSON view, CSV export
//!
//! Structure:
//! - api.rs: JSON API, HTMX partial and download endpoints
//! - page.rs: Table and filter bar rendering

pub mod api;
pub mod page;

pub use api::{api_transactions, export_transactions, htmx_transactions_list};
pub use page::transactions_section;
