//! View parameters carried in query strings
//!
//! Recognized keys: `q`, `from`, `to` (`yyyy-mm-dd`), `sort`, `dir`, `page`.
//! Empty values count as absent, so plain HTML forms can submit every field.

use chrono::NaiveDate;
use std::collections::HashMap;
use txdash_core::{DateRange, SortDirection, SortKey, ViewParameters};

use crate::ApiError;

fn param<'a>(params: &'a HashMap<String, String>, name: &str) -> Option<&'a str> {
    params.get(name).map(|s| s.trim()).filter(|s| !s.is_empty())
}

fn parse_date(name: &str, value: &str) -> Result<NaiveDate, ApiError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| ApiError::invalid_parameter(name, value))
}

/// Overlay query parameters on top of `defaults`
///
/// The page is taken as given; callers clamp it against the filtered count.
pub fn view_parameters(
    params: &HashMap<String, String>,
    defaults: ViewParameters,
) -> Result<ViewParameters, ApiError> {
    let mut view = defaults;

    if let Some(q) = params.get("q") {
        view.search_term = q.clone();
    }

    view.date_range = DateRange {
        from: param(params, "from").map(|v| parse_date("from", v)).transpose()?,
        to: param(params, "to").map(|v| parse_date("to", v)).transpose()?,
    };

    if let Some(sort) = param(params, "sort") {
        view.sort_key = sort
            .parse::<SortKey>()
            .map_err(|_| ApiError::invalid_parameter("sort", sort))?;
    }
    if let Some(dir) = param(params, "dir") {
        view.sort_direction = dir
            .parse::<SortDirection>()
            .map_err(|_| ApiError::invalid_parameter("dir", dir))?;
    }
    if let Some(page) = param(params, "page") {
        view.page = page
            .parse::<usize>()
            .map_err(|_| ApiError::invalid_parameter("page", page))?;
    }

    Ok(view)
}

/// Encode parameters back into a query string for links and HTMX requests
pub fn query_string(view: &ViewParameters) -> String {
    let mut parts = Vec::new();
    if !view.search_term.is_empty() {
        parts.push(format!("q={}", urlencoding::encode(&view.search_term)));
    }
    if let Some(from) = view.date_range.from {
        parts.push(format!("from={}", from.format("%Y-%m-%d")));
    }
    if let Some(to) = view.date_range.to {
        parts.push(format!("to={}", to.format("%Y-%m-%d")));
    }
    parts.push(format!("sort={}", view.sort_key));
    parts.push(format!("dir={}", view.sort_direction));
    parts.push(format!("page={}", view.page));
    parts.join("&")
}
