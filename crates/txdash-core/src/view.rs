//! Derived view pipeline: filter -> sort -> paginate
//!
//! Every function here is a pure projection of the fetched records and the
//! current [`ViewParameters`]; nothing is cached between calls.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use super::models::Record;
use super::types::DateRange;
use txdash_config::{SortDirection, SortKey};

/// Rows per page unless configured otherwise
pub const PAGE_SIZE: usize = 5;

/// User-controlled filter/sort/page state driving the table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewParameters {
    /// Case-insensitive substring matched against name or email
    pub search_term: String,
    /// Inclusive date bounds
    pub date_range: DateRange,
    pub sort_key: SortKey,
    pub sort_direction: SortDirection,
    /// 1-based page number
    pub page: usize,
    pub page_size: usize,
}

impl Default for ViewParameters {
    fn default() -> Self {
        Self {
            search_term: String::new(),
            date_range: DateRange::default(),
            sort_key: SortKey::Date,
            sort_direction: SortDirection::Desc,
            page: 1,
            page_size: PAGE_SIZE,
        }
    }
}

impl ViewParameters {
    /// Parameters for the first page with the given sort
    pub fn new(page_size: usize, sort_key: SortKey, sort_direction: SortDirection) -> Self {
        Self {
            page_size,
            sort_key,
            sort_direction,
            ..Self::default()
        }
    }

    /// Apply a click on a column header
    ///
    /// Clicking the column already sorted ascending flips it to descending;
    /// any other click sorts that column ascending.
    pub fn toggle_sort(&mut self, key: SortKey) {
        if self.sort_key == key && self.sort_direction == SortDirection::Asc {
            self.sort_direction = SortDirection::Desc;
        } else {
            self.sort_key = key;
            self.sort_direction = SortDirection::Asc;
        }
    }

    /// Copy of these parameters with the header click applied
    pub fn with_sort_toggled(&self, key: SortKey) -> Self {
        let mut next = self.clone();
        next.toggle_sort(key);
        next
    }

    /// Arrow shown next to the active column header
    pub fn sort_indicator(&self, key: SortKey) -> &'static str {
        if self.sort_key != key {
            return "";
        }
        match self.sort_direction {
            SortDirection::Asc => "↑",
            SortDirection::Desc => "↓",
        }
    }
}

/// The slice of records actually rendered, plus paging metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedView {
    pub rows: Vec<Record>,
    /// Number of records matching the filters, before pagination
    pub filtered_count: usize,
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
}

impl DerivedView {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}

/// Keep records inside the date range whose name or email contains the query
pub fn filter_records(records: &[Record], query: &str, date_range: &DateRange) -> Vec<Record> {
    let query_lower = query.to_lowercase();
    records
        .iter()
        .filter(|r| date_range.contains(&r.date))
        .filter(|r| r.matches_query(&query_lower))
        .cloned()
        .collect()
}

/// Natural ordering of two records on one column
///
/// Amounts compare numerically; values that do not parse sort after all
/// parsable ones, in text order.
pub fn compare_records(a: &Record, b: &Record, key: SortKey) -> Ordering {
    match key {
        SortKey::Name => a.name.cmp(&b.name),
        SortKey::Email => a.email.cmp(&b.email),
        SortKey::Amount => match (a.amount_value(), b.amount_value()) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => a.amount.cmp(&b.amount),
        },
        SortKey::Type => a.kind.label().cmp(b.kind.label()),
        SortKey::Date => a.date.cmp(&b.date),
    }
}

/// Stable sort into a new vector; equal keys keep their input order
pub fn sort_records(records: &[Record], key: SortKey, direction: SortDirection) -> Vec<Record> {
    let mut sorted = records.to_vec();
    match direction {
        SortDirection::Asc => sorted.sort_by(|a, b| compare_records(a, b, key)),
        SortDirection::Desc => sorted.sort_by(|a, b| compare_records(b, a, key)),
    }
    sorted
}

/// Number of pages needed for `len` items, never less than 1
pub fn total_pages(len: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 1;
    }
    len.div_ceil(page_size).max(1)
}

/// Clamp a requested page into `1..=total_pages`
pub fn clamp_page(page: usize, total_pages: usize) -> usize {
    page.clamp(1, total_pages.max(1))
}

/// Items `[(page-1)*size, page*size)` clamped to the list bounds
///
/// Page 0 and pages starting past the end yield an empty slice.
pub fn paginate<T>(items: &[T], page: usize, page_size: usize) -> &[T] {
    if page == 0 || page_size == 0 {
        return &[];
    }
    let start = (page - 1).saturating_mul(page_size);
    if start >= items.len() {
        return &[];
    }
    let end = start.saturating_add(page_size).min(items.len());
    &items[start..end]
}

/// Filtered and sorted records, before pagination
pub fn select_records(records: &[Record], params: &ViewParameters) -> Vec<Record> {
    let filtered = filter_records(records, &params.search_term, &params.date_range);
    sort_records(&filtered, params.sort_key, params.sort_direction)
}

/// Full pipeline for one page; `params.page` is used as given
pub fn derive_view(records: &[Record], params: &ViewParameters) -> DerivedView {
    let selected = select_records(records, params);
    let rows = paginate(&selected, params.page, params.page_size).to_vec();
    DerivedView {
        rows,
        filtered_count: selected.len(),
        page: params.page,
        page_size: params.page_size,
        total_pages: total_pages(selected.len(), params.page_size),
    }
}
