//! Transaction table rendering - filter bar, sortable headers, pagination

use txdash_core::{DerivedView, SortKey, ViewParameters};
use txdash_utils::escape_html;

use crate::query::query_string;

const TABLE_TARGET: &str = "#transactions-table";

/// Filter bar plus the table container, which loads itself over HTMX
pub fn transactions_section(params: &ViewParameters) -> String {
    let from = params
        .date_range
        .from
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default();
    let to = params
        .date_range
        .to
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default();

    format!(
        r#"<div class='bg-white rounded-xl shadow-sm p-6'>
            <div class='flex items-center justify-between mb-4'>
                <h3 class='text-lg font-semibold'>Recent Transactions</h3>
            </div>
            <form id='transactions-filter' class='flex flex-wrap items-center gap-3 mb-4'
                  hx-get='/transactions/list' hx-target='{target}'
                  hx-trigger='input changed delay:300ms from:input[name=q], change'>
                <input type='search' name='q' value='{q}' placeholder='Search name or email...'
                       class='flex-1 min-w-[200px] px-3 py-2 border rounded-lg'>
                <input type='date' name='from' value='{from}' class='px-2 py-2 border rounded-lg'>
                <span class='text-gray-400'>to</span>
                <input type='date' name='to' value='{to}' class='px-2 py-2 border rounded-lg'>
                {sort_inputs}
                <button type='button' class='px-3 py-2 bg-indigo-600 text-white rounded-lg hover:bg-indigo-700'
                        onclick="window.location='/transactions/export?' + new URLSearchParams(new FormData(this.form)).toString()">Export CSV</button>
            </form>
            <div id='transactions-table' hx-get='/transactions/list?{query}' hx-trigger='load'>
                {loading}
            </div>
        </div>"#,
        target = TABLE_TARGET,
        q = escape_html(&params.search_term),
        from = from,
        to = to,
        sort_inputs = sort_inputs(params, false),
        query = query_string(params),
        loading = loading_message(),
    )
}

/// Hidden sort fields read by the filter form and the export button
///
/// The table partial re-sends them out of band so later filter requests and
/// exports keep the sort chosen from the headers.
fn sort_inputs(params: &ViewParameters, out_of_band: bool) -> String {
    let oob = if out_of_band { " hx-swap-oob='true'" } else { "" };
    format!(
        "<input type='hidden' id='filter-sort' name='sort' value='{}'{}><input type='hidden' id='filter-dir' name='dir' value='{}'{}>",
        params.sort_key, oob, params.sort_direction, oob
    )
}

fn loading_message() -> &'static str {
    "<div class='text-center py-12 text-gray-500'><p>Loading transactions...</p></div>"
}

/// Placeholder shown while the fetch is in flight; polls until it settles
pub fn render_loading(params: &ViewParameters) -> String {
    format!(
        r#"<div hx-get='/transactions/list?{}' hx-trigger='load delay:1s' hx-target='{}'>{}</div>"#,
        query_string(params),
        TABLE_TARGET,
        loading_message()
    )
}

/// Fetch failure shown in place of the table
pub fn render_error(message: &str) -> String {
    format!(
        r#"<div class='text-center py-12 text-red-600'><p>Error: {}</p></div>"#,
        escape_html(message)
    )
}

fn sort_header(params: &ViewParameters, key: SortKey) -> String {
    let next = params.with_sort_toggled(key);
    format!(
        r#"<th class='px-4 py-2 text-left cursor-pointer select-none hover:bg-gray-100'
               hx-get='/transactions/list?{}' hx-target='{}'>{} {}</th>"#,
        query_string(&next),
        TABLE_TARGET,
        key.label(),
        params.sort_indicator(key)
    )
}

fn page_button(params: &ViewParameters, page: usize, label: &str, enabled: bool) -> String {
    let target = ViewParameters {
        page,
        ..params.clone()
    };
    format!(
        r#"<button {} hx-get='/transactions/list?{}' hx-target='{}' class='px-3 py-1 border rounded hover:bg-gray-100 disabled:opacity-50'>{}</button>"#,
        if enabled { "" } else { "disabled" },
        query_string(&target),
        TABLE_TARGET,
        label
    )
}

/// Table body for one derived view
///
/// `params` must carry the page the view was clamped to.
pub fn render_table(view: &DerivedView, params: &ViewParameters) -> String {
    let mut html = String::from("<table class='w-full text-sm'><thead class='bg-gray-50'><tr>");
    for key in SortKey::ALL {
        html.push_str(&sort_header(params, key));
    }
    html.push_str("</tr></thead><tbody>");

    if view.is_empty() {
        html.push_str(
            "<tr><td colspan='5' class='px-4 py-8 text-center text-gray-500'>No transactions found</td></tr>",
        );
    }

    for record in &view.rows {
        html.push_str(&format!(
            r#"<tr class='border-t hover:bg-gray-50'>
                <td class='px-4 py-2 font-medium'>{}</td>
                <td class='px-4 py-2 text-gray-600'>{}</td>
                <td class='px-4 py-2'>{}</td>
                <td class='px-4 py-2'>{}</td>
                <td class='px-4 py-2 text-gray-500'>{}</td>
            </tr>"#,
            escape_html(&record.name),
            escape_html(&record.email),
            escape_html(&record.amount),
            record.kind.label(),
            record.date.format("%Y-%m-%d")
        ));
    }
    html.push_str("</tbody></table>");

    html.push_str(&format!(
        r#"<div class='mt-4 flex items-center justify-between'>
            <span class='text-sm text-gray-500'>Page {} of {} ({} transactions)</span>
            <div class='flex items-center gap-2'>{}{}</div>
        </div>"#,
        view.page,
        view.total_pages,
        view.filtered_count,
        page_button(params, view.page.saturating_sub(1).max(1), "Previous", view.has_previous()),
        page_button(params, (view.page + 1).min(view.total_pages), "Next", view.has_next()),
    ));
    html.push_str(&sort_inputs(params, true));

    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::sample_records;
    use txdash_core::{derive_view, SortDirection};

    #[test]
    fn test_render_table_headers_and_rows() {
        let records = sample_records(7);
        let params = ViewParameters::default();
        let html = render_table(&derive_view(&records, &params), &params);

        assert!(html.contains("Date ↓"));
        assert!(html.contains("sort=name&dir=asc&page=1"));
        assert_eq!(html.matches("<tr class='border-t").count(), 5);
        assert!(html.contains("Page 1 of 2 (7 transactions)"));
    }

    #[test]
    fn test_header_toggle_flips_active_ascending_column() {
        let params = ViewParameters {
            sort_key: SortKey::Amount,
            sort_direction: SortDirection::Asc,
            ..ViewParameters::default()
        };
        let header = sort_header(&params, SortKey::Amount);
        assert!(header.contains("sort=amount&dir=desc"));
        assert!(header.contains("Amount ↑"));
    }

    #[test]
    fn test_render_table_syncs_sort_inputs() {
        let params = ViewParameters {
            sort_key: SortKey::Email,
            sort_direction: SortDirection::Asc,
            ..ViewParameters::default()
        };
        let html = render_table(&derive_view(&sample_records(3), &params), &params);
        assert!(html.contains("id='filter-sort' name='sort' value='email' hx-swap-oob='true'"));
        assert!(html.contains("id='filter-dir' name='dir' value='asc' hx-swap-oob='true'"));

        let section = transactions_section(&params);
        assert!(section.contains("id='filter-sort' name='sort' value='email'>"));
    }

    #[test]
    fn test_render_empty_view() {
        let params = ViewParameters::default();
        let html = render_table(&derive_view(&[], &params), &params);
        assert!(html.contains("No transactions found"));
        assert!(html.contains("Page 1 of 1 (0 transactions)"));
    }

    #[test]
    fn test_render_error_is_escaped() {
        assert_eq!(
            render_error("<boom>"),
            "<div class='text-center py-12 text-red-600'><p>Error: &lt;boom&gt;</p></div>"
        );
    }
}
