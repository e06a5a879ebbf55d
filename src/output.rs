//! Terminal rendering of tables, records and toasts.

use comfy_table::{modifiers, presets, ContentArrangement, Table};
use serde_json::{Map, Value};
use terminal_size::{terminal_size, Width};
use yansi::Paint;

use crate::list::{ListState, ListStatus, Toast, ToastLevel};
use crate::models::{Pagination, RowView};
use crate::utils::value_to_short_string;

pub const NO_DATA: &str = "No data";

pub fn new_table() -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL);
    table.apply_modifier(modifiers::UTF8_ROUND_CORNERS);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    if let Some((Width(w), _)) = terminal_size() {
        table.set_width(w.saturating_sub(4));
    }
    table
}

/// Table of rows; an empty page renders one explicit "No data" row.
pub fn render_rows(headers: &[String], rows: &[RowView]) -> Table {
    let mut table = new_table();
    table.set_header(headers);
    if rows.is_empty() {
        let mut filler = vec![String::new(); headers.len().max(1)];
        filler[0] = NO_DATA.to_string();
        table.add_row(filler);
    } else {
        for row in rows {
            table.add_row(row.cells.clone());
        }
    }
    table
}

pub fn pagination_footer(p: &Pagination, rows_on_page: usize) -> String {
    match p.showing(rows_on_page) {
        Some((from, to)) => format!(
            "Page {} of {} | Showing {}-{} of {} | {} per page",
            p.current_page,
            p.total_pages(),
            from,
            to,
            p.total,
            p.per_page
        ),
        None => format!("Page {} of {} | 0 results", p.current_page, p.total_pages()),
    }
}

pub fn print_rows(headers: &[String], rows: &[RowView], pagination: &Pagination) {
    println!("\n{}", render_rows(headers, rows));
    println!("{}\n", Paint::new(pagination_footer(pagination, rows.len())).cyan());
}

/// Whole browse screen: filters line, table, footer and status.
pub fn print_list_state(title: &str, headers: &[String], state: &ListState<RowView>) {
    let filters = state
        .query
        .filters
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join(" ");
    println!(
        "\n{} {}",
        Paint::new(title).bold().underline(),
        Paint::new(if filters.is_empty() { "(no filters)".to_string() } else { filters }).dim()
    );
    println!("{}", render_rows(headers, &state.rows));
    let mut footer = state.pagination;
    footer.current_page = state.displayed_page();
    println!("{}", Paint::new(pagination_footer(&footer, state.rows.len())).cyan());
    match &state.status {
        ListStatus::Loading => println!("{}", Paint::new("Loading…").yellow()),
        ListStatus::Error(msg) => println!("{} {}", Paint::new("Last request failed:").red(), msg),
        ListStatus::Idle => {}
    }
}

/// Field/value table of one record.
pub fn print_record(record: &Map<String, Value>) {
    let mut table = new_table();
    table.set_header(vec!["Field", "Value"]);
    for (k, v) in record {
        table.add_row(vec![k.clone(), value_to_short_string(v)]);
    }
    println!("\n{table}\n");
}

pub fn print_toast(toast: &Toast) {
    match toast.level {
        ToastLevel::Success => println!("{}", Paint::new(&toast.message).green()),
        ToastLevel::Info => println!("{}", Paint::new(&toast.message).cyan()),
        ToastLevel::Warning => eprintln!("{}", Paint::new(&toast.message).yellow()),
        ToastLevel::Error => eprintln!("{}", Paint::new(&toast.message).red()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_rows_render_no_data_row() {
        let headers = vec!["ID".to_string(), "Name".to_string()];
        let table = render_rows(&headers, &[]);
        assert_eq!(table.row_iter().count(), 1);
        assert!(table.to_string().contains(NO_DATA));
    }

    #[test]
    fn footer_reports_range() {
        let p = Pagination { current_page: 2, per_page: 10, total: 15 };
        assert_eq!(pagination_footer(&p, 5), "Page 2 of 2 | Showing 11-15 of 15 | 10 per page");
        let empty = Pagination { current_page: 1, per_page: 10, total: 0 };
        assert_eq!(pagination_footer(&empty, 0), "Page 1 of 1 | 0 results");
    }
}
