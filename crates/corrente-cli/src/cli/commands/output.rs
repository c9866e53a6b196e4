//! Table rendering for list screens.

use chrono::{DateTime, Utc};
use comfy_table::{ContentArrangement, Table, presets};
use corrente_core::config::Config;
use corrente_core::listing::{Listable, TableView};

/// Search, tab and page requested on the command line.
#[derive(Debug, Clone, Default)]
pub struct ListOptions {
    pub search: Option<String>,
    pub tab: Option<String>,
    pub page: usize,
    pub page_size: Option<usize>,
}

impl ListOptions {
    /// Builds a view over `items` with the requested filters applied.
    ///
    /// Filters are applied before the page so an out-of-range page clamps
    /// against the filtered size.
    pub fn view<T: Listable>(&self, items: Vec<T>, config: &Config) -> TableView<T> {
        let page_size = self
            .page_size
            .unwrap_or_else(|| config.effective_page_size());
        let mut view = TableView::new(items, page_size);
        if let Some(search) = &self.search {
            view.set_search(search.clone());
        }
        if let Some(tab) = &self.tab {
            view.set_tab(Some(tab.clone()));
        }
        view.set_page(self.page);
        view
    }
}

pub fn table(header: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header.to_vec());
    table
}

/// Prints the current page of `view` as a table, followed by a page footer.
pub fn print_view<T, F>(view: &TableView<T>, header: &[&str], row: F)
where
    T: Listable,
    F: Fn(&T) -> Vec<String>,
{
    let items = view.page_items();
    if items.is_empty() {
        println!("No results.");
    } else {
        let mut table = table(header);
        for item in items {
            table.add_row(row(item));
        }
        println!("{table}");
    }
    println!("{}", footer(view));
}

fn footer<T: Listable>(view: &TableView<T>) -> String {
    let mut line = format!(
        "Page {} of {} · {} result(s)",
        view.page(),
        view.total_pages(),
        view.filtered_len()
    );
    if let Some(tab) = view.tab() {
        line.push_str(&format!(" · tab {tab}"));
    }
    if !view.search().trim().is_empty() {
        line.push_str(&format!(" · search \"{}\"", view.search().trim()));
    }
    line
}

pub fn money(amount: f64) -> String {
    format!("R$ {amount:.2}")
}

pub fn date(value: Option<&DateTime<Utc>>) -> String {
    value.map_or_else(|| "-".to_string(), |d| d.format("%d/%m/%Y").to_string())
}

pub fn or_dash(value: &str) -> String {
    if value.trim().is_empty() {
        "-".to_string()
    } else {
        value.to_string()
    }
}

/// Text progress bar, e.g. `[#####-----] 50%`.
pub fn progress_bar(percent: u8) -> String {
    let filled = usize::from(percent.min(100)) / 10;
    format!("[{}{}] {percent}%", "#".repeat(filled), "-".repeat(10 - filled))
}
