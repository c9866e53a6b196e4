//! Client-side search, tab filtering and pagination for list screens.
//!
//! A [`TableView`] owns one fetched collection. Search is a case-insensitive
//! substring match over each record's [`Listable::search_fields`]; tabs
//! partition records by [`Listable::tab_key`]. Pages are 1-based and computed
//! from the filtered size, so there is always at least one page.

use std::borrow::Cow;

use corrente_types::{Donation, QueueEntry, Report, User};

/// A record that can be shown in a [`TableView`].
pub trait Listable {
    /// Text the search box matches against.
    fn search_fields(&self) -> Vec<Cow<'_, str>>;

    /// Tab this record belongs to (usually its status).
    fn tab_key(&self) -> Cow<'_, str>;
}

impl Listable for User {
    fn search_fields(&self) -> Vec<Cow<'_, str>> {
        vec![
            Cow::Owned(self.full_name()),
            Cow::Borrowed(&self.email),
            Cow::Borrowed(&self.cpf),
            Cow::Borrowed(&self.phone),
        ]
    }

    fn tab_key(&self) -> Cow<'_, str> {
        Cow::Borrowed(self.status.as_str())
    }
}

impl Listable for Donation {
    fn search_fields(&self) -> Vec<Cow<'_, str>> {
        vec![
            Cow::Borrowed(self.donor_name()),
            Cow::Borrowed(self.receiver_name()),
            Cow::Borrowed(self.kind.label()),
        ]
    }

    fn tab_key(&self) -> Cow<'_, str> {
        Cow::Borrowed(self.status.as_str())
    }
}

impl Listable for Report {
    fn search_fields(&self) -> Vec<Cow<'_, str>> {
        vec![
            Cow::Borrowed(&self.reason),
            Cow::Borrowed(&self.description),
            Cow::Borrowed(self.reporter_name()),
        ]
    }

    fn tab_key(&self) -> Cow<'_, str> {
        Cow::Borrowed(self.status.as_str())
    }
}

impl Listable for QueueEntry {
    fn search_fields(&self) -> Vec<Cow<'_, str>> {
        vec![
            Cow::Borrowed(self.user_name()),
            Cow::Borrowed(self.user_email()),
        ]
    }

    /// Queue screens filter by level rather than status.
    fn tab_key(&self) -> Cow<'_, str> {
        Cow::Owned(self.level.to_string())
    }
}

/// Filter and page state over a fetched collection.
#[derive(Debug, Clone)]
pub struct TableView<T> {
    items: Vec<T>,
    search: String,
    tab: Option<String>,
    page: usize,
    page_size: usize,
}

impl<T: Listable> TableView<T> {
    /// A zero `page_size` is treated as 1.
    pub fn new(items: Vec<T>, page_size: usize) -> Self {
        Self {
            items,
            search: String::new(),
            tab: None,
            page: 1,
            page_size: page_size.max(1),
        }
    }

    /// Replaces the collection (e.g. after a refetch), keeping filters.
    pub fn set_items(&mut self, items: Vec<T>) {
        self.items = items;
        self.page = self.page.min(self.total_pages());
    }

    pub fn set_search(&mut self, term: impl Into<String>) {
        self.search = term.into();
        self.page = 1;
    }

    /// `None` shows every tab.
    pub fn set_tab(&mut self, tab: Option<String>) {
        self.tab = tab;
        self.page = 1;
    }

    pub fn set_page_size(&mut self, page_size: usize) {
        self.page_size = page_size.max(1);
        self.page = 1;
    }

    /// Moves to `page`, clamped into `1..=total_pages`.
    pub fn set_page(&mut self, page: usize) {
        self.page = page.clamp(1, self.total_pages());
    }

    pub fn next_page(&mut self) {
        self.set_page(self.page + 1);
    }

    pub fn previous_page(&mut self) {
        self.set_page(self.page.saturating_sub(1));
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn tab(&self) -> Option<&str> {
        self.tab.as_deref()
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Records passing the current search and tab.
    pub fn filtered(&self) -> Vec<&T> {
        let needle = self.search.trim().to_lowercase();
        self.items
            .iter()
            .filter(|item| self.tab.as_deref().is_none_or(|tab| item.tab_key() == tab))
            .filter(|item| {
                needle.is_empty()
                    || item
                        .search_fields()
                        .iter()
                        .any(|field| field.to_lowercase().contains(&needle))
            })
            .collect()
    }

    pub fn filtered_len(&self) -> usize {
        self.filtered().len()
    }

    pub fn total_pages(&self) -> usize {
        self.filtered_len().div_ceil(self.page_size).max(1)
    }

    /// Slice of the filtered records on the current page.
    pub fn page_items(&self) -> Vec<&T> {
        let start = (self.page - 1) * self.page_size;
        self.filtered()
            .into_iter()
            .skip(start)
            .take(self.page_size)
            .collect()
    }

    /// Number of records in `tab`, ignoring the search term.
    pub fn count_in_tab(&self, tab: &str) -> usize {
        self.items.iter().filter(|item| item.tab_key() == tab).count()
    }
}
