//! Client-side table state: filtering and pagination
//!
//! Every table of the console holds its full row set in memory. A filter
//! keeps rows whose text contains the query (case-insensitive) and the
//! result is split into pages of [`PAGE_SIZE`] rows.

use corpografo_client::EntitySummary;

/// Rows per page
pub const PAGE_SIZE: usize = 10;

/// Rows that can be matched by a filter query
pub trait Filterable {
    /// Whether any searchable column contains `needle` (already lowercased)
    fn matches(&self, needle: &str) -> bool;
}

impl Filterable for EntitySummary {
    fn matches(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
    }
}

/// Filter and pagination state over an owned row set
#[derive(Debug, Clone, PartialEq)]
pub struct TableState<R> {
    rows: Vec<R>,
    filter: String,
    page: usize,
    page_size: usize,
}

impl<R: Filterable> TableState<R> {
    pub fn new(rows: Vec<R>) -> Self {
        Self {
            rows,
            filter: String::new(),
            page: 1,
            page_size: PAGE_SIZE,
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// All rows, unfiltered
    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    /// Change the filter query and go back to the first page
    pub fn set_filter(&mut self, query: impl Into<String>) {
        self.filter = query.into();
        self.page = 1;
    }

    /// Rows matching the filter, in their original order
    pub fn filtered(&self) -> Vec<&R> {
        let needle = self.filter.trim().to_lowercase();
        if needle.is_empty() {
            return self.rows.iter().collect();
        }
        self.rows.iter().filter(|r| r.matches(&needle)).collect()
    }

    /// Number of rows matching the filter
    pub fn total(&self) -> usize {
        self.filtered().len()
    }

    /// Current page, starting at 1
    pub fn page(&self) -> usize {
        self.page
    }

    /// Number of pages (at least 1)
    pub fn page_count(&self) -> usize {
        self.total().div_ceil(self.page_size).max(1)
    }

    /// Go to `page`, clamped to the valid range
    pub fn set_page(&mut self, page: usize) {
        self.page = page.clamp(1, self.page_count());
    }

    pub fn next_page(&mut self) {
        self.set_page(self.page + 1);
    }

    pub fn prev_page(&mut self) {
        self.set_page(self.page.saturating_sub(1));
    }

    /// Rows of the current page
    pub fn page_rows(&self) -> Vec<&R> {
        let start = (self.page - 1) * self.page_size;
        self.filtered()
            .into_iter()
            .skip(start)
            .take(self.page_size)
            .collect()
    }

    /// `first-last of total` label for the pager
    pub fn range_label(&self) -> String {
        let total = self.total();
        if total == 0 {
            return "0 of 0".to_string();
        }
        let first = (self.page - 1) * self.page_size + 1;
        let last = (first + self.page_size - 1).min(total);
        format!("{}-{} of {}", first, last, total)
    }
}

// ============================================================================
// Tests
// ============================================================================
