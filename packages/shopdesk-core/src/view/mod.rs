//! List view derivation: search, exact-match filters, sorting and pagination.

mod engine;
mod matcher;

use std::collections::BTreeMap;
use std::fmt;
use std::num::NonZeroUsize;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::record::Value;

pub use engine::derive;
pub use matcher::{matches, FieldMatcher};

/// Rows per page when a screen does not say otherwise.
pub const DEFAULT_PAGE_SIZE: NonZeroUsize = NonZeroUsize::MIN.saturating_add(4);

/// Sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    /// Returns the opposite direction.
    pub fn reversed(self) -> Self {
        match self {
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::Asc,
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortOrder::Asc => f.write_str("asc"),
            SortOrder::Desc => f.write_str("desc"),
        }
    }
}

impl FromStr for SortOrder {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            other => Err(CoreError::validation(
                "sortOrder",
                format!("expected 'asc' or 'desc', got '{}'", other),
            )),
        }
    }
}

/// Search, filter, sort and pagination parameters of one list screen.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryState {
    /// Free-text search, matched case-insensitively
    pub search_text: String,
    /// Fields the search text is matched against, in order
    pub search_fields: Vec<String>,
    /// Field to exact-match value; blank values are ignored
    pub filters: BTreeMap<String, Value>,
    /// Field to sort by; `None` keeps the input order
    pub sort_field: Option<String>,
    pub sort_order: SortOrder,
    /// 1-based page number
    pub page: NonZeroUsize,
    pub page_size: NonZeroUsize,
}

impl Default for QueryState {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl QueryState {
    /// Creates a query on page 1 with no search, filters or sorting.
    pub fn new(page_size: NonZeroUsize) -> Self {
        Self {
            search_text: String::new(),
            search_fields: Vec::new(),
            filters: BTreeMap::new(),
            sort_field: None,
            sort_order: SortOrder::Asc,
            page: NonZeroUsize::MIN,
            page_size,
        }
    }

    /// Sets the search text and the fields it applies to.
    pub fn with_search<I, S>(mut self, text: impl Into<String>, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.search_text = text.into();
        self.search_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Adds an exact-match filter.
    pub fn with_filter(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filters.insert(field.into(), value.into());
        self
    }

    /// Sets the sort field and direction.
    pub fn sorted_by(mut self, field: impl Into<String>, order: SortOrder) -> Self {
        self.sort_field = Some(field.into());
        self.sort_order = order;
        self
    }

    /// Moves to `page`.
    pub fn at_page(mut self, page: NonZeroUsize) -> Self {
        self.page = page;
        self
    }

    /// Index of the first row on the current page.
    pub fn offset(&self) -> usize {
        (self.page.get() - 1).saturating_mul(self.page_size.get())
    }

    /// Advances one page if `page < total_pages`. Returns whether the page changed.
    pub fn next_page(&mut self, total_pages: usize) -> bool {
        if self.page.get() < total_pages {
            self.page = self.page.saturating_add(1);
            true
        } else {
            false
        }
    }

    /// Goes back one page if not on the first. Returns whether the page changed.
    pub fn previous_page(&mut self) -> bool {
        match NonZeroUsize::new(self.page.get() - 1) {
            Some(previous) => {
                self.page = previous;
                true
            }
            None => false,
        }
    }

    /// Returns to page 1.
    pub fn reset_page(&mut self) {
        self.page = NonZeroUsize::MIN;
    }
}

/// One derived page of a list screen.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListPage<R> {
    /// Rows on the requested page
    pub items: Vec<R>,
    /// `ceil(total_items / page_size)`, zero when nothing matched
    pub total_pages: usize,
    /// Rows that survived search and filters, across all pages
    pub total_items: usize,
    /// Page the rows were taken from
    pub page: usize,
}

impl<R> ListPage<R> {
    /// True when the requested page holds no rows.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
