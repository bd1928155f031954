//! Tabular state engine.
//!
//! [`TableState`] owns a copy of the raw records plus the current search,
//! filter, sort, pagination and selection state, and derives the visible
//! projection from them. It never talks to a backend and never renders;
//! views feed it data and read the derived page back out.

pub mod record;
pub mod selection;
mod state;

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use self::record::Record;

pub use self::state::TableState;

/// How a column's values compare when sorting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortType {
    #[default]
    Text,
    Number,
    Date,
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    /// The opposite direction.
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

/// Custom cell renderer supplied by the view.
///
/// Receives the resolved value (if the dot-path resolved) and the whole
/// record, and produces display text.
pub type CellRender = Arc<dyn Fn(Option<&Value>, &Record) -> String + Send + Sync>;

/// A table column descriptor. Immutable for the life of the table.
#[derive(Clone)]
pub struct Column {
    /// Dot-path into the record (`"stats.sent"`).
    pub key: String,
    /// Header text.
    pub title: String,
    /// Whether clicking the header sorts by this column.
    pub sortable: bool,
    /// Comparison policy when sorting.
    pub sort_type: SortType,
    /// Optional custom cell renderer.
    pub render: Option<CellRender>,
}

impl Column {
    /// Create a sortable text column.
    pub fn new(key: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            title: title.into(),
            sortable: true,
            sort_type: SortType::Text,
            render: None,
        }
    }

    /// Compare values numerically when sorting.
    pub fn numeric(mut self) -> Self {
        self.sort_type = SortType::Number;
        self
    }

    /// Compare values as dates when sorting.
    pub fn date(mut self) -> Self {
        self.sort_type = SortType::Date;
        self
    }

    /// Exclude this column from sorting.
    pub fn unsortable(mut self) -> Self {
        self.sortable = false;
        self
    }

    /// Attach a custom cell renderer.
    pub fn render(
        mut self,
        f: impl Fn(Option<&Value>, &Record) -> String + Send + Sync + 'static,
    ) -> Self {
        self.render = Some(Arc::new(f));
        self
    }
}

impl fmt::Debug for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("key", &self.key)
            .field("title", &self.title)
            .field("sortable", &self.sortable)
            .field("sort_type", &self.sort_type)
            .field("render", &self.render.is_some())
            .finish()
    }
}

/// Table construction options.
#[derive(Debug, Clone)]
pub struct TableOptions {
    /// Column descriptors, in display order.
    pub columns: Vec<Column>,
    /// Rows per page.
    pub page_size: usize,
    /// Page sizes offered to the user.
    pub page_sizes: Vec<usize>,
    /// Whether rows can be selected at all.
    pub selectable: bool,
    /// Multiple selection; false means at most one row is selected.
    pub multi_select: bool,
    /// Record fields tried, in order, for row identity before falling back
    /// to a content hash.
    pub key_fields: Vec<String>,
}

impl Default for TableOptions {
    fn default() -> Self {
        Self {
            columns: Vec::new(),
            page_size: 10,
            page_sizes: vec![5, 10, 25, 50, 100],
            selectable: false,
            multi_select: false,
            key_fields: vec!["id".to_string(), "_id".to_string()],
        }
    }
}

impl TableOptions {
    /// Create options with the given columns.
    pub fn new(columns: Vec<Column>) -> Self {
        Self {
            columns,
            ..Default::default()
        }
    }

    /// Set the page size.
    pub fn page_size(mut self, size: usize) -> Self {
        self.page_size = size.max(1);
        self
    }

    /// Allow single-row selection.
    pub fn selectable(mut self) -> Self {
        self.selectable = true;
        self
    }

    /// Allow multi-row selection.
    pub fn multi_select(mut self) -> Self {
        self.selectable = true;
        self.multi_select = true;
        self
    }

    /// Set the identity field chain.
    pub fn key_fields(mut self, fields: &[&str]) -> Self {
        self.key_fields = fields.iter().map(|f| f.to_string()).collect();
        self
    }
}

/// Pagination metadata for rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageInfo {
    /// 1-based current page.
    pub current_page: usize,
    /// Total pages; at least 1 even when empty.
    pub total_pages: usize,
    /// Total items after search/filter.
    pub total_items: usize,
    /// 1-based index of the first shown item (0 when empty).
    pub start: usize,
    /// 1-based index of the last shown item (0 when empty).
    pub end: usize,
}
