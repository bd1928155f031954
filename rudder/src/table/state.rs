//! Table state and derivation.

use std::cmp::Ordering;
use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::Value;

use super::record::{Record, RowKey};
use super::selection::{Selection, SelectionMode};
use super::{Column, PageInfo, SortDirection, SortType, TableOptions};

/// State for one table instance.
///
/// The visible projection is always `sort(filter(search(raw)))` — a pure
/// function of the raw records and the current search/filter/sort state.
/// Every operation is total: out-of-range pages clamp, unknown column keys
/// no-op, so stale UI references can never corrupt the table.
pub struct TableState {
    options: TableOptions,
    raw: Vec<Record>,
    search_query: String,
    column_filters: HashMap<String, String>,
    sort: Option<(String, SortDirection)>,
    current_page: usize,
    selection: Selection<RowKey>,
    visible: Vec<Record>,
    loading: bool,
}

impl TableState {
    /// Create an empty table with the given options.
    pub fn new(options: TableOptions) -> Self {
        let selection = if options.multi_select {
            Selection::multi()
        } else {
            Selection::single()
        };
        Self {
            options,
            raw: Vec::new(),
            search_query: String::new(),
            column_filters: HashMap::new(),
            sort: None,
            current_page: 1,
            selection,
            visible: Vec::new(),
            loading: false,
        }
    }

    // -------------------------------------------------------------------
    // Data
    // -------------------------------------------------------------------

    /// Replace the whole record collection.
    ///
    /// Selections pointing at rows no longer present are dropped.
    pub fn set_data(&mut self, records: Vec<Record>) {
        self.raw = records;

        let keyless = self
            .raw
            .iter()
            .filter(|r| !r.has_key_field(&self.options.key_fields))
            .count();
        if keyless > 0 {
            log::warn!(
                "{keyless} record(s) without an identity field ({:?}); \
                 falling back to content-hash identity",
                self.options.key_fields
            );
        }

        let keys: std::collections::HashSet<RowKey> = self
            .raw
            .iter()
            .map(|r| r.key(&self.options.key_fields))
            .collect();
        self.selection.retain(|k| keys.contains(k));

        self.rederive();
    }

    /// Set the search query. Empty means inactive.
    pub fn search(&mut self, query: &str) {
        self.search_query = query.to_string();
        self.current_page = 1;
        self.rederive();
    }

    /// Merge column filters.
    ///
    /// Keys not mentioned keep their current filter; an empty value clears
    /// that column's filter; unknown column keys are ignored.
    pub fn filter(&mut self, partial: impl IntoIterator<Item = (String, String)>) {
        for (key, value) in partial {
            if value.is_empty() {
                self.column_filters.remove(&key);
            } else if self.column(&key).is_some() {
                self.column_filters.insert(key, value);
            } else {
                log::debug!("ignoring filter for unknown column '{key}'");
            }
        }
        self.current_page = 1;
        self.rederive();
    }

    /// Sort by a column.
    ///
    /// Unknown or unsortable columns are a no-op. Re-sorting the current
    /// column with no explicit direction toggles it; a different column
    /// defaults to ascending.
    pub fn sort(&mut self, column_key: &str, direction: Option<SortDirection>) {
        let sortable = self.column(column_key).is_some_and(|c| c.sortable);
        if !sortable {
            log::debug!("ignoring sort on unknown or unsortable column '{column_key}'");
            return;
        }

        let new_direction = match &self.sort {
            Some((current, dir)) if current == column_key => {
                direction.unwrap_or_else(|| dir.toggled())
            }
            _ => direction.unwrap_or_default(),
        };
        self.sort = Some((column_key.to_string(), new_direction));
        self.rederive();
    }

    // -------------------------------------------------------------------
    // Pagination
    // -------------------------------------------------------------------

    /// Go to a page, clamped into the valid range.
    pub fn go_to_page(&mut self, page: usize) {
        self.current_page = page.clamp(1, self.total_pages());
    }

    /// Change the page size and return to the first page.
    pub fn set_page_size(&mut self, size: usize) {
        self.options.page_size = size.max(1);
        self.current_page = 1;
    }

    /// The visible slice for the current page.
    pub fn visible_page(&self) -> &[Record] {
        let start = (self.current_page - 1) * self.options.page_size;
        let end = (start + self.options.page_size).min(self.visible.len());
        if start >= self.visible.len() {
            &[]
        } else {
            &self.visible[start..end]
        }
    }

    /// Pagination metadata for rendering ("Showing X to Y of Z").
    pub fn page_info(&self) -> PageInfo {
        let total_items = self.visible.len();
        let start_index = (self.current_page - 1) * self.options.page_size;
        let end_index = (start_index + self.options.page_size).min(total_items);
        PageInfo {
            current_page: self.current_page,
            total_pages: self.total_pages(),
            total_items,
            start: if total_items == 0 { 0 } else { start_index + 1 },
            end: end_index,
        }
    }

    fn total_pages(&self) -> usize {
        self.visible.len().div_ceil(self.options.page_size).max(1)
    }

    // -------------------------------------------------------------------
    // Selection
    // -------------------------------------------------------------------

    /// Toggle selection of one row.
    ///
    /// In single-select mode this replaces the selection with the given key,
    /// even when it is already the sole selected row. A key that no longer
    /// names a raw record (a stale UI reference) is ignored, keeping the
    /// selection a subset of the current records.
    pub fn toggle_selection(&mut self, key: impl Into<RowKey>) {
        if !self.options.selectable {
            return;
        }
        let key = key.into();
        let known = self
            .raw
            .iter()
            .any(|r| r.key(&self.options.key_fields) == key);
        if !known {
            log::debug!("ignoring selection toggle for unknown row '{key}'");
            return;
        }
        self.selection.toggle(key);
    }

    /// Toggle selection of every row on the current page.
    ///
    /// When every row on the page is already selected, exactly that page's
    /// rows are deselected; otherwise exactly that page's rows are added.
    /// Selections on other pages are untouched. Multi-select only.
    pub fn toggle_select_all_on_page(&mut self) {
        if self.selection.mode != SelectionMode::Multi {
            return;
        }
        let page_keys: Vec<RowKey> = self
            .visible_page()
            .iter()
            .map(|r| r.key(&self.options.key_fields))
            .collect();
        if page_keys.is_empty() {
            return;
        }
        let all_selected = page_keys.iter().all(|k| self.selection.is_selected(k));
        for key in page_keys {
            if all_selected {
                self.selection.remove(&key);
            } else {
                self.selection.insert(key);
            }
        }
    }

    /// Clear the selection.
    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Selected row keys, for affordance rendering.
    pub fn selected_keys(&self) -> impl Iterator<Item = &RowKey> {
        self.selection.iter()
    }

    /// The selected records, in raw-collection order.
    pub fn selected_records(&self) -> Vec<&Record> {
        self.raw
            .iter()
            .filter(|r| self.selection.is_selected(&r.key(&self.options.key_fields)))
            .collect()
    }

    /// Whether a row is selected.
    pub fn is_selected(&self, key: &RowKey) -> bool {
        self.selection.is_selected(key)
    }

    /// The identity of a record under this table's key configuration.
    pub fn row_key(&self, record: &Record) -> RowKey {
        record.key(&self.options.key_fields)
    }

    // -------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------

    /// The whole derived projection (all pages).
    pub fn visible_records(&self) -> &[Record] {
        &self.visible
    }

    /// Current sort column and direction, for header affordances.
    pub fn sort_state(&self) -> Option<(&str, SortDirection)> {
        self.sort.as_ref().map(|(key, dir)| (key.as_str(), *dir))
    }

    /// Current search query.
    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    /// Active column filters.
    pub fn column_filters(&self) -> &HashMap<String, String> {
        &self.column_filters
    }

    /// 1-based current page.
    pub fn current_page(&self) -> usize {
        self.current_page
    }

    /// Table options.
    pub fn options(&self) -> &TableOptions {
        &self.options
    }

    /// Loading flag, for render gating only; does not affect derivation.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Set the loading flag.
    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    // -------------------------------------------------------------------
    // Derivation
    // -------------------------------------------------------------------

    fn column(&self, key: &str) -> Option<&Column> {
        self.options.columns.iter().find(|c| c.key == key)
    }

    fn rederive(&mut self) {
        self.visible = derive(
            &self.raw,
            &self.search_query,
            &self.column_filters,
            self.sort.as_ref(),
            &self.options.columns,
        );
        self.current_page = self.current_page.clamp(1, self.total_pages());
    }
}

/// Compute the visible projection: `sort(filter(search(raw)))`.
///
/// Pure in its five inputs; no other table state participates.
fn derive(
    raw: &[Record],
    query: &str,
    filters: &HashMap<String, String>,
    sort: Option<&(String, SortDirection)>,
    columns: &[Column],
) -> Vec<Record> {
    let query = query.to_lowercase();
    let mut visible: Vec<Record> = raw
        .iter()
        .filter(|record| {
            if !query.is_empty() {
                let hit = columns.iter().any(|col| {
                    record
                        .get_text(&col.key)
                        .is_some_and(|text| text.to_lowercase().contains(&query))
                });
                if !hit {
                    return false;
                }
            }
            filters.iter().all(|(key, value)| {
                record
                    .get_text(key)
                    .is_some_and(|text| text.to_lowercase().contains(&value.to_lowercase()))
            })
        })
        .cloned()
        .collect();

    if let Some((sort_key, direction)) = sort {
        if let Some(column) = columns.iter().find(|c| &c.key == sort_key) {
            visible.sort_by(|a, b| {
                let ordering = compare(a, b, column);
                match direction {
                    SortDirection::Asc => ordering,
                    SortDirection::Desc => ordering.reverse(),
                }
            });
        }
    }

    visible
}

/// Compare two records on one column according to its sort type.
fn compare(a: &Record, b: &Record, column: &Column) -> Ordering {
    match column.sort_type {
        SortType::Number => {
            let left = numeric_value(a.get_path(&column.key));
            let right = numeric_value(b.get_path(&column.key));
            left.partial_cmp(&right).unwrap_or(Ordering::Equal)
        }
        SortType::Date => {
            let left = date_value(a.get_path(&column.key));
            let right = date_value(b.get_path(&column.key));
            // None < Some: unparsable dates sort first.
            left.cmp(&right)
        }
        SortType::Text => {
            let left = a.get_text(&column.key).unwrap_or_default().to_lowercase();
            let right = b.get_text(&column.key).unwrap_or_default().to_lowercase();
            left.cmp(&right)
        }
    }
}

/// Numeric interpretation of a cell; unparsable values count as zero.
fn numeric_value(value: Option<&Value>) -> f64 {
    match value {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => parse_number_prefix(s),
        _ => 0.0,
    }
}

/// Parse the longest numeric prefix of a string, `parseFloat`-style.
///
/// `"42px"` parses as 42; a string with no numeric prefix is zero.
fn parse_number_prefix(text: &str) -> f64 {
    let trimmed = text.trim();
    let mut end = 0;
    for (i, c) in trimmed.char_indices() {
        if c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E') {
            end = i + c.len_utf8();
        } else {
            break;
        }
    }
    while end > 0 {
        if let Ok(parsed) = trimmed[..end].parse::<f64>() {
            return parsed;
        }
        end -= 1;
    }
    0.0
}

/// Timestamp interpretation of a cell, in milliseconds since the epoch.
///
/// Numbers are taken as epoch milliseconds; strings are tried as RFC 3339,
/// then `YYYY-MM-DD HH:MM:SS`, then a bare `YYYY-MM-DD`.
fn date_value(value: Option<&Value>) -> Option<i64> {
    match value {
        Some(Value::Number(n)) => n.as_i64(),
        Some(Value::String(s)) => {
            let s = s.trim();
            if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
                return Some(dt.timestamp_millis());
            }
            if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
                return Some(dt.and_utc().timestamp_millis());
            }
            if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
                return Some(d.and_hms_opt(0, 0, 0)?.and_utc().timestamp_millis());
            }
            None
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_prefix_parse_is_lenient() {
        assert_eq!(parse_number_prefix("42px"), 42.0);
        assert_eq!(parse_number_prefix("  -3.5  "), -3.5);
        assert_eq!(parse_number_prefix("1e3!"), 1000.0);
        assert_eq!(parse_number_prefix("abc"), 0.0);
        assert_eq!(parse_number_prefix("--"), 0.0);
    }

    #[test]
    fn date_values_parse_common_shapes() {
        assert!(date_value(Some(&Value::String("2024-03-01".to_string()))).is_some());
        assert!(date_value(Some(&Value::String("2024-03-01 10:30:00".to_string()))).is_some());
        assert!(date_value(Some(&Value::String("2024-03-01T10:30:00Z".to_string()))).is_some());
        assert!(date_value(Some(&Value::String("not a date".to_string()))).is_none());
        assert_eq!(date_value(None), None);
    }
}
