//! Sortable, paginated table engine.
//!
//! A [`TableView`] owns a record set in its original order and a sort
//! permutation over it. Sorting is stable and total (see
//! [`crate::value::sort_order`]), nulls always sort last, and every change
//! to the sort or to the rows returns the cursor to the first page.

use serde::{Deserialize, Serialize};

use crate::PresentationError;
use crate::record::{Record, validate_fields};
use crate::value::{CompareMode, SortDirection, Value, sort_order};

/// Horizontal alignment of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

/// Formats a cell from its value and the whole row.
pub type Renderer<R> = fn(&Value, &R) -> String;

/// Where a column reads its value from.
#[derive(Debug, Clone)]
pub enum Accessor<R: Record> {
    /// A field of the record.
    Field(R::Field),
    /// A value computed from the whole record.
    Computed(fn(&R) -> Value),
}

/// A declared table column.
#[derive(Debug, Clone)]
pub struct Column<R: Record> {
    key: String,
    label: String,
    accessor: Accessor<R>,
    align: Align,
    renderer: Option<Renderer<R>>,
    sortable: bool,
}

impl<R: Record> Column<R> {
    /// A column showing `field`, keyed by the field's name.
    pub fn field(field: R::Field, label: impl Into<String>) -> Self {
        Self {
            key: field.to_string(),
            label: label.into(),
            accessor: Accessor::Field(field),
            align: Align::default(),
            renderer: None,
            sortable: true,
        }
    }

    /// A column whose value is computed from the record.
    pub fn computed(
        key: impl Into<String>,
        label: impl Into<String>,
        f: fn(&R) -> Value,
    ) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            accessor: Accessor::Computed(f),
            align: Align::default(),
            renderer: None,
            sortable: true,
        }
    }

    #[must_use]
    pub const fn align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }

    /// Replaces the default formatting for this column.
    #[must_use]
    pub const fn render(mut self, renderer: Renderer<R>) -> Self {
        self.renderer = Some(renderer);
        self
    }

    /// Makes [`TableView::sort`] ignore this column.
    #[must_use]
    pub const fn unsortable(mut self) -> Self {
        self.sortable = false;
        self
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    #[must_use]
    pub const fn is_sortable(&self) -> bool {
        self.sortable
    }

    /// Reads this column's value from `row`.
    pub fn value(&self, row: &R) -> Value {
        match &self.accessor {
            Accessor::Field(field) => row.value(field),
            Accessor::Computed(f) => f(row),
        }
    }

    /// Formats this column's cell for `row`. A custom renderer wins over
    /// the default formatting, including for null values.
    pub fn render_cell(&self, row: &R) -> Cell {
        let value = self.value(row);
        let text = self
            .renderer
            .map_or_else(|| value.display(), |render| render(&value, row));
        Cell {
            text,
            align: self.align,
            unavailable: value.is_null(),
        }
    }
}

/// A rendered table cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Cell {
    pub text: String,
    pub align: Align,
    /// `true` when the underlying value was not reported.
    pub unavailable: bool,
}

/// A rendered column header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeaderCell {
    pub key: String,
    pub label: String,
    pub align: Align,
    pub sortable: bool,
    /// Sort arrow when this is the active sort column.
    pub indicator: Option<char>,
}

/// Active sort column and direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortState {
    pub key: String,
    pub direction: SortDirection,
}

/// A sortable, paginated view over a record set.
#[derive(Debug, Clone)]
pub struct TableView<R: Record> {
    rows: Vec<R>,
    columns: Vec<Column<R>>,
    page_size: usize,
    sort: Option<SortState>,
    page: usize,
    order: Vec<usize>,
}

impl<R: Record> TableView<R> {
    /// Creates a view on page 0 with no active sort.
    ///
    /// # Errors
    ///
    /// * [`PresentationError::InvalidPageSize`] if `page_size` is zero
    /// * [`PresentationError::DuplicateColumn`] if two columns share a key
    /// * [`PresentationError::UnknownField`] if a field column names a
    ///   field no row carries
    pub fn new(
        rows: Vec<R>,
        columns: Vec<Column<R>>,
        page_size: usize,
    ) -> Result<Self, PresentationError> {
        if page_size == 0 {
            return Err(PresentationError::InvalidPageSize);
        }
        for (i, column) in columns.iter().enumerate() {
            if columns[..i].iter().any(|c| c.key == column.key) {
                return Err(PresentationError::DuplicateColumn {
                    key: column.key.clone(),
                });
            }
        }
        validate_columns(&rows, &columns)?;

        let order = (0..rows.len()).collect();
        Ok(Self {
            rows,
            columns,
            page_size,
            sort: None,
            page: 0,
            order,
        })
    }

    /// Sorts by the column `key`.
    ///
    /// Selecting the active column toggles its direction; any other column
    /// is selected ascending. Unknown keys and unsortable columns are
    /// ignored. Returns to page 0.
    pub fn sort(&mut self, key: &str) {
        let Some(column) = self.columns.iter().find(|c| c.key == key) else {
            log::warn!("Ignoring sort on unknown column '{key}'");
            return;
        };
        if !column.sortable {
            log::debug!("Column '{key}' is not sortable");
            return;
        }

        let direction = match &self.sort {
            Some(active) if active.key == key => active.direction.toggled(),
            _ => SortDirection::Ascending,
        };
        self.sort = Some(SortState {
            key: key.to_string(),
            direction,
        });
        self.apply_sort();
        self.page = 0;
    }

    /// Moves to `page`, clamped to the valid range.
    pub fn go_to_page(&mut self, page: usize) {
        self.page = page.min(self.last_page());
    }

    pub fn next_page(&mut self) {
        self.go_to_page(self.page.saturating_add(1));
    }

    pub fn previous_page(&mut self) {
        self.go_to_page(self.page.saturating_sub(1));
    }

    /// Replaces the record set, keeping the active sort and returning to
    /// page 0.
    ///
    /// # Errors
    ///
    /// Returns [`PresentationError::UnknownField`] if a field column names
    /// a field none of the new rows carries. The view is left unchanged.
    pub fn set_rows(&mut self, rows: Vec<R>) -> Result<(), PresentationError> {
        validate_columns(&rows, &self.columns)?;
        self.order = (0..rows.len()).collect();
        self.rows = rows;
        self.apply_sort();
        self.page = 0;
        Ok(())
    }

    /// Records in their original order.
    #[must_use]
    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    #[must_use]
    pub fn columns(&self) -> &[Column<R>] {
        &self.columns
    }

    #[must_use]
    pub const fn sort_state(&self) -> Option<&SortState> {
        self.sort.as_ref()
    }

    #[must_use]
    pub const fn page(&self) -> usize {
        self.page
    }

    #[must_use]
    pub const fn page_size(&self) -> usize {
        self.page_size
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// `ceil(len / page_size)`; zero for an empty table.
    #[must_use]
    pub fn total_pages(&self) -> usize {
        self.rows.len().div_ceil(self.page_size)
    }

    /// All records in the current sort order.
    #[must_use]
    pub fn sorted_rows(&self) -> Vec<&R> {
        self.order.iter().map(|&i| &self.rows[i]).collect()
    }

    /// Records on the current page, in sort order.
    #[must_use]
    pub fn visible_rows(&self) -> Vec<&R> {
        let (start, end) = self.page_bounds();
        self.order[start..end].iter().map(|&i| &self.rows[i]).collect()
    }

    /// Rendered cells of the current page.
    #[must_use]
    pub fn render_page(&self) -> Vec<Vec<Cell>> {
        self.visible_rows()
            .into_iter()
            .map(|row| self.columns.iter().map(|c| c.render_cell(row)).collect())
            .collect()
    }

    #[must_use]
    pub fn header(&self) -> Vec<HeaderCell> {
        self.columns
            .iter()
            .map(|c| HeaderCell {
                key: c.key.clone(),
                label: c.label.clone(),
                align: c.align,
                sortable: c.sortable,
                indicator: self.sort_indicator(&c.key),
            })
            .collect()
    }

    /// Sort arrow for `key` when it is the active sort column.
    #[must_use]
    pub fn sort_indicator(&self, key: &str) -> Option<char> {
        self.sort
            .as_ref()
            .filter(|s| s.key == key)
            .map(|s| s.direction.indicator())
    }

    /// "Showing a to b of n entries", 1-based.
    #[must_use]
    pub fn page_summary(&self) -> String {
        let (start, end) = self.page_bounds();
        let first = if end > start { start + 1 } else { 0 };
        format!("Showing {first} to {end} of {} entries", self.rows.len())
    }

    const fn last_page(&self) -> usize {
        self.rows.len().div_ceil(self.page_size).saturating_sub(1)
    }

    fn page_bounds(&self) -> (usize, usize) {
        let start = (self.page * self.page_size).min(self.rows.len());
        let end = (start + self.page_size).min(self.rows.len());
        (start, end)
    }

    fn apply_sort(&mut self) {
        let Some(state) = &self.sort else {
            return;
        };
        let Some(column) = self.columns.iter().find(|c| c.key == state.key) else {
            return;
        };

        let keys: Vec<Value> = self.rows.iter().map(|r| column.value(r)).collect();
        let mode = CompareMode::for_values(&keys);
        let direction = state.direction;
        self.order = (0..self.rows.len()).collect();
        self.order
            .sort_by(|&a, &b| sort_order(&keys[a], &keys[b], mode, direction));

        log::debug!(
            "Sorted {} row(s) by '{}' {direction:?} ({mode:?})",
            self.rows.len(),
            state.key
        );
    }
}

fn validate_columns<R: Record>(
    rows: &[R],
    columns: &[Column<R>],
) -> Result<(), PresentationError> {
    let fields: Vec<R::Field> = columns
        .iter()
        .filter_map(|c| match &c.accessor {
            Accessor::Field(field) => Some(field.clone()),
            Accessor::Computed(_) => None,
        })
        .collect();
    validate_fields(rows, &fields)
}
