//! Table component: a controlled data table with sortable columns, row
//! selection, loading skeletons and an empty state.
//!
//! The table owns none of its interaction state. Sort, selection and
//! pagination live in a [`TableState`] held by the caller; the table turns
//! user actions into [`TableEvent`]s, fires the matching handlers and leaves
//! it to the caller to apply them.
//!
//! # Example
//!
//! ```ignore
//! use inkwell_table::prelude::*;
//!
//! #[derive(Clone, Debug)]
//! struct User {
//!     id: u32,
//!     name: String,
//!     email: String,
//! }
//!
//! impl TableRow for User {
//!     fn id(&self) -> String { self.id.to_string() }
//! }
//!
//! let table = Table::new(vec![
//!     Column::new("name", "Name").data_key(|u: &User| u.name.clone().into()).sortable(),
//!     Column::new("email", "Email").data_key(|u: &User| u.email.clone().into()),
//! ])
//! .selectable()
//! .on_sort_change(|column, direction| log::info!("sort {:?} {:?}", column, direction));
//!
//! let mut state = TableState::new(Pagination::new(users.len(), 5));
//! let visible = state.pagination.slice(&users);
//! if let Some(event) = table.dispatch(TableAction::SelectAll(true), visible, &state) {
//!     state.apply(&event);
//! }
//! let lines = table.view(visible, &state).render_lines(80, 0);
//! ```

mod events;
mod item;
mod render;
mod state;

pub use events::TableHandlers;
pub use item::{Accessor, Alignment, CellRenderer, CellValue, Column, ColumnWidth, TableRow};
pub use render::{BodyRow, HeaderCell, HeaderView, LineStyle, RenderedLine, TableView};
pub use state::{TableAction, TableEvent, TableState};

use std::sync::Arc;

use crate::sort::SortDirection;

/// Default number of skeleton rows while loading.
pub const DEFAULT_LOADING_ROWS: usize = 5;

/// Visual variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TableVariant {
    #[default]
    Standard,
    /// Light box around the table.
    Outlined,
    /// Heavy box around the table.
    Elevated,
}

impl TableVariant {
    /// Whether the variant draws a frame.
    pub fn is_framed(self) -> bool {
        !matches!(self, TableVariant::Standard)
    }
}

/// Density.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TableSize {
    Small,
    #[default]
    Medium,
}

impl TableSize {
    /// Spacing between cells, in terminal columns.
    pub fn gap(self) -> u16 {
        match self {
            TableSize::Small => 1,
            TableSize::Medium => 2,
        }
    }
}

/// Content shown when there are no rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmptyState {
    pub title: String,
    pub description: Option<String>,
}

impl Default for EmptyState {
    fn default() -> Self {
        Self {
            title: "No data available".to_string(),
            description: Some("There are no records to display at the moment.".to_string()),
        }
    }
}

impl EmptyState {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Table configuration and handlers.
///
/// Columns are fixed for the lifetime of the table. Everything that changes
/// in response to the user lives in [`TableState`].
pub struct Table<T> {
    pub columns: Vec<Column<T>>,
    /// Show skeleton rows instead of data; all actions are ignored.
    pub loading: bool,
    pub loading_rows: usize,
    /// Show a checkbox column.
    pub selectable: bool,
    pub striped: bool,
    pub hoverable: bool,
    pub clickable_rows: bool,
    pub empty_state: EmptyState,
    pub variant: TableVariant,
    pub size: TableSize,
    /// Body rows kept in view; `None` shows every row.
    pub max_height: Option<usize>,
    /// Keep the header visible while the body is scrolled.
    pub sticky_header: bool,
    pub handlers: TableHandlers<T>,
}

impl<T: TableRow> Table<T> {
    pub fn new(columns: Vec<Column<T>>) -> Self {
        Self {
            columns,
            loading: false,
            loading_rows: DEFAULT_LOADING_ROWS,
            selectable: false,
            striped: false,
            hoverable: true,
            clickable_rows: false,
            empty_state: EmptyState::default(),
            variant: TableVariant::default(),
            size: TableSize::default(),
            max_height: None,
            sticky_header: false,
            handlers: TableHandlers::default(),
        }
    }

    pub fn loading(mut self, loading: bool) -> Self {
        self.loading = loading;
        self
    }

    pub fn loading_rows(mut self, rows: usize) -> Self {
        self.loading_rows = rows;
        self
    }

    pub fn selectable(mut self) -> Self {
        self.selectable = true;
        self
    }

    pub fn striped(mut self) -> Self {
        self.striped = true;
        self
    }

    pub fn hoverable(mut self, hoverable: bool) -> Self {
        self.hoverable = hoverable;
        self
    }

    pub fn clickable_rows(mut self) -> Self {
        self.clickable_rows = true;
        self
    }

    pub fn empty_state(mut self, empty_state: EmptyState) -> Self {
        self.empty_state = empty_state;
        self
    }

    pub fn variant(mut self, variant: TableVariant) -> Self {
        self.variant = variant;
        self
    }

    pub fn size(mut self, size: TableSize) -> Self {
        self.size = size;
        self
    }

    pub fn max_height(mut self, rows: usize) -> Self {
        self.max_height = Some(rows);
        self
    }

    pub fn sticky_header(mut self) -> Self {
        self.sticky_header = true;
        self
    }

    pub fn on_selection_change<F>(mut self, f: F) -> Self
    where
        F: Fn(&[String]) + Send + Sync + 'static,
    {
        self.handlers.on_selection_change = Some(Arc::new(f));
        self
    }

    pub fn on_sort_change<F>(mut self, f: F) -> Self
    where
        F: Fn(Option<&str>, Option<SortDirection>) + Send + Sync + 'static,
    {
        self.handlers.on_sort_change = Some(Arc::new(f));
        self
    }

    pub fn on_row_click<F>(mut self, f: F) -> Self
    where
        F: Fn(&T, usize) + Send + Sync + 'static,
    {
        self.handlers.on_row_click = Some(Arc::new(f));
        self
    }

    pub fn on_page_change<F>(mut self, f: F) -> Self
    where
        F: Fn(usize) + Send + Sync + 'static,
    {
        self.handlers.on_page_change = Some(Arc::new(f));
        self
    }

    pub fn on_rows_per_page_change<F>(mut self, f: F) -> Self
    where
        F: Fn(usize) + Send + Sync + 'static,
    {
        self.handlers.on_rows_per_page_change = Some(Arc::new(f));
        self
    }

    /// Number of cells per row, checkbox included.
    pub fn column_span(&self) -> usize {
        self.columns.len() + usize::from(self.selectable)
    }

    /// Whether row clicks produce events.
    pub fn rows_clickable(&self) -> bool {
        self.clickable_rows || self.handlers.on_row_click.is_some()
    }

    /// Columns in layout order: sticky columns first, others after, each
    /// group keeping its declared order.
    pub fn layout_columns(&self) -> Vec<&Column<T>> {
        let (mut sticky, rest): (Vec<_>, Vec<_>) = self.columns.iter().partition(|c| c.sticky);
        sticky.extend(rest);
        sticky
    }
}
