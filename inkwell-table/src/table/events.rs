//! Optional callbacks fired when the table reports a change.

use std::fmt;
use std::sync::Arc;

use crate::sort::SortDirection;

use super::state::TableEvent;

pub type SelectionHandler = Arc<dyn Fn(&[String]) + Send + Sync>;
pub type SortHandler = Arc<dyn Fn(Option<&str>, Option<SortDirection>) + Send + Sync>;
pub type RowClickHandler<T> = Arc<dyn Fn(&T, usize) + Send + Sync>;
pub type PageHandler = Arc<dyn Fn(usize) + Send + Sync>;

/// Handlers for a table. A missing handler makes the matching event a no-op
/// on the caller's side; the event is still returned from `dispatch`.
pub struct TableHandlers<T> {
    pub on_selection_change: Option<SelectionHandler>,
    pub on_sort_change: Option<SortHandler>,
    pub on_row_click: Option<RowClickHandler<T>>,
    pub on_page_change: Option<PageHandler>,
    pub on_rows_per_page_change: Option<PageHandler>,
}

impl<T> TableHandlers<T> {
    /// Call the handler matching `event`, if one is set.
    pub fn emit(&self, event: &TableEvent<T>) {
        match event {
            TableEvent::SelectionChanged(ids) => {
                if let Some(handler) = &self.on_selection_change {
                    handler(ids);
                }
            }
            TableEvent::SortChanged(sort) => {
                if let Some(handler) = &self.on_sort_change {
                    match sort.active() {
                        Some((column, direction)) => handler(Some(column), Some(direction)),
                        None => handler(None, None),
                    }
                }
            }
            TableEvent::RowClicked { row, index } => {
                if let Some(handler) = &self.on_row_click {
                    handler(row, *index);
                }
            }
            TableEvent::PageChanged(page) => {
                if let Some(handler) = &self.on_page_change {
                    handler(*page);
                }
            }
            TableEvent::RowsPerPageChanged(size) => {
                if let Some(handler) = &self.on_rows_per_page_change {
                    handler(*size);
                }
            }
        }
    }
}

impl<T> Default for TableHandlers<T> {
    fn default() -> Self {
        Self {
            on_selection_change: None,
            on_sort_change: None,
            on_row_click: None,
            on_page_change: None,
            on_rows_per_page_change: None,
        }
    }
}

impl<T> Clone for TableHandlers<T> {
    fn clone(&self) -> Self {
        Self {
            on_selection_change: self.on_selection_change.clone(),
            on_sort_change: self.on_sort_change.clone(),
            on_row_click: self.on_row_click.clone(),
            on_page_change: self.on_page_change.clone(),
            on_rows_per_page_change: self.on_rows_per_page_change.clone(),
        }
    }
}

impl<T> fmt::Debug for TableHandlers<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableHandlers")
            .field("on_selection_change", &self.on_selection_change.is_some())
            .field("on_sort_change", &self.on_sort_change.is_some())
            .field("on_row_click", &self.on_row_click.is_some())
            .field("on_page_change", &self.on_page_change.is_some())
            .field("on_rows_per_page_change", &self.on_rows_per_page_change.is_some())
            .finish()
    }
}
