//! Caller-owned table state and the action reducer.

use crate::pagination::Pagination;
use crate::selection::Selection;
use crate::sort::{SortState, next_sort};

use super::item::TableRow;
use super::Table;

/// A user interaction with the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableAction {
    /// Header of the column with this id was clicked.
    HeaderClick(String),
    /// Checkbox of the row with this id was toggled.
    ToggleRow(String),
    /// Header checkbox was set.
    SelectAll(bool),
    /// Deselect every row, on any page.
    ClearSelection,
    /// Row at this index of the visible rows was clicked.
    RowClick(usize),
    PageChange(usize),
    RowsPerPageChange(usize),
}

/// The change a [`TableAction`] asks the owner to make.
#[derive(Debug, Clone, PartialEq)]
pub enum TableEvent<T> {
    /// The full proposed selection, sorted.
    SelectionChanged(Vec<String>),
    SortChanged(SortState),
    RowClicked { row: T, index: usize },
    PageChanged(usize),
    RowsPerPageChanged(usize),
}

/// State the owner keeps for a table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableState {
    pub sort: SortState,
    pub selection: Selection,
    pub pagination: Pagination,
}

impl TableState {
    pub fn new(pagination: Pagination) -> Self {
        Self {
            pagination,
            ..Self::default()
        }
    }

    /// Apply an event to the state. Row clicks carry no state.
    ///
    /// Sort and page changes never touch the selection.
    pub fn apply<T>(&mut self, event: &TableEvent<T>) {
        match event {
            TableEvent::SelectionChanged(ids) => {
                self.selection = Selection::from_ids(ids.iter().cloned());
            }
            TableEvent::SortChanged(sort) => self.sort = sort.clone(),
            TableEvent::RowClicked { .. } => {}
            TableEvent::PageChanged(page) => {
                self.pagination.set_page(*page);
            }
            TableEvent::RowsPerPageChanged(size) => {
                self.pagination.set_rows_per_page(*size);
            }
        }
    }
}

impl<T: TableRow> Table<T> {
    /// Turn an action into the event it implies, without side effects.
    ///
    /// `visible` is the slice of rows currently shown. Returns `None` when the
    /// action is a no-op: while loading, for a non-sortable header, for
    /// selection on a non-selectable table, for clicks on non-clickable rows,
    /// and for page changes that land on the current page.
    pub fn reduce(&self, action: &TableAction, visible: &[T], state: &TableState) -> Option<TableEvent<T>> {
        if self.loading {
            log::debug!("[table] ignoring {:?} while loading", action);
            return None;
        }

        match action {
            TableAction::HeaderClick(column_id) => {
                next_sort(&self.columns, &state.sort, column_id).map(TableEvent::SortChanged)
            }
            TableAction::ToggleRow(id) => {
                if !self.selectable || !visible.iter().any(|row| row.id() == *id) {
                    return None;
                }
                let mut selection = state.selection.clone();
                selection.toggle(id);
                Some(TableEvent::SelectionChanged(selection.selected()))
            }
            TableAction::SelectAll(checked) => {
                if !self.selectable {
                    return None;
                }
                let ids: Vec<String> = visible.iter().map(TableRow::id).collect();
                let mut selection = state.selection.clone();
                selection.select_all(*checked, &ids);
                Some(TableEvent::SelectionChanged(selection.selected()))
            }
            TableAction::ClearSelection => {
                if !self.selectable || state.selection.is_empty() {
                    return None;
                }
                let mut selection = state.selection.clone();
                selection.clear();
                Some(TableEvent::SelectionChanged(selection.selected()))
            }
            TableAction::RowClick(index) => {
                if !self.rows_clickable() {
                    return None;
                }
                visible.get(*index).map(|row| TableEvent::RowClicked {
                    row: row.clone(),
                    index: *index,
                })
            }
            TableAction::PageChange(page) => {
                let mut pagination = state.pagination.clone();
                pagination
                    .set_page(*page)
                    .then_some(TableEvent::PageChanged(pagination.page))
            }
            TableAction::RowsPerPageChange(size) => {
                (*size > 0).then_some(TableEvent::RowsPerPageChanged(*size))
            }
        }
    }

    /// Reduce an action and fire the matching handler.
    ///
    /// The event is returned so the owner can [`TableState::apply`] it.
    pub fn dispatch(&self, action: TableAction, visible: &[T], state: &TableState) -> Option<TableEvent<T>> {
        let event = self.reduce(&action, visible, state)?;
        log::debug!("[table] {:?} -> {}", action, event_name(&event));
        self.handlers.emit(&event);
        Some(event)
    }
}

fn event_name<T>(event: &TableEvent<T>) -> &'static str {
    match event {
        TableEvent::SelectionChanged(_) => "selection",
        TableEvent::SortChanged(_) => "sort",
        TableEvent::RowClicked { .. } => "row click",
        TableEvent::PageChanged(_) => "page",
        TableEvent::RowsPerPageChanged(_) => "rows per page",
    }
}
