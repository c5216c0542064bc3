//! Sort engine.
//!
//! The table itself never reorders data. A header click is turned into the
//! next `(column, direction)` pair and handed back to the owner, which sorts
//! its rows (optionally with [`sort_rows`]) before the next render.

use std::cmp::Ordering;

use crate::table::Column;

/// Sort direction of the active column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    /// Header indicator glyph.
    pub fn indicator(self) -> &'static str {
        match self {
            SortDirection::Ascending => "▲",
            SortDirection::Descending => "▼",
        }
    }

    /// Apply the direction to an ascending comparison.
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }

    /// Accessibility label, as announced for the active header.
    pub fn label(self) -> &'static str {
        match self {
            SortDirection::Ascending => "sorted ascending",
            SortDirection::Descending => "sorted descending",
        }
    }
}

/// Which column is sorted, and how. At most one column is active.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortState {
    pub column: Option<String>,
    pub direction: Option<SortDirection>,
}

impl SortState {
    /// No active sort.
    pub fn none() -> Self {
        Self::default()
    }

    /// Sort by `column` in `direction`.
    pub fn by(column: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            column: Some(column.into()),
            direction: Some(direction),
        }
    }

    /// Returns `true` when no column is sorted.
    pub fn is_none(&self) -> bool {
        self.active().is_none()
    }

    /// The active column and direction, if both are set.
    pub fn active(&self) -> Option<(&str, SortDirection)> {
        match (&self.column, self.direction) {
            (Some(column), Some(direction)) => Some((column.as_str(), direction)),
            _ => None,
        }
    }

    /// Direction for `column_id` when it is the active column.
    pub fn direction_for(&self, column_id: &str) -> Option<SortDirection> {
        self.active()
            .and_then(|(column, direction)| (column == column_id).then_some(direction))
    }
}

/// Compute the sort state that follows a click on `clicked_id`.
///
/// - another column (or nothing) active: `(clicked, Ascending)`
/// - clicked column ascending: `(clicked, Descending)`
/// - clicked column descending: no sort
///
/// Returns `None` when the column is unknown or not sortable; the click is
/// then a no-op and no change should be reported.
pub fn next_sort<T>(columns: &[Column<T>], current: &SortState, clicked_id: &str) -> Option<SortState> {
    let column = columns.iter().find(|c| c.id == clicked_id)?;
    if !column.sortable {
        return None;
    }

    let next = match current.direction_for(clicked_id) {
        None => SortState::by(clicked_id, SortDirection::Ascending),
        Some(SortDirection::Ascending) => SortState::by(clicked_id, SortDirection::Descending),
        Some(SortDirection::Descending) => SortState::none(),
    };
    Some(next)
}

/// Sort rows by the active column's accessor value.
///
/// Stable: rows with equal keys keep their relative order. Does nothing
/// when no sort is active or the column is unknown.
pub fn sort_rows<T>(rows: &mut [T], columns: &[Column<T>], state: &SortState) {
    let Some((column_id, _)) = state.active() else {
        return;
    };
    let Some(column) = columns.iter().find(|c| c.id == column_id) else {
        log::debug!("[sort] unknown column {}", column_id);
        return;
    };
    sort_rows_by(rows, state, |a, b| column.value(a).compare(&column.value(b)));
}

/// Sort rows with a caller-supplied ascending comparator; the state's
/// direction decides whether the result is reversed.
pub fn sort_rows_by<T, F>(rows: &mut [T], state: &SortState, mut compare: F)
where
    F: FnMut(&T, &T) -> Ordering,
{
    if let Some((_, direction)) = state.active() {
        rows.sort_by(|a, b| direction.apply(compare(a, b)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::CellValue;

    #[derive(Clone, Debug, PartialEq)]
    struct Row {
        name: &'static str,
        role: &'static str,
    }

    fn columns() -> Vec<Column<Row>> {
        vec![
            Column::new("name", "Name")
                .data_key(|r: &Row| CellValue::from(r.name))
                .sortable(),
            Column::new("email", "Email"),
            Column::new("role", "Role")
                .data_key(|r: &Row| CellValue::from(r.role))
                .sortable(),
        ]
    }

    #[test]
    fn clicks_cycle_with_period_three() {
        let columns = columns();
        let mut state = SortState::none();
        let mut seen = Vec::new();
        for _ in 0..6 {
            state = next_sort(&columns, &state, "name").unwrap();
            seen.push(state.direction);
        }
        assert_eq!(
            seen,
            vec![
                Some(SortDirection::Ascending),
                Some(SortDirection::Descending),
                None,
                Some(SortDirection::Ascending),
                Some(SortDirection::Descending),
                None,
            ]
        );
        assert_eq!(state, SortState::none());
    }

    #[test]
    fn switching_column_resets_to_ascending() {
        let columns = columns();
        let state = SortState::by("name", SortDirection::Descending);
        let next = next_sort(&columns, &state, "role").unwrap();
        assert_eq!(next, SortState::by("role", SortDirection::Ascending));
    }

    #[test]
    fn non_sortable_and_unknown_columns_are_no_ops() {
        let columns = columns();
        let state = SortState::by("name", SortDirection::Ascending);
        assert_eq!(next_sort(&columns, &state, "email"), None);
        assert_eq!(next_sort(&columns, &state, "missing"), None);
    }

    #[test]
    fn column_without_direction_counts_as_inactive() {
        let columns = columns();
        let state = SortState {
            column: Some("name".into()),
            direction: None,
        };
        let next = next_sort(&columns, &state, "name").unwrap();
        assert_eq!(next.direction, Some(SortDirection::Ascending));
    }

    #[test]
    fn sort_rows_is_stable_and_reversible() {
        let columns = columns();
        let mut rows = vec![
            Row { name: "Mike", role: "Editor" },
            Row { name: "Sarah", role: "Admin" },
            Row { name: "John", role: "Editor" },
            Row { name: "Jane", role: "Admin" },
        ];

        sort_rows(&mut rows, &columns, &SortState::by("role", SortDirection::Ascending));
        let names: Vec<_> = rows.iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["Sarah", "Jane", "Mike", "John"]);

        sort_rows(&mut rows, &columns, &SortState::by("name", SortDirection::Descending));
        let names: Vec<_> = rows.iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["Sarah", "Mike", "John", "Jane"]);
    }

    #[test]
    fn inactive_sort_keeps_order() {
        let columns = columns();
        let mut rows = vec![
            Row { name: "b", role: "x" },
            Row { name: "a", role: "y" },
        ];
        let before = rows.clone();
        sort_rows(&mut rows, &columns, &SortState::none());
        assert_eq!(rows, before);
    }
}
