//! Selection tracker.
//!
//! Selection uses string row IDs so it stays attached to the same rows when
//! the data is re-sorted, re-fetched or paged. The table only proposes new
//! selections; the owner keeps the authoritative copy.

use std::collections::HashSet;

/// Visual state of the header checkbox.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CheckboxState {
    #[default]
    Unchecked,
    Checked,
    Indeterminate,
}

impl CheckboxState {
    /// Terminal glyph for this state.
    pub fn glyph(self) -> &'static str {
        match self {
            CheckboxState::Unchecked => "[ ]",
            CheckboxState::Checked => "[x]",
            CheckboxState::Indeterminate => "[-]",
        }
    }

    /// Glyph for a plain row checkbox.
    pub fn row_glyph(selected: bool) -> &'static str {
        if selected {
            CheckboxState::Checked.glyph()
        } else {
            CheckboxState::Unchecked.glyph()
        }
    }
}

/// ID-based selection state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    selected: HashSet<String>,
}

impl Selection {
    /// Create a new empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a selection from a list of IDs.
    pub fn from_ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            selected: ids.into_iter().map(Into::into).collect(),
        }
    }

    /// Get all selected IDs (sorted for deterministic ordering).
    pub fn selected(&self) -> Vec<String> {
        let mut ids: Vec<_> = self.selected.iter().cloned().collect();
        ids.sort();
        ids
    }

    /// Check if an ID is selected.
    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.contains(id)
    }

    /// Get the number of selected items.
    pub fn len(&self) -> usize {
        self.selected.len()
    }

    /// Check if nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Clear all selection.
    /// Returns the IDs that were deselected.
    pub fn clear(&mut self) -> Vec<String> {
        self.selected.drain().collect()
    }

    /// Toggle selection of an ID.
    /// Returns (added, removed) IDs.
    pub fn toggle(&mut self, id: &str) -> (Vec<String>, Vec<String>) {
        if self.selected.remove(id) {
            (vec![], vec![id.to_string()])
        } else {
            self.selected.insert(id.to_string());
            (vec![id.to_string()], vec![])
        }
    }

    /// Header checkbox change.
    ///
    /// Checked: the selection becomes exactly the visible rows' IDs.
    /// Unchecked: the selection becomes empty.
    pub fn select_all(&mut self, checked: bool, visible_ids: &[String]) {
        self.selected.clear();
        if checked {
            self.selected.extend(visible_ids.iter().cloned());
        }
    }

    /// Number of `visible_ids` that are selected.
    pub fn count_in(&self, visible_ids: &[String]) -> usize {
        visible_ids
            .iter()
            .filter(|id| self.selected.contains(id.as_str()))
            .count()
    }

    /// Header checkbox state for the rows currently shown.
    ///
    /// Checked iff every visible row is selected and there is at least one;
    /// indeterminate iff some but not all are.
    pub fn header_state(&self, visible_ids: &[String]) -> CheckboxState {
        let total = visible_ids.len();
        let selected = self.count_in(visible_ids);
        if total > 0 && selected == total {
            CheckboxState::Checked
        } else if selected > 0 {
            CheckboxState::Indeterminate
        } else {
            CheckboxState::Unchecked
        }
    }

    /// Drop IDs that no longer resolve to a row.
    /// Returns the IDs that were removed.
    pub fn prune(&mut self, existing_ids: &[String]) -> Vec<String> {
        let existing: HashSet<&str> = existing_ids.iter().map(String::as_str).collect();
        let stale: Vec<String> = self
            .selected
            .iter()
            .filter(|id| !existing.contains(id.as_str()))
            .cloned()
            .collect();
        for id in &stale {
            self.selected.remove(id);
        }
        stale
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("row-{}", i)).collect()
    }

    #[test]
    fn select_all_then_none_is_empty() {
        for n in [0, 1, 5] {
            let visible = ids(n);
            let mut selection = Selection::new();
            selection.select_all(true, &visible);
            assert_eq!(selection.len(), n);
            selection.select_all(false, &visible);
            assert!(selection.is_empty());
        }
    }

    #[test]
    fn toggle_flips_membership() {
        let mut selection = Selection::new();
        assert_eq!(selection.toggle("a"), (vec!["a".to_string()], vec![]));
        assert!(selection.is_selected("a"));
        assert_eq!(selection.toggle("a"), (vec![], vec!["a".to_string()]));
        assert!(!selection.is_selected("a"));
    }

    #[test]
    fn header_state_tracks_visible_rows() {
        let visible = ids(3);
        let mut selection = Selection::new();
        assert_eq!(selection.header_state(&visible), CheckboxState::Unchecked);

        selection.toggle("row-1");
        assert_eq!(selection.header_state(&visible), CheckboxState::Indeterminate);

        selection.toggle("row-0");
        selection.toggle("row-2");
        assert_eq!(selection.header_state(&visible), CheckboxState::Checked);

        assert_eq!(selection.header_state(&[]), CheckboxState::Unchecked);
    }

    #[test]
    fn select_all_replaces_rows_from_other_pages() {
        let mut selection = Selection::from_ids(["old"]);
        selection.select_all(true, &ids(2));
        assert_eq!(selection.selected(), vec!["row-0", "row-1"]);
    }

    #[test]
    fn prune_drops_unknown_ids() {
        let mut selection = Selection::from_ids(["row-0", "gone"]);
        assert_eq!(selection.prune(&ids(2)), vec!["gone".to_string()]);
        assert_eq!(selection.selected(), vec!["row-0"]);
    }
}
