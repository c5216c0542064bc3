use std::sync::{Arc, Mutex};

use inkwell_table::prelude::*;

#[derive(Clone, Debug, PartialEq)]
struct User {
    id: u32,
    name: &'static str,
    email: &'static str,
    role: &'static str,
}

impl TableRow for User {
    fn id(&self) -> String {
        self.id.to_string()
    }
}

fn users() -> Vec<User> {
    vec![
        User { id: 1, name: "John Doe", email: "john@example.com", role: "Admin" },
        User { id: 2, name: "Jane Smith", email: "jane@example.com", role: "Editor" },
        User { id: 3, name: "Bob Johnson", email: "bob@example.com", role: "Viewer" },
        User { id: 4, name: "Alice Brown", email: "alice@example.com", role: "Editor" },
        User { id: 5, name: "Charlie Wilson", email: "charlie@example.com", role: "Admin" },
    ]
}

fn columns() -> Vec<Column<User>> {
    vec![
        Column::new("name", "Name")
            .data_key(|u: &User| u.name.into())
            .sortable(),
        Column::new("email", "Email").data_key(|u: &User| u.email.into()),
        Column::new("role", "Role")
            .data_key(|u: &User| u.role.into())
            .sortable(),
    ]
}

#[test]
fn test_paging_five_rows_by_three() {
    let users = users();
    let table = Table::new(columns()).selectable();
    let mut state = TableState::new(Pagination::new(users.len(), 3));

    let visible = state.pagination.slice(&users);
    assert_eq!(visible.len(), 3);
    assert_eq!(state.pagination.label(), "1–3 of 5");

    let event = table
        .dispatch(TableAction::PageChange(1), visible, &state)
        .unwrap();
    state.apply(&event);
    let visible = state.pagination.slice(&users);
    assert_eq!(visible.iter().map(|u| u.id).collect::<Vec<_>>(), vec![4, 5]);
    assert_eq!(state.pagination.label(), "4–5 of 5");
    assert_eq!(state.pagination.next(), None);
}

#[test]
fn test_select_all_on_second_page_selects_only_visible() {
    let users = users();
    let table = Table::new(columns()).selectable();
    let mut state = TableState::new(Pagination::new(users.len(), 3));
    state.pagination.set_page(1);

    let visible = state.pagination.slice(&users);
    let event = table
        .dispatch(TableAction::SelectAll(true), visible, &state)
        .unwrap();
    state.apply(&event);
    assert_eq!(state.selection.selected(), vec!["4", "5"]);

    let view = table.view(visible, &state);
    assert_eq!(view.header.checkbox, Some(CheckboxState::Checked));

    state.pagination.set_page(0);
    let view = table.view(state.pagination.slice(&users), &state);
    assert_eq!(view.header.checkbox, Some(CheckboxState::Unchecked));
}

#[test]
fn test_selection_follows_rows_through_sorting() {
    let mut users = users();
    let table = Table::new(columns()).selectable();
    let mut state = TableState::new(Pagination::new(users.len(), 5));

    let event = table
        .dispatch(TableAction::ToggleRow("3".into()), &users, &state)
        .unwrap();
    state.apply(&event);

    let event = table
        .dispatch(TableAction::HeaderClick("name".into()), &users, &state)
        .unwrap();
    state.apply(&event);
    sort_rows(&mut users, &table.columns, &state.sort);

    let view = table.view(&users, &state);
    let selected: Vec<_> = view
        .rows
        .iter()
        .filter_map(|row| match row {
            BodyRow::Data { id, selected: Some(true), .. } => Some(id.clone()),
            _ => None,
        })
        .collect();
    assert_eq!(selected, vec!["3"]);
    assert_eq!(users[0].name, "Alice Brown");
    assert_eq!(users[1].name, "Bob Johnson");
}

#[test]
fn test_handlers_receive_changes() {
    let sorts = Arc::new(Mutex::new(Vec::new()));
    let selections = Arc::new(Mutex::new(Vec::new()));
    let clicks = Arc::new(Mutex::new(Vec::new()));

    let table = {
        let sorts = sorts.clone();
        let selections = selections.clone();
        let clicks = clicks.clone();
        Table::new(columns())
            .selectable()
            .on_sort_change(move |column, direction| {
                sorts
                    .lock()
                    .unwrap()
                    .push((column.map(str::to_string), direction));
            })
            .on_selection_change(move |ids| selections.lock().unwrap().push(ids.to_vec()))
            .on_row_click(move |user: &User, index| clicks.lock().unwrap().push((user.id, index)))
    };

    let users = users();
    let mut state = TableState::new(Pagination::new(users.len(), 5));
    for _ in 0..3 {
        if let Some(event) = table.dispatch(TableAction::HeaderClick("role".into()), &users, &state) {
            state.apply(&event);
        }
    }
    assert!(table
        .dispatch(TableAction::HeaderClick("email".into()), &users, &state)
        .is_none());

    table.dispatch(TableAction::ToggleRow("2".into()), &users, &state);
    table.dispatch(TableAction::RowClick(4), &users, &state);

    assert_eq!(
        *sorts.lock().unwrap(),
        vec![
            (Some("role".to_string()), Some(SortDirection::Ascending)),
            (Some("role".to_string()), Some(SortDirection::Descending)),
            (None, None),
        ]
    );
    assert_eq!(*selections.lock().unwrap(), vec![vec!["2".to_string()]]);
    assert_eq!(*clicks.lock().unwrap(), vec![(5, 4)]);
}

#[test]
fn test_loading_table_ignores_actions_and_shows_skeletons() {
    let users = users();
    let table = Table::new(columns()).selectable().loading(true);
    let state = TableState::new(Pagination::new(users.len(), 5));

    assert!(table
        .dispatch(TableAction::SelectAll(true), &users, &state)
        .is_none());
    let view = table.view(&users, &state);
    assert_eq!(view.rows.len(), 5);
    assert!(view.rows.iter().all(|r| matches!(r, BodyRow::Skeleton(_))));
    assert!(!view.has_data());
}

#[test]
fn test_loading_rows_replace_the_data_whatever_its_length() {
    let users = users();
    let state = TableState::new(Pagination::new(users.len(), 5));

    let table = Table::new(columns()).loading(true).loading_rows(2);
    let view = table.view(&users, &state);
    assert_eq!(view.rows.len(), 2);
    assert!(view.rows.iter().all(|r| matches!(r, BodyRow::Skeleton(_))));

    let table = Table::new(columns()).loading(true).loading_rows(4);
    let view = table.view(&[], &state);
    assert_eq!(view.rows.len(), 4);
    assert!(view.rows.iter().all(|r| matches!(r, BodyRow::Skeleton(_))));
    assert!(!view.rows.iter().any(|r| matches!(r, BodyRow::Empty { .. })));
}

#[test]
fn test_rows_per_page_five_shows_every_row() {
    let users = users();
    let table = Table::new(columns());
    let mut state = TableState::new(Pagination::new(users.len(), 3));
    state.pagination.set_page(1);

    let visible = state.pagination.slice(&users);
    let event = table
        .dispatch(TableAction::RowsPerPageChange(5), visible, &state)
        .unwrap();
    state.apply(&event);

    assert_eq!(state.pagination.current_page(), 0);
    assert_eq!(state.pagination.slice(&users).len(), 5);
    assert_eq!(state.pagination.label(), "1–5 of 5");
}

#[test]
fn test_sticky_columns_lead_the_layout() {
    let mut columns = columns();
    columns[2] = Column::new("role", "Role")
        .data_key(|u: &User| u.role.into())
        .sticky();
    let table = Table::new(columns);
    let users = users();
    let state = TableState::new(Pagination::new(users.len(), 5));

    let view = table.view(&users, &state);
    let ids: Vec<_> = view.header.cells.iter().map(|c| c.column_id.as_str()).collect();
    assert_eq!(ids, vec!["role", "name", "email"]);
}

#[test]
fn test_empty_table_shows_zero_of_zero() {
    let table = Table::new(columns()).selectable();
    let state = TableState::new(Pagination::new(0, 5));
    let view = table.view(&[], &state);
    assert_eq!(view.rows.len(), 1);
    assert!(matches!(&view.rows[0], BodyRow::Empty { colspan: 4, .. }));
    assert_eq!(view.header.checkbox, Some(CheckboxState::Unchecked));
    assert_eq!(state.pagination.label(), "0 of 0");
}

#[test]
fn test_rendered_lines_fit_width() {
    let users = users();
    let table = Table::new(columns()).selectable().variant(TableVariant::Outlined);
    let state = TableState::new(Pagination::new(users.len(), 5));
    let lines = table.view(&users, &state).render_lines(60, 0);
    assert_eq!(lines.len(), 2 + 2 + 5);
    for line in &lines {
        assert_eq!(inkwell_table::text::display_width(&line.text), 60);
    }
}
