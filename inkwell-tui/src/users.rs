//! The users table: row type, columns and fetching.

use inkwell_lib::api::{ApiClient, endpoints};
use inkwell_lib::error::ApiError;
use inkwell_lib::model::{User, UsersPage};
use inkwell_table::prelude::*;

/// A user shown as a table row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRow(pub User);

impl TableRow for UserRow {
    fn id(&self) -> String {
        self.0.id.clone()
    }
}

impl From<User> for UserRow {
    fn from(user: User) -> Self {
        Self(user)
    }
}

pub fn columns() -> Vec<Column<UserRow>> {
    vec![
        Column::new("id", "ID")
            .data_key(|row: &UserRow| match row.0.id.parse::<i64>() {
                Ok(id) => CellValue::Int(id),
                Err(_) => CellValue::from(&row.0.id),
            })
            .sortable()
            .align(Alignment::Right)
            .fixed(4),
        Column::new("name", "Name")
            .data_key(|row: &UserRow| CellValue::from(&row.0.name))
            .sortable()
            .sticky()
            .flex(2)
            .min_width(10),
        Column::new("email", "Email")
            .data_key(|row: &UserRow| CellValue::from(&row.0.email))
            .sortable()
            .flex(3)
            .min_width(12),
        Column::new("role", "Role")
            .data_key(|row: &UserRow| {
                row.0.role.as_deref().map(CellValue::from).unwrap_or_default()
            })
            .render(|value, _, _| match value {
                CellValue::Empty => "-".to_string(),
                other => other.to_string(),
            })
            .sortable()
            .fixed(8),
    ]
}

/// Fetch every page of `/v1/users`.
pub async fn fetch_all(client: &ApiClient) -> Result<Vec<User>, ApiError> {
    let mut users = Vec::new();
    let mut page = 1;
    loop {
        let response = client
            .get::<UsersPage>(&endpoints::users::list(page))
            .await?
            .data;
        let done = response.data.is_empty()
            || users.len() + response.data.len() >= response.total as usize;
        users.extend(response.data);
        if done {
            break;
        }
        page += 1;
    }
    log::debug!("[users] fetched {} users in {} pages", users.len(), page);
    Ok(users)
}
