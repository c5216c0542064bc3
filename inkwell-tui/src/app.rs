//! The users screen: state, key handling, drawing and the event loop.

use std::io::Write;

use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::style::{Attribute, Color, Print, SetAttribute, SetBackgroundColor, SetForegroundColor};
use crossterm::{cursor, queue, terminal};
use futures::StreamExt;
use inkwell_lib::Config;
use inkwell_lib::auth::AuthService;
use inkwell_lib::error::ApiError;
use inkwell_lib::model::User;
use inkwell_table::prelude::*;
use inkwell_table::text::fit;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};

use crate::error::AppError;
use crate::settings::Settings;
use crate::terminal::TerminalGuard;
use crate::users::{self, UserRow};

/// Lines around the table: title, pagination, selection, status, help.
const CHROME_LINES: u16 = 5;

const HELP: &str = "↑↓ move  ←→ page  space select  a all  c clear  1-9 sort  +/- rows  enter open  l loading  r reload  o sign out  q quit";

/// Results of background work, fed back into the loop.
#[derive(Debug)]
pub enum Message {
    UsersLoaded(Result<Vec<User>, ApiError>),
    SignedInAs(Option<User>),
    SignedOut,
}

/// Why the screen closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exit {
    Quit,
    SignedOut,
}

pub struct App {
    auth: AuthService,
    settings: Settings,
    table: Table<UserRow>,
    state: TableState,
    /// Rows in fetch order.
    fetched: Vec<UserRow>,
    /// Rows in display order.
    rows: Vec<UserRow>,
    cursor: usize,
    user: Option<User>,
    status: String,
    tx: UnboundedSender<Message>,
    exit: Option<Exit>,
}

impl App {
    pub fn new(
        auth: AuthService,
        settings: Settings,
        config: &Config,
        rows_per_page: usize,
        tx: UnboundedSender<Message>,
    ) -> Self {
        let table = Table::new(users::columns())
            .selectable()
            .striped()
            .sticky_header()
            .variant(TableVariant::Outlined)
            .loading_rows(config.loading_rows)
            .empty_state(EmptyState::new("No users").description("Press r to load them again."))
            .on_selection_change(|ids| log::debug!("[app] selected {:?}", ids))
            .on_sort_change(|column, direction| log::debug!("[app] sort {:?} {:?}", column, direction))
            .on_row_click(|row: &UserRow, index| log::info!("[app] opened {} at row {}", row.0.id, index));

        let pagination = Pagination::new(0, rows_per_page)
            .with_options(config.rows_per_page_options.clone())
            .with_first_last_buttons();

        Self {
            auth,
            settings,
            table,
            state: TableState::new(pagination),
            fetched: Vec::new(),
            rows: Vec::new(),
            cursor: 0,
            user: None,
            status: String::new(),
            tx,
            exit: None,
        }
    }

    pub fn exit(&self) -> Option<Exit> {
        self.exit
    }

    fn visible(&self) -> &[UserRow] {
        self.state.pagination.slice(&self.rows)
    }

    /// Start fetching users; the table shows skeleton rows meanwhile.
    pub fn reload(&mut self) {
        self.table.loading = true;
        self.status = "Loading users…".to_string();
        let client = self.auth.client().clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = users::fetch_all(&client).await;
            let _ = tx.send(Message::UsersLoaded(result));
        });
    }

    pub fn load_user(&self) {
        let auth = self.auth.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let _ = tx.send(Message::SignedInAs(auth.current_user().await));
        });
    }

    fn sign_out(&mut self) {
        self.status = "Signing out…".to_string();
        let auth = self.auth.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            if let Err(e) = auth.logout().await {
                log::error!("[app] sign out failed: {}", e);
            }
            let _ = tx.send(Message::SignedOut);
        });
    }

    pub fn handle_message(&mut self, message: Message) {
        match message {
            Message::UsersLoaded(Ok(users)) => {
                self.fetched = users.into_iter().map(UserRow::from).collect();
                let ids: Vec<String> = self.fetched.iter().map(TableRow::id).collect();
                self.state.selection.prune(&ids);
                self.state.pagination.set_count(self.fetched.len());
                self.resort();
                self.table.loading = false;
                self.status = format!("Loaded {} users", self.fetched.len());
            }
            Message::UsersLoaded(Err(e)) => {
                log::warn!("[app] loading users failed: {}", e);
                self.table.loading = false;
                self.status = e.user_message();
                if e.is_unauthorized() {
                    // The server no longer accepts the stored token
                    let session = self.auth.client().session().clone();
                    let tx = self.tx.clone();
                    tokio::spawn(async move {
                        if let Err(e) = session.clear().await {
                            log::error!("[app] failed to clear session: {}", e);
                        }
                        let _ = tx.send(Message::SignedOut);
                    });
                } else if !self.auth.is_authenticated() {
                    self.exit = Some(Exit::SignedOut);
                }
            }
            Message::SignedInAs(user) => self.user = user,
            Message::SignedOut => self.exit = Some(Exit::SignedOut),
        }
        self.clamp_cursor();
    }

    fn resort(&mut self) {
        self.rows = self.fetched.clone();
        sort_rows(&mut self.rows, &self.table.columns, &self.state.sort);
    }

    fn clamp_cursor(&mut self) {
        self.cursor = self.cursor.min(self.visible().len().saturating_sub(1));
    }

    /// Run a table action and fold the resulting event into the state.
    fn act(&mut self, action: TableAction) {
        let Some(event) = self
            .table
            .dispatch(action, self.state.pagination.slice(&self.rows), &self.state)
        else {
            return;
        };
        self.state.apply(&event);

        match &event {
            TableEvent::SortChanged(sort) => {
                self.resort();
                let column = sort
                    .column
                    .as_deref()
                    .and_then(|id| self.table.columns.iter().find(|c| c.id == id));
                self.status = match (column, sort.direction) {
                    (Some(column), Some(direction)) => format!("{} {}", column.label, direction.label()),
                    _ => "Unsorted".to_string(),
                };
            }
            TableEvent::PageChanged(_) => self.cursor = 0,
            TableEvent::RowsPerPageChanged(rows) => {
                self.cursor = 0;
                let settings = self.settings.clone();
                let rows = *rows;
                tokio::spawn(async move {
                    if let Err(e) = settings.set_rows_per_page(rows).await {
                        log::warn!("[app] failed to save rows per page: {}", e);
                    }
                });
            }
            TableEvent::RowClicked { row, .. } => {
                let role = row.0.role.as_deref().unwrap_or("no role");
                self.status = format!("{} <{}> · {}", row.0.name, row.0.email, role);
            }
            TableEvent::SelectionChanged(_) => {}
        }
        self.clamp_cursor();
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.exit = Some(Exit::Quit);
            return;
        }

        let pagination = &self.state.pagination;
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.exit = Some(Exit::Quit),
            KeyCode::Up | KeyCode::Char('k') => self.cursor = self.cursor.saturating_sub(1),
            KeyCode::Down | KeyCode::Char('j') => {
                if self.cursor + 1 < self.visible().len() {
                    self.cursor += 1;
                }
            }
            KeyCode::Left | KeyCode::PageUp => {
                if let Some(page) = pagination.previous() {
                    self.act(TableAction::PageChange(page));
                }
            }
            KeyCode::Right | KeyCode::PageDown => {
                if let Some(page) = pagination.next() {
                    self.act(TableAction::PageChange(page));
                }
            }
            KeyCode::Home => {
                if let Some(page) = pagination.first() {
                    self.act(TableAction::PageChange(page));
                }
            }
            KeyCode::End => {
                if let Some(page) = pagination.last() {
                    self.act(TableAction::PageChange(page));
                }
            }
            KeyCode::Char('+') => {
                if let Some(rows) = pagination.next_rows_per_page_option() {
                    self.act(TableAction::RowsPerPageChange(rows));
                }
            }
            KeyCode::Char('-') => {
                if let Some(rows) = pagination.previous_rows_per_page_option() {
                    self.act(TableAction::RowsPerPageChange(rows));
                }
            }
            KeyCode::Char(' ') => {
                let id = self.visible().get(self.cursor).map(TableRow::id);
                if let Some(id) = id {
                    self.act(TableAction::ToggleRow(id));
                }
            }
            KeyCode::Char('a') => {
                let ids: Vec<String> = self.visible().iter().map(TableRow::id).collect();
                let checked = self.state.selection.header_state(&ids) != CheckboxState::Checked;
                self.act(TableAction::SelectAll(checked));
            }
            KeyCode::Char('c') => self.act(TableAction::ClearSelection),
            KeyCode::Enter => self.act(TableAction::RowClick(self.cursor)),
            KeyCode::Char(c @ '1'..='9') => {
                let index = c as usize - '1' as usize;
                let column = self.table.layout_columns().get(index).map(|c| c.id.clone());
                if let Some(column) = column {
                    self.act(TableAction::HeaderClick(column));
                }
            }
            KeyCode::Char('l') => {
                self.table.loading = !self.table.loading;
                self.status = if self.table.loading {
                    "Showing loading state".to_string()
                } else {
                    String::new()
                };
            }
            KeyCode::Char('r') => self.reload(),
            KeyCode::Char('o') => self.sign_out(),
            _ => {}
        }
    }

    /// Draw the whole screen.
    pub fn render(&self, out: &mut impl Write) -> std::io::Result<()> {
        let (width, height) = terminal::size()?;
        let body_height = height.saturating_sub(CHROME_LINES + 4).max(1) as usize;
        let scroll = self.cursor.saturating_sub(body_height - 1);

        let mut view = self.table.view(self.visible(), &self.state).hover(Some(self.cursor));
        view.max_height = Some(body_height);

        queue!(out, terminal::Clear(terminal::ClearType::All), cursor::MoveTo(0, 0))?;

        let who = match &self.user {
            Some(user) => format!("Signed in as {} <{}>", user.name, user.email),
            None => "Signed in".to_string(),
        };
        let title = fit(&format!(" Inkwell · Users   {}", who), width, Alignment::Left);
        queue!(
            out,
            SetAttribute(Attribute::Bold),
            Print(title),
            SetAttribute(Attribute::Reset),
            cursor::MoveToNextLine(1)
        )?;

        for line in view.render_lines(width, scroll) {
            draw_line(out, &line)?;
        }

        let footer = [
            self.state.pagination.render_line(),
            format!("{} selected", self.state.selection.len()),
            self.status.clone(),
        ];
        for text in footer {
            queue!(out, Print(fit(&text, width, Alignment::Left)), cursor::MoveToNextLine(1))?;
        }
        queue!(
            out,
            SetForegroundColor(Color::DarkGrey),
            Print(fit(HELP, width, Alignment::Left)),
            SetAttribute(Attribute::Reset)
        )?;
        out.flush()
    }
}

fn draw_line(out: &mut impl Write, line: &RenderedLine) -> std::io::Result<()> {
    match line.style {
        LineStyle::Frame | LineStyle::Rule | LineStyle::Skeleton => {
            queue!(out, SetForegroundColor(Color::DarkGrey))?;
        }
        LineStyle::Header => queue!(out, SetAttribute(Attribute::Bold))?,
        LineStyle::Empty => queue!(out, SetAttribute(Attribute::Italic))?,
        LineStyle::Row {
            striped,
            hovered,
            selected,
        } => {
            if striped {
                queue!(out, SetBackgroundColor(Color::AnsiValue(236)))?;
            }
            if selected {
                queue!(out, SetForegroundColor(Color::Cyan))?;
            }
            if hovered {
                queue!(out, SetAttribute(Attribute::Reverse))?;
            }
        }
    }
    queue!(
        out,
        Print(&line.text),
        SetAttribute(Attribute::Reset),
        cursor::MoveToNextLine(1)
    )
}

/// Show the users screen until the user quits or signs out.
pub async fn run(
    auth: AuthService,
    settings: Settings,
    config: &Config,
) -> Result<Exit, AppError> {
    let options = config.rows_per_page_options.clone();
    let default_rows = if options.contains(&config.page_size) {
        config.page_size
    } else {
        options.first().copied().unwrap_or(config.page_size)
    };
    let rows_per_page = settings.rows_per_page(&options, default_rows).await;

    let (tx, mut rx): (_, UnboundedReceiver<Message>) = unbounded_channel();
    let mut app = App::new(auth, settings, config, rows_per_page, tx);
    app.reload();
    app.load_user();

    let mut terminal = TerminalGuard::new()?;
    let mut events = EventStream::new();

    loop {
        if let Some(exit) = app.exit() {
            log::info!("[app] closing: {:?}", exit);
            return Ok(exit);
        }
        app.render(terminal.stdout())?;

        tokio::select! {
            Some(message) = rx.recv() => app.handle_message(message),
            event = events.next() => match event {
                Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => app.handle_key(key),
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(e.into()),
                None => return Ok(Exit::Quit),
            },
        }
    }
}
