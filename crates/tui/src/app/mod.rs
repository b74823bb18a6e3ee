use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use api_types::category::Category;
use crossterm::event::{self, Event, KeyEvent};
use split_engine::{
    CategoryRef, SessionState, Split, SplitEditor, SplitKey, SplitPatch, SplitSession,
    TransactionId,
};

use crate::{
    client::Client,
    config::AppConfig,
    error::{AppError, Result},
    ui::{self, keymap::AppAction},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitField {
    Date,
    Description,
    Subcategory,
    Amount,
}

impl SplitField {
    pub const ALL: [SplitField; 4] = [
        Self::Date,
        Self::Description,
        Self::Subcategory,
        Self::Amount,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Date => "Date",
            Self::Description => "Description",
            Self::Subcategory => "Subcategory",
            Self::Amount => "Amount",
        }
    }

    fn next(self) -> Self {
        match self {
            Self::Date => Self::Description,
            Self::Description => Self::Subcategory,
            Self::Subcategory => Self::Amount,
            Self::Amount => Self::Date,
        }
    }

    fn prev(self) -> Self {
        match self {
            Self::Date => Self::Amount,
            Self::Description => Self::Date,
            Self::Subcategory => Self::Description,
            Self::Amount => Self::Subcategory,
        }
    }
}

/// Row and field under the cursor, relative to the current page.
#[derive(Debug, Clone, Copy)]
pub struct Cursor {
    pub row: usize,
    pub field: SplitField,
    pub editing: bool,
    /// The next typed character replaces the prefilled text.
    pub overwrite: bool,
}

impl Cursor {
    fn begin_edit(&mut self) {
        self.editing = true;
        self.overwrite = matches!(self.field, SplitField::Date | SplitField::Amount);
    }
}

impl Default for Cursor {
    fn default() -> Self {
        Self {
            row: 0,
            field: SplitField::Description,
            editing: false,
            overwrite: false,
        }
    }
}

/// A selectable subcategory with the name of its category.
#[derive(Debug, Clone)]
pub struct SubcategoryOption {
    pub category: String,
    pub subcategory: CategoryRef,
}

fn flatten_categories(categories: Vec<Category>) -> Vec<SubcategoryOption> {
    categories
        .into_iter()
        .flat_map(|category| {
            let name = category.name;
            category
                .subcategories
                .into_iter()
                .map(move |sub| SubcategoryOption {
                    category: name.clone(),
                    subcategory: CategoryRef::new(sub.id, sub.name),
                })
        })
        .collect()
}

/// Option following `current` in the list, wrapping around.
fn next_subcategory(options: &[SubcategoryOption], current: i64) -> Option<CategoryRef> {
    if options.is_empty() {
        return None;
    }
    let next = options
        .iter()
        .position(|opt| opt.subcategory.id == current)
        .map_or(0, |idx| (idx + 1) % options.len());
    Some(options[next].subcategory.clone())
}

#[derive(Debug)]
pub struct AppState {
    pub transaction_id: TransactionId,
    pub session: Option<SplitSession<Client>>,
    pub cursor: Cursor,
    pub subcategories: Vec<SubcategoryOption>,
    pub saving: bool,
}

impl AppState {
    pub fn selected_split(&self) -> Option<&Split> {
        let editor = self.session.as_ref()?.editor()?;
        editor.ledger().current_page_splits().get(self.cursor.row)
    }
}

pub struct App {
    config: AppConfig,
    pub state: AppState,
    closed: Arc<Mutex<Option<bool>>>,
    should_quit: bool,
}

impl App {
    pub fn new(config: AppConfig, transaction_id: TransactionId) -> Self {
        Self {
            config,
            state: AppState {
                transaction_id,
                session: None,
                cursor: Cursor::default(),
                subcategories: Vec::new(),
                saving: false,
            },
            closed: Arc::new(Mutex::new(None)),
            should_quit: false,
        }
    }

    /// Runs the editor until the session closes.
    ///
    /// Returns `Some(refresh)` once the session closed, `None` if it never
    /// got that far.
    pub async fn run(&mut self) -> Result<Option<bool>> {
        let mut terminal = ui::setup_terminal()?;
        let result = self.open_and_loop(&mut terminal).await;
        ui::restore_terminal(&mut terminal)?;
        result?;

        let closed = self
            .closed
            .lock()
            .map_err(|_| AppError::Terminal("close state poisoned".to_string()))?;
        Ok(*closed)
    }

    async fn open_and_loop(&mut self, terminal: &mut ui::Terminal) -> Result<()> {
        self.draw(terminal)?;
        self.open_session().await?;
        self.event_loop(terminal).await
    }

    fn draw(&self, terminal: &mut ui::Terminal) -> Result<()> {
        terminal
            .draw(|frame| ui::render(frame, &self.state))
            .map_err(|err| AppError::Terminal(err.to_string()))?;
        Ok(())
    }

    async fn open_session(&mut self) -> Result<()> {
        let client = Client::new(&self.config.base_url)?;

        match client.categories().await {
            Ok(categories) => self.state.subcategories = flatten_categories(categories),
            Err(err) => tracing::warn!("failed to fetch categories: {err}"),
        }

        let sink = Arc::clone(&self.closed);
        let session = SplitSession::open(client, self.state.transaction_id, move |refresh| {
            if let Ok(mut slot) = sink.lock() {
                *slot = Some(refresh);
            }
        })
        .await;
        self.state.session = Some(session);
        Ok(())
    }

    async fn event_loop(&mut self, terminal: &mut ui::Terminal) -> Result<()> {
        let tick_rate = Duration::from_millis(200);

        while !self.should_quit {
            self.draw(terminal)?;

            if self.state.saving {
                self.save().await;
                continue;
            }

            if event::poll(tick_rate)? {
                if let Event::Key(key) = event::read()? {
                    self.handle_key(key).await;
                }
            }
        }

        Ok(())
    }

    async fn save(&mut self) {
        self.state.saving = false;
        let Some(session) = self.state.session.as_mut() else {
            return;
        };
        // Failures are shown by the editor's error banner.
        if session.save().await.is_ok() {
            self.should_quit = true;
        }
    }

    fn cancel(&mut self) {
        match self.state.session.as_mut() {
            Some(session) => {
                if session.cancel().is_ok() {
                    self.should_quit = true;
                }
            }
            None => self.should_quit = true,
        }
    }

    async fn handle_key(&mut self, key: KeyEvent) {
        let action = ui::keymap::map_key(key);
        if action == AppAction::Quit {
            self.cancel();
            return;
        }

        let state = self.state.session.as_ref().map(SplitSession::state);
        match state {
            Some(SessionState::Loading) => match action {
                AppAction::Input('r') | AppAction::Input('R') => {
                    if let Some(session) = self.state.session.as_mut() {
                        session.retry_load().await;
                    }
                }
                AppAction::Input('q') | AppAction::Cancel => self.cancel(),
                _ => {}
            },
            Some(SessionState::Ready) if self.state.cursor.editing => self.handle_editing(action),
            Some(SessionState::Ready) => self.handle_browsing(action),
            _ => {}
        }
    }

    fn handle_browsing(&mut self, action: AppAction) {
        match action {
            AppAction::Input('q') | AppAction::Cancel => return self.cancel(),
            AppAction::Input('s') => {
                self.state.saving = true;
                return;
            }
            _ => {}
        }

        let state = &mut self.state;
        if let Some(editor) = state.session.as_mut().and_then(SplitSession::editor_mut) {
            browse(editor, &mut state.cursor, &state.subcategories, action);
        }
    }

    fn handle_editing(&mut self, action: AppAction) {
        let state = &mut self.state;
        if let Some(editor) = state.session.as_mut().and_then(SplitSession::editor_mut) {
            edit(editor, &mut state.cursor, action);
        }
    }
}

fn browse(
    editor: &mut SplitEditor,
    cursor: &mut Cursor,
    subcategories: &[SubcategoryOption],
    action: AppAction,
) {
    let selected = editor
        .ledger()
        .current_page_splits()
        .get(cursor.row)
        .map(|split| split.key);

    match action {
        AppAction::Input('a') => {
            editor.add_split();
            cursor.row = editor.ledger().current_page_splits().len().saturating_sub(1);
            cursor.field = SplitField::Description;
        }
        AppAction::Input('d') => {
            if let Some(key) = selected {
                editor.remove_split(key);
            }
        }
        AppAction::Input('x') => editor.dismiss_error(),
        AppAction::Up | AppAction::Input('k') => cursor.row = cursor.row.saturating_sub(1),
        AppAction::Down | AppAction::Input('j') => cursor.row += 1,
        AppAction::Left | AppAction::Input('[') => {
            editor.prev_page();
            cursor.row = 0;
        }
        AppAction::Right | AppAction::Input(']') => {
            editor.next_page();
            cursor.row = 0;
        }
        AppAction::NextField => cursor.field = cursor.field.next(),
        AppAction::PrevField => cursor.field = cursor.field.prev(),
        AppAction::Submit => {
            if let Some(key) = selected {
                if cursor.field == SplitField::Subcategory {
                    let current = editor.ledger().get(key).map_or(0, |s| s.subcategory.id);
                    if let Some(next) = next_subcategory(subcategories, current) {
                        editor.update_subcategory(key, next);
                    }
                } else {
                    cursor.begin_edit();
                }
            }
        }
        _ => {}
    }

    clamp_row(cursor, editor);
}

fn edit(editor: &mut SplitEditor, cursor: &mut Cursor, action: AppAction) {
    let Some(split) = editor.ledger().current_page_splits().get(cursor.row) else {
        cursor.editing = false;
        return;
    };
    let key = split.key;
    let mut text = field_text(split, cursor.field);

    match action {
        AppAction::Input(ch) => {
            if cursor.overwrite {
                text.clear();
            }
            text.push(ch);
            cursor.overwrite = false;
            editor.update_split(key, field_patch(cursor.field, text));
        }
        AppAction::Backspace => {
            text.pop();
            cursor.overwrite = false;
            editor.update_split(key, field_patch(cursor.field, text));
        }
        AppAction::Submit | AppAction::Cancel | AppAction::NextField => {
            finish_edit(editor, key, cursor.field);
            cursor.editing = false;
            cursor.overwrite = false;
            if action == AppAction::NextField {
                cursor.field = cursor.field.next();
            }
        }
        _ => {}
    }
}

fn field_text(split: &Split, field: SplitField) -> String {
    match field {
        SplitField::Date => split.transaction_date.clone(),
        SplitField::Description => split.description.clone(),
        SplitField::Amount => split.amount.clone(),
        SplitField::Subcategory => split.subcategory.name.clone(),
    }
}

fn field_patch(field: SplitField, text: String) -> SplitPatch {
    match field {
        SplitField::Date => SplitPatch::default().transaction_date(text),
        SplitField::Description => SplitPatch::default().description(text),
        SplitField::Amount => SplitPatch::default().amount(text),
        SplitField::Subcategory => SplitPatch::default(),
    }
}

fn finish_edit(editor: &mut SplitEditor, key: SplitKey, field: SplitField) {
    match field {
        SplitField::Amount => editor.finish_amount_edit(key),
        SplitField::Date => editor.finish_date_edit(key),
        SplitField::Description | SplitField::Subcategory => {}
    }
}

fn clamp_row(cursor: &mut Cursor, editor: &SplitEditor) {
    let rows = editor.ledger().current_page_splits().len();
    cursor.row = cursor.row.min(rows.saturating_sub(1));
}
