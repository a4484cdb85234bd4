use std::collections::HashSet;
use std::time::Instant;

use chrono::NaiveDate;
use log::error;

use crate::board::{self, DragSession, DropTarget};
use crate::calendar::{self, date_key};
use crate::models::{DiaryEntry, Status, Todo};
use crate::tui::widgets::editor::Editor;
use crate::utils::today;
use crate::{Config, Database};

/// How long a status message stays visible before auto-clearing
const STATUS_MESSAGE_TIMEOUT_SECS: u64 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Diary,
    Board,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    View,
    EditEntry,
    EditCard,
    Help,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardField {
    Title,
    Description,
}

/// Form state for creating or editing a board card
#[derive(Debug, Clone)]
pub struct CardForm {
    pub current_field: CardField,
    pub title: Editor,
    pub description: Editor,
    pub editing_id: Option<i64>, // None for new cards, Some(id) for editing
}

impl CardForm {
    pub fn new() -> Self {
        Self {
            current_field: CardField::Title,
            title: Editor::new(),
            description: Editor::new(),
            editing_id: None,
        }
    }

    pub fn for_todo(todo: &Todo) -> Self {
        Self {
            current_field: CardField::Title,
            title: Editor::from_string(&todo.title),
            description: Editor::from_string(todo.description.as_deref().unwrap_or("")),
            editing_id: todo.id,
        }
    }

    pub fn current_editor_mut(&mut self) -> &mut Editor {
        match self.current_field {
            CardField::Title => &mut self.title,
            CardField::Description => &mut self.description,
        }
    }
}

#[derive(Debug, Clone)]
pub enum DeleteTarget {
    Entry(DiaryEntry),
    Card(Todo),
}

#[derive(Debug, Clone)]
pub struct UiState {
    pub current_tab: Tab,
    pub mode: Mode,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            current_tab: Tab::Diary,
            mode: Mode::View,
        }
    }
}

/// Diary tab state: the visible month, the selected day and its entry
#[derive(Debug, Clone)]
pub struct DiaryState {
    pub selected_date: NaiveDate,
    pub visible_month: NaiveDate, // always the first day of the month
    pub entry: Option<DiaryEntry>,
    pub editor: Editor,
    pub entry_dates: HashSet<String>,
}

impl DiaryState {
    fn new(date: NaiveDate) -> Self {
        Self {
            selected_date: date,
            visible_month: calendar::month_start(date),
            entry: None,
            editor: Editor::new(),
            entry_dates: HashSet::new(),
        }
    }
}

/// Board tab state: lane focus, per-lane cursors and the active grab
#[derive(Debug, Clone)]
pub struct BoardState {
    pub focused_lane: Status,
    pub selected: [usize; 3], // cursor per lane, in Status::ALL order
    pub drag: Option<DragSession>,
}

impl Default for BoardState {
    fn default() -> Self {
        Self {
            focused_lane: Status::Todo,
            selected: [0; 3],
            drag: None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ModalState {
    pub delete_confirmation: Option<DeleteTarget>,
    pub delete_modal_selection: usize, // 0 = Delete, 1 = Cancel
}

#[derive(Debug, Clone, Default)]
pub struct StatusState {
    pub message: Option<String>,
    pub message_time: Option<Instant>,
}

pub struct App {
    pub config: Config,
    /// None when the configured database path is unusable. The app still
    /// runs, but every data-bound view is disabled.
    pub database: Option<Database>,
    pub todos: Vec<Todo>,
    pub ui: UiState,
    pub diary: DiaryState,
    pub board: BoardState,
    pub form: Option<CardForm>,
    pub modals: ModalState,
    pub status: StatusState,
}

fn lane_index(lane: Status) -> usize {
    match lane {
        Status::Todo => 0,
        Status::InProgress => 1,
        Status::Done => 2,
    }
}

impl App {
    pub fn new(config: Config, database: Option<Database>) -> Self {
        let mut app = Self {
            config,
            database,
            todos: Vec::new(),
            ui: UiState::default(),
            diary: DiaryState::new(today()),
            board: BoardState::default(),
            form: None,
            modals: ModalState::default(),
            status: StatusState::default(),
        };

        if app.database.is_some() {
            app.reload();
        } else {
            app.set_status_message(
                "No database available. Check the configured database path.".to_string(),
            );
        }

        app
    }

    pub fn is_degraded(&self) -> bool {
        self.database.is_none()
    }

    // --- Status messages ---

    pub fn set_status_message(&mut self, message: String) {
        self.status.message = Some(message);
        self.status.message_time = Some(Instant::now());
    }

    pub fn clear_status_message(&mut self) {
        self.status.message = None;
        self.status.message_time = None;
    }

    pub fn check_status_message_timeout(&mut self) {
        if let Some(time) = self.status.message_time {
            if time.elapsed().as_secs() >= STATUS_MESSAGE_TIMEOUT_SECS {
                self.clear_status_message();
            }
        }
    }

    // --- Loading ---

    /// Refetch everything from the store. This is the only way optimistic
    /// board previews are reconciled: no local patching after writes.
    pub fn reload(&mut self) {
        self.load_todos();
        self.load_entry_dates();
        self.load_entry();
    }

    pub fn load_todos(&mut self) {
        let Some(db) = &self.database else {
            return;
        };
        match db.get_all_todos() {
            Ok(todos) => {
                self.todos = todos;
                self.clamp_board_selection();
            }
            Err(e) => {
                error!("Failed to load todos: {}", e);
                self.set_status_message(format!("Failed to load todos: {}", e));
            }
        }
    }

    pub fn load_entry_dates(&mut self) {
        let Some(db) = &self.database else {
            return;
        };
        match db.get_entry_dates() {
            Ok(dates) => {
                self.diary.entry_dates = dates.into_iter().collect();
            }
            Err(e) => {
                error!("Failed to load entry dates: {}", e);
                self.set_status_message(format!("Failed to load entry dates: {}", e));
            }
        }
    }

    /// Fetch the entry for the selected date and reset the editor to it
    pub fn load_entry(&mut self) {
        let Some(db) = &self.database else {
            return;
        };
        let key = date_key(self.diary.selected_date);
        match db.get_entry_by_date(&key) {
            Ok(entry) => {
                self.diary.editor = Editor::from_string(
                    entry.as_ref().map(|e| e.content.as_str()).unwrap_or(""),
                );
                self.diary.entry = entry;
            }
            Err(e) => {
                error!("Failed to load entry for {}: {}", key, e);
                self.set_status_message(format!("Failed to load entry: {}", e));
            }
        }
    }

    // --- Diary ---

    /// Select a day. Out-of-month cells of the visible grid stay
    /// selectable without shifting the month; only a date outside the
    /// grid moves the calendar to its month.
    pub fn select_date(&mut self, date: NaiveDate) {
        self.diary.selected_date = date;
        let (grid_start, grid_end) = calendar::grid_bounds(self.diary.visible_month);
        if date < grid_start || date > grid_end {
            self.diary.visible_month = calendar::month_start(date);
        }
        self.load_entry();
    }

    /// Switch tabs. Each tab refetches its own data on entry.
    pub fn switch_tab(&mut self, tab: Tab) {
        self.ui.current_tab = tab;
        match tab {
            Tab::Diary => {
                self.load_entry_dates();
                self.load_entry();
            }
            Tab::Board => self.load_todos(),
        }
    }

    pub fn goto_prev_month(&mut self) {
        let prev = calendar::prev_month(self.diary.selected_date);
        self.select_date(prev);
    }

    pub fn goto_next_month(&mut self) {
        let next = calendar::next_month(self.diary.selected_date);
        self.select_date(next);
    }

    pub fn goto_today(&mut self) {
        self.select_date(today());
    }

    pub fn move_selected_date(&mut self, days: i64) {
        if let Some(date) = self
            .diary
            .selected_date
            .checked_add_signed(chrono::Duration::days(days))
        {
            self.select_date(date);
        }
    }

    pub fn start_edit_entry(&mut self) {
        if self.is_degraded() {
            self.set_status_message("Diary is disabled: no database available".to_string());
            return;
        }
        self.diary.editor = Editor::from_string(
            self.diary
                .entry
                .as_ref()
                .map(|e| e.content.as_str())
                .unwrap_or(""),
        );
        self.ui.mode = Mode::EditEntry;
    }

    pub fn cancel_edit_entry(&mut self) {
        self.ui.mode = Mode::View;
        self.load_entry();
    }

    /// Persist the editor buffer as the entry for the selected date.
    /// A whitespace-only buffer is rejected locally without touching the
    /// store. One entry per date: an existing entry is updated in place.
    pub fn save_entry(&mut self) {
        if self.diary.editor.is_blank() {
            self.set_status_message("Entry cannot be empty".to_string());
            return;
        }

        let Some(db) = &self.database else {
            self.set_status_message("Diary is disabled: no database available".to_string());
            return;
        };

        let content = self.diary.editor.content();
        let key = date_key(self.diary.selected_date);

        let result = match &self.diary.entry {
            Some(existing) => match existing.id {
                Some(id) => db.update_entry_content(id, &content),
                None => Err(crate::database::DatabaseError::MissingId),
            },
            None => db
                .insert_entry(&DiaryEntry::new(key.clone(), content))
                .map(|_| ()),
        };

        match result {
            Ok(()) => {
                self.ui.mode = Mode::View;
                self.set_status_message(format!("Entry for {} saved", key));
                self.load_entry_dates();
                self.load_entry();
            }
            Err(e) => {
                // keep the buffer and edit mode so the user can retry
                error!("Failed to save entry for {}: {}", key, e);
                self.set_status_message(format!("Failed to save entry: {}", e));
            }
        }
    }

    pub fn request_delete_entry(&mut self) {
        if let Some(entry) = self.diary.entry.clone() {
            self.modals.delete_confirmation = Some(DeleteTarget::Entry(entry));
            self.modals.delete_modal_selection = 1; // default to Cancel
        } else {
            self.set_status_message("No entry to delete".to_string());
        }
    }

    // --- Board ---

    pub fn lane_len(&self, lane: Status) -> usize {
        board::lane_todos(&self.todos, lane).len()
    }

    pub fn selected_todo(&self) -> Option<&Todo> {
        let lane = self.board.focused_lane;
        let index = self.board.selected[lane_index(lane)];
        board::lane_todos(&self.todos, lane).get(index).copied()
    }

    fn clamp_board_selection(&mut self) {
        for lane in Status::ALL {
            let len = self.lane_len(lane);
            let cursor = &mut self.board.selected[lane_index(lane)];
            if len == 0 {
                *cursor = 0;
            } else if *cursor >= len {
                *cursor = len - 1;
            }
        }
    }

    pub fn focus_lane_left(&mut self) {
        let lane = match self.board.focused_lane {
            Status::Todo => Status::Todo,
            Status::InProgress => Status::Todo,
            Status::Done => Status::InProgress,
        };
        self.board.focused_lane = lane;
    }

    pub fn focus_lane_right(&mut self) {
        let lane = match self.board.focused_lane {
            Status::Todo => Status::InProgress,
            Status::InProgress => Status::Done,
            Status::Done => Status::Done,
        };
        self.board.focused_lane = lane;
    }

    pub fn move_board_cursor_up(&mut self) {
        let cursor = &mut self.board.selected[lane_index(self.board.focused_lane)];
        *cursor = cursor.saturating_sub(1);
    }

    pub fn move_board_cursor_down(&mut self) {
        let len = self.lane_len(self.board.focused_lane);
        let cursor = &mut self.board.selected[lane_index(self.board.focused_lane)];
        if len > 0 && *cursor + 1 < len {
            *cursor += 1;
        }
    }

    pub fn open_new_card(&mut self) {
        if self.is_degraded() {
            self.set_status_message("Board is disabled: no database available".to_string());
            return;
        }
        self.form = Some(CardForm::new());
        self.ui.mode = Mode::EditCard;
    }

    pub fn open_edit_card(&mut self) {
        if self.is_degraded() {
            self.set_status_message("Board is disabled: no database available".to_string());
            return;
        }
        if let Some(todo) = self.selected_todo() {
            self.form = Some(CardForm::for_todo(todo));
            self.ui.mode = Mode::EditCard;
        } else {
            self.set_status_message("No card selected".to_string());
        }
    }

    pub fn cancel_card_form(&mut self) {
        self.form = None;
        self.ui.mode = Mode::View;
    }

    /// Persist the card form: insert for new cards, update for existing.
    /// A blank title is rejected locally without touching the store.
    pub fn save_card(&mut self) {
        let Some(form) = &self.form else {
            return;
        };

        if form.title.is_blank() {
            self.set_status_message("Title cannot be empty".to_string());
            return;
        }

        let Some(db) = &self.database else {
            self.set_status_message("Board is disabled: no database available".to_string());
            return;
        };

        let title = form.title.content().trim().to_string();
        let description = {
            let text = form.description.content();
            if text.trim().is_empty() {
                None
            } else {
                Some(text)
            }
        };

        let editing = form.editing_id.is_some();
        let result = match form.editing_id {
            Some(id) => match self.todos.iter().find(|t| t.id == Some(id)) {
                Some(existing) => {
                    let mut todo = existing.clone();
                    todo.title = title;
                    todo.description = description;
                    db.update_todo(&todo)
                }
                None => Err(crate::database::DatabaseError::MissingId),
            },
            None => {
                let mut todo = Todo::new(title);
                todo.description = description;
                db.insert_todo(&todo).map(|_| ())
            }
        };

        match result {
            Ok(()) => {
                let verb = if editing { "updated" } else { "created" };
                self.set_status_message(format!("Card {}", verb));
                self.form = None;
                self.ui.mode = Mode::View;
            }
            Err(e) => {
                error!("Failed to save card: {}", e);
                self.set_status_message(format!("Failed to save card: {}", e));
            }
        }

        self.load_todos();
    }

    pub fn request_delete_card(&mut self) {
        if let Some(todo) = self.selected_todo().cloned() {
            self.modals.delete_confirmation = Some(DeleteTarget::Card(todo));
            self.modals.delete_modal_selection = 1; // default to Cancel
        } else {
            self.set_status_message("No card selected".to_string());
        }
    }

    /// Manual lane transition (no grab involved): persist and refetch
    pub fn set_selected_status(&mut self, status: Status) {
        let Some(id) = self.selected_todo().and_then(|t| t.id) else {
            self.set_status_message("No card selected".to_string());
            return;
        };

        if self.selected_todo().map(|t| t.status) == Some(status) {
            return;
        }

        self.persist_status(id, status);
        self.load_todos();
    }

    fn persist_status(&mut self, id: i64, status: Status) {
        let Some(db) = &self.database else {
            self.set_status_message("Board is disabled: no database available".to_string());
            return;
        };
        if let Err(e) = db.update_todo_status(id, status) {
            error!("Failed to update card status: {}", e);
            self.set_status_message(format!("Failed to update card status: {}", e));
        }
    }

    // --- Grab-and-move ---

    /// Grab the selected card, opening a drag session
    pub fn start_drag(&mut self) {
        if self.is_degraded() {
            self.set_status_message("Board is disabled: no database available".to_string());
            return;
        }
        match self.selected_todo() {
            Some(todo) => {
                if let Some(id) = todo.id {
                    self.board.drag = Some(DragSession::start(id, todo.status));
                }
            }
            None => self.set_status_message("No card to grab".to_string()),
        }
    }

    /// The lane the grabbed card currently sits in (its preview lane)
    pub fn drag_lane(&self) -> Option<Status> {
        let drag = self.board.drag?;
        self.todos
            .iter()
            .find(|t| t.id == Some(drag.todo_id))
            .map(|t| t.status)
    }

    /// Move the grabbed card over an adjacent lane, previewing the move
    /// in memory only
    pub fn drag_to_lane_left(&mut self) {
        if let Some(lane) = self.drag_lane() {
            let target = match lane {
                Status::Todo => Status::Todo,
                Status::InProgress => Status::Todo,
                Status::Done => Status::InProgress,
            };
            self.drag_over(DropTarget::Lane(target));
        }
    }

    pub fn drag_to_lane_right(&mut self) {
        if let Some(lane) = self.drag_lane() {
            let target = match lane {
                Status::Todo => Status::InProgress,
                Status::InProgress => Status::Done,
                Status::Done => Status::Done,
            };
            self.drag_over(DropTarget::Lane(target));
        }
    }

    /// Hover the next or previous card in the preview lane. The lane
    /// does not change (a same-lane card hover is a no-op for the list),
    /// but the hovered card becomes the pending drop target.
    pub fn drag_hover_card(&mut self, step: isize) {
        let Some(drag) = self.board.drag else {
            return;
        };
        let Some(lane) = self.drag_lane() else {
            return;
        };
        let others: Vec<i64> = board::lane_todos(&self.todos, lane)
            .iter()
            .filter_map(|t| t.id)
            .filter(|id| *id != drag.todo_id)
            .collect();
        if others.is_empty() {
            return;
        }

        let current = match drag.over {
            Some(DropTarget::Card(id)) => others.iter().position(|&o| o == id),
            _ => None,
        };
        let next = match current {
            Some(i) => (i as isize + step).rem_euclid(others.len() as isize) as usize,
            None if step >= 0 => 0,
            None => others.len() - 1,
        };
        self.drag_over(DropTarget::Card(others[next]));
    }

    /// Hover a specific target, recording it as the pending drop target
    pub fn drag_over(&mut self, target: DropTarget) {
        let Some(drag) = &mut self.board.drag else {
            return;
        };
        drag.over = Some(target);
        let active_id = drag.todo_id;
        board::drag_over(&mut self.todos, active_id, target);
        if let Some(lane) = board::target_lane(&self.todos, target) {
            self.board.focused_lane = lane;
        }
        self.clamp_board_selection();
    }

    /// Drop the grabbed card. The final lane resolves with the same rule
    /// as hovering; dropping into the origin lane skips the write. Every
    /// path ends in a refetch, so a failed write simply rolls back.
    pub fn end_drag(&mut self) {
        let Some(drag) = self.board.drag.take() else {
            return;
        };

        match board::resolve_drop(&self.todos, drag.over) {
            Some(final_lane) if final_lane != drag.origin => {
                self.persist_status(drag.todo_id, final_lane);
            }
            _ => {} // no valid target, or dropped back home: nothing to write
        }

        self.load_todos();
    }

    /// Abandon the grab, discarding the in-memory preview by refetching
    pub fn cancel_drag(&mut self) {
        if self.board.drag.take().is_some() {
            self.load_todos();
        }
    }

    // --- Delete confirmation modal ---

    pub fn confirm_delete(&mut self) {
        let Some(target) = self.modals.delete_confirmation.take() else {
            return;
        };
        self.modals.delete_modal_selection = 1;

        let Some(db) = &self.database else {
            self.set_status_message("No database available".to_string());
            return;
        };

        match target {
            DeleteTarget::Entry(entry) => {
                let result = entry
                    .id
                    .ok_or(crate::database::DatabaseError::MissingId)
                    .and_then(|id| db.delete_entry(id));
                match result {
                    Ok(()) => self.set_status_message("Entry deleted".to_string()),
                    Err(e) => {
                        error!("Failed to delete entry: {}", e);
                        self.set_status_message(format!("Failed to delete entry: {}", e));
                    }
                }
                self.load_entry_dates();
                self.load_entry();
            }
            DeleteTarget::Card(todo) => {
                let result = todo
                    .id
                    .ok_or(crate::database::DatabaseError::MissingId)
                    .and_then(|id| db.delete_todo(id));
                match result {
                    Ok(()) => self.set_status_message("Card deleted".to_string()),
                    Err(e) => {
                        error!("Failed to delete card: {}", e);
                        self.set_status_message(format!("Failed to delete card: {}", e));
                    }
                }
                self.load_todos();
            }
        }
    }

    pub fn cancel_delete(&mut self) {
        self.modals.delete_confirmation = None;
        self.modals.delete_modal_selection = 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::lane_counts;

    fn test_app() -> App {
        let db = Database::new(":memory:").unwrap();
        App::new(Config::default(), Some(db))
    }

    fn add_card(app: &mut App, title: &str) {
        app.open_new_card();
        let form = app.form.as_mut().unwrap();
        for ch in title.chars() {
            form.title.insert_char(ch);
        }
        app.save_card();
    }

    #[test]
    fn starts_on_diary_tab_with_today_selected() {
        let app = test_app();
        assert_eq!(app.ui.current_tab, Tab::Diary);
        assert_eq!(app.diary.selected_date, today());
        assert!(app.todos.is_empty());
    }

    #[test]
    fn blank_entry_is_rejected_without_a_write() {
        let mut app = test_app();
        app.start_edit_entry();
        app.diary.editor = Editor::from_string("   \n  ");
        app.save_entry();

        assert_eq!(app.ui.mode, Mode::EditEntry);
        assert!(app.status.message.is_some());
        assert!(app.diary.entry_dates.is_empty());
    }

    #[test]
    fn saving_twice_keeps_one_entry_per_date() {
        let mut app = test_app();
        app.start_edit_entry();
        app.diary.editor = Editor::from_string("first draft");
        app.save_entry();
        assert_eq!(app.diary.entry_dates.len(), 1);
        assert_eq!(app.diary.entry.as_ref().unwrap().content, "first draft");

        app.start_edit_entry();
        app.diary.editor = Editor::from_string("second draft");
        app.save_entry();
        assert_eq!(app.diary.entry_dates.len(), 1);
        assert_eq!(app.diary.entry.as_ref().unwrap().content, "second draft");
    }

    #[test]
    fn failed_save_keeps_the_unsaved_buffer() {
        let mut app = test_app();
        app.start_edit_entry();
        app.diary.editor = Editor::from_string("old text");
        app.save_entry();
        assert_eq!(app.ui.mode, Mode::View);

        // stale view of the store: the save takes the insert path and
        // hits the UNIQUE date constraint
        app.start_edit_entry();
        app.diary.entry = None;
        app.diary.editor = Editor::from_string("unsaved new text");
        app.save_entry();

        assert_eq!(app.ui.mode, Mode::EditEntry);
        assert_eq!(app.diary.editor.content(), "unsaved new text");
        assert!(app.status.message.as_deref().unwrap().contains("Failed"));

        // the stored row is untouched
        let db = app.database.as_ref().unwrap();
        let key = date_key(today());
        assert_eq!(db.get_entry_by_date(&key).unwrap().unwrap().content, "old text");
    }

    #[test]
    fn selecting_another_date_loads_its_entry() {
        let mut app = test_app();
        app.start_edit_entry();
        app.diary.editor = Editor::from_string("today's note");
        app.save_entry();

        app.move_selected_date(1);
        assert!(app.diary.entry.is_none());
        assert!(app.diary.editor.is_blank());

        app.move_selected_date(-1);
        assert_eq!(app.diary.entry.as_ref().unwrap().content, "today's note");
    }

    #[test]
    fn out_of_month_selection_keeps_the_visible_month() {
        let mut app = test_app();
        let march = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        app.diary.visible_month = march;

        // Feb 25 2024 sits in the first displayed week of March 2024
        app.select_date(NaiveDate::from_ymd_opt(2024, 2, 25).unwrap());
        assert_eq!(app.diary.visible_month, march);

        // a date outside the grid moves the calendar to its month
        app.select_date(NaiveDate::from_ymd_opt(2024, 6, 15).unwrap());
        assert_eq!(
            app.diary.visible_month,
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
        );
    }

    #[test]
    fn card_with_blank_title_is_rejected() {
        let mut app = test_app();
        app.open_new_card();
        app.save_card();
        assert!(app.todos.is_empty());
        assert_eq!(app.ui.mode, Mode::EditCard); // form stays open
    }

    #[test]
    fn new_cards_start_in_the_todo_lane() {
        let mut app = test_app();
        add_card(&mut app, "Buy milk");
        assert_eq!(lane_counts(&app.todos), [1, 0, 0]);
        assert_eq!(app.ui.mode, Mode::View);
    }

    #[test]
    fn grab_and_drop_moves_a_card_across_lanes() {
        let mut app = test_app();
        add_card(&mut app, "Buy milk");
        assert_eq!(lane_counts(&app.todos), [1, 0, 0]);

        app.board.focused_lane = Status::Todo;
        app.start_drag();
        assert!(app.board.drag.is_some());

        app.drag_to_lane_right();
        // preview is visible before the drop
        assert_eq!(lane_counts(&app.todos), [0, 1, 0]);

        app.drag_to_lane_right();
        app.end_drag();
        assert_eq!(lane_counts(&app.todos), [0, 0, 1]);

        // survived the refetch, so it was persisted
        let db = app.database.as_ref().unwrap();
        let stored = db.get_all_todos().unwrap();
        assert_eq!(stored[0].status, Status::Done);
    }

    #[test]
    fn drop_without_a_target_writes_nothing() {
        let mut app = test_app();
        add_card(&mut app, "Buy milk");

        app.start_drag();
        app.end_drag(); // never hovered anything

        assert_eq!(lane_counts(&app.todos), [1, 0, 0]);
    }

    #[test]
    fn failed_drop_persistence_rolls_back_to_the_stored_lane() {
        let mut app = test_app();
        add_card(&mut app, "Buy milk");

        // writes now fail, reads still work
        app.database.as_ref().unwrap().set_query_only(true).unwrap();

        app.start_drag();
        app.drag_to_lane_right();
        assert_eq!(lane_counts(&app.todos), [0, 1, 0]);

        app.end_drag();

        // the write failed, so the reconciling reload restored the last
        // persisted lane
        assert_eq!(lane_counts(&app.todos), [1, 0, 0]);
        assert_eq!(app.todos[0].status, Status::Todo);
        assert!(app.board.drag.is_none());
        assert!(app.status.message.as_deref().unwrap().contains("Failed"));
    }

    #[test]
    fn cancelling_a_drag_discards_the_preview() {
        let mut app = test_app();
        add_card(&mut app, "Buy milk");

        app.start_drag();
        app.drag_to_lane_right();
        assert_eq!(lane_counts(&app.todos), [0, 1, 0]);

        app.cancel_drag();
        assert!(app.board.drag.is_none());
        assert_eq!(lane_counts(&app.todos), [1, 0, 0]);
    }

    #[test]
    fn dropping_back_into_the_origin_lane_is_a_no_op() {
        let mut app = test_app();
        add_card(&mut app, "Buy milk");
        let before = app.todos[0].updated_at.clone();

        app.start_drag();
        app.drag_to_lane_right();
        app.drag_to_lane_left();
        app.end_drag();

        assert_eq!(lane_counts(&app.todos), [1, 0, 0]);
        assert_eq!(app.todos[0].updated_at, before);
    }

    #[test]
    fn manual_lane_transition_persists() {
        let mut app = test_app();
        add_card(&mut app, "Buy milk");

        app.set_selected_status(Status::InProgress);
        assert_eq!(lane_counts(&app.todos), [0, 1, 0]);

        let db = app.database.as_ref().unwrap();
        assert_eq!(db.get_all_todos().unwrap()[0].status, Status::InProgress);
    }

    #[test]
    fn editing_a_card_updates_it_in_place() {
        let mut app = test_app();
        add_card(&mut app, "Buy milk");

        app.open_edit_card();
        let form = app.form.as_mut().unwrap();
        form.title = Editor::from_string("Buy oat milk");
        app.save_card();

        assert_eq!(app.todos.len(), 1);
        assert_eq!(app.todos[0].title, "Buy oat milk");
    }

    #[test]
    fn delete_modal_defaults_to_cancel() {
        let mut app = test_app();
        add_card(&mut app, "Buy milk");

        app.request_delete_card();
        assert_eq!(app.modals.delete_modal_selection, 1);

        app.cancel_delete();
        assert_eq!(app.todos.len(), 1);

        app.request_delete_card();
        app.confirm_delete();
        assert!(app.todos.is_empty());
    }

    #[test]
    fn degraded_mode_disables_actions_without_panicking() {
        let mut app = App::new(Config::default(), None);
        assert!(app.is_degraded());
        assert!(app.status.message.is_some());

        app.start_edit_entry();
        assert_eq!(app.ui.mode, Mode::View);

        app.open_new_card();
        assert!(app.form.is_none());

        app.start_drag();
        assert!(app.board.drag.is_none());

        app.reload();
        app.save_entry();
        assert!(app.todos.is_empty());
    }

    #[test]
    fn board_cursor_clamps_after_deletes() {
        let mut app = test_app();
        add_card(&mut app, "one");
        add_card(&mut app, "two");
        add_card(&mut app, "three");

        app.move_board_cursor_down();
        app.move_board_cursor_down();
        assert_eq!(app.board.selected[0], 2);

        app.request_delete_card();
        app.confirm_delete();
        assert_eq!(app.board.selected[0], 1);
    }
}
