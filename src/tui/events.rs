use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, size as terminal_size, EnterAlternateScreen,
    LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;
use ratatui::Terminal;
use std::io;

use crate::models::Status;
use crate::tui::app::{CardField, Mode, Tab};
use crate::tui::error::TuiError;
use crate::tui::layout::Layout;
use crate::tui::App;
use crate::utils::{has_primary_modifier, parse_key_binding};

/// Guard that ensures terminal state is restored even on panic.
/// If the terminal is left in raw mode or the alternate screen, the
/// user's shell is unusable afterwards.
struct TerminalGuard {
    raw_mode_enabled: bool,
    alternate_screen_enabled: bool,
}

impl TerminalGuard {
    fn new() -> Result<Self, TuiError> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;

        Ok(Self {
            raw_mode_enabled: true,
            alternate_screen_enabled: true,
        })
    }

    /// Manually restore terminal state (called on normal exit).
    /// After calling this, the guard does nothing on drop.
    fn restore(&mut self) -> Result<(), TuiError> {
        if self.raw_mode_enabled {
            disable_raw_mode()?;
            self.raw_mode_enabled = false;
        }
        if self.alternate_screen_enabled {
            execute!(io::stdout(), LeaveAlternateScreen)?;
            self.alternate_screen_enabled = false;
        }
        Ok(())
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        // Ignore errors, we are already in a cleanup path
        if self.raw_mode_enabled {
            let _ = disable_raw_mode();
        }
        if self.alternate_screen_enabled {
            let _ = execute!(io::stdout(), LeaveAlternateScreen);
        }
    }
}

pub fn run_event_loop(mut app: App) -> Result<(), TuiError> {
    // Check terminal size before entering the alternate screen so the
    // error message lands in the normal terminal
    let (width, height) = terminal_size()?;
    let min_width = Layout::MIN_WIDTH + 2;
    let min_height = Layout::MIN_HEIGHT + 2;
    if width < min_width || height < min_height {
        return Err(TuiError::RenderError(format!(
            "Terminal size too small. Current: {}x{}, minimum required: {}x{}. Please resize your terminal window.",
            width, height, min_width, min_height
        )));
    }

    let mut guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)?;

    loop {
        app.check_status_message_timeout();

        let size = terminal.size()?;
        let terminal_rect = Rect::new(0, 0, size.width, size.height);
        terminal.draw(|f| {
            let layout = Layout::calculate(terminal_rect, app.ui.current_tab);
            crate::tui::render::render(f, &mut app, &layout);
        })?;

        if event::poll(std::time::Duration::from_millis(16))? {
            match event::read()? {
                Event::Key(key_event) => {
                    // Only Press events: Release would double-process on
                    // Windows
                    if key_event.kind == KeyEventKind::Press
                        && handle_key_event(&mut app, key_event)
                    {
                        break;
                    }
                }
                Event::Resize(_, _) => {
                    // Layout is recalculated on the next draw
                }
                _ => {}
            }
        }
    }

    guard.restore()?;

    Ok(())
}

fn matches_binding(key_event: &KeyEvent, binding: &str) -> bool {
    match parse_key_binding(binding) {
        Ok(parsed) => {
            key_event.code == parsed.key_code
                && parsed.requires_ctrl == has_primary_modifier(key_event.modifiers)
        }
        Err(_) => false,
    }
}

/// Returns true when the app should quit
fn handle_key_event(app: &mut App, key_event: KeyEvent) -> bool {
    if app.modals.delete_confirmation.is_some() {
        handle_delete_modal(app, key_event);
        return false;
    }

    match app.ui.mode {
        Mode::Help => {
            let help = app.config.key_bindings.help.clone();
            if key_event.code == KeyCode::Esc || matches_binding(&key_event, &help) {
                app.ui.mode = Mode::View;
            }
            false
        }
        Mode::EditEntry => {
            handle_entry_edit(app, key_event);
            false
        }
        Mode::EditCard => {
            handle_card_edit(app, key_event);
            false
        }
        Mode::View => handle_view_mode(app, key_event),
    }
}

fn handle_delete_modal(app: &mut App, key_event: KeyEvent) {
    match key_event.code {
        KeyCode::Up | KeyCode::Down | KeyCode::Char('j') | KeyCode::Char('k') => {
            // Two options, so any step toggles
            app.modals.delete_modal_selection = 1 - app.modals.delete_modal_selection;
        }
        KeyCode::Enter => {
            if app.modals.delete_modal_selection == 0 {
                app.confirm_delete();
            } else {
                app.cancel_delete();
            }
        }
        KeyCode::Esc => app.cancel_delete(),
        _ => {}
    }
}

fn handle_entry_edit(app: &mut App, key_event: KeyEvent) {
    let save = app.config.key_bindings.save.clone();
    if matches_binding(&key_event, &save) {
        app.save_entry();
        return;
    }

    match key_event.code {
        KeyCode::Esc => app.cancel_edit_entry(),
        KeyCode::Enter => app.diary.editor.insert_newline(),
        KeyCode::Backspace => app.diary.editor.delete_char(),
        KeyCode::Up => app.diary.editor.move_cursor_up(),
        KeyCode::Down => app.diary.editor.move_cursor_down(),
        KeyCode::Left => app.diary.editor.move_cursor_left(),
        KeyCode::Right => app.diary.editor.move_cursor_right(),
        KeyCode::Home => app.diary.editor.move_to_line_start(),
        KeyCode::End => app.diary.editor.move_to_line_end(),
        KeyCode::Char(c) if !has_primary_modifier(key_event.modifiers) => {
            app.diary.editor.insert_char(c);
        }
        _ => {}
    }
}

fn handle_card_edit(app: &mut App, key_event: KeyEvent) {
    let save = app.config.key_bindings.save.clone();
    if matches_binding(&key_event, &save) {
        app.save_card();
        return;
    }

    match key_event.code {
        KeyCode::Esc => {
            app.cancel_card_form();
            return;
        }
        _ => {}
    }

    let Some(form) = &mut app.form else {
        return;
    };

    match key_event.code {
        KeyCode::Tab | KeyCode::BackTab => {
            form.current_field = match form.current_field {
                CardField::Title => CardField::Description,
                CardField::Description => CardField::Title,
            };
        }
        // Enter advances out of the single-line title field
        KeyCode::Enter if form.current_field == CardField::Title => {
            form.current_field = CardField::Description;
        }
        KeyCode::Enter => form.current_editor_mut().insert_newline(),
        KeyCode::Backspace => form.current_editor_mut().delete_char(),
        KeyCode::Up => form.current_editor_mut().move_cursor_up(),
        KeyCode::Down => form.current_editor_mut().move_cursor_down(),
        KeyCode::Left => form.current_editor_mut().move_cursor_left(),
        KeyCode::Right => form.current_editor_mut().move_cursor_right(),
        KeyCode::Home => form.current_editor_mut().move_to_line_start(),
        KeyCode::End => form.current_editor_mut().move_to_line_end(),
        KeyCode::Char(c) if !has_primary_modifier(key_event.modifiers) => {
            form.current_editor_mut().insert_char(c);
        }
        _ => {}
    }
}

/// Returns true when the app should quit
fn handle_view_mode(app: &mut App, key_event: KeyEvent) -> bool {
    let kb = app.config.key_bindings.clone();

    // A grab takes over the board keys entirely
    if app.board.drag.is_some() {
        handle_drag_keys(app, key_event, &kb);
        return false;
    }

    if matches_binding(&key_event, &kb.quit) {
        return true;
    }
    if matches_binding(&key_event, &kb.help) {
        app.ui.mode = Mode::Help;
        return false;
    }
    if matches_binding(&key_event, &kb.tab_diary) {
        app.switch_tab(Tab::Diary);
        return false;
    }
    if matches_binding(&key_event, &kb.tab_board) {
        app.switch_tab(Tab::Board);
        return false;
    }

    match app.ui.current_tab {
        Tab::Diary => handle_diary_keys(app, key_event, &kb),
        Tab::Board => handle_board_keys(app, key_event, &kb),
    }

    false
}

fn handle_diary_keys(app: &mut App, key_event: KeyEvent, kb: &crate::config::KeyBindings) {
    if matches_binding(&key_event, &kb.edit)
        || matches_binding(&key_event, &kb.new)
        || matches_binding(&key_event, &kb.select)
    {
        app.start_edit_entry();
    } else if matches_binding(&key_event, &kb.delete) {
        app.request_delete_entry();
    } else if matches_binding(&key_event, &kb.prev_month) {
        app.goto_prev_month();
    } else if matches_binding(&key_event, &kb.next_month) {
        app.goto_next_month();
    } else if matches_binding(&key_event, &kb.today) {
        app.goto_today();
    } else if matches_binding(&key_event, &kb.list_left) || key_event.code == KeyCode::Left {
        app.move_selected_date(-1);
    } else if matches_binding(&key_event, &kb.list_right) || key_event.code == KeyCode::Right {
        app.move_selected_date(1);
    } else if matches_binding(&key_event, &kb.list_up) || key_event.code == KeyCode::Up {
        app.move_selected_date(-7);
    } else if matches_binding(&key_event, &kb.list_down) || key_event.code == KeyCode::Down {
        app.move_selected_date(7);
    }
}

fn handle_board_keys(app: &mut App, key_event: KeyEvent, kb: &crate::config::KeyBindings) {
    if matches_binding(&key_event, &kb.new) {
        app.open_new_card();
    } else if matches_binding(&key_event, &kb.edit) || matches_binding(&key_event, &kb.select) {
        app.open_edit_card();
    } else if matches_binding(&key_event, &kb.delete) {
        app.request_delete_card();
    } else if matches_binding(&key_event, &kb.grab) {
        app.start_drag();
    } else if matches_binding(&key_event, &kb.lane_todo) {
        app.set_selected_status(Status::Todo);
    } else if matches_binding(&key_event, &kb.lane_in_progress) {
        app.set_selected_status(Status::InProgress);
    } else if matches_binding(&key_event, &kb.lane_done) {
        app.set_selected_status(Status::Done);
    } else if matches_binding(&key_event, &kb.list_left) || key_event.code == KeyCode::Left {
        app.focus_lane_left();
    } else if matches_binding(&key_event, &kb.list_right) || key_event.code == KeyCode::Right {
        app.focus_lane_right();
    } else if matches_binding(&key_event, &kb.list_up) || key_event.code == KeyCode::Up {
        app.move_board_cursor_up();
    } else if matches_binding(&key_event, &kb.list_down) || key_event.code == KeyCode::Down {
        app.move_board_cursor_down();
    }
}

fn handle_drag_keys(app: &mut App, key_event: KeyEvent, kb: &crate::config::KeyBindings) {
    if matches_binding(&key_event, &kb.select) || matches_binding(&key_event, &kb.grab) {
        app.end_drag();
    } else if key_event.code == KeyCode::Esc {
        app.cancel_drag();
    } else if matches_binding(&key_event, &kb.list_left) || key_event.code == KeyCode::Left {
        app.drag_to_lane_left();
    } else if matches_binding(&key_event, &kb.list_right) || key_event.code == KeyCode::Right {
        app.drag_to_lane_right();
    } else if matches_binding(&key_event, &kb.list_up) || key_event.code == KeyCode::Up {
        app.drag_hover_card(-1);
    } else if matches_binding(&key_event, &kb.list_down) || key_event.code == KeyCode::Down {
        app.drag_hover_card(1);
    }
}
