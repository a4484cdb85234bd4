use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::tui::app::{App, Mode};
use crate::tui::widgets::color::parse_color;

/// Render the entry pane for the selected day. In edit mode the editor
/// buffer is shown with a live cursor; otherwise the stored entry.
pub fn render_diary_entry(f: &mut Frame, area: Rect, app: &mut App) {
    let active_theme = app.config.get_active_theme();
    let fg_color = parse_color(&active_theme.fg);
    let bg_color = parse_color(&active_theme.bg);
    let dim_fg = parse_color(&active_theme.dim_fg);

    let editing = app.ui.mode == Mode::EditEntry;
    let title = if editing {
        format!("{} (editing)", app.diary.selected_date.format("%Y-%m-%d"))
    } else {
        app.diary.selected_date.format("%Y-%m-%d").to_string()
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .style(Style::default().fg(fg_color).bg(bg_color));

    if editing {
        let viewport_height = area.height.saturating_sub(2) as usize;
        app.diary.editor.update_scroll(viewport_height);

        let editor = &app.diary.editor;
        let text = editor
            .lines
            .iter()
            .skip(editor.scroll_offset)
            .take(viewport_height)
            .cloned()
            .collect::<Vec<_>>()
            .join("\n");

        let paragraph = Paragraph::new(text)
            .block(block)
            .style(Style::default().fg(fg_color).bg(bg_color));
        f.render_widget(paragraph, area);

        // Place the terminal cursor at the editor cursor (inside the border)
        let cursor_y = editor.cursor_line.saturating_sub(editor.scroll_offset) as u16;
        f.set_cursor_position((
            area.x + 1 + editor.cursor_col as u16,
            area.y + 1 + cursor_y,
        ));
        return;
    }

    let paragraph = match &app.diary.entry {
        Some(entry) => Paragraph::new(entry.content.clone())
            .block(block)
            .style(Style::default().fg(fg_color).bg(bg_color))
            .wrap(ratatui::widgets::Wrap { trim: false }),
        None => {
            let hint = if app.is_degraded() {
                "Diary is disabled: no database available"
            } else {
                "No entry for this date. Press the edit key to write one."
            };
            Paragraph::new(hint)
                .block(block)
                .style(Style::default().fg(dim_fg).bg(bg_color))
                .wrap(ratatui::widgets::Wrap { trim: true })
        }
    };

    f.render_widget(paragraph, area);
}
