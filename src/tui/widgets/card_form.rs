use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

use crate::tui::app::{CardField, CardForm};
use crate::tui::widgets::color::parse_color;
use crate::tui::widgets::editor::Editor;
use crate::tui::widgets::help::popup_area;
use crate::Config;

/// Render the card create/edit form as a centered popup with a title
/// field and a multi-line description field.
pub fn render_card_form(f: &mut Frame, area: Rect, form: &mut CardForm, config: &Config) {
    let active_theme = config.get_active_theme();
    let fg_color = parse_color(&active_theme.fg);
    let bg_color = parse_color(&active_theme.bg);
    let highlight_bg = parse_color(&active_theme.highlight_bg);

    let popup = popup_area(area, 60, 60);
    f.render_widget(Clear, popup);

    let outer_title = if form.editing_id.is_some() {
        "Edit Card"
    } else {
        "New Card"
    };
    let outer = Block::default()
        .borders(Borders::ALL)
        .title(outer_title)
        .style(Style::default().fg(fg_color).bg(bg_color));
    let inner = outer.inner(popup);
    f.render_widget(outer, popup);

    let fields = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(3)])
        .split(inner);

    let field_block = |label: &str, active: bool| {
        let border_style = if active {
            Style::default()
                .fg(highlight_bg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(fg_color)
        };
        Block::default()
            .borders(Borders::ALL)
            .title(label.to_string())
            .border_style(border_style)
            .style(Style::default().fg(fg_color).bg(bg_color))
    };

    let title_active = form.current_field == CardField::Title;
    render_field(
        f,
        fields[0],
        &mut form.title,
        field_block("Title", title_active),
        title_active,
        fg_color,
        bg_color,
    );
    render_field(
        f,
        fields[1],
        &mut form.description,
        field_block("Description", !title_active),
        !title_active,
        fg_color,
        bg_color,
    );
}

fn render_field(
    f: &mut Frame,
    area: Rect,
    editor: &mut Editor,
    block: Block,
    active: bool,
    fg: ratatui::style::Color,
    bg: ratatui::style::Color,
) {
    let viewport_height = area.height.saturating_sub(2) as usize;
    editor.update_scroll(viewport_height);

    let text = editor
        .lines
        .iter()
        .skip(editor.scroll_offset)
        .take(viewport_height.max(1))
        .cloned()
        .collect::<Vec<_>>()
        .join("\n");

    let paragraph = Paragraph::new(text)
        .block(block)
        .style(Style::default().fg(fg).bg(bg));
    f.render_widget(paragraph, area);

    if active {
        let cursor_y = editor.cursor_line.saturating_sub(editor.scroll_offset) as u16;
        f.set_cursor_position((
            area.x + 1 + editor.cursor_col as u16,
            area.y + 1 + cursor_y,
        ));
    }
}
