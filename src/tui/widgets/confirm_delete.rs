use ratatui::layout::{Alignment, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

use crate::tui::app::DeleteTarget;
use crate::tui::widgets::color::parse_color;
use crate::tui::widgets::help::popup_area;
use crate::Config;

pub fn render_confirm_delete(
    f: &mut Frame,
    area: Rect,
    target: &DeleteTarget,
    selection: usize,
    config: &Config,
) {
    let active_theme = config.get_active_theme();
    let fg_color = parse_color(&active_theme.fg);
    let bg_color = parse_color(&active_theme.bg);
    let highlight_bg = parse_color(&active_theme.highlight_bg);
    let highlight_fg = parse_color(&active_theme.highlight_fg);

    let popup = popup_area(area, 50, 35);

    // Clear the background first so content does not show through
    f.render_widget(Clear, popup);

    let (kind, name) = match target {
        DeleteTarget::Entry(entry) => ("diary entry", entry.date.clone()),
        DeleteTarget::Card(todo) => ("card", todo.title.clone()),
    };

    let mut lines = Vec::new();
    lines.push(Line::from(Span::styled(
        format!("Delete this {}?", kind),
        Style::default().fg(fg_color).bg(bg_color),
    )));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        name,
        Style::default().fg(fg_color).bg(bg_color),
    )));
    lines.push(Line::from(""));

    let options = ["Delete", "Cancel"];
    for (index, option) in options.iter().enumerate() {
        let is_selected = index == selection;
        let prefix = if is_selected { "> " } else { "  " };
        let style = if is_selected {
            Style::default().fg(highlight_fg).bg(highlight_bg)
        } else {
            Style::default().fg(fg_color).bg(bg_color)
        };
        lines.push(Line::from(Span::styled(
            format!("{}{}", prefix, option),
            style,
        )));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Use ↑↓ to navigate, Enter to confirm, Esc to cancel",
        Style::default().fg(fg_color).bg(bg_color),
    )));

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Confirm Delete")
                .title_alignment(Alignment::Center)
                .style(Style::default().fg(fg_color).bg(bg_color)),
        )
        .style(Style::default().fg(fg_color).bg(bg_color))
        .wrap(ratatui::widgets::Wrap { trim: true })
        .alignment(Alignment::Center);

    f.render_widget(paragraph, popup);
}
