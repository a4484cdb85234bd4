use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::board::lane_todos;
use crate::models::Status;
use crate::tui::app::App;
use crate::tui::widgets::color::parse_color;

/// Render one board lane. The focused lane gets a bold border, the
/// selected card a highlight, and a grabbed card a marker.
pub fn render_lane(f: &mut Frame, area: Rect, app: &App, lane: Status) {
    let active_theme = app.config.get_active_theme();
    let fg_color = parse_color(&active_theme.fg);
    let bg_color = parse_color(&active_theme.bg);
    let highlight_bg = parse_color(&active_theme.highlight_bg);
    let highlight_fg = parse_color(&active_theme.highlight_fg);
    let dim_fg = parse_color(&active_theme.dim_fg);

    let cards = lane_todos(&app.todos, lane);
    let title = format!("{} ({})", lane.title(), cards.len());

    let focused = app.board.focused_lane == lane;
    let border_style = if focused {
        Style::default()
            .fg(highlight_bg)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(fg_color)
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(border_style)
        .style(Style::default().fg(fg_color).bg(bg_color));

    let lane_idx = match lane {
        Status::Todo => 0,
        Status::InProgress => 1,
        Status::Done => 2,
    };
    let cursor = app.board.selected[lane_idx];
    let dragged_id = app.board.drag.map(|d| d.todo_id);
    let inner_width = area.width.saturating_sub(2) as usize;

    let mut lines = Vec::with_capacity(cards.len());
    for (index, card) in cards.iter().enumerate() {
        let grabbed = card.id.is_some() && card.id == dragged_id;
        let selected = focused && index == cursor;

        let prefix = if grabbed { "◆ " } else { "  " };
        let mut text = format!("{}{}", prefix, card.title);
        if text.chars().count() > inner_width {
            text = text
                .chars()
                .take(inner_width.saturating_sub(1))
                .collect::<String>()
                + "…";
        }

        let style = if selected || grabbed {
            Style::default().fg(highlight_fg).bg(highlight_bg)
        } else {
            Style::default().fg(fg_color).bg(bg_color)
        };

        lines.push(Line::from(Span::styled(text, style)));

        // One-line description preview below the title, dimmed
        if selected {
            if let Some(description) = &card.description {
                if let Some(first) = description.lines().next() {
                    let mut preview = format!("    {}", first);
                    if preview.chars().count() > inner_width {
                        preview = preview.chars().take(inner_width).collect();
                    }
                    lines.push(Line::from(Span::styled(
                        preview,
                        Style::default().fg(dim_fg).bg(bg_color),
                    )));
                }
            }
        }
    }

    if cards.is_empty() {
        let hint = if app.is_degraded() {
            "disabled"
        } else {
            "empty"
        };
        lines.push(Line::from(Span::styled(
            format!("  ({})", hint),
            Style::default().fg(dim_fg).bg(bg_color),
        )));
    }

    let paragraph = Paragraph::new(lines).block(block);
    f.render_widget(paragraph, area);
}
