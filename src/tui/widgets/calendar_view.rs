use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::calendar::month_grid;
use crate::tui::app::App;
use crate::tui::widgets::color::parse_color;
use crate::utils::today;

/// Render the month grid. Weeks run Sunday through Saturday; days with
/// an entry carry a dot marker, the selected day is highlighted and
/// today is bold.
pub fn render_calendar(f: &mut Frame, area: Rect, app: &App) {
    let active_theme = app.config.get_active_theme();
    let fg_color = parse_color(&active_theme.fg);
    let bg_color = parse_color(&active_theme.bg);
    let highlight_bg = parse_color(&active_theme.highlight_bg);
    let highlight_fg = parse_color(&active_theme.highlight_fg);
    let dim_fg = parse_color(&active_theme.dim_fg);

    let title = app.diary.visible_month.format("%B %Y").to_string();

    let grid = month_grid(
        app.diary.visible_month,
        app.diary.selected_date,
        today(),
        &app.diary.entry_dates,
    );

    let mut lines = Vec::with_capacity(grid.len() + 1);
    lines.push(Line::from(Span::styled(
        " Su  Mo  Tu  We  Th  Fr  Sa",
        Style::default().fg(dim_fg),
    )));

    for week in &grid {
        let mut spans = Vec::with_capacity(week.len());
        for cell in week {
            let marker = if cell.has_content { '.' } else { ' ' };
            let text = format!(" {:>2}{}", cell.date.format("%-d"), marker);

            let mut style = if cell.in_month {
                Style::default().fg(fg_color).bg(bg_color)
            } else {
                Style::default().fg(dim_fg).bg(bg_color)
            };
            if cell.today {
                style = style.add_modifier(Modifier::BOLD);
            }
            if cell.selected {
                style = style.fg(highlight_fg).bg(highlight_bg);
            }

            spans.push(Span::styled(text, style));
        }
        lines.push(Line::from(spans));
    }

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(title)
            .title_alignment(Alignment::Center)
            .style(Style::default().fg(fg_color).bg(bg_color)),
    );

    f.render_widget(paragraph, area);
}
