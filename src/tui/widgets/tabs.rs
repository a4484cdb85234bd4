use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Tabs;
use ratatui::Frame;

use crate::tui::app::Tab;
use crate::tui::widgets::color::parse_color;
use crate::Config;

pub fn render_tabs(f: &mut Frame, area: Rect, current_tab: Tab, config: &Config) {
    let active_theme = config.get_active_theme();
    let fg_color = parse_color(&active_theme.fg);
    let bg_color = parse_color(&active_theme.bg);
    let highlight_bg = parse_color(&active_theme.highlight_bg);
    let highlight_fg = parse_color(&active_theme.highlight_fg);
    let dim_fg = parse_color(&active_theme.dim_fg);

    let titles: Vec<Line> = vec![
        Line::from(Span::styled(" Diary ", Style::default().fg(dim_fg))),
        Line::from(Span::styled(" Board ", Style::default().fg(dim_fg))),
    ];

    let tab_index = match current_tab {
        Tab::Diary => 0,
        Tab::Board => 1,
    };

    let tabs = Tabs::new(titles)
        .select(tab_index)
        .style(Style::default().fg(fg_color).bg(bg_color))
        .highlight_style(
            Style::default()
                .fg(highlight_fg)
                .bg(highlight_bg)
                .add_modifier(Modifier::BOLD),
        )
        .divider(" ")
        .padding("", "");

    f.render_widget(tabs, area);
}
