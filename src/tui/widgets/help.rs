use ratatui::layout::{Alignment, Constraint, Flex, Layout, Rect};
use ratatui::style::Style;
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

use crate::tui::widgets::color::parse_color;
use crate::utils::format_key_binding_for_display;
use crate::Config;

pub fn render_help(f: &mut Frame, area: Rect, config: &Config) {
    let active_theme = config.get_active_theme();
    let fg_color = parse_color(&active_theme.fg);
    let bg_color = parse_color(&active_theme.bg);

    let popup = popup_area(area, 60, 70);

    // Clear the background first so content does not show through
    f.render_widget(Clear, popup);

    let help_text = build_help_text(config);

    let paragraph = Paragraph::new(help_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Help - Key Bindings")
                .title_alignment(Alignment::Center)
                .style(Style::default().fg(fg_color).bg(bg_color)),
        )
        .style(Style::default().fg(fg_color).bg(bg_color))
        .wrap(ratatui::widgets::Wrap { trim: true });

    f.render_widget(paragraph, popup);
}

/// Centered rect taking a percentage of the available rect
/// Based on ratatui popup example: https://ratatui.rs/examples/apps/popup/
pub fn popup_area(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let vertical = Layout::vertical([Constraint::Percentage(percent_y)]).flex(Flex::Center);
    let horizontal = Layout::horizontal([Constraint::Percentage(percent_x)]).flex(Flex::Center);
    let [area] = vertical.areas(area);
    let [area] = horizontal.areas(area);
    area
}

fn build_help_text(config: &Config) -> String {
    let kb = &config.key_bindings;
    let mut text = String::new();

    text.push_str("Navigation:\n");
    text.push_str(&format!(
        "  {} / {}: Jump to Diary / Board tab\n",
        format_key_binding_for_display(&kb.tab_diary),
        format_key_binding_for_display(&kb.tab_board)
    ));
    text.push_str(&format!(
        "  {} / {} / {} / {}: Move around the calendar or board\n",
        format_key_binding_for_display(&kb.list_left),
        format_key_binding_for_display(&kb.list_down),
        format_key_binding_for_display(&kb.list_up),
        format_key_binding_for_display(&kb.list_right)
    ));
    text.push_str(&format!(
        "  {} / {}: Previous / next month\n",
        format_key_binding_for_display(&kb.prev_month),
        format_key_binding_for_display(&kb.next_month)
    ));
    text.push_str(&format!(
        "  {}: Jump to today (Diary tab)\n",
        format_key_binding_for_display(&kb.today)
    ));
    text.push('\n');

    text.push_str("Diary:\n");
    text.push_str(&format!(
        "  {}: Edit the entry for the selected day\n",
        format_key_binding_for_display(&kb.edit)
    ));
    text.push_str(&format!(
        "  {}: Save the entry\n",
        format_key_binding_for_display(&kb.save)
    ));
    text.push_str(&format!(
        "  {}: Delete the entry\n",
        format_key_binding_for_display(&kb.delete)
    ));
    text.push('\n');

    text.push_str("Board:\n");
    text.push_str(&format!(
        "  {}: New card\n",
        format_key_binding_for_display(&kb.new)
    ));
    text.push_str(&format!(
        "  {}: Edit the selected card\n",
        format_key_binding_for_display(&kb.edit)
    ));
    text.push_str(&format!(
        "  {}: Delete the selected card\n",
        format_key_binding_for_display(&kb.delete)
    ));
    text.push_str(&format!(
        "  {}: Grab the selected card\n",
        format_key_binding_for_display(&kb.grab)
    ));
    text.push_str("  While grabbed: move with the navigation keys,\n");
    text.push_str(&format!(
        "  {} drops the card, Esc cancels\n",
        format_key_binding_for_display(&kb.select)
    ));
    text.push_str(&format!(
        "  {} / {} / {}: Send card to To Do / In Progress / Done\n",
        format_key_binding_for_display(&kb.lane_todo),
        format_key_binding_for_display(&kb.lane_in_progress),
        format_key_binding_for_display(&kb.lane_done)
    ));
    text.push('\n');

    text.push_str("General:\n");
    text.push_str(&format!(
        "  {}: Quit\n",
        format_key_binding_for_display(&kb.quit)
    ));
    text.push_str(&format!(
        "  {}: Show/hide help\n",
        format_key_binding_for_display(&kb.help)
    ));

    text
}
