use ratatui::style::Style;
use ratatui::widgets::{Block, Borders};
use ratatui::Frame;

use crate::models::Status;
use crate::tui::app::{Mode, Tab};
use crate::tui::widgets::{
    board_view::render_lane, calendar_view::render_calendar, card_form::render_card_form,
    color::parse_color, confirm_delete::render_confirm_delete, diary_view::render_diary_entry,
    help::render_help, status_bar::render_status_bar, tabs::render_tabs,
};
use crate::tui::{App, Layout};
use crate::utils::format_key_binding_for_display;

pub fn render(f: &mut Frame, app: &mut App, layout: &Layout) {
    // Outer border with the app title centered in the top border
    let active_theme = app.config.get_active_theme();
    let fg_color = parse_color(&active_theme.fg);
    let bg_color = parse_color(&active_theme.bg);
    let outer_block = Block::default()
        .borders(Borders::ALL)
        .title("My Daily")
        .title_alignment(ratatui::layout::Alignment::Center)
        .style(Style::default().fg(fg_color).bg(bg_color));
    f.render_widget(outer_block, f.area());

    render_tabs(f, layout.tabs_area, app.ui.current_tab, &app.config);

    match app.ui.current_tab {
        Tab::Diary => {
            render_calendar(f, layout.left_area, app);
            render_diary_entry(f, layout.middle_area, app);
        }
        Tab::Board => {
            render_lane(f, layout.left_area, app, Status::Todo);
            render_lane(f, layout.middle_area, app, Status::InProgress);
            render_lane(f, layout.right_area, app, Status::Done);
        }
    }

    // Overlays render after normal content
    if app.ui.mode == Mode::EditCard {
        if let Some(form) = &mut app.form {
            render_card_form(f, f.area(), form, &app.config);
        }
    }

    if app.ui.mode == Mode::Help {
        render_help(f, f.area(), &app.config);
    }

    if let Some(target) = &app.modals.delete_confirmation {
        render_confirm_delete(
            f,
            f.area(),
            target,
            app.modals.delete_modal_selection,
            &app.config,
        );
    }

    let key_hints = get_key_hints(app);
    render_status_bar(
        f,
        layout.status_area,
        app.status.message.as_ref(),
        &key_hints,
        &app.config,
    );
}

fn get_key_hints(app: &App) -> Vec<String> {
    let kb = &app.config.key_bindings;

    if app.modals.delete_confirmation.is_some() {
        return vec!["↑/↓: Navigate".to_string(), "Enter: Confirm".to_string(), "Esc: Cancel".to_string()];
    }

    match app.ui.mode {
        Mode::Help => vec![format!(
            "Esc or {}: Exit help",
            format_key_binding_for_display(&kb.help)
        )],
        Mode::EditEntry => vec![
            format!("{}: Save", format_key_binding_for_display(&kb.save)),
            "Esc: Cancel".to_string(),
        ],
        Mode::EditCard => vec![
            "Tab: Next field".to_string(),
            format!("{}: Save", format_key_binding_for_display(&kb.save)),
            "Esc: Cancel".to_string(),
        ],
        Mode::View => {
            if app.board.drag.is_some() {
                return vec![
                    format!(
                        "{}/{}: Move between lanes",
                        format_key_binding_for_display(&kb.list_left),
                        format_key_binding_for_display(&kb.list_right)
                    ),
                    format!(
                        "{}: Drop",
                        format_key_binding_for_display(&kb.select)
                    ),
                    "Esc: Cancel".to_string(),
                ];
            }

            let mut hints = vec![
                format!("{}: Quit", format_key_binding_for_display(&kb.quit)),
                format!(
                    "{}/{}: Tabs",
                    format_key_binding_for_display(&kb.tab_diary),
                    format_key_binding_for_display(&kb.tab_board)
                ),
            ];

            match app.ui.current_tab {
                Tab::Diary => {
                    hints.push(format!(
                        "{}: Edit entry",
                        format_key_binding_for_display(&kb.edit)
                    ));
                    hints.push(format!(
                        "{}/{}: Month",
                        format_key_binding_for_display(&kb.prev_month),
                        format_key_binding_for_display(&kb.next_month)
                    ));
                    hints.push(format!(
                        "{}: Today",
                        format_key_binding_for_display(&kb.today)
                    ));
                }
                Tab::Board => {
                    hints.push(format!(
                        "{}: New card",
                        format_key_binding_for_display(&kb.new)
                    ));
                    hints.push(format!(
                        "{}: Grab",
                        format_key_binding_for_display(&kb.grab)
                    ));
                    hints.push(format!(
                        "{}: Delete",
                        format_key_binding_for_display(&kb.delete)
                    ));
                }
            }

            hints.push(format!(
                "{}: Help",
                format_key_binding_for_display(&kb.help)
            ));
            hints
        }
    }
}
