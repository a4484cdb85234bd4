use ratatui::layout::{Constraint, Direction, Layout as RatLayout, Rect};

use crate::tui::app::Tab;

pub struct Layout {
    pub inner_area: Rect, // Area inside the outer border
    pub tabs_area: Rect,
    /// Diary tab: the calendar pane. Board tab: the Todo lane.
    pub left_area: Rect,
    /// Diary tab: the entry pane. Board tab: the In Progress lane.
    pub middle_area: Rect,
    /// Board tab only: the Done lane (zero-width on the diary tab).
    pub right_area: Rect,
    pub status_area: Rect,
}

impl Layout {
    /// Minimum terminal dimensions required for the application
    /// Width: 60 columns fits the 7-column calendar plus the entry pane,
    /// and three readable board lanes
    /// Height: 16 lines (2 outer borders + 1 tabs + 1 status + 12 content,
    /// enough for a six-week month grid with its weekday header)
    pub const MIN_WIDTH: u16 = 60;
    pub const MIN_HEIGHT: u16 = 16;

    pub fn calculate(size: Rect, tab: Tab) -> Self {
        // Ensure minimum terminal size (accounting for outer border)
        let width = size.width.max(Self::MIN_WIDTH + 2);
        let height = size.height.max(Self::MIN_HEIGHT + 2);
        let size = Rect::new(size.x, size.y, width, height);

        let inner_area = Rect::new(
            size.x + 1,
            size.y + 1,
            size.width.saturating_sub(2),
            size.height.saturating_sub(2),
        );

        // Split vertically: tabs (1 line), content, status (1 line)
        let vertical = RatLayout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Tabs
                Constraint::Min(1),    // Content
                Constraint::Length(1), // Status
            ])
            .split(inner_area);

        let horizontal = match tab {
            // Calendar gets a fixed width (7 day columns of 4 chars plus
            // borders), the entry pane takes the rest
            Tab::Diary => RatLayout::default()
                .direction(Direction::Horizontal)
                .constraints([
                    Constraint::Length(30),
                    Constraint::Min(20),
                    Constraint::Length(0),
                ])
                .split(vertical[1]),
            // Three equal lanes
            Tab::Board => RatLayout::default()
                .direction(Direction::Horizontal)
                .constraints([
                    Constraint::Ratio(1, 3),
                    Constraint::Ratio(1, 3),
                    Constraint::Ratio(1, 3),
                ])
                .split(vertical[1]),
        };

        Self {
            inner_area,
            tabs_area: vertical[0],
            left_area: horizontal[0],
            middle_area: horizontal[1],
            right_area: horizontal[2],
            status_area: vertical[2],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn board_tab_gets_three_lanes() {
        let layout = Layout::calculate(Rect::new(0, 0, 92, 30), Tab::Board);
        assert!(layout.left_area.width > 0);
        assert!(layout.middle_area.width > 0);
        assert!(layout.right_area.width > 0);
        assert_eq!(layout.status_area.height, 1);
    }

    #[test]
    fn diary_tab_gets_calendar_and_entry_panes() {
        let layout = Layout::calculate(Rect::new(0, 0, 92, 30), Tab::Diary);
        assert_eq!(layout.left_area.width, 30);
        assert!(layout.middle_area.width >= 20);
        assert_eq!(layout.right_area.width, 0);
    }

    #[test]
    fn undersized_terminal_is_padded_to_the_minimum() {
        let layout = Layout::calculate(Rect::new(0, 0, 10, 5), Tab::Diary);
        assert_eq!(layout.inner_area.width, Layout::MIN_WIDTH);
        assert_eq!(layout.inner_area.height, Layout::MIN_HEIGHT);
    }
}
