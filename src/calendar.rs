use chrono::{Datelike, Days, Months, NaiveDate};
use std::collections::HashSet;

/// One day cell in the month grid. Derived on every render, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarCell {
    pub date: NaiveDate,
    pub in_month: bool,
    pub selected: bool,
    pub today: bool,
    pub has_content: bool,
}

/// Format a date the way the store keys diary entries
pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// First day of the month containing `date`
pub fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Last day of the month containing `date`
pub fn month_end(date: NaiveDate) -> NaiveDate {
    let first = month_start(date);
    first
        .checked_add_months(Months::new(1))
        .and_then(|d| d.checked_sub_days(Days::new(1)))
        .unwrap_or(date)
}

/// Shift by exactly one calendar month. Year boundaries need no special
/// casing; chrono's month arithmetic clamps the day-of-month.
pub fn next_month(date: NaiveDate) -> NaiveDate {
    date.checked_add_months(Months::new(1)).unwrap_or(date)
}

pub fn prev_month(date: NaiveDate) -> NaiveDate {
    date.checked_sub_months(Months::new(1)).unwrap_or(date)
}

/// First and last day shown for the month containing `visible`: the
/// Sunday on or before the 1st through the Saturday on or after the
/// month's last day.
pub fn grid_bounds(visible: NaiveDate) -> (NaiveDate, NaiveDate) {
    let first = month_start(visible);
    let last = month_end(visible);

    let grid_start = first
        .checked_sub_days(Days::new(first.weekday().num_days_from_sunday() as u64))
        .unwrap_or(first);
    let grid_end = last
        .checked_add_days(Days::new(6 - last.weekday().num_days_from_sunday() as u64))
        .unwrap_or(last);
    (grid_start, grid_end)
}

/// Build the full display grid for the month containing `visible`:
/// complete weeks of 7 cells, Sunday through Saturday, from the week of
/// the 1st through the week of the month's last day. Out-of-month days
/// are included (dimmed by the renderer) and remain selectable.
pub fn month_grid(
    visible: NaiveDate,
    selected: NaiveDate,
    today: NaiveDate,
    content_dates: &HashSet<String>,
) -> Vec<Vec<CalendarCell>> {
    let first = month_start(visible);
    let (grid_start, grid_end) = grid_bounds(visible);

    let mut weeks = Vec::new();
    let mut week = Vec::with_capacity(7);
    let mut day = grid_start;

    while day <= grid_end {
        week.push(CalendarCell {
            date: day,
            in_month: day.month() == first.month() && day.year() == first.year(),
            selected: day == selected,
            today: day == today,
            has_content: content_dates.contains(&date_key(day)),
        });

        if week.len() == 7 {
            weeks.push(std::mem::take(&mut week));
        }

        day = match day.checked_add_days(Days::new(1)) {
            Some(next) => next,
            None => break,
        };
    }

    weeks
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn grid(visible: NaiveDate) -> Vec<Vec<CalendarCell>> {
        month_grid(visible, visible, visible, &HashSet::new())
    }

    #[test]
    fn every_month_yields_complete_sunday_to_saturday_weeks() {
        for year in [1999, 2000, 2024, 2025] {
            for month in 1..=12 {
                let weeks = grid(date(year, month, 15));
                assert!(!weeks.is_empty());
                for week in &weeks {
                    assert_eq!(week.len(), 7);
                    assert_eq!(week[0].date.weekday(), Weekday::Sun);
                    assert_eq!(week[6].date.weekday(), Weekday::Sat);
                }
            }
        }
    }

    #[test]
    fn grid_covers_the_whole_month() {
        let weeks = grid(date(2024, 2, 10));
        let in_month: Vec<_> = weeks
            .iter()
            .flatten()
            .filter(|c| c.in_month)
            .map(|c| c.date.day())
            .collect();
        // 2024 is a leap year
        assert_eq!(in_month, (1..=29).collect::<Vec<_>>());
    }

    #[test]
    fn grid_cells_are_consecutive_days() {
        let weeks = grid(date(2024, 3, 15));
        let cells: Vec<_> = weeks.iter().flatten().collect();
        for pair in cells.windows(2) {
            assert_eq!(
                pair[1].date,
                pair[0].date.checked_add_days(Days::new(1)).unwrap()
            );
        }
    }

    #[test]
    fn february_starting_on_sunday_needs_exactly_four_weeks() {
        // Feb 2015: starts Sunday, 28 days
        let weeks = grid(date(2015, 2, 1));
        assert_eq!(weeks.len(), 4);
        assert!(weeks.iter().flatten().all(|c| c.in_month));
    }

    #[test]
    fn adjacent_month_days_are_flagged_out_of_month() {
        // March 2024 starts on a Friday, so the first week holds
        // Feb 25..29 before it.
        let weeks = grid(date(2024, 3, 1));
        let first_week = &weeks[0];
        assert_eq!(first_week[0].date, date(2024, 2, 25));
        assert!(!first_week[0].in_month);
        assert!(first_week[5].in_month);
        assert_eq!(first_week[5].date, date(2024, 3, 1));
    }

    #[test]
    fn has_content_tracks_set_membership_exactly() {
        let mut content = HashSet::new();
        content.insert("2024-03-15".to_string());
        content.insert("2024-03-01".to_string());

        let weeks = month_grid(date(2024, 3, 1), date(2024, 3, 1), date(2024, 3, 1), &content);
        for cell in weeks.iter().flatten() {
            assert_eq!(cell.has_content, content.contains(&date_key(cell.date)));
        }
    }

    #[test]
    fn has_content_with_full_month_set() {
        let content: HashSet<String> = (1..=31).map(|d| date_key(date(2024, 3, d))).collect();
        let weeks = month_grid(date(2024, 3, 1), date(2024, 3, 1), date(2024, 3, 1), &content);
        for cell in weeks.iter().flatten() {
            assert_eq!(cell.has_content, cell.in_month);
        }
    }

    #[test]
    fn selected_and_today_flags_mark_single_cells() {
        let weeks = month_grid(
            date(2024, 3, 1),
            date(2024, 3, 15),
            date(2024, 3, 20),
            &HashSet::new(),
        );
        let cells: Vec<_> = weeks.iter().flatten().collect();
        assert_eq!(cells.iter().filter(|c| c.selected).count(), 1);
        assert_eq!(cells.iter().filter(|c| c.today).count(), 1);
        assert!(cells.iter().any(|c| c.selected && c.date == date(2024, 3, 15)));
    }

    #[test]
    fn out_of_month_selection_is_representable() {
        // Selecting a dimmed adjacent-month day still marks that cell
        // while the visible month stays put.
        let weeks = month_grid(
            date(2024, 3, 1),
            date(2024, 2, 25),
            date(2024, 3, 1),
            &HashSet::new(),
        );
        let cell = weeks
            .iter()
            .flatten()
            .find(|c| c.selected)
            .expect("selected cell present");
        assert!(!cell.in_month);
        assert_eq!(cell.date, date(2024, 2, 25));
    }

    #[test]
    fn month_navigation_crosses_year_boundaries() {
        assert_eq!(next_month(date(2024, 12, 15)), date(2025, 1, 15));
        assert_eq!(prev_month(date(2024, 1, 15)), date(2023, 12, 15));
        // Day-of-month clamps rather than overflowing
        assert_eq!(next_month(date(2024, 1, 31)), date(2024, 2, 29));
    }
}
