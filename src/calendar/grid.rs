use super::cursor::MonthCursor;
use crate::exam::ExamEvent;
use time::Date;

pub(crate) const DAYS_IN_WEEK: usize = 7;

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) enum GridCell {
    /// Placeholder before the first day of the month
    Blank,
    Day(DayCell),
}

impl GridCell {
    pub(crate) fn as_day(&self) -> Option<&DayCell> {
        match self {
            GridCell::Blank => None,
            GridCell::Day(day) => Some(day),
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct DayCell {
    pub(crate) date: Date,
    /// Events on this date, in the order they appeared in the table
    pub(crate) events: Vec<ExamEvent>,
}

impl DayCell {
    pub(crate) fn day(&self) -> u8 {
        self.date.day()
    }
}

/// The cells of a Sunday-first month view: a run of blanks for the weekdays
/// before the 1st, then one cell per day of the month
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct MonthGrid {
    cursor: MonthCursor,
    cells: Vec<GridCell>,
}

impl MonthGrid {
    pub(crate) fn build(events: &[ExamEvent], cursor: MonthCursor) -> MonthGrid {
        // Events whose date cannot be read simply never land on a day
        let dated = events
            .iter()
            .filter_map(|ev| ev.calendar_date().ok().map(|d| (d, ev)))
            .collect::<Vec<_>>();
        let leading = cursor.first_day().weekday().number_days_from_sunday();
        let mut cells = Vec::with_capacity(DAYS_IN_WEEK * 6);
        cells.resize(usize::from(leading), GridCell::Blank);
        cells.extend(cursor.days().map(|date| {
            GridCell::Day(DayCell {
                date,
                events: dated
                    .iter()
                    .filter(|&&(d, _)| d == date)
                    .map(|&(_, ev)| ev.clone())
                    .collect(),
            })
        }));
        MonthGrid { cursor, cells }
    }

    pub(crate) fn cursor(&self) -> MonthCursor {
        self.cursor
    }

    pub(crate) fn cells(&self) -> &[GridCell] {
        &self.cells
    }

    pub(crate) fn leading_blanks(&self) -> usize {
        self.cells
            .iter()
            .take_while(|c| matches!(c, GridCell::Blank))
            .count()
    }

    pub(crate) fn days(&self) -> impl Iterator<Item = &DayCell> + '_ {
        self.cells.iter().filter_map(GridCell::as_day)
    }

    /// The cells split into rows of seven; the last row may be short
    pub(crate) fn weeks(&self) -> std::slice::Chunks<'_, GridCell> {
        self.cells().chunks(DAYS_IN_WEEK)
    }

    pub(crate) fn week_count(&self) -> usize {
        self.cells.len().div_ceil(DAYS_IN_WEEK)
    }

    pub(crate) fn event_count(&self) -> usize {
        self.days().map(|d| d.events.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::{macros::date, Month};

    fn exam(title: &str, date: &str, time: &str) -> ExamEvent {
        ExamEvent {
            title: title.to_owned(),
            date: date.to_owned(),
            time: time.to_owned(),
            exam_type: None,
        }
    }

    fn cursor(year: i32, month: Month) -> MonthCursor {
        MonthCursor::new(year, month).unwrap()
    }

    #[test]
    fn test_february_leap_year() {
        let grid = MonthGrid::build(&[], cursor(2024, Month::February));
        // 2024-02-01 was a Thursday
        assert_eq!(grid.leading_blanks(), 4);
        assert_eq!(grid.days().count(), 29);
        assert_eq!(grid.cells().len(), 33);
        assert_eq!(grid.week_count(), 5);
    }

    #[test]
    fn test_leading_blanks_match_weekday() {
        for year in [1999, 2000, 2023, 2024, 2025] {
            let mut c = cursor(year, Month::January);
            for _ in 0..12 {
                let grid = MonthGrid::build(&[], c);
                assert_eq!(
                    grid.leading_blanks(),
                    usize::from(c.first_day().weekday().number_days_from_sunday()),
                    "leading blanks for {c}"
                );
                let next = c.shifted(1).unwrap();
                let last = next.first_day().previous_day().unwrap();
                assert_eq!(
                    grid.days().count(),
                    usize::from(last.day()),
                    "day count for {c}"
                );
                c = next;
            }
        }
    }

    #[test]
    fn test_sunday_start_has_no_blanks() {
        // 2026-02-01 is a Sunday, and the month fills exactly four rows
        let grid = MonthGrid::build(&[], cursor(2026, Month::February));
        assert_eq!(grid.leading_blanks(), 0);
        assert_eq!(grid.week_count(), 4);
        assert_eq!(grid.weeks().map(<[GridCell]>::len).collect::<Vec<_>>(), [7; 4]);
    }

    #[test]
    fn test_event_lands_on_its_day_only() {
        let events = [exam("Physics (R1)", "15/3/2024", "09:00")];
        let grid = MonthGrid::build(&events, cursor(2024, Month::March));
        for day in grid.days() {
            if day.day() == 15 {
                assert_eq!(day.events, events);
            } else {
                assert!(day.events.is_empty(), "unexpected events on {}", day.date);
            }
        }
        assert_eq!(grid.event_count(), 1);
        let other = MonthGrid::build(&events, cursor(2024, Month::April));
        assert_eq!(other.event_count(), 0);
        let other = MonthGrid::build(&events, cursor(2023, Month::March));
        assert_eq!(other.event_count(), 0);
    }

    #[test]
    fn test_events_keep_source_order() {
        let events = [
            exam("B (R2)", "2/5/2024", "13:00"),
            exam("Elsewhere (R9)", "3/5/2024", "07:00"),
            exam("A (R1)", "02/05/2024", "07:30"),
        ];
        let grid = MonthGrid::build(&events, cursor(2024, Month::May));
        let day = grid
            .days()
            .find(|d| d.date == date!(2024 - 05 - 02))
            .unwrap();
        let titles = day.events.iter().map(|ev| ev.title.as_str()).collect::<Vec<_>>();
        assert_eq!(titles, ["B (R2)", "A (R1)"]);
    }

    #[test]
    fn test_undated_events_are_dropped() {
        let events = [
            exam("Lost (R1)", "Unknown Date", "09:00"),
            exam("Bogus (R2)", "31/4/2024", "09:00"),
        ];
        let grid = MonthGrid::build(&events, cursor(2024, Month::April));
        assert_eq!(grid.event_count(), 0);
    }
}
