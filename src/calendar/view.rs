use super::cursor::{MonthCursor, OutOfTimeError};
use super::grid::MonthGrid;
use crate::exam::{DateError, ExamEvent};
use thiserror::Error;
use tracing::{debug, error, warn};

/// The navigable month view: the events read at startup, the month being
/// shown, and the grid for that month.  Moving between months rebuilds the
/// grid from the same events.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct MonthView {
    events: Vec<ExamEvent>,
    home: MonthCursor,
    grid: MonthGrid,
}

impl MonthView {
    /// Start a view on the month of the first event.
    pub(crate) fn new(events: Vec<ExamEvent>) -> Result<MonthView, ViewError> {
        let first = events.first().ok_or(ViewError::NoEvents)?;
        let date = first.calendar_date()?;
        let home = MonthCursor::containing(date);
        let grid = MonthGrid::build(&events, home);
        Ok(MonthView { events, home, grid })
    }

    /// Like [`MonthView::new()`], but problems are logged instead of
    /// returned.
    pub(crate) fn from_events(events: Vec<ExamEvent>) -> Option<MonthView> {
        match MonthView::new(events) {
            Ok(view) => Some(view),
            Err(e @ ViewError::NoEvents) => {
                warn!("{e}");
                None
            }
            Err(e) => {
                error!("{e}");
                None
            }
        }
    }

    /// Make `cursor` both the month shown and the one returned to by
    /// [`MonthView::go_home()`]
    pub(crate) fn start_at(mut self, cursor: MonthCursor) -> Self {
        self.home = cursor;
        self.show(cursor);
        self
    }

    pub(crate) fn grid(&self) -> &MonthGrid {
        &self.grid
    }

    pub(crate) fn cursor(&self) -> MonthCursor {
        self.grid.cursor()
    }

    pub(crate) fn shift(&mut self, delta: i32) -> Result<(), OutOfTimeError> {
        let cursor = self.cursor().shifted(delta)?;
        self.show(cursor);
        Ok(())
    }

    pub(crate) fn next_month(&mut self) -> Result<(), OutOfTimeError> {
        self.shift(1)
    }

    pub(crate) fn previous_month(&mut self) -> Result<(), OutOfTimeError> {
        self.shift(-1)
    }

    pub(crate) fn jump_to(&mut self, cursor: MonthCursor) {
        self.show(cursor);
    }

    pub(crate) fn go_home(&mut self) {
        self.show(self.home);
    }

    fn show(&mut self, cursor: MonthCursor) {
        if cursor != self.grid.cursor() {
            self.grid = MonthGrid::build(&self.events, cursor);
            debug!(
                month = %cursor,
                leading_blanks = self.grid.leading_blanks(),
                events = self.grid.event_count(),
                "showing month"
            );
        }
    }
}

#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub(crate) enum ViewError {
    #[error("No events to display in the calendar")]
    NoEvents,
    #[error("Invalid date format in events: {0}")]
    BadFirstDate(#[from] DateError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::Month;

    fn exam(title: &str, date: &str) -> ExamEvent {
        ExamEvent {
            title: title.to_owned(),
            date: date.to_owned(),
            time: String::from("09:00"),
            exam_type: Some(String::from("EOS")),
        }
    }

    fn cursor(year: i32, month: Month) -> MonthCursor {
        MonthCursor::new(year, month).unwrap()
    }

    #[test]
    fn test_starts_on_first_event_month() {
        let view = MonthView::new(vec![
            exam("Later (R1)", "3/1/2025"),
            exam("Earlier (R2)", "20/12/2024"),
        ])
        .unwrap();
        assert_eq!(view.cursor(), cursor(2025, Month::January));
        assert_eq!(view.grid().event_count(), 1);
    }

    #[test]
    fn test_no_events() {
        assert_eq!(MonthView::new(Vec::new()), Err(ViewError::NoEvents));
        assert_eq!(MonthView::from_events(Vec::new()), None);
    }

    #[test]
    fn test_bad_first_date() {
        let r = MonthView::new(vec![
            exam("Lost (R1)", "Unknown Date"),
            exam("Fine (R2)", "1/1/2025"),
        ]);
        assert!(matches!(r, Err(ViewError::BadFirstDate(_))));
        assert_eq!(
            MonthView::from_events(vec![exam("Lost (R1)", "Unknown Date")]),
            None
        );
    }

    #[test]
    fn test_navigation_rebuilds_grid() {
        let mut view = MonthView::new(vec![
            exam("Later (R1)", "3/1/2025"),
            exam("Earlier (R2)", "20/12/2024"),
        ])
        .unwrap();
        view.previous_month().unwrap();
        assert_eq!(view.cursor(), cursor(2024, Month::December));
        let titles = view
            .grid()
            .days()
            .flat_map(|d| &d.events)
            .map(|ev| ev.title.as_str())
            .collect::<Vec<_>>();
        assert_eq!(titles, ["Earlier (R2)"]);
        view.next_month().unwrap();
        view.next_month().unwrap();
        assert_eq!(view.cursor(), cursor(2025, Month::February));
        assert_eq!(view.grid().event_count(), 0);
        assert_eq!(view.events.len(), 2);
        view.go_home();
        assert_eq!(view.cursor(), cursor(2025, Month::January));
    }

    #[test]
    fn test_start_at() {
        let mut view = MonthView::new(vec![exam("Only (R1)", "3/1/2025")])
            .unwrap()
            .start_at(cursor(2024, Month::June));
        assert_eq!(view.cursor(), cursor(2024, Month::June));
        view.shift(3).unwrap();
        view.go_home();
        assert_eq!(view.cursor(), cursor(2024, Month::June));
        view.jump_to(cursor(2025, Month::January));
        assert_eq!(view.grid().event_count(), 1);
    }
}
