use std::fmt;
use thiserror::Error;
use time::{Date, Month};

const MONTHS_IN_YEAR: i64 = 12;

/// A calendar month, always one that `time` can represent
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub(crate) struct MonthCursor {
    // Invariant: always the first day of a month
    first_day: Date,
}

impl MonthCursor {
    pub(crate) fn new(year: i32, month: Month) -> Result<MonthCursor, OutOfTimeError> {
        Date::from_calendar_date(year, month, 1)
            .map(|first_day| MonthCursor { first_day })
            .map_err(|_| OutOfTimeError)
    }

    pub(crate) fn containing(date: Date) -> MonthCursor {
        MonthCursor {
            first_day: date.replace_day(1).unwrap_or(date),
        }
    }

    pub(crate) fn year(self) -> i32 {
        self.first_day.year()
    }

    pub(crate) fn month(self) -> Month {
        self.first_day.month()
    }

    /// The month as a number from 0 (January) to 11 (December)
    pub(crate) fn month0(self) -> u8 {
        u8::from(self.month()) - 1
    }

    pub(crate) fn first_day(self) -> Date {
        self.first_day
    }

    /// Move `delta` months forwards (or backwards, if negative), carrying
    /// into the year as needed
    pub(crate) fn shifted(self, delta: i32) -> Result<MonthCursor, OutOfTimeError> {
        let index = i64::from(self.year()) * MONTHS_IN_YEAR
            + i64::from(self.month0())
            + i64::from(delta);
        let year = i32::try_from(index.div_euclid(MONTHS_IN_YEAR)).map_err(|_| OutOfTimeError)?;
        let month0 = u8::try_from(index.rem_euclid(MONTHS_IN_YEAR)).map_err(|_| OutOfTimeError)?;
        let month = Month::try_from(month0 + 1).map_err(|_| OutOfTimeError)?;
        MonthCursor::new(year, month)
    }

    pub(crate) fn days(self) -> impl Iterator<Item = Date> {
        let month = self.month();
        std::iter::successors(Some(self.first_day), |d| d.next_day())
            .take_while(move |d| d.month() == month)
    }
}

impl fmt::Display for MonthCursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.month(), self.year())
    }
}

#[derive(Copy, Clone, Debug, Eq, Error, PartialEq)]
#[error("reached the end of time")]
pub(crate) struct OutOfTimeError;

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    fn cursor(year: i32, month0: u8) -> MonthCursor {
        MonthCursor::new(year, Month::try_from(month0 + 1).unwrap()).unwrap()
    }

    #[test]
    fn test_next_month_across_year() {
        let next = cursor(2024, 11).shifted(1).unwrap();
        assert_eq!((next.year(), next.month0()), (2025, 0));
    }

    #[test]
    fn test_previous_month_across_year() {
        let prev = cursor(2024, 0).shifted(-1).unwrap();
        assert_eq!((prev.year(), prev.month0()), (2023, 11));
    }

    #[test]
    fn test_shift_within_year() {
        assert_eq!(cursor(2024, 2).shifted(1), Ok(cursor(2024, 3)));
        assert_eq!(cursor(2024, 2).shifted(-2), Ok(cursor(2024, 0)));
        assert_eq!(cursor(2024, 2).shifted(0), Ok(cursor(2024, 2)));
    }

    #[test]
    fn test_shift_by_years() {
        assert_eq!(cursor(2024, 5).shifted(12), Ok(cursor(2025, 5)));
        assert_eq!(cursor(2024, 5).shifted(-18), Ok(cursor(2022, 11)));
        assert_eq!(cursor(2024, 5).shifted(31), Ok(cursor(2027, 0)));
    }

    #[test]
    fn test_shift_past_end_of_time() {
        assert_eq!(cursor(9999, 11).shifted(1), Err(OutOfTimeError));
        assert_eq!(cursor(-9999, 0).shifted(-1), Err(OutOfTimeError));
    }

    #[test]
    fn test_containing() {
        let c = MonthCursor::containing(date!(2024 - 02 - 17));
        assert_eq!(c.first_day(), date!(2024 - 02 - 01));
        assert_eq!(c.to_string(), "February 2024");
    }

    #[test]
    fn test_days() {
        assert_eq!(cursor(2024, 1).days().count(), 29);
        assert_eq!(cursor(2023, 1).days().count(), 28);
        assert_eq!(cursor(2024, 3).days().count(), 30);
        assert_eq!(cursor(2024, 11).days().count(), 31);
        assert_eq!(cursor(9999, 11).days().count(), 31);
        assert_eq!(cursor(2024, 11).days().last(), Some(date!(2024 - 12 - 31)));
    }
}
