use crate::table::{find_table, Row, Table};
use thiserror::Error;
use time::{Date, Month};
use tracing::{debug, error, warn};

/// Rows with fewer cells than this are not exam rows
pub(crate) const MIN_CELLS: usize = 7;

const SUBJECT_CELL: usize = 2;
const DATE_CELL: usize = 3;
const ROOM_CELL: usize = 4;
const TIME_CELL: usize = 5;
const TYPE_CELL: usize = 6;

pub(crate) const UNKNOWN_SUBJECT: &str = "Unknown Subject";
pub(crate) const UNKNOWN_DATE: &str = "Unknown Date";
pub(crate) const UNKNOWN_ROOM: &str = "Unknown Room";
pub(crate) const UNKNOWN_TIME: &str = "Unknown Time";

/// One scheduled exam as read from the page.  The date is kept as the
/// day/month/year text found in the table; use [`ExamEvent::calendar_date()`]
/// to interpret it.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub(crate) struct ExamEvent {
    pub(crate) title: String,
    pub(crate) date: String,
    pub(crate) time: String,
    pub(crate) exam_type: Option<String>,
}

impl ExamEvent {
    /// Build an event from the positional cells of a table row.  Returns
    /// `None` if the row has fewer than [`MIN_CELLS`] cells.
    pub(crate) fn from_row(row: &Row) -> Option<ExamEvent> {
        if row.len() < MIN_CELLS {
            return None;
        }
        let subject = cell_or(row, SUBJECT_CELL, UNKNOWN_SUBJECT);
        let room = cell_or(row, ROOM_CELL, UNKNOWN_ROOM);
        Some(ExamEvent {
            title: format!("{subject} ({room})"),
            date: cell_or(row, DATE_CELL, UNKNOWN_DATE).to_owned(),
            time: cell_or(row, TIME_CELL, UNKNOWN_TIME).to_owned(),
            exam_type: row
                .cell(TYPE_CELL)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(ToOwned::to_owned),
        })
    }

    pub(crate) fn calendar_date(&self) -> Result<Date, DateError> {
        parse_dmy(&self.date)
    }

    pub(crate) fn category(&self) -> ExamCategory {
        ExamCategory::classify(self.exam_type.as_deref())
    }
}

fn cell_or<'a>(row: &'a Row, index: usize, fallback: &'a str) -> &'a str {
    match row.cell(index).map(str::trim) {
        Some(s) if !s.is_empty() => s,
        _ => fallback,
    }
}

/// Read every exam row of the schedule table inside the element with id
/// `container_id`.  A page without that element or table yields no events.
pub(crate) fn scrape(html: &str, container_id: &str) -> Vec<ExamEvent> {
    match find_table(html, container_id) {
        Ok(table) => extract_events(&table),
        Err(e) => {
            error!(container = container_id, "{e}");
            Vec::new()
        }
    }
}

pub(crate) fn extract_events(table: &Table) -> Vec<ExamEvent> {
    let mut events = Vec::with_capacity(table.rows().len());
    for (i, row) in table.rows().iter().enumerate() {
        match ExamEvent::from_row(row) {
            Some(ev) => events.push(ev),
            None => warn!(
                row = i,
                cells = row.len(),
                "Skipping row due to insufficient cells"
            ),
        }
    }
    debug!(count = events.len(), "extracted exam events");
    events
}

/// Visual grouping of an exam, derived from the free-text exam type
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub(crate) enum ExamCategory {
    Eos,
    ProjectPresentation,
    EosPea,
    EosMultipleChoice,
    Other,
}

impl ExamCategory {
    pub(crate) const ALL: [ExamCategory; 5] = [
        ExamCategory::Eos,
        ExamCategory::ProjectPresentation,
        ExamCategory::EosPea,
        ExamCategory::EosMultipleChoice,
        ExamCategory::Other,
    ];

    pub(crate) fn classify(exam_type: Option<&str>) -> ExamCategory {
        let Some(exam_type) = exam_type else {
            return ExamCategory::Other;
        };
        match exam_type.trim().to_lowercase().as_str() {
            "eos" => ExamCategory::Eos,
            "project presentation" => ExamCategory::ProjectPresentation,
            "eos & pea" => ExamCategory::EosPea,
            "eos (multiple choice)" => ExamCategory::EosMultipleChoice,
            _ => ExamCategory::Other,
        }
    }

    pub(crate) fn class_name(self) -> &'static str {
        match self {
            ExamCategory::Eos => "eos",
            ExamCategory::ProjectPresentation => "project-presentation",
            ExamCategory::EosPea => "eos-pea",
            ExamCategory::EosMultipleChoice => "eos-multiple-choice",
            ExamCategory::Other => "other",
        }
    }

    pub(crate) fn label(self) -> &'static str {
        match self {
            ExamCategory::Eos => "EOS",
            ExamCategory::ProjectPresentation => "Presentation",
            ExamCategory::EosPea => "EOS & PEA",
            ExamCategory::EosMultipleChoice => "EOS (MC)",
            ExamCategory::Other => "Other",
        }
    }
}

#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub(crate) enum DateError {
    #[error("expected a day/month/year date, got {0:?}")]
    Malformed(String),
    #[error("{text:?} is not a valid calendar date")]
    OutOfRange {
        text: String,
        source: time::error::ComponentRange,
    },
}

/// Parse a `D/M/Y` date such as `5/6/2024`.  The segments are read in
/// reverse, so `15/3/2024` is the 15th of March.
pub(crate) fn parse_dmy(text: &str) -> Result<Date, DateError> {
    let malformed = || DateError::Malformed(text.to_owned());
    let mut segments = text.split('/').map(str::trim).collect::<Vec<_>>();
    segments.reverse();
    let [year, month, day] = segments.as_slice() else {
        return Err(malformed());
    };
    let year = year.parse::<i32>().map_err(|_| malformed())?;
    let month = month.parse::<u8>().map_err(|_| malformed())?;
    let day = day.parse::<u8>().map_err(|_| malformed())?;
    Month::try_from(month)
        .and_then(|month| Date::from_calendar_date(year, month, day))
        .map_err(|source| DateError::OutOfRange {
            text: text.to_owned(),
            source,
        })
}
