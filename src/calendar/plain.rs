use super::grid::{GridCell, MonthGrid};
use super::widget::WEEKDAY_NAMES;
use std::io::{self, Write};

/// Columns given to each day, including the space separating it from the
/// previous day
const SLOT_WIDTH: usize = 4;

const LINE_WIDTH: usize = SLOT_WIDTH * WEEKDAY_NAMES.len() - 1;

/// Write `grid` as a `cal(1)`-style block of day numbers followed by a list
/// of the month's exams
pub(crate) fn write_month<W: Write>(grid: &MonthGrid, mut out: W) -> io::Result<()> {
    let heading = format!("{:^width$}", grid.cursor().to_string(), width = LINE_WIDTH);
    writeln!(out, "{}", heading.trim_end())?;
    writeln!(out, "{}", WEEKDAY_NAMES.join(" "))?;
    for week in grid.weeks() {
        let line = week
            .iter()
            .map(|cell| match cell {
                GridCell::Blank => String::from("   "),
                GridCell::Day(day) => format!("{:>3}", day.day()),
            })
            .collect::<Vec<_>>()
            .join(" ");
        writeln!(out, "{}", line.trim_end())?;
    }
    writeln!(out)?;
    if grid.event_count() == 0 {
        writeln!(out, "No exams this month.")?;
    }
    for day in grid.days() {
        let weekday = WEEKDAY_NAMES[usize::from(day.date.weekday().number_days_from_sunday())];
        for ev in &day.events {
            writeln!(
                out,
                "{weekday} {:>2}  {} - {} [{}]",
                day.day(),
                ev.title,
                ev.time,
                ev.category().class_name()
            )?;
        }
    }
    out.flush()
}
