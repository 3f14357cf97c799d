use super::grid::{DayCell, GridCell, MonthGrid};
use crate::exam::ExamEvent;
use crate::theme::{
    category_style, DAY_STYLE, MONTH_STYLE, MORE_STYLE, TITLE_STYLE, TODAY_STYLE, WEEKDAY_STYLE,
};
use ratatui::{layout::Flex, prelude::*, widgets::*};
use time::Date;

static TITLE: &str = "Exam Calendar";

pub(crate) const WEEKDAY_NAMES: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

const DAYS_IN_WEEK: u16 = 7;

/// Number of lines taken up by the title, month name, weekday names, and the
/// rule beneath them
const HEADER_LINES: u16 = 4;

/// Each week gets at least a line of day numbers and a line of events
const MIN_WEEK_LINES: u16 = 2;

/// Column within a day at which its weekday name is written
const WEEKDAY_INDENT: u16 = 1;

const ACS_HLINE: char = '─';

/// A month of exams laid out as a Sunday-first grid.  The available width is
/// divided evenly between the seven days and the available height between
/// the weeks; each day shows its number followed by as many of its events as
/// fit.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct MonthCalendar<'a> {
    grid: &'a MonthGrid,
    today: Date,
}

impl<'a> MonthCalendar<'a> {
    pub(crate) fn new(grid: &'a MonthGrid, today: Date) -> MonthCalendar<'a> {
        MonthCalendar { grid, today }
    }
}

impl Widget for MonthCalendar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let day_width = (area.width / DAYS_IN_WEEK).max(1);
        let grid_width = (day_width * DAYS_IN_WEEK).min(area.width);
        let [area] = Layout::horizontal([grid_width])
            .flex(Flex::Center)
            .areas(area);
        let week_qty = u16::try_from(self.grid.week_count())
            .unwrap_or(u16::MAX)
            .max(1);
        let week_lines = (area.height.saturating_sub(HEADER_LINES) / week_qty).max(MIN_WEEK_LINES);
        let mut canvas = BufferCanvas::new(area, buf);
        canvas.draw_centered(0, TITLE, TITLE_STYLE);
        canvas.draw_centered(1, &self.grid.cursor().to_string(), MONTH_STYLE);
        for (wd, name) in std::iter::zip(0u16.., WEEKDAY_NAMES) {
            canvas.mvprint(2, wd * day_width + WEEKDAY_INDENT, name, Some(WEEKDAY_STYLE));
        }
        canvas.hline(HEADER_LINES - 1, 0, ACS_HLINE, area.width);
        for (week_no, week) in std::iter::zip(0u16.., self.grid.weeks()) {
            let y = HEADER_LINES + week_no * week_lines;
            for (wd, cell) in std::iter::zip(0u16.., week) {
                if let GridCell::Day(day) = cell {
                    let x = wd * day_width;
                    canvas.draw_day(y, x, day, day.date == self.today);
                    canvas.draw_events(y + 1, x, day_width - 1, week_lines - 1, &day.events);
                }
            }
        }
    }
}

#[derive(Debug, Eq, PartialEq)]
struct BufferCanvas<'a> {
    area: Rect,
    buf: &'a mut Buffer,
}

impl<'a> BufferCanvas<'a> {
    fn new(area: Rect, buf: &'a mut Buffer) -> Self {
        Self { area, buf }
    }

    fn draw_centered(&mut self, y: u16, s: &str, style: Style) {
        let x = self.area.width.saturating_sub(text_width(s)) / 2;
        self.mvprint(y, x, s, Some(style));
    }

    fn draw_day(&mut self, y: u16, x: u16, day: &DayCell, is_today: bool) {
        if is_today {
            self.mvprint(y, x, format!("[{:2}]", day.day()), Some(TODAY_STYLE));
        } else {
            self.mvprint(y, x, format!(" {:2} ", day.day()), Some(DAY_STYLE));
        }
    }

    // Draws up to `lines` lines of events starting at line `y`, each cut to
    // `width` columns.  If not all of the events fit, the last line instead
    // says how many were left out.
    fn draw_events(&mut self, y: u16, x: u16, width: u16, lines: u16, events: &[ExamEvent]) {
        let lines = usize::from(lines);
        let (shown, hidden) = if events.len() > lines {
            let shown = lines.saturating_sub(1);
            (shown, events.len() - shown)
        } else {
            (events.len(), 0)
        };
        let mut line_y = y;
        for ev in events.iter().take(shown) {
            let text = format!("{} {}", ev.time, ev.title);
            self.mvprint(
                line_y,
                x,
                truncate(&text, width),
                Some(category_style(ev.category())),
            );
            line_y += 1;
        }
        if hidden > 0 && lines > 0 {
            let text = format!("+{hidden} more");
            self.mvprint(line_y, x, truncate(&text, width), Some(MORE_STYLE));
        }
    }

    fn mvprint<S: AsRef<str>>(&mut self, y: u16, x: u16, s: S, style: Option<Style>) {
        if y < self.area.height && x < self.area.width {
            let text = Text::styled(s.as_ref(), style.unwrap_or_default());
            let width = u16::try_from(text.width()).unwrap_or(u16::MAX);
            // The Rect given to the Paragraph must lie entirely within the
            // frame, so clamp the width to what is left of the area.
            Paragraph::new(text).render(
                Rect {
                    x: x + self.area.x,
                    y: y + self.area.y,
                    width: (self.area.width - x).min(width),
                    height: 1,
                },
                self.buf,
            );
        }
    }

    fn hline(&mut self, y: u16, x: u16, ch: char, length: u16) {
        self.mvprint(y, x, String::from(ch).repeat(length.into()), None);
    }
}

fn text_width(s: &str) -> u16 {
    u16::try_from(s.chars().count()).unwrap_or(u16::MAX)
}

fn truncate(s: &str, width: u16) -> String {
    s.chars().take(usize::from(width)).collect()
}
