mod cursor;
mod grid;
mod plain;
mod view;
mod widget;
pub(crate) use self::cursor::MonthCursor;
pub(crate) use self::plain::write_month;
pub(crate) use self::view::MonthView;
pub(crate) use self::widget::MonthCalendar;
