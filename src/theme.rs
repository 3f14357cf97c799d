use crate::exam::ExamCategory;
use ratatui::style::{Color, Modifier, Style};

pub(crate) const BASE_STYLE: Style = Style::new().fg(Color::White).bg(Color::Black);

pub(crate) const TITLE_STYLE: Style = BASE_STYLE.add_modifier(Modifier::BOLD);

pub(crate) const MONTH_STYLE: Style = BASE_STYLE
    .fg(Color::LightCyan)
    .add_modifier(Modifier::BOLD);

pub(crate) const WEEKDAY_STYLE: Style = BASE_STYLE.add_modifier(Modifier::BOLD);

pub(crate) const DAY_STYLE: Style = BASE_STYLE;

pub(crate) const TODAY_STYLE: Style = BASE_STYLE
    .fg(Color::LightYellow)
    .add_modifier(Modifier::BOLD);

pub(crate) const MORE_STYLE: Style = BASE_STYLE.fg(Color::DarkGray);

pub(crate) const fn category_style(category: ExamCategory) -> Style {
    match category {
        ExamCategory::Eos => Style::new().fg(Color::Black).bg(Color::Yellow),
        ExamCategory::ProjectPresentation => Style::new().fg(Color::White).bg(Color::Blue),
        ExamCategory::EosPea => Style::new().fg(Color::Black).bg(Color::LightGreen),
        ExamCategory::EosMultipleChoice => Style::new().fg(Color::Black).bg(Color::LightCyan),
        ExamCategory::Other => BASE_STYLE.fg(Color::Gray),
    }
}

pub(crate) mod jumpto {
    use super::*;

    pub(crate) const UNFILLED_CELL_STYLE: Style = BASE_STYLE.fg(Color::DarkGray);

    pub(crate) const READY_ENTER_STYLE: Style = BASE_STYLE.add_modifier(Modifier::UNDERLINED);
}
