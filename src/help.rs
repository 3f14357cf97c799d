use crate::exam::ExamCategory;
use crate::theme::category_style;
use ratatui::{
    buffer::Buffer,
    layout::Flex,
    layout::{Alignment, Layout, Rect},
    style::Style,
    text::{Line, Span, Text},
    widgets::{Block, Clear, Paragraph, Widget},
};

static TEXT: &[&str] = &[
    "h, LEFT         Previous month",
    "l, RIGHT        Next month",
    "H, PAGE UP      Previous year",
    "L, PAGE DOWN    Next year",
    "0, HOME         Back to the first month shown",
    "g               Input month to jump to",
    "?               Show this help",
    "q, ESC          Quit",
    "",
];

static DISMISS: &str = "Press the Any Key to dismiss.";

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) struct Help(pub(crate) Style);

impl Help {
    fn text(self) -> Text<'static> {
        let mut lines = TEXT.iter().map(|&s| Line::raw(s)).collect::<Vec<_>>();
        let mut legend = vec![Span::raw("Exam types:")];
        for category in ExamCategory::ALL {
            legend.push(Span::raw(" "));
            legend.push(Span::styled(category.label(), category_style(category)));
        }
        lines.push(Line::from(legend));
        lines.push(Line::raw(""));
        lines.push(Line::raw(DISMISS));
        Text::from(lines)
    }
}

impl Widget for Help {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let text = self.text();
        let height = u16::try_from(text.height())
            .unwrap_or(u16::MAX)
            .min(area.height)
            .saturating_add(2);
        let width = u16::try_from(text.width())
            .unwrap_or(u16::MAX)
            .min(area.width)
            .saturating_add(2);
        let para = Paragraph::new(text)
            .block(
                Block::bordered()
                    .title(" Commands ")
                    .title_alignment(Alignment::Center),
            )
            .style(self.0);
        let [help_area] = Layout::horizontal([width]).flex(Flex::Center).areas(area);
        let [help_area] = Layout::vertical([height])
            .flex(Flex::Center)
            .areas(help_area);
        let outer_area = Rect {
            x: help_area.x.saturating_sub(1),
            y: help_area.y,
            width: help_area.width.saturating_add(2),
            height: help_area.height,
        }
        .intersection(area);
        Clear.render(outer_area, buf);
        Block::new().style(self.0).render(outer_area, buf);
        para.render(help_area, buf);
    }
}
