//! Up-next strip.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use watch_proto::schedule::ScheduleItem;

use crate::theme::{item_type_color, style_border, style_default, style_secondary, C_SEPARATOR};

pub fn draw_up_next(frame: &mut Frame, area: Rect, item: &ScheduleItem) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(style_border());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let [left, right] =
        Layout::horizontal([Constraint::Fill(1), Constraint::Length(8)]).areas(inner);

    let item_type = item.item_type();
    let line = Line::from(vec![
        Span::styled(" › UP NEXT ", style_secondary()),
        Span::styled("│ ", Style::default().fg(C_SEPARATOR)),
        Span::styled(
            format!(" {} ", item_type.as_str()),
            Style::default()
                .fg(item_type_color(item_type))
                .add_modifier(Modifier::BOLD | Modifier::REVERSED),
        ),
        Span::raw(" "),
        Span::styled(item.display_title(), style_default().add_modifier(Modifier::BOLD)),
    ]);
    frame.render_widget(Paragraph::new(line), left);

    if let Some(time) = item.display_time() {
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(time, style_secondary())).right_aligned()),
            right,
        );
    }
}
