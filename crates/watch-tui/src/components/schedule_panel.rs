//! SchedulePanel — today's programme with each item's timeline status.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use watch_proto::navigator::{item_status, ItemStatus};

use crate::action::Action;
use crate::app_state::AppState;
use crate::component::Component;
use crate::theme::{item_type_color, C_ACCENT, C_MUTED, C_PRIMARY};
use crate::widgets::pane_chrome::{draw_empty_state, loop_badge, pane_chrome};
use crate::widgets::text::fit_width;

pub struct SchedulePanel {
    scroll: usize,
}

impl SchedulePanel {
    pub fn new() -> Self {
        Self { scroll: 0 }
    }
}

fn status_marker(status: ItemStatus) -> (&'static str, Style) {
    match status {
        ItemStatus::Completed => ("✓", Style::default().fg(C_MUTED)),
        ItemStatus::Live => ("▶", Style::default().fg(C_ACCENT).add_modifier(Modifier::BOLD)),
        ItemStatus::Upcoming => ("·", Style::default().fg(C_PRIMARY)),
    }
}

impl Component for SchedulePanel {
    fn on_action(&mut self, action: &Action, _state: &AppState) {
        match action {
            Action::ScrollUp(n) => self.scroll = self.scroll.saturating_sub(*n),
            Action::ScrollDown(n) => self.scroll = self.scroll.saturating_add(*n),
            _ => {}
        }
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, state: &AppState) {
        let block = pane_chrome("Today's Schedule", loop_badge(&state.scheduler));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let Some(snapshot) = state.snapshot().filter(|s| !s.items.is_empty()) else {
            draw_empty_state(frame, inner, "No schedule available", "");
            return;
        };

        let current = snapshot.now.current_schedule_item_id.as_deref();
        let now = state.now.naive_local();
        let title_width = (inner.width as usize).saturating_sub(18);

        let lines: Vec<Line> = snapshot
            .items
            .iter()
            .map(|item| {
                let status = item_status(item, current, now);
                let (marker, marker_style) = status_marker(status);
                let text_style = match status {
                    ItemStatus::Completed => Style::default().fg(C_MUTED),
                    ItemStatus::Live => Style::default().fg(C_ACCENT).add_modifier(Modifier::BOLD),
                    ItemStatus::Upcoming => Style::default().fg(C_PRIMARY),
                };
                let item_type = item.item_type();
                Line::from(vec![
                    Span::styled(
                        format!("{} ", item.display_time().unwrap_or_else(|| "--:--".into())),
                        text_style,
                    ),
                    Span::styled(format!("{} ", marker), marker_style),
                    Span::styled(
                        fit_width(item_type.as_str(), 8),
                        Style::default().fg(item_type_color(item_type)),
                    ),
                    Span::styled(
                        fit_width(
                            item.title.as_deref().unwrap_or(item_type.as_str()),
                            title_width,
                        ),
                        text_style,
                    ),
                ])
            })
            .collect();

        let max_scroll = lines.len().saturating_sub(inner.height as usize);
        self.scroll = self.scroll.min(max_scroll);
        frame.render_widget(
            Paragraph::new(lines).scroll((self.scroll as u16, 0)),
            inner,
        );
    }
}
