//! Status bar — bottom line with poll health and keybindings.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use watch_proto::poller::{LoopPhase, LoopStatus};

use crate::app_state::AppState;
use crate::theme::{C_ACCENT, C_BADGE_LIVE, C_BADGE_PENDING, C_MUTED, C_SECONDARY, C_SEPARATOR};

const KEYS: &[(&str, &str)] = &[
    ("r", "refresh"),
    ("s", "schedule"),
    ("l", "layout"),
    ("0", "auto"),
    ("q", "quit"),
];

fn health_span<T>(name: &'static str, status: &LoopStatus<T>) -> Span<'static> {
    let color = match status.phase {
        LoopPhase::Ready => C_BADGE_LIVE,
        LoopPhase::Loading => C_BADGE_PENDING,
        LoopPhase::Error => C_ACCENT,
        LoopPhase::Idle => C_MUTED,
    };
    Span::styled(format!("● {} ", name), Style::default().fg(color))
}

pub fn draw_status_bar(frame: &mut Frame, area: Rect, state: &AppState) {
    let [left, right] =
        Layout::horizontal([Constraint::Fill(1), Constraint::Length(48)]).areas(area);

    let mut spans = vec![
        health_span("schedule", &state.scheduler),
        health_span("fixtures", &state.fixtures),
        health_span("ticker", &state.ticker),
    ];
    if let Some(at) = state.scheduler.last_success {
        spans.push(Span::styled(
            format!(" updated {}", at.format("%H:%M:%S")),
            Style::default().fg(C_SECONDARY),
        ));
    }
    if let Some(err) = &state.scheduler.error {
        spans.push(Span::styled(format!("  {}", err), Style::default().fg(C_ACCENT)));
    }
    if let Some(addr) = &state.http_address {
        spans.push(Span::styled(
            format!("  api {}", addr),
            Style::default().fg(C_MUTED),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), left);

    let mut keys = Vec::new();
    for (i, (key, label)) in KEYS.iter().enumerate() {
        if i > 0 {
            keys.push(Span::styled(" │ ", Style::default().fg(C_SEPARATOR)));
        }
        keys.push(Span::styled(*key, Style::default().fg(C_SECONDARY)));
        keys.push(Span::styled(format!(" {}", label), Style::default().fg(C_MUTED)));
    }
    frame.render_widget(Paragraph::new(Line::from(keys).right_aligned()), right);
}
