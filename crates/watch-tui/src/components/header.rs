//! Header — mode indicator, channel name and wall clock.

use chrono::Timelike;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use watch_proto::schedule::ChannelMode;

use crate::app_state::AppState;
use crate::theme::{mode_color, style_secondary, style_title, C_ACCENT, C_MUTED, C_PRIMARY};

pub fn draw_header(frame: &mut Frame, area: Rect, state: &AppState) {
    let [left, right] =
        Layout::horizontal([Constraint::Fill(1), Constraint::Length(24)]).areas(area);

    let mode = state.display_mode();
    // LIVE pulses once a second
    let dot_style = if mode == ChannelMode::Live && state.now.second() % 2 == 1 {
        Style::default().fg(mode_color(mode)).add_modifier(Modifier::DIM)
    } else {
        Style::default().fg(mode_color(mode))
    };

    let mut spans = vec![
        Span::styled(" ● ", dot_style),
        Span::styled(
            mode.label(),
            Style::default().fg(C_PRIMARY).add_modifier(Modifier::BOLD),
        ),
        Span::styled("   WATCH", style_title()),
    ];
    if state.mode_override.is_some() {
        spans.push(Span::styled(
            " DEV ",
            Style::default().fg(C_ACCENT).add_modifier(Modifier::REVERSED),
        ));
        spans.push(Span::styled(
            format!(" auto: {}", state.derived_mode().label()),
            Style::default().fg(C_MUTED),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), left);

    let clock = Line::from(vec![
        Span::styled(state.now.format("%a %d %b  ").to_string(), style_secondary()),
        Span::styled(state.now.format("%H:%M:%S ").to_string(), style_title()),
    ])
    .right_aligned();
    frame.render_widget(Paragraph::new(clock), right);
}
