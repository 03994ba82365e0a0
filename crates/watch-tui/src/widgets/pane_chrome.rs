//! PaneChrome — standardized bordered pane with a status badge.

use crate::theme::{style_border, C_BADGE_ERR, C_BADGE_PENDING, C_MUTED, C_PRIMARY, C_SECONDARY};
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use watch_proto::poller::{LoopPhase, LoopStatus};

/// A badge shown in the top-right of the pane header (e.g., "LOADING", "STALE").
pub struct Badge<'a> {
    pub text: &'a str,
    pub color: Color,
}

pub fn pane_chrome<'a>(title: &'a str, badge: Option<Badge<'a>>) -> Block<'a> {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(style_border())
        .title(Line::from(Span::styled(
            format!(" {} ", title),
            Style::default().fg(C_PRIMARY).add_modifier(Modifier::BOLD),
        )));

    if let Some(b) = badge {
        block.title_top(
            Line::from(Span::styled(
                format!(" {} ", b.text),
                Style::default().fg(b.color).add_modifier(Modifier::BOLD),
            ))
            .right_aligned(),
        )
    } else {
        block
    }
}

/// Badge for a polling slot: loading only on the first fetch, stale when the
/// last fetch failed but older data is still on screen.
pub fn loop_badge<T>(status: &LoopStatus<T>) -> Option<Badge<'static>> {
    match status.phase {
        LoopPhase::Loading if status.data.is_none() => Some(Badge {
            text: "LOADING",
            color: C_BADGE_PENDING,
        }),
        LoopPhase::Error if status.data.is_some() => Some(Badge {
            text: "STALE",
            color: C_BADGE_PENDING,
        }),
        LoopPhase::Error => Some(Badge {
            text: "ERR",
            color: C_BADGE_ERR,
        }),
        _ => None,
    }
}

/// Centered headline plus one line of detail, for layouts with nothing to show.
pub fn draw_empty_state(frame: &mut Frame, area: Rect, headline: &str, detail: &str) {
    let [_, middle, _] = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(3),
        Constraint::Fill(1),
    ])
    .areas(area);

    let text = vec![
        Line::from(Span::styled(
            headline,
            Style::default().fg(C_PRIMARY).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(detail, Style::default().fg(C_SECONDARY))),
    ];
    frame.render_widget(
        Paragraph::new(text)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        middle,
    );
}

/// Single muted line, e.g. "Loading fixtures…".
pub fn draw_hint(frame: &mut Frame, area: Rect, text: &str) {
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(text, Style::default().fg(C_MUTED)))),
        area,
    );
}
