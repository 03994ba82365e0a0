//! TickerBar — one-line scrolling strip of every fixture of the day, with
//! the latest goal of each match picked out.

use chrono::{DateTime, Local};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthChar;
use watch_proto::protocol::LiveTickerResponse;
use watch_proto::ticker::{fixture_segments, Emphasis};

use crate::app_state::AppState;
use crate::component::Component;
use crate::theme::{
    style_border, style_default, style_highlight, C_MUTED, C_RED_CARD, C_SECONDARY,
};

const FIXTURE_GAP: &str = "   ·   ";
const LOOP_GAP: &str = "          ";

pub fn emphasis_style(emphasis: Emphasis) -> Style {
    match emphasis {
        Emphasis::Plain => style_default(),
        Emphasis::Highlight => style_highlight(),
        Emphasis::RedCard => Style::default().fg(C_RED_CARD),
    }
}

fn push_str(cells: &mut Vec<(char, Style)>, text: &str, style: Style) {
    cells.extend(text.chars().map(|c| (c, style)));
}

/// Flatten the feed into styled characters, competitions in feed order.
pub fn ticker_cells(feed: &LiveTickerResponse) -> Vec<(char, Style)> {
    let mut cells = Vec::new();
    let sep = Style::default().fg(C_MUTED);
    for competition in feed.competitions.iter().filter(|c| !c.fixtures.is_empty()) {
        if !cells.is_empty() {
            push_str(&mut cells, FIXTURE_GAP, sep);
        }
        push_str(
            &mut cells,
            &format!("{}  ", competition.competition_name.to_uppercase()),
            Style::default().fg(C_SECONDARY).add_modifier(Modifier::BOLD),
        );
        for (i, fixture) in competition.fixtures.iter().enumerate() {
            if i > 0 {
                push_str(&mut cells, FIXTURE_GAP, sep);
            }
            for seg in fixture_segments(fixture) {
                push_str(&mut cells, &seg.text, emphasis_style(seg.emphasis));
            }
        }
    }
    cells
}

fn total_width(cells: &[(char, Style)]) -> usize {
    cells.iter().map(|(c, _)| c.width().unwrap_or(0)).sum()
}

/// The `width` columns of the looping strip starting `offset` chars in.
/// A strip that already fits is shown as-is without scrolling.
pub fn marquee_window(cells: &[(char, Style)], offset: usize, width: usize) -> Line<'static> {
    if cells.is_empty() || width == 0 {
        return Line::default();
    }
    let fits = total_width(cells) <= width;
    let looped: Vec<(char, Style)> = if fits {
        cells.to_vec()
    } else {
        let mut v = cells.to_vec();
        push_str(&mut v, LOOP_GAP, Style::default());
        v
    };
    let start = if fits { 0 } else { offset % looped.len() };

    let mut spans: Vec<Span<'static>> = Vec::new();
    let mut run = String::new();
    let mut run_style = looped[start].1;
    let mut used = 0;
    for i in 0..looped.len() {
        let (c, style) = looped[(start + i) % looped.len()];
        let cw = c.width().unwrap_or(0);
        if used + cw > width {
            break;
        }
        if style != run_style && !run.is_empty() {
            spans.push(Span::styled(std::mem::take(&mut run), run_style));
        }
        run_style = style;
        run.push(c);
        used += cw;
    }
    if !run.is_empty() {
        spans.push(Span::styled(run, run_style));
    }
    Line::from(spans)
}

pub struct TickerBar {
    offset: usize,
    cells: Vec<(char, Style)>,
    /// `last_success` of the feed `cells` was built from.
    built_from: Option<DateTime<Local>>,
}

impl TickerBar {
    pub fn new() -> Self {
        Self {
            offset: 0,
            cells: Vec::new(),
            built_from: None,
        }
    }

    /// Rebuild the strip only when a new feed has arrived.
    fn sync_cells(&mut self, state: &AppState) {
        if self.built_from == state.ticker.last_success {
            return;
        }
        self.cells = state
            .ticker
            .data
            .as_ref()
            .map(|feed| ticker_cells(feed))
            .unwrap_or_default();
        self.built_from = state.ticker.last_success;
    }
}

impl Component for TickerBar {
    fn tick(&mut self, state: &AppState) {
        self.sync_cells(state);
        self.offset = self.offset.wrapping_add(1);
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, state: &AppState) {
        let block = Block::default()
            .borders(Borders::TOP | Borders::BOTTOM)
            .border_style(style_border());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let line = if self.cells.is_empty() {
            let text = if state.ticker.is_first_load() {
                " Loading scores…"
            } else {
                " Waiting for match updates..."
            };
            Line::from(Span::styled(text, Style::default().fg(C_MUTED)))
        } else {
            marquee_window(&self.cells, self.offset, inner.width as usize)
        };
        frame.render_widget(Paragraph::new(line), inner);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(s: &str) -> Vec<(char, Style)> {
        s.chars().map(|c| (c, Style::default())).collect()
    }

    fn text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_short_strip_does_not_scroll() {
        let cells = plain("A 1 - 0 B");
        assert_eq!(text(&marquee_window(&cells, 0, 20)), "A 1 - 0 B");
        assert_eq!(text(&marquee_window(&cells, 7, 20)), "A 1 - 0 B");
    }

    #[test]
    fn test_long_strip_wraps_around() {
        let cells = plain("abcdefghij");
        assert_eq!(text(&marquee_window(&cells, 0, 4)), "abcd");
        assert_eq!(text(&marquee_window(&cells, 8, 4)), "ij  ");
        // 10 chars + loop gap of 10
        assert_eq!(text(&marquee_window(&cells, 20, 4)), "abcd");
    }

    #[test]
    fn test_wide_chars_never_overflow() {
        let cells = plain("東京東京東京東京");
        let line = marquee_window(&cells, 1, 5);
        assert_eq!(unicode_width::UnicodeWidthStr::width(text(&line).as_str()), 4);
    }

    #[test]
    fn test_empty_feed_has_no_cells() {
        assert!(ticker_cells(&LiveTickerResponse::default()).is_empty());
    }

    #[test]
    fn test_cells_rebuilt_only_for_a_new_feed() {
        use std::sync::Arc;
        use watch_proto::ticker::{TickerCompetition, TickerFixture};

        let feed = |home: &str| LiveTickerResponse {
            competitions: vec![TickerCompetition {
                competition_name: "League".into(),
                fixtures: vec![TickerFixture {
                    home_team: home.into(),
                    away_team: "Away".into(),
                    ..Default::default()
                }],
                ..Default::default()
            }],
            ..Default::default()
        };
        let mut state = AppState::new(None);
        let mut bar = TickerBar::new();
        bar.tick(&state);
        assert!(bar.cells.is_empty());

        let fetched_at = Local::now();
        state.ticker.data = Some(Arc::new(feed("Arsenal")));
        state.ticker.last_success = Some(fetched_at);
        bar.tick(&state);
        let first: String = bar.cells.iter().map(|(c, _)| c).collect();
        assert!(first.contains("Arsenal"));

        // Same fetch: the strip is kept as built
        state.ticker.data = Some(Arc::new(feed("Chelsea")));
        bar.tick(&state);
        let kept: String = bar.cells.iter().map(|(c, _)| c).collect();
        assert_eq!(kept, first);

        state.ticker.last_success = Some(fetched_at + chrono::Duration::seconds(120));
        bar.tick(&state);
        let rebuilt: String = bar.cells.iter().map(|(c, _)| c).collect();
        assert!(rebuilt.contains("Chelsea"));
    }
}
