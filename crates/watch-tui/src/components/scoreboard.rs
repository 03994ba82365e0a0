//! Scoreboard — every fixture of the day from the live ticker feed, grouped
//! by competition with matches in play first.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use watch_proto::fixture::FixtureStatus;
use watch_proto::ticker::TickerFixture;

use crate::action::Action;
use crate::app_state::AppState;
use crate::component::Component;
use crate::theme::{style_default, style_secondary, C_BADGE_LIVE, C_RED_CARD, C_SECONDARY};
use crate::widgets::pane_chrome::{draw_empty_state, draw_hint, loop_badge, pane_chrome};
use crate::widgets::text::{fit_width, fit_width_right};

/// In play, half time, not started, finished, then anything else.
pub fn status_rank(code: &str) -> u8 {
    let status = FixtureStatus::parse(code);
    if status.is_in_play() {
        return 0;
    }
    match status {
        FixtureStatus::HalfTime => 1,
        FixtureStatus::NotStarted => 2,
        FixtureStatus::FullTime => 3,
        _ => 4,
    }
}

pub struct Scoreboard {
    /// Pane title, set by the layout before draw.
    pub title: &'static str,
    scroll: usize,
}

impl Scoreboard {
    pub fn new() -> Self {
        Self {
            title: "Today's Matches",
            scroll: 0,
        }
    }
}

fn score(goals: Option<u32>) -> String {
    goals.map(|g| g.to_string()).unwrap_or_else(|| "-".into())
}

fn fixture_line(f: &TickerFixture, width: usize) -> Line<'static> {
    let team_col = width.saturating_sub(6 + 7 + 4) / 2;
    let in_play = FixtureStatus::parse(&f.status).is_in_play();
    let status_style = if in_play {
        Style::default().fg(C_BADGE_LIVE).add_modifier(Modifier::BOLD)
    } else {
        style_secondary()
    };
    let mut spans = vec![
        Span::styled(fit_width(&f.status, 6), status_style),
        Span::styled(fit_width_right(&f.home_team, team_col), style_default()),
        Span::styled(
            fit_width(
                &format!(" {} - {}", score(f.home_goals), score(f.away_goals)),
                7,
            ),
            style_default().add_modifier(Modifier::BOLD),
        ),
        Span::styled(fit_width(&f.away_team, team_col), style_default()),
    ];
    let reds = f.home_red_cards.len() + f.away_red_cards.len();
    if reds > 0 {
        spans.push(Span::styled(
            format!(" {}", "▮".repeat(reds.min(4))),
            Style::default().fg(C_RED_CARD),
        ));
    }
    Line::from(spans)
}

impl Component for Scoreboard {
    fn on_action(&mut self, action: &Action, _state: &AppState) {
        match action {
            Action::ScrollUp(n) => self.scroll = self.scroll.saturating_sub(*n),
            Action::ScrollDown(n) => self.scroll = self.scroll.saturating_add(*n),
            _ => {}
        }
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, state: &AppState) {
        let block = pane_chrome(self.title, loop_badge(&state.ticker));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if state.ticker.is_first_load() {
            draw_hint(frame, inner, " Loading matches…");
            return;
        }
        let competitions = state
            .ticker
            .data
            .as_ref()
            .map(|d| d.competitions.as_slice())
            .unwrap_or(&[]);
        if competitions.iter().all(|c| c.fixtures.is_empty()) {
            draw_empty_state(frame, inner, "No matches scheduled today", "Check back soon!");
            return;
        }

        let width = inner.width as usize;
        let mut lines = Vec::new();
        for competition in competitions.iter().filter(|c| !c.fixtures.is_empty()) {
            if !lines.is_empty() {
                lines.push(Line::from(""));
            }
            lines.push(Line::from(Span::styled(
                competition.competition_name.to_uppercase(),
                Style::default().fg(C_SECONDARY).add_modifier(Modifier::BOLD),
            )));
            let mut fixtures: Vec<&TickerFixture> = competition.fixtures.iter().collect();
            fixtures.sort_by_key(|f| status_rank(&f.status));
            lines.extend(fixtures.into_iter().map(|f| fixture_line(f, width)));
        }

        let max_scroll = lines.len().saturating_sub(inner.height as usize);
        self.scroll = self.scroll.min(max_scroll);
        frame.render_widget(
            Paragraph::new(lines).scroll((self.scroll as u16, 0)),
            inner,
        );
    }
}
