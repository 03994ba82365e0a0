//! FixturesPanel — the fixtures of the current LIVE slot, in schedule order.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use watch_proto::fixture::Fixture;
use watch_proto::navigator;
use watch_proto::schedule::FixtureId;

use crate::action::Action;
use crate::app_state::AppState;
use crate::component::Component;
use crate::theme::{style_default, style_secondary, C_BADGE_LIVE, C_MUTED, C_SECONDARY};
use crate::widgets::pane_chrome::{draw_empty_state, draw_hint, loop_badge, pane_chrome};
use crate::widgets::text::{fit_width, fit_width_right};

const STATUS_COL: usize = 7;
const SCORE_COL: usize = 7;

pub struct FixturesPanel {
    scroll: usize,
}

impl FixturesPanel {
    pub fn new() -> Self {
        Self { scroll: 0 }
    }
}

/// Fixtures in the order of `ids`.  Ids the backend did not return are skipped.
pub fn ordered_fixtures<'a>(ids: &[FixtureId], fixtures: &'a [Fixture]) -> Vec<&'a Fixture> {
    ids.iter()
        .filter_map(|id| fixtures.iter().find(|f| f.fixture_id == *id))
        .collect()
}

fn fixture_line(f: &Fixture, width: usize) -> Line<'static> {
    let team_col = width.saturating_sub(STATUS_COL + SCORE_COL + 2) / 2;
    let status_style = if f.status().is_in_play() {
        Style::default().fg(C_BADGE_LIVE).add_modifier(Modifier::BOLD)
    } else {
        style_secondary()
    };
    Line::from(vec![
        Span::styled(fit_width(&f.status_display(), STATUS_COL), status_style),
        Span::styled(fit_width_right(&f.home_team_name, team_col), style_default()),
        Span::styled(
            fit_width(&format!(" {}", f.score_display()), SCORE_COL),
            style_default().add_modifier(Modifier::BOLD),
        ),
        Span::styled(fit_width(&f.away_team_name, team_col), style_default()),
    ])
}

impl Component for FixturesPanel {
    fn on_action(&mut self, action: &Action, _state: &AppState) {
        match action {
            Action::ScrollUp(n) => self.scroll = self.scroll.saturating_sub(*n),
            Action::ScrollDown(n) => self.scroll = self.scroll.saturating_add(*n),
            _ => {}
        }
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, state: &AppState) {
        let block = pane_chrome("Live Fixtures", loop_badge(&state.fixtures));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let ids = navigator::fixture_ids_for_live(state.snapshot());
        if state.fixtures.is_first_load() {
            draw_hint(frame, inner, " Loading fixtures…");
            return;
        }
        let fixtures = state
            .fixtures
            .data
            .as_ref()
            .map(|d| ordered_fixtures(ids, &d.fixtures))
            .unwrap_or_default();
        if fixtures.is_empty() {
            draw_empty_state(
                frame,
                inner,
                "No live fixtures",
                "Scores appear here once the live block starts.",
            );
            return;
        }

        let width = inner.width as usize;
        let mut lines = Vec::new();
        let mut competition: Option<&str> = None;
        for f in &fixtures {
            if competition != Some(f.competition_name.as_str()) {
                competition = Some(f.competition_name.as_str());
                if !lines.is_empty() {
                    lines.push(Line::from(""));
                }
                lines.push(Line::from(Span::styled(
                    f.competition_name.to_uppercase(),
                    Style::default().fg(C_SECONDARY).add_modifier(Modifier::BOLD),
                )));
            }
            lines.push(fixture_line(f, width));
        }
        if fixtures.len() < ids.len() {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                format!("{} of {} fixtures available", fixtures.len(), ids.len()),
                Style::default().fg(C_MUTED),
            )));
        }

        let max_scroll = lines.len().saturating_sub(inner.height as usize);
        self.scroll = self.scroll.min(max_scroll);
        frame.render_widget(
            Paragraph::new(lines).scroll((self.scroll as u16, 0)),
            inner,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture(id: FixtureId) -> Fixture {
        Fixture {
            fixture_id: id,
            home_team_name: format!("Home {}", id),
            away_team_name: format!("Away {}", id),
            ..Default::default()
        }
    }

    #[test]
    fn test_ordered_by_schedule_and_skips_missing() {
        let fixtures = vec![fixture(3), fixture(1)];
        let ordered: Vec<FixtureId> = ordered_fixtures(&[1, 2, 3], &fixtures)
            .iter()
            .map(|f| f.fixture_id)
            .collect();
        assert_eq!(ordered, vec![1, 3]);
    }

    #[test]
    fn test_fixture_line_fits_width() {
        let mut f = fixture(1);
        f.status_short = "FT".into();
        f.home_goals = Some(2);
        f.away_goals = Some(0);
        let line = fixture_line(&f, 40);
        let text: String = line.spans.iter().map(|s| s.content.as_ref()).collect();
        assert!(text.starts_with("FT"));
        assert!(text.contains("2 - 0"));
        assert!(unicode_width::UnicodeWidthStr::width(text.as_str()) <= 40);
    }
}
