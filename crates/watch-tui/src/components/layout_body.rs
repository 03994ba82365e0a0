//! LayoutBody — draws the screen chosen by `select_layout`.
//!
//! One arm per channel mode.  The panels inside keep their own scroll and
//! marquee state across mode changes.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use watch_proto::layout::LayoutView;
use watch_proto::schedule::{ChannelMode, ScheduleItem};
use watch_proto::ticker::fixture_segments;

use crate::action::Action;
use crate::app_state::AppState;
use crate::component::Component;
use crate::components::fixtures_panel::FixturesPanel;
use crate::components::scoreboard::Scoreboard;
use crate::components::ticker_bar::{emphasis_style, TickerBar};
use crate::components::up_next::draw_up_next;
use crate::theme::{mode_color, style_border, C_PRIMARY, C_SECONDARY};
use crate::widgets::pane_chrome::{draw_empty_state, loop_badge, pane_chrome};

pub struct LayoutBody {
    fixtures: FixturesPanel,
    scoreboard: Scoreboard,
    ticker: TickerBar,
}

impl LayoutBody {
    pub fn new() -> Self {
        Self {
            fixtures: FixturesPanel::new(),
            scoreboard: Scoreboard::new(),
            ticker: TickerBar::new(),
        }
    }
}

/// Channel banner: mode name over a subtitle, tinted with the mode color.
fn draw_banner(frame: &mut Frame, area: Rect, mode: ChannelMode, heading: &str, subtitle: &str) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(mode_color(mode)));
    let text = vec![
        Line::from(Span::styled(
            heading.to_string(),
            Style::default().fg(C_PRIMARY).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(subtitle.to_string(), Style::default().fg(C_SECONDARY))),
    ];
    frame.render_widget(
        Paragraph::new(text).block(block).wrap(Wrap { trim: true }),
        area,
    );
}

/// Fixtures with any goals or red cards, as ticker lines.
fn draw_recap(frame: &mut Frame, area: Rect, state: &AppState) {
    let block = pane_chrome("Match Recap", loop_badge(&state.ticker));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let lines: Vec<Line> = state
        .ticker
        .data
        .iter()
        .flat_map(|feed| feed.competitions.iter())
        .flat_map(|c| c.fixtures.iter())
        .filter(|f| {
            !(f.home_goalscorers.is_empty()
                && f.away_goalscorers.is_empty()
                && f.home_red_cards.is_empty()
                && f.away_red_cards.is_empty())
        })
        .map(|f| {
            Line::from(
                fixture_segments(f)
                    .into_iter()
                    .map(|seg| Span::styled(seg.text, emphasis_style(seg.emphasis)))
                    .collect::<Vec<_>>(),
            )
        })
        .collect();

    if lines.is_empty() {
        draw_empty_state(frame, inner, "No goals to recap", "Waiting for match updates...");
        return;
    }
    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
}

/// Split off an up-next strip at the bottom of `area` when there is an item.
fn with_up_next(frame: &mut Frame, area: Rect, next: Option<&ScheduleItem>) -> Rect {
    match next {
        Some(item) if area.height > 6 => {
            let [rest, strip] =
                Layout::vertical([Constraint::Fill(1), Constraint::Length(3)]).areas(area);
            draw_up_next(frame, strip, item);
            rest
        }
        _ => area,
    }
}

impl Component for LayoutBody {
    fn tick(&mut self, state: &AppState) {
        self.ticker.tick(state);
    }

    fn on_action(&mut self, action: &Action, state: &AppState) {
        match state.display_mode() {
            ChannelMode::Live => self.fixtures.on_action(action, state),
            _ => self.scoreboard.on_action(action, state),
        }
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, state: &AppState) {
        let layout = state.layout();
        let mode = layout.mode();
        match layout {
            LayoutView::Live { current, next, .. } => {
                let [banner, body, ticker] = Layout::vertical([
                    Constraint::Length(4),
                    Constraint::Fill(1),
                    Constraint::Length(3),
                ])
                .areas(area);
                let title = current
                    .map(|item| item.display_title())
                    .unwrap_or_else(|| "Live coverage".to_string());
                draw_banner(frame, banner, mode, &title, "Live scores from the grounds");
                let body = with_up_next(frame, body, next);
                self.fixtures.draw(frame, body, state);
                self.ticker.draw(frame, ticker, state);
            }
            LayoutView::News { next, subtitle } => {
                let [banner, body, ticker] = Layout::vertical([
                    Constraint::Length(4),
                    Constraint::Fill(1),
                    Constraint::Length(3),
                ])
                .areas(area);
                draw_banner(
                    frame,
                    banner,
                    mode,
                    &subtitle,
                    "Top stories and breaking news from around the football world.",
                );
                let body = with_up_next(frame, body, next);
                self.scoreboard.title = "Live Scores";
                self.scoreboard.draw(frame, body, state);
                self.ticker.draw(frame, ticker, state);
            }
            LayoutView::Podcast {
                next,
                title,
                description,
            } => {
                let body = with_up_next(frame, area, next);
                let [banner, rest] =
                    Layout::vertical([Constraint::Length(4), Constraint::Fill(1)]).areas(body);
                draw_banner(frame, banner, mode, &title, &description);
                let details = Block::default()
                    .borders(Borders::ALL)
                    .border_style(style_border());
                let inner = details.inner(rest);
                frame.render_widget(details, rest);
                draw_empty_state(frame, inner, "Now playing", "Episode details coming soon.");
            }
            LayoutView::Matchday => {
                let [body, ticker] =
                    Layout::vertical([Constraint::Fill(1), Constraint::Length(3)]).areas(area);
                self.scoreboard.title = "Today's Matches";
                self.scoreboard.draw(frame, body, state);
                self.ticker.draw(frame, ticker, state);
            }
            LayoutView::PostMatchday => {
                let [results, recap] =
                    Layout::vertical([Constraint::Percentage(55), Constraint::Fill(1)])
                        .areas(area);
                self.scoreboard.title = "Today's Results";
                self.scoreboard.draw(frame, results, state);
                draw_recap(frame, recap, state);
            }
            LayoutView::NoneMatchday => draw_empty_state(
                frame,
                area,
                "No Matches Today",
                "There are no matches scheduled for today. Check back on match days for live coverage and scores.",
            ),
            LayoutView::OffAir => draw_empty_state(
                frame,
                area,
                "Off Air",
                "Check back later for upcoming matches and live coverage.",
            ),
        }
    }
}
