//! Live ticker view — all of today's fixtures with their goal and red-card
//! events, as computed upstream.
//!
//! The client treats the event lists as opaque apart from working out which
//! goal was the most recent one, so the ticker can highlight it.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::schedule::FixtureId;

/// A goal or a red card.  `time` is display-ready, e.g. `"45+2'"`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TickerEvent {
    #[serde(default)]
    pub player: String,
    #[serde(default)]
    pub time: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TickerFixture {
    pub fixture_id: FixtureId,
    #[serde(default)]
    pub home_team: String,
    #[serde(default)]
    pub away_team: String,
    #[serde(default)]
    pub home_goals: Option<u32>,
    #[serde(default)]
    pub away_goals: Option<u32>,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub home_goalscorers: Vec<TickerEvent>,
    #[serde(default)]
    pub away_goalscorers: Vec<TickerEvent>,
    #[serde(default)]
    pub home_red_cards: Vec<TickerEvent>,
    #[serde(default)]
    pub away_red_cards: Vec<TickerEvent>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TickerCompetition {
    #[serde(default)]
    pub competition_id: String,
    #[serde(default)]
    pub competition_name: String,
    #[serde(default)]
    pub fixtures: Vec<TickerFixture>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Home,
    Away,
}

impl Side {
    fn opposite(self) -> Self {
        match self {
            Side::Home => Side::Away,
            Side::Away => Side::Home,
        }
    }
}

/// The most recent goal of a fixture.  `side` is the team that benefited,
/// which for an own goal is not the team whose list the goal sits in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LatestGoal {
    pub side: Side,
    /// The list the goal was found in.
    pub listed_under: Side,
    pub player: String,
    pub time: String,
}

fn goal_time_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\d+)(?:\+(\d+))?").expect("static regex"))
}

/// `"45+2'"` -> 47, `"90'"` -> 90.  Unparseable input is 0.
pub fn parse_goal_time(time: &str) -> u32 {
    let Some(caps) = goal_time_re().captures(time) else {
        return 0;
    };
    let base: u32 = caps[1].parse().unwrap_or(0);
    let extra: u32 = caps
        .get(2)
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0);
    base.saturating_add(extra)
}

/// Text heuristic; upstream gives no structured own-goal flag on ticker events.
pub fn is_own_goal(player: &str) -> bool {
    let p = player.to_lowercase();
    p.contains("(og)") || p.contains("own goal")
}

/// Home scorers are scanned before away scorers and only a strictly later
/// time replaces the running best, so ties go to the first one seen and
/// goals with no parseable time never count.
pub fn latest_goal(fixture: &TickerFixture) -> Option<LatestGoal> {
    let mut best: Option<(u32, Side, &TickerEvent)> = None;
    let lists = [
        (Side::Home, &fixture.home_goalscorers),
        (Side::Away, &fixture.away_goalscorers),
    ];
    for (side, goals) in lists {
        for goal in goals {
            let t = parse_goal_time(&goal.time);
            if t > best.map(|(bt, _, _)| bt).unwrap_or(0) {
                best = Some((t, side, goal));
            }
        }
    }

    best.map(|(_, listed_under, goal)| LatestGoal {
        side: if is_own_goal(&goal.player) {
            listed_under.opposite()
        } else {
            listed_under
        },
        listed_under,
        player: goal.player.clone(),
        time: goal.time.clone(),
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Emphasis {
    Plain,
    /// Team or scorer of the latest goal.
    Highlight,
    RedCard,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickerSegment {
    pub text: String,
    pub emphasis: Emphasis,
}

impl TickerSegment {
    fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            emphasis: Emphasis::Plain,
        }
    }

    fn styled(text: impl Into<String>, emphasis: Emphasis) -> Self {
        Self {
            text: text.into(),
            emphasis,
        }
    }
}

/// Render one fixture as ticker segments:
/// `Home 2 - 1 Away (Saka 12', Son 40', Rice 77' / Romero 55')`.
pub fn fixture_segments(fixture: &TickerFixture) -> Vec<TickerSegment> {
    let latest = latest_goal(fixture);
    let highlight_if = |on: bool| if on { Emphasis::Highlight } else { Emphasis::Plain };

    let mut out = vec![
        TickerSegment::styled(
            fixture.home_team.clone(),
            highlight_if(latest.as_ref().is_some_and(|g| g.side == Side::Home)),
        ),
        TickerSegment::plain(format!(
            " {} - {} ",
            fixture.home_goals.unwrap_or(0),
            fixture.away_goals.unwrap_or(0)
        )),
        TickerSegment::styled(
            fixture.away_team.clone(),
            highlight_if(latest.as_ref().is_some_and(|g| g.side == Side::Away)),
        ),
    ];

    let is_latest = |side: Side, goal: &TickerEvent| {
        latest.as_ref().is_some_and(|g| {
            g.listed_under == side && g.player == goal.player && g.time == goal.time
        })
    };
    let goals: Vec<TickerSegment> = fixture
        .home_goalscorers
        .iter()
        .map(|g| (Side::Home, g))
        .chain(fixture.away_goalscorers.iter().map(|g| (Side::Away, g)))
        .map(|(side, g)| {
            TickerSegment::styled(
                format!("{} {}", g.player, g.time),
                highlight_if(is_latest(side, g)),
            )
        })
        .collect();
    let reds: Vec<String> = fixture
        .home_red_cards
        .iter()
        .chain(fixture.away_red_cards.iter())
        .map(|r| format!("{} {}", r.player, r.time))
        .collect();

    if goals.is_empty() && reds.is_empty() {
        return out;
    }

    out.push(TickerSegment::plain(" ("));
    for (i, seg) in goals.into_iter().enumerate() {
        if i > 0 {
            out.push(TickerSegment::plain(", "));
        }
        out.push(seg);
    }
    if !reds.is_empty() {
        if out.len() > 4 {
            out.push(TickerSegment::plain(" / "));
        }
        out.push(TickerSegment::styled(reds.join(", "), Emphasis::RedCard));
    }
    out.push(TickerSegment::plain(")"));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ev(player: &str, time: &str) -> TickerEvent {
        TickerEvent {
            player: player.into(),
            time: time.into(),
        }
    }

    fn fixture() -> TickerFixture {
        TickerFixture {
            fixture_id: 1,
            home_team: "Arsenal".into(),
            away_team: "Spurs".into(),
            home_goals: Some(2),
            away_goals: Some(1),
            status: "2H".into(),
            home_goalscorers: vec![ev("Saka", "12'"), ev("Rice", "45+2'")],
            away_goalscorers: vec![ev("Son", "40'")],
            ..Default::default()
        }
    }

    #[test]
    fn test_parse_goal_time() {
        assert_eq!(parse_goal_time("45+2'"), 47);
        assert_eq!(parse_goal_time("90'"), 90);
        assert_eq!(parse_goal_time("?"), 0);
        assert_eq!(parse_goal_time(""), 0);
    }

    #[test]
    fn test_latest_goal_uses_added_time() {
        let g = latest_goal(&fixture()).unwrap();
        assert_eq!(g.side, Side::Home);
        assert_eq!(g.player, "Rice");
        assert_eq!(g.time, "45+2'");
    }

    #[test]
    fn test_own_goal_credits_other_side() {
        let mut f = fixture();
        f.home_goalscorers.clear();
        f.away_goalscorers = vec![ev("Son", "40'"), ev("Romero (OG)", "88'")];
        let g = latest_goal(&f).unwrap();
        assert_eq!(g.listed_under, Side::Away);
        assert_eq!(g.side, Side::Home);
    }

    #[test]
    fn test_tie_goes_to_home_list() {
        let mut f = fixture();
        f.home_goalscorers = vec![ev("Saka", "50'")];
        f.away_goalscorers = vec![ev("Son", "50'")];
        assert_eq!(latest_goal(&f).unwrap().player, "Saka");
    }

    #[test]
    fn test_no_goals_no_latest() {
        let mut f = fixture();
        f.home_goalscorers.clear();
        f.away_goalscorers.clear();
        assert!(latest_goal(&f).is_none());
        let segs = fixture_segments(&f);
        assert_eq!(segs.len(), 3);
        assert_eq!(segs[1].text, " 2 - 1 ");
    }

    #[test]
    fn test_segments_highlight_latest_scorer_and_reds() {
        let mut f = fixture();
        f.away_red_cards = vec![ev("Romero", "55'")];
        let segs = fixture_segments(&f);
        let text: String = segs.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(
            text,
            "Arsenal 2 - 1 Spurs (Saka 12', Rice 45+2', Son 40' / Romero 55')"
        );
        let highlighted: Vec<&str> = segs
            .iter()
            .filter(|s| s.emphasis == Emphasis::Highlight)
            .map(|s| s.text.as_str())
            .collect();
        assert_eq!(highlighted, vec!["Arsenal", "Rice 45+2'"]);
        assert_eq!(segs.iter().filter(|s| s.emphasis == Emphasis::RedCard).count(), 1);
    }

    #[test]
    fn test_reds_only() {
        let mut f = fixture();
        f.home_goalscorers.clear();
        f.away_goalscorers.clear();
        f.home_red_cards = vec![ev("Xhaka", "30'")];
        let text: String = fixture_segments(&f).iter().map(|s| s.text.as_str()).collect();
        assert_eq!(text, "Arsenal 2 - 1 Spurs (Xhaka 30')");
    }

    #[test]
    fn test_decode_wire_shape() {
        let json = r#"{ "competitionId": "39", "competitionName": "PREMIER LEAGUE",
            "fixtures": [ { "fixtureId": 5, "homeTeam": "A", "awayTeam": "B",
              "homeGoals": null, "awayGoals": 0, "status": "NS",
              "homeGoalscorers": [], "awayGoalscorers": [],
              "homeRedCards": [], "awayRedCards": [] } ] }"#;
        let c: TickerCompetition = serde_json::from_str(json).unwrap();
        assert_eq!(c.fixtures[0].fixture_id, 5);
        assert_eq!(c.fixtures[0].home_goals, None);
    }
}
