//! Fixture — one match and its latest upstream state.
//!
//! Fixtures are created and mutated upstream; this client only ever displays
//! the latest fetched copy.

use serde::{Deserialize, Deserializer, Serialize};

use crate::schedule::FixtureId;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Fixture {
    pub fixture_id: FixtureId,
    #[serde(default)]
    pub competition_id: u64,
    #[serde(default)]
    pub competition_name: String,
    #[serde(default)]
    pub kickoff_utc: String,
    /// Kickoff as unix seconds.
    #[serde(default)]
    pub timestamp: i64,
    #[serde(default)]
    pub status_short: String,
    #[serde(default)]
    pub status_long: String,
    #[serde(default)]
    pub elapsed: Option<u32>,
    /// Added minutes on top of `elapsed`.  Upstream sends this as a number
    /// or a numeric string; anything else is dropped.
    #[serde(default, rename = "status_extra", deserialize_with = "lenient_minutes")]
    pub extra_time: Option<u32>,
    #[serde(default)]
    pub home_team_name: String,
    #[serde(default)]
    pub home_team_logo: String,
    #[serde(default)]
    pub home_goals: Option<u32>,
    #[serde(default)]
    pub away_team_name: String,
    #[serde(default)]
    pub away_team_logo: String,
    #[serde(default)]
    pub away_goals: Option<u32>,
}

fn lenient_minutes<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match raw {
        Some(serde_json::Value::Number(n)) => n.as_u64().and_then(|v| u32::try_from(v).ok()),
        Some(serde_json::Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

/// Interpretation of the upstream short status code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FixtureStatus {
    NotStarted,
    FirstHalf,
    HalfTime,
    SecondHalf,
    ExtraTime,
    Live,
    FullTime,
    Postponed,
    Cancelled,
    Suspended,
    Other(String),
}

impl FixtureStatus {
    pub fn parse(code: &str) -> Self {
        match code.trim() {
            "NS" | "TBD" => FixtureStatus::NotStarted,
            "1H" => FixtureStatus::FirstHalf,
            "HT" => FixtureStatus::HalfTime,
            "2H" => FixtureStatus::SecondHalf,
            "ET" => FixtureStatus::ExtraTime,
            "LIVE" => FixtureStatus::Live,
            "FT" | "AET" | "PEN" => FixtureStatus::FullTime,
            "PST" => FixtureStatus::Postponed,
            "CANC" => FixtureStatus::Cancelled,
            "SUSP" => FixtureStatus::Suspended,
            other => FixtureStatus::Other(other.to_string()),
        }
    }

    /// Ball is rolling (the clock is running).
    pub fn is_in_play(&self) -> bool {
        matches!(
            self,
            FixtureStatus::FirstHalf
                | FixtureStatus::SecondHalf
                | FixtureStatus::ExtraTime
                | FixtureStatus::Live
        )
    }
}

impl Fixture {
    pub fn status(&self) -> FixtureStatus {
        FixtureStatus::parse(&self.status_short)
    }

    pub fn kickoff(&self) -> Option<chrono::DateTime<chrono::Utc>> {
        chrono::DateTime::parse_from_rfc3339(&self.kickoff_utc)
            .map(|dt| dt.with_timezone(&chrono::Utc))
            .ok()
            .or_else(|| chrono::DateTime::from_timestamp(self.timestamp, 0))
            .filter(|dt| dt.timestamp() > 0)
    }

    /// Short status cell: clock while in play, `HT`/`FT`, local kickoff time
    /// before the start, otherwise the raw code.
    pub fn status_display(&self) -> String {
        let status = self.status();
        if status.is_in_play() {
            return match (self.elapsed, self.extra_time) {
                (Some(min), Some(extra)) if extra > 0 => format!("{}+{}'", min, extra),
                (Some(min), _) if min > 0 => format!("{}'", min),
                _ => "LIVE".to_string(),
            };
        }
        match status {
            FixtureStatus::HalfTime => "HT".to_string(),
            FixtureStatus::FullTime => "FT".to_string(),
            FixtureStatus::NotStarted => self
                .kickoff()
                .map(|k| k.with_timezone(&chrono::Local).format("%H:%M").to_string())
                .unwrap_or_else(|| "NS".to_string()),
            _ => self.status_short.clone(),
        }
    }

    /// `"2 - 1"`, with `-` standing in for unknown goal counts.
    pub fn score_display(&self) -> String {
        let goals = |g: Option<u32>| g.map(|v| v.to_string()).unwrap_or_else(|| "-".into());
        format!("{} - {}", goals(self.home_goals), goals(self.away_goals))
    }
}
