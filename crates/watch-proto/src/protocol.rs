//! Response bodies of the backend functions.
//!
//! Every field carries a serde default: the backend answers with partial
//! bodies on its error paths and those still count as data.

use serde::{Deserialize, Deserializer, Serialize};

use crate::fixture::Fixture;
use crate::schedule::{ChannelMode, FixtureId, ScheduleSnapshot};
use crate::ticker::TickerCompetition;

pub const SCHEDULER_STATE: &str = "get-scheduler-state";
pub const FIXTURES_BY_IDS: &str = "get-fixtures-by-ids";
pub const LIVE_TICKER: &str = "get-live-ticker";

/// Epoch milliseconds as sent by the data functions.  Numeric strings and
/// RFC 3339 timestamps are accepted too; anything else is dropped.
fn lenient_epoch_ms<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match raw {
        Some(serde_json::Value::Number(n)) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Some(serde_json::Value::String(s)) => s.trim().parse().ok().or_else(|| {
            chrono::DateTime::parse_from_rfc3339(s.trim())
                .ok()
                .map(|dt| dt.timestamp_millis())
        }),
        _ => None,
    })
}

/// `get-scheduler-state`.  On backend failure this is still a 200 with
/// `mode = OFF_AIR`, no bundle and `error` set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchedulerResponse {
    #[serde(default, deserialize_with = "crate::schedule::lenient_mode")]
    pub mode: Option<ChannelMode>,
    #[serde(default)]
    pub bundle: Option<ScheduleSnapshot>,
    #[serde(default)]
    pub last_updated: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixturesRequest {
    pub fixture_ids: Vec<FixtureId>,
}

/// `get-fixtures-by-ids`.  Ids the backend does not know are simply absent
/// from `fixtures`, so `found` can be lower than `requested`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixturesResponse {
    #[serde(default)]
    pub fixtures: Vec<Fixture>,
    #[serde(default)]
    pub requested: usize,
    #[serde(default)]
    pub found: usize,
    /// Epoch milliseconds.
    #[serde(default, deserialize_with = "lenient_epoch_ms")]
    pub last_updated: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FixturesResponse {
    /// Result for an empty id list, produced without asking the backend.
    pub fn empty() -> Self {
        Self::default()
    }
}

/// `get-live-ticker`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveTickerResponse {
    #[serde(default)]
    pub competitions: Vec<TickerCompetition>,
    #[serde(default)]
    pub date: Option<String>,
    /// Epoch milliseconds.
    #[serde(default, deserialize_with = "lenient_epoch_ms")]
    pub last_updated: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl LiveTickerResponse {
    pub fn fixture_count(&self) -> usize {
        self.competitions.iter().map(|c| c.fixtures.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scheduler_fallback_body() {
        let body = r#"{ "mode": "OFF_AIR", "bundle": null,
            "lastUpdated": "2026-10-18T12:00:00Z", "error": "db unavailable" }"#;
        let r: SchedulerResponse = serde_json::from_str(body).unwrap();
        assert_eq!(r.mode, Some(ChannelMode::OffAir));
        assert!(r.bundle.is_none());
        assert_eq!(r.error.as_deref(), Some("db unavailable"));
    }

    #[test]
    fn test_scheduler_unknown_mode_is_absent() {
        let r: SchedulerResponse = serde_json::from_str(r#"{ "mode": "HALFTIME_SHOW" }"#).unwrap();
        assert_eq!(r.mode, None);
    }

    #[test]
    fn test_fixtures_request_and_partial_response() {
        let req = FixturesRequest {
            fixture_ids: vec![1, 2],
        };
        assert_eq!(serde_json::to_string(&req).unwrap(), r#"{"fixtureIds":[1,2]}"#);

        let r: FixturesResponse = serde_json::from_str(
            r#"{ "fixtures": [ { "fixture_id": 1 } ], "requested": 2, "found": 1 }"#,
        )
        .unwrap();
        assert_eq!(r.fixtures.len(), 1);
        assert_eq!(r.requested, 2);
        assert!(r.last_updated.is_none());
    }

    #[test]
    fn test_ticker_count() {
        let r: LiveTickerResponse = serde_json::from_str(
            r#"{ "competitions": [
                { "competitionName": "A", "fixtures": [ { "fixtureId": 1 }, { "fixtureId": 2 } ] },
                { "competitionName": "B", "fixtures": [ { "fixtureId": 3 } ] } ],
              "date": "2026-10-18" }"#,
        )
        .unwrap();
        assert_eq!(r.fixture_count(), 3);
    }

    #[test]
    fn test_data_functions_send_epoch_millis() {
        let r: LiveTickerResponse = serde_json::from_str(
            r#"{ "competitions": [], "date": "2026-10-18", "lastUpdated": 1760788800000 }"#,
        )
        .unwrap();
        assert_eq!(r.last_updated, Some(1760788800000));
        assert_eq!(r.date.as_deref(), Some("2026-10-18"));

        let r: FixturesResponse = serde_json::from_str(
            r#"{ "fixtures": [ { "fixture_id": 5, "status_short": "1H", "home_goals": 1 } ],
                 "requested": 1, "found": 1, "lastUpdated": 1760788800000 }"#,
        )
        .unwrap();
        assert_eq!(r.last_updated, Some(1760788800000));
        assert_eq!(r.fixtures[0].fixture_id, 5);
    }

    #[test]
    fn test_odd_last_updated_values_never_fail_the_body() {
        let r: FixturesResponse =
            serde_json::from_str(r#"{ "requested": 0, "lastUpdated": "1760788800000" }"#).unwrap();
        assert_eq!(r.last_updated, Some(1760788800000));

        let r: LiveTickerResponse =
            serde_json::from_str(r#"{ "lastUpdated": "2025-10-18T12:00:00Z" }"#).unwrap();
        assert_eq!(r.last_updated, Some(1760788800000));

        let r: LiveTickerResponse =
            serde_json::from_str(r#"{ "lastUpdated": { "at": 1 } }"#).unwrap();
        assert_eq!(r.last_updated, None);
    }
}
