//! Scheduler bundle — one polled read of what the channel scheduler says is on.
//!
//! A bundle is replaced wholesale on every poll; nothing here is patched in
//! place.  Every field defaults when absent so a partial bundle still decodes,
//! and ids that point nowhere are resolved to `None` by the navigator rather
//! than rejected here.  Items that cannot be read are dropped one by one.

use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

pub type FixtureId = u64;

/// Which full-page layout is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChannelMode {
    #[default]
    OffAir,
    NoneMatchday,
    Matchday,
    Live,
    PostMatchday,
    News,
    Podcast,
}

impl ChannelMode {
    pub const ALL: [ChannelMode; 7] = [
        ChannelMode::Live,
        ChannelMode::News,
        ChannelMode::Podcast,
        ChannelMode::Matchday,
        ChannelMode::PostMatchday,
        ChannelMode::NoneMatchday,
        ChannelMode::OffAir,
    ];

    /// Short label for the mode indicator.
    pub fn label(self) -> &'static str {
        match self {
            ChannelMode::Live => "LIVE",
            ChannelMode::News => "NEWS",
            ChannelMode::Podcast => "PODCAST",
            ChannelMode::Matchday => "MATCHDAY",
            ChannelMode::PostMatchday => "POST-MATCH",
            ChannelMode::NoneMatchday => "NO MATCHES",
            ChannelMode::OffAir => "OFF AIR",
        }
    }

    /// Wire name, e.g. `POST_MATCHDAY`.
    pub fn as_str(self) -> &'static str {
        match self {
            ChannelMode::Live => "LIVE",
            ChannelMode::News => "NEWS",
            ChannelMode::Podcast => "PODCAST",
            ChannelMode::Matchday => "MATCHDAY",
            ChannelMode::PostMatchday => "POST_MATCHDAY",
            ChannelMode::NoneMatchday => "NONE_MATCHDAY",
            ChannelMode::OffAir => "OFF_AIR",
        }
    }

    pub fn from_wire(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.as_str() == s)
    }
}

/// Decode an optional mode, treating unknown strings (and non-strings) as absent.
pub(crate) fn lenient_mode<'de, D>(deserializer: D) -> Result<Option<ChannelMode>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(raw
        .as_ref()
        .and_then(|v| v.as_str())
        .and_then(ChannelMode::from_wire))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScheduleItemType {
    News,
    Live,
    Podcast,
    Show,
    Break,
}

impl ScheduleItemType {
    pub fn as_str(self) -> &'static str {
        match self {
            ScheduleItemType::News => "NEWS",
            ScheduleItemType::Live => "LIVE",
            ScheduleItemType::Podcast => "PODCAST",
            ScheduleItemType::Show => "SHOW",
            ScheduleItemType::Break => "BREAK",
        }
    }
}

/// Type-specific payload of a schedule item.  The variant always agrees with
/// the item's `schedule_item_type`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemPayload {
    News { scope: Option<String> },
    Podcast { show_key: Option<String> },
    Live { fixture_ids: Vec<FixtureId> },
    Show,
    Break,
}

impl ItemPayload {
    pub fn item_type(&self) -> ScheduleItemType {
        match self {
            ItemPayload::News { .. } => ScheduleItemType::News,
            ItemPayload::Podcast { .. } => ScheduleItemType::Podcast,
            ItemPayload::Live { .. } => ScheduleItemType::Live,
            ItemPayload::Show => ScheduleItemType::Show,
            ItemPayload::Break => ScheduleItemType::Break,
        }
    }

    fn from_wire(item_type: ScheduleItemType, payload: Option<&serde_json::Value>) -> Self {
        let text = |key: &str| {
            payload
                .and_then(|p| p.get(key))
                .and_then(|v| v.as_str())
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };
        match item_type {
            ScheduleItemType::News => ItemPayload::News { scope: text("scope") },
            ScheduleItemType::Podcast => ItemPayload::Podcast {
                show_key: text("show_key"),
            },
            ScheduleItemType::Live => ItemPayload::Live {
                fixture_ids: payload
                    .and_then(|p| p.get("fixture_ids"))
                    .map(fixture_id_list)
                    .unwrap_or_default(),
            },
            ScheduleItemType::Show => ItemPayload::Show,
            ScheduleItemType::Break => ItemPayload::Break,
        }
    }

    fn to_wire(&self) -> Option<serde_json::Value> {
        match self {
            ItemPayload::News { scope } => {
                scope.as_ref().map(|s| serde_json::json!({ "scope": s }))
            }
            ItemPayload::Podcast { show_key } => show_key
                .as_ref()
                .map(|k| serde_json::json!({ "show_key": k })),
            ItemPayload::Live { fixture_ids } => {
                Some(serde_json::json!({ "fixture_ids": fixture_ids }))
            }
            ItemPayload::Show | ItemPayload::Break => None,
        }
    }
}

/// Ids that are not non-negative integers are dropped.
fn fixture_id_list(value: &serde_json::Value) -> Vec<FixtureId> {
    value
        .as_array()
        .map(|arr| arr.iter().filter_map(|v| v.as_u64()).collect())
        .unwrap_or_default()
}

/// One block of the day's programming.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "WireScheduleItem", into = "WireScheduleItem")]
pub struct ScheduleItem {
    pub id: String,
    pub title: Option<String>,
    /// ISO timestamp, UK wall clock.
    pub scheduled_for_uk: Option<String>,
    pub payload: ItemPayload,
}

impl ScheduleItem {
    pub fn item_type(&self) -> ScheduleItemType {
        self.payload.item_type()
    }

    /// Title, or `"<TYPE> Block"` when the scheduler left it blank.
    pub fn display_title(&self) -> String {
        match self.title.as_deref() {
            Some(t) if !t.is_empty() => t.to_string(),
            _ => format!("{} Block", self.item_type().as_str()),
        }
    }

    /// Scheduled start as a local wall-clock time.
    ///
    /// Offsets in the timestamp are honoured and converted to local time;
    /// naive timestamps are taken as already being wall-clock.
    pub fn scheduled_at(&self) -> Option<chrono::NaiveDateTime> {
        let raw = self.scheduled_for_uk.as_deref()?.trim();
        if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(&chrono::Local).naive_local());
        }
        ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"]
            .iter()
            .find_map(|fmt| chrono::NaiveDateTime::parse_from_str(raw, fmt).ok())
    }

    /// `HH:MM`, or `None` when there is no parseable start time.
    pub fn display_time(&self) -> Option<String> {
        self.scheduled_at().map(|t| t.format("%H:%M").to_string())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct WireScheduleItem {
    schedule_item_id: String,
    schedule_item_type: ScheduleItemType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    scheduled_for_uk: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    payload: Option<serde_json::Value>,
}

impl From<WireScheduleItem> for ScheduleItem {
    fn from(w: WireScheduleItem) -> Self {
        Self {
            payload: ItemPayload::from_wire(w.schedule_item_type, w.payload.as_ref()),
            id: w.schedule_item_id,
            title: w.title,
            scheduled_for_uk: w.scheduled_for_uk,
        }
    }
}

impl From<ScheduleItem> for WireScheduleItem {
    fn from(item: ScheduleItem) -> Self {
        Self {
            schedule_item_type: item.item_type(),
            payload: item.payload.to_wire(),
            schedule_item_id: item.id,
            title: item.title,
            scheduled_for_uk: item.scheduled_for_uk,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BlockChildren {
    #[serde(default)]
    pub fixture_ids: Vec<FixtureId>,
}

/// Expanded live grouping: one LIVE slot covering several simultaneous matches.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LiveBlock {
    #[serde(default)]
    pub block_id: Option<String>,
    #[serde(default)]
    pub schedule_item_id: Option<String>,
    #[serde(default)]
    pub children: Option<BlockChildren>,
}

impl LiveBlock {
    pub fn fixture_ids(&self) -> &[FixtureId] {
        self.children
            .as_ref()
            .map(|c| c.fixture_ids.as_slice())
            .unwrap_or(&[])
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ChannelState {
    /// Coarse, operator-set mode.  Used when the current item does not decide.
    #[serde(default, deserialize_with = "lenient_mode")]
    pub mode: Option<ChannelMode>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NowPointer {
    #[serde(default)]
    pub current_schedule_item_id: Option<String>,
    #[serde(default)]
    pub next_schedule_item_id: Option<String>,
    #[serde(default)]
    pub current_block_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScheduleSnapshot {
    #[serde(default)]
    pub channel_state: ChannelState,
    #[serde(default)]
    pub now: NowPointer,
    #[serde(default, deserialize_with = "lenient_items")]
    pub items: Vec<ScheduleItem>,
    #[serde(default)]
    pub blocks: Vec<LiveBlock>,
}

/// Decode items one by one.  An item with an unknown type or no id is
/// skipped, so a pointer to it resolves to nothing and mode falls back to
/// the channel flag.
fn lenient_items<'de, D>(deserializer: D) -> Result<Vec<ScheduleItem>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Vec<serde_json::Value>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(raw
        .into_iter()
        .filter_map(|value| match ScheduleItem::deserialize(&value) {
            Ok(item) => Some(item),
            Err(e) => {
                warn!("skipping schedule item: {}", e);
                None
            }
        })
        .collect())
}

impl ScheduleSnapshot {
    /// Linear lookup by id.  Empty ids never match.
    pub fn item(&self, id: &str) -> Option<&ScheduleItem> {
        if id.is_empty() {
            return None;
        }
        self.items.iter().find(|item| item.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_bundle_with_payloads() {
        let json = r#"{
            "channel_state": { "mode": "MATCHDAY" },
            "now": { "current_schedule_item_id": "n1", "next_schedule_item_id": "l1" },
            "items": [
                { "schedule_item_id": "n1", "schedule_item_type": "NEWS",
                  "payload": { "scope": "premier_league" } },
                { "schedule_item_id": "l1", "schedule_item_type": "LIVE",
                  "title": "Saturday 3pm", "payload": { "fixture_ids": [10, 11] } },
                { "schedule_item_id": "b1", "schedule_item_type": "BREAK" }
            ],
            "blocks": [
                { "schedule_item_id": "l1", "block_id": "blk-1",
                  "children": { "fixture_ids": [10, 11, 12] } }
            ]
        }"#;
        let snap: ScheduleSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snap.channel_state.mode, Some(ChannelMode::Matchday));
        assert_eq!(snap.items.len(), 3);
        assert_eq!(
            snap.items[0].payload,
            ItemPayload::News {
                scope: Some("premier_league".into())
            }
        );
        assert_eq!(
            snap.items[1].payload,
            ItemPayload::Live {
                fixture_ids: vec![10, 11]
            }
        );
        assert_eq!(snap.items[2].payload, ItemPayload::Break);
        assert_eq!(snap.blocks[0].fixture_ids(), &[10, 11, 12]);
        assert!(snap.now.current_block_id.is_none());
    }

    #[test]
    fn test_unknown_channel_mode_is_absent() {
        let snap: ScheduleSnapshot =
            serde_json::from_str(r#"{ "channel_state": { "mode": "HALFTIME_SHOW" } }"#).unwrap();
        assert_eq!(snap.channel_state.mode, None);
    }

    #[test]
    fn test_empty_object_decodes_to_defaults() {
        let snap: ScheduleSnapshot = serde_json::from_str("{}").unwrap();
        assert_eq!(snap, ScheduleSnapshot::default());
    }

    #[test]
    fn test_malformed_payload_fields_decode_empty() {
        let json = r#"[
            { "schedule_item_id": "a", "schedule_item_type": "LIVE", "payload": { "fixture_ids": "10,11" } },
            { "schedule_item_id": "b", "schedule_item_type": "NEWS", "payload": { "scope": "" } },
            { "schedule_item_id": "c", "schedule_item_type": "PODCAST" }
        ]"#;
        let items: Vec<ScheduleItem> = serde_json::from_str(json).unwrap();
        assert_eq!(items[0].payload, ItemPayload::Live { fixture_ids: vec![] });
        assert_eq!(items[1].payload, ItemPayload::News { scope: None });
        assert_eq!(items[2].payload, ItemPayload::Podcast { show_key: None });
    }

    #[test]
    fn test_item_reencodes_wire_shape() {
        let item = ScheduleItem {
            id: "p1".into(),
            title: None,
            scheduled_for_uk: Some("2026-10-18T19:30:00".into()),
            payload: ItemPayload::Podcast {
                show_key: Some("full_kit_shankers".into()),
            },
        };
        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(value["schedule_item_id"], "p1");
        assert_eq!(value["schedule_item_type"], "PODCAST");
        assert_eq!(value["payload"]["show_key"], "full_kit_shankers");
        assert_eq!(item.display_title(), "PODCAST Block");
        assert_eq!(item.display_time().as_deref(), Some("19:30"));
    }

    #[test]
    fn test_empty_id_never_resolves() {
        let snap = ScheduleSnapshot {
            items: vec![ScheduleItem {
                id: String::new(),
                title: None,
                scheduled_for_uk: None,
                payload: ItemPayload::Show,
            }],
            ..Default::default()
        };
        assert!(snap.item("").is_none());
    }

    #[test]
    fn test_unreadable_items_are_skipped() {
        let json = r#"{
            "channel_state": { "mode": "MATCHDAY" },
            "now": { "current_schedule_item_id": "n1" },
            "items": [
                { "schedule_item_id": "n1", "schedule_item_type": "NEWS",
                  "payload": { "scope": "general" } },
                { "schedule_item_id": "i1", "schedule_item_type": "INTERVIEW" },
                { "schedule_item_type": "LIVE", "payload": { "fixture_ids": [1] } }
            ]
        }"#;
        let snap: ScheduleSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snap.items.len(), 1);
        assert_eq!(snap.items[0].id, "n1");
        assert!(snap.item("i1").is_none());
    }

    #[test]
    fn test_null_items_decode_empty() {
        let snap: ScheduleSnapshot = serde_json::from_str(r#"{ "items": null }"#).unwrap();
        assert!(snap.items.is_empty());
    }
}
