//! Schedule navigation — pure lookups over one bundle.
//!
//! Every function takes `Option<&ScheduleSnapshot>` so callers can pass
//! whatever the poller currently holds, including nothing.  Missing or
//! dangling references resolve to `None` (or an empty slice); nothing here
//! panics or errors.

use chrono::NaiveDateTime;

use crate::schedule::{FixtureId, ItemPayload, LiveBlock, ScheduleItem, ScheduleSnapshot};

fn non_empty(id: &Option<String>) -> Option<&str> {
    id.as_deref().filter(|s| !s.is_empty())
}

/// Item referenced by `now.current_schedule_item_id`.
pub fn current_item(snapshot: Option<&ScheduleSnapshot>) -> Option<&ScheduleItem> {
    let snapshot = snapshot?;
    snapshot.item(non_empty(&snapshot.now.current_schedule_item_id)?)
}

/// Item referenced by `now.next_schedule_item_id`.
pub fn next_item(snapshot: Option<&ScheduleSnapshot>) -> Option<&ScheduleItem> {
    let snapshot = snapshot?;
    snapshot.item(non_empty(&snapshot.now.next_schedule_item_id)?)
}

/// The live block being broadcast.
///
/// An explicit `now.current_block_id` is authoritative: it is matched against
/// each block's `block_id` or `schedule_item_id`, and if nothing matches the
/// answer is `None` without falling back to the current item.  Without that
/// pointer, a LIVE current item is matched by `schedule_item_id`.
pub fn active_live_block(snapshot: Option<&ScheduleSnapshot>) -> Option<&LiveBlock> {
    let snapshot = snapshot?;

    if let Some(block_id) = non_empty(&snapshot.now.current_block_id) {
        return snapshot.blocks.iter().find(|b| {
            b.block_id.as_deref() == Some(block_id)
                || b.schedule_item_id.as_deref() == Some(block_id)
        });
    }

    let item = current_item(Some(snapshot))?;
    if !matches!(item.payload, ItemPayload::Live { .. }) {
        return None;
    }
    snapshot
        .blocks
        .iter()
        .find(|b| b.schedule_item_id.as_deref() == Some(item.id.as_str()))
}

/// Fixtures covered by the current LIVE slot.  Prefers the active block's
/// children, then the LIVE item's own payload.  Empty means nothing to show.
pub fn fixture_ids_for_live(snapshot: Option<&ScheduleSnapshot>) -> &[FixtureId] {
    if let Some(block) = active_live_block(snapshot) {
        if !block.fixture_ids().is_empty() {
            return block.fixture_ids();
        }
    }
    match current_item(snapshot).map(|item| &item.payload) {
        Some(ItemPayload::Live { fixture_ids }) => fixture_ids.as_slice(),
        _ => &[],
    }
}

/// Scope of the current NEWS item, e.g. `premier_league`.
pub fn news_scope(snapshot: Option<&ScheduleSnapshot>) -> Option<&str> {
    match current_item(snapshot).map(|item| &item.payload) {
        Some(ItemPayload::News { scope }) => scope.as_deref().filter(|s| !s.is_empty()),
        _ => None,
    }
}

/// Show key of the current PODCAST item, e.g. `full_kit_shankers`.
pub fn podcast_show_key(snapshot: Option<&ScheduleSnapshot>) -> Option<&str> {
    match current_item(snapshot).map(|item| &item.payload) {
        Some(ItemPayload::Podcast { show_key }) => show_key.as_deref().filter(|s| !s.is_empty()),
        _ => None,
    }
}

/// `premier_league` -> `Premier League`.  ASCII capitalization only.
pub fn format_scope_for_display(scope: &str) -> String {
    scope
        .split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Where an item sits on today's timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    Completed,
    Live,
    Upcoming,
}

/// The current item is `Live`; anything else that was scheduled to start
/// before `now` is `Completed`; the rest (including untimed items) is
/// `Upcoming`.
pub fn item_status(item: &ScheduleItem, current_id: Option<&str>, now: NaiveDateTime) -> ItemStatus {
    if current_id.is_some_and(|id| !id.is_empty() && id == item.id) {
        return ItemStatus::Live;
    }
    match item.scheduled_at() {
        Some(start) if start < now => ItemStatus::Completed,
        _ => ItemStatus::Upcoming,
    }
}
