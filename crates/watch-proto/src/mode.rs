//! Effective channel mode.
//!
//! `channel_state.mode` is a coarse flag flipped by hand; the current schedule
//! item overrides it whenever its type maps straight onto a mode.

use crate::schedule::{ChannelMode, ScheduleItemType, ScheduleSnapshot};
use crate::navigator;

/// Item types that decide the mode on their own.  `SHOW` and `BREAK` defer
/// to the channel flag.
fn mode_for_item_type(item_type: ScheduleItemType) -> Option<ChannelMode> {
    match item_type {
        ScheduleItemType::News => Some(ChannelMode::News),
        ScheduleItemType::Live => Some(ChannelMode::Live),
        ScheduleItemType::Podcast => Some(ChannelMode::Podcast),
        ScheduleItemType::Show | ScheduleItemType::Break => None,
    }
}

/// Pure and total: no snapshot means `OFF_AIR`; otherwise the current item's
/// mode if it has one, else the channel flag, else `OFF_AIR`.
pub fn derive_mode(snapshot: Option<&ScheduleSnapshot>) -> ChannelMode {
    let Some(snapshot) = snapshot else {
        return ChannelMode::OffAir;
    };
    let fallback = snapshot.channel_state.mode.unwrap_or(ChannelMode::OffAir);

    navigator::current_item(Some(snapshot))
        .and_then(|item| mode_for_item_type(item.item_type()))
        .unwrap_or(fallback)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::{ChannelState, ItemPayload, NowPointer, ScheduleItem};

    fn snapshot(fallback: Option<ChannelMode>, current: Option<&str>, payload: ItemPayload) -> ScheduleSnapshot {
        ScheduleSnapshot {
            channel_state: ChannelState { mode: fallback },
            now: NowPointer {
                current_schedule_item_id: current.map(str::to_string),
                ..Default::default()
            },
            items: vec![ScheduleItem {
                id: "x1".into(),
                title: None,
                scheduled_for_uk: None,
                payload,
            }],
            blocks: vec![],
        }
    }

    #[test]
    fn test_no_snapshot_is_off_air() {
        assert_eq!(derive_mode(None), ChannelMode::OffAir);
    }

    #[test]
    fn test_item_type_overrides_flag() {
        let s = snapshot(Some(ChannelMode::Matchday), Some("x1"), ItemPayload::News { scope: None });
        assert_eq!(derive_mode(Some(&s)), ChannelMode::News);
        let s = snapshot(Some(ChannelMode::OffAir), Some("x1"), ItemPayload::Podcast { show_key: None });
        assert_eq!(derive_mode(Some(&s)), ChannelMode::Podcast);
    }

    #[test]
    fn test_show_and_break_defer_to_flag() {
        for payload in [ItemPayload::Show, ItemPayload::Break] {
            let s = snapshot(Some(ChannelMode::PostMatchday), Some("x1"), payload);
            assert_eq!(derive_mode(Some(&s)), ChannelMode::PostMatchday);
        }
    }

    #[test]
    fn test_missing_flag_and_dangling_item() {
        let s = snapshot(None, Some("nope"), ItemPayload::Live { fixture_ids: vec![] });
        assert_eq!(derive_mode(Some(&s)), ChannelMode::OffAir);
        let s = snapshot(None, Some(""), ItemPayload::Live { fixture_ids: vec![] });
        assert_eq!(derive_mode(Some(&s)), ChannelMode::OffAir);
    }
}
