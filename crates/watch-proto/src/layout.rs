//! Layout selection — which of the seven screens to draw, and the schedule
//! data each one needs.

use crate::navigator;
use crate::schedule::{ChannelMode, FixtureId, ScheduleItem, ScheduleSnapshot};

/// Curated podcast titles.  Unknown keys fall back to a prettified key.
const PODCAST_SHOWS: &[(&str, &str, &str)] = &[(
    "full_kit_shankers",
    "Full Kit Shankers",
    "The ultimate football podcast for passionate fans",
)];

#[derive(Debug, Clone, PartialEq)]
pub enum LayoutView<'a> {
    Live {
        current: Option<&'a ScheduleItem>,
        next: Option<&'a ScheduleItem>,
        fixture_ids: &'a [FixtureId],
    },
    News {
        next: Option<&'a ScheduleItem>,
        /// e.g. `"Premier League News"`.
        subtitle: String,
    },
    Podcast {
        next: Option<&'a ScheduleItem>,
        title: String,
        description: String,
    },
    Matchday,
    PostMatchday,
    NoneMatchday,
    OffAir,
}

impl LayoutView<'_> {
    pub fn mode(&self) -> ChannelMode {
        match self {
            LayoutView::Live { .. } => ChannelMode::Live,
            LayoutView::News { .. } => ChannelMode::News,
            LayoutView::Podcast { .. } => ChannelMode::Podcast,
            LayoutView::Matchday => ChannelMode::Matchday,
            LayoutView::PostMatchday => ChannelMode::PostMatchday,
            LayoutView::NoneMatchday => ChannelMode::NoneMatchday,
            LayoutView::OffAir => ChannelMode::OffAir,
        }
    }

    /// The "up next" item, for layouts that show one.
    pub fn next_item(&self) -> Option<&ScheduleItem> {
        match self {
            LayoutView::Live { next, .. }
            | LayoutView::News { next, .. }
            | LayoutView::Podcast { next, .. } => *next,
            _ => None,
        }
    }
}

/// Dispatch table from mode to screen.  No side effects.
pub fn select_layout(mode: ChannelMode, snapshot: Option<&ScheduleSnapshot>) -> LayoutView<'_> {
    match mode {
        ChannelMode::Live => LayoutView::Live {
            current: navigator::current_item(snapshot),
            next: navigator::next_item(snapshot),
            fixture_ids: navigator::fixture_ids_for_live(snapshot),
        },
        ChannelMode::News => {
            let scope = navigator::news_scope(snapshot)
                .map(navigator::format_scope_for_display)
                .unwrap_or_else(|| "General".to_string());
            LayoutView::News {
                next: navigator::next_item(snapshot),
                subtitle: format!("{} News", scope),
            }
        }
        ChannelMode::Podcast => {
            let key = navigator::podcast_show_key(snapshot);
            let curated = key.and_then(|k| PODCAST_SHOWS.iter().find(|(id, _, _)| *id == k));
            let (title, description) = match curated {
                Some((_, title, description)) => (title.to_string(), description.to_string()),
                None => (
                    navigator::format_scope_for_display(key.unwrap_or("Podcast")),
                    "Football podcast".to_string(),
                ),
            };
            LayoutView::Podcast {
                next: navigator::next_item(snapshot),
                title,
                description,
            }
        }
        ChannelMode::Matchday => LayoutView::Matchday,
        ChannelMode::PostMatchday => LayoutView::PostMatchday,
        ChannelMode::NoneMatchday => LayoutView::NoneMatchday,
        ChannelMode::OffAir => LayoutView::OffAir,
    }
}
