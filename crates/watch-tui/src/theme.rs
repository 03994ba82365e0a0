//! Color palette and style constants for the watch TUI.

use ratatui::style::{Color, Modifier, Style};
use watch_proto::schedule::{ChannelMode, ScheduleItemType};

// ── Color palette ─────────────────────────────────────────────────────────────

pub const C_ACCENT: Color = Color::Rgb(255, 95, 95);
pub const C_MUTED: Color = Color::Rgb(72, 72, 88);
pub const C_SEPARATOR: Color = Color::Rgb(40, 40, 52);
pub const C_SECONDARY: Color = Color::Rgb(115, 115, 138);
pub const C_PRIMARY: Color = Color::Rgb(210, 210, 225);
pub const C_PANEL_BORDER: Color = Color::Rgb(40, 40, 52);
pub const C_HIGHLIGHT: Color = Color::Rgb(255, 210, 50);
pub const C_RED_CARD: Color = Color::Rgb(230, 60, 60);
pub const C_BADGE_LIVE: Color = Color::Rgb(80, 200, 120);
pub const C_BADGE_ERR: Color = Color::Rgb(255, 95, 95);
pub const C_BADGE_PENDING: Color = Color::Rgb(255, 184, 80);

// Mode indicator dots
pub const C_MODE_LIVE: Color = Color::Rgb(239, 68, 68);
pub const C_MODE_MATCHDAY: Color = Color::Rgb(34, 197, 94);
pub const C_MODE_POST: Color = Color::Rgb(59, 130, 246);
pub const C_MODE_NEWS: Color = Color::Rgb(96, 165, 250);
pub const C_MODE_PODCAST: Color = Color::Rgb(168, 85, 247);
pub const C_MODE_NONE: Color = Color::Rgb(107, 114, 128);
pub const C_MODE_OFF: Color = Color::Rgb(55, 65, 81);

pub fn mode_color(mode: ChannelMode) -> Color {
    match mode {
        ChannelMode::Live => C_MODE_LIVE,
        ChannelMode::Matchday => C_MODE_MATCHDAY,
        ChannelMode::PostMatchday => C_MODE_POST,
        ChannelMode::News => C_MODE_NEWS,
        ChannelMode::Podcast => C_MODE_PODCAST,
        ChannelMode::NoneMatchday => C_MODE_NONE,
        ChannelMode::OffAir => C_MODE_OFF,
    }
}

pub fn item_type_color(item_type: ScheduleItemType) -> Color {
    match item_type {
        ScheduleItemType::Live => C_MODE_LIVE,
        ScheduleItemType::News => C_MODE_NEWS,
        ScheduleItemType::Podcast => C_MODE_PODCAST,
        ScheduleItemType::Show => C_MODE_MATCHDAY,
        ScheduleItemType::Break => C_MODE_NONE,
    }
}

// ── Predefined styles ─────────────────────────────────────────────────────────

pub fn style_default() -> Style {
    Style::default().fg(C_PRIMARY)
}

pub fn style_secondary() -> Style {
    Style::default().fg(C_SECONDARY)
}

pub fn style_title() -> Style {
    Style::default().fg(C_PRIMARY).add_modifier(Modifier::BOLD)
}

pub fn style_highlight() -> Style {
    Style::default().fg(C_HIGHLIGHT).add_modifier(Modifier::BOLD)
}

pub fn style_border() -> Style {
    Style::default().fg(C_PANEL_BORDER)
}
