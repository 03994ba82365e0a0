//! AppState — shared read-only data passed to all components during render.
//!
//! Holds the latest copy of each polling slot.  The App event loop refreshes
//! these from the poller's watch channels and is the only writer.

use chrono::{DateTime, Local};

use watch_proto::layout::{select_layout, LayoutView};
use watch_proto::poller::{FixturesStatus, SchedulerStatus, TickerStatus};
use watch_proto::schedule::{ChannelMode, ScheduleSnapshot};

pub struct AppState {
    pub scheduler: SchedulerStatus,
    pub fixtures: FixturesStatus,
    pub ticker: TickerStatus,
    /// Forced layout for development.  Display only: polling always follows
    /// the derived mode.
    pub mode_override: Option<ChannelMode>,
    pub show_schedule: bool,
    pub now: DateTime<Local>,
    /// Shown in the status bar when the local status API is up.
    pub http_address: Option<String>,
}

impl AppState {
    pub fn new(http_address: Option<String>) -> Self {
        Self {
            scheduler: SchedulerStatus::default(),
            fixtures: FixturesStatus::default(),
            ticker: TickerStatus::default(),
            mode_override: None,
            show_schedule: false,
            now: Local::now(),
            http_address,
        }
    }

    pub fn snapshot(&self) -> Option<&ScheduleSnapshot> {
        self.scheduler.snapshot()
    }

    pub fn derived_mode(&self) -> ChannelMode {
        self.scheduler.mode()
    }

    pub fn display_mode(&self) -> ChannelMode {
        self.mode_override.unwrap_or_else(|| self.derived_mode())
    }

    pub fn layout(&self) -> LayoutView<'_> {
        select_layout(self.display_mode(), self.snapshot())
    }

    /// Off -> first mode -> ... -> last mode -> off.
    pub fn cycle_override(&mut self) {
        let all = ChannelMode::ALL;
        self.mode_override = match self.mode_override {
            None => Some(all[0]),
            Some(current) => all
                .iter()
                .position(|m| *m == current)
                .and_then(|i| all.get(i + 1))
                .copied(),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_override_cycles_through_every_mode_then_off() {
        let mut state = AppState::new(None);
        assert_eq!(state.display_mode(), ChannelMode::OffAir);

        let mut seen = Vec::new();
        for _ in 0..ChannelMode::ALL.len() {
            state.cycle_override();
            seen.push(state.display_mode());
        }
        assert_eq!(seen, ChannelMode::ALL.to_vec());

        state.cycle_override();
        assert_eq!(state.mode_override, None);
    }

    #[test]
    fn test_override_does_not_touch_derived_mode() {
        let mut state = AppState::new(None);
        state.mode_override = Some(ChannelMode::Live);
        assert_eq!(state.display_mode(), ChannelMode::Live);
        assert_eq!(state.derived_mode(), ChannelMode::OffAir);
        assert_eq!(state.layout().mode(), ChannelMode::Live);
    }
}
