//! Shared core of the watch companion: wire types, the pure schedule
//! derivations, the HTTP client and the polling controller.

pub mod client;
pub mod config;
pub mod fixture;
pub mod layout;
pub mod mode;
pub mod navigator;
pub mod platform;
pub mod poller;
pub mod protocol;
pub mod schedule;
pub mod ticker;

pub use client::{FetchError, HttpWatchApi, WatchApi};
pub use config::Config;
pub use layout::{select_layout, LayoutView};
pub use mode::derive_mode;
pub use poller::{LoopPhase, LoopStatus, PollingController, PollingHandle};
pub use schedule::{ChannelMode, FixtureId, ScheduleSnapshot};
