pub mod fixtures_panel;
pub mod header;
pub mod layout_body;
pub mod schedule_panel;
pub mod scoreboard;
pub mod ticker_bar;
pub mod up_next;
