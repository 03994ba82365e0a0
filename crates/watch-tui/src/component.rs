//! Component trait — the interface every stateful panel implements.
//!
//! Components read `AppState` and own only their view state (scroll offsets,
//! marquee position).  The App event loop is the only writer of `AppState`.

use ratatui::{layout::Rect, Frame};

use crate::action::Action;
use crate::app_state::AppState;

pub trait Component {
    /// Called each UI tick.  For animation and other time-based updates.
    fn tick(&mut self, _state: &AppState) {}

    /// React to a dispatched action.  Components ignore what they don't use.
    fn on_action(&mut self, _action: &Action, _state: &AppState) {}

    fn draw(&mut self, frame: &mut Frame, area: Rect, state: &AppState);
}
