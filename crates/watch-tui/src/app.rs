//! App — event loop.
//!
//! Architecture:
//! - `App` owns the components and `AppState`.
//! - Keyboard events arrive from a blocking reader thread over an mpsc channel.
//! - Poller updates arrive on the three `watch` receivers; each change is
//!   copied into `AppState` and triggers a redraw.
//! - Keys decode into `Action`s which the App dispatches.

use std::io;
use std::time::Duration;

use ratatui::crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Layout},
    Frame, Terminal,
};
use tokio::sync::mpsc;
use tracing::{debug, info};

use watch_proto::poller::PollingHandle;

use crate::action::{action_for_key, Action};
use crate::app_state::AppState;
use crate::component::Component;
use crate::components::header::draw_header;
use crate::components::layout_body::LayoutBody;
use crate::components::schedule_panel::SchedulePanel;
use crate::widgets::status_bar::draw_status_bar;

/// Marquee and clock cadence.
const UI_TICK: Duration = Duration::from_millis(200);
const INPUT_POLL: Duration = Duration::from_millis(250);

enum AppMessage {
    Event(Event),
}

pub struct App {
    state: AppState,
    body: LayoutBody,
    schedule: SchedulePanel,
    poller: PollingHandle,
    should_quit: bool,
}

impl App {
    pub fn new(poller: PollingHandle, http_address: Option<String>) -> Self {
        Self {
            state: AppState::new(http_address),
            body: LayoutBody::new(),
            schedule: SchedulePanel::new(),
            poller,
            should_quit: false,
        }
    }

    // ── Main run loop ─────────────────────────────────────────────────────────

    pub async fn run(mut self) -> anyhow::Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        debug!("run(): terminal created, size={:?}", terminal.size());

        let result = self.event_loop(&mut terminal).await;

        // ── Teardown ──────────────────────────────────────────────────────────
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        self.poller.shutdown().await;
        result
    }

    async fn event_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> anyhow::Result<()> {
        let (tx, mut rx) = mpsc::channel::<AppMessage>(256);

        // ── Background task: keyboard events ──────────────────────────────────
        // Polls with a timeout so the thread notices the loop has exited and
        // runtime shutdown is not held up by a blocked read.
        tokio::task::spawn_blocking(move || loop {
            if tx.is_closed() {
                break;
            }
            match event::poll(INPUT_POLL) {
                Ok(true) => match event::read() {
                    Ok(ev) => {
                        if tx.blocking_send(AppMessage::Event(ev)).is_err() {
                            break;
                        }
                    }
                    Err(_) => break,
                },
                Ok(false) => {}
                Err(_) => break,
            }
        });

        let mut scheduler_rx = self.poller.scheduler();
        let mut fixtures_rx = self.poller.fixtures();
        let mut ticker_rx = self.poller.ticker();

        let mut ui_tick = tokio::time::interval(UI_TICK);
        ui_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        // ── Main loop ─────────────────────────────────────────────────────────
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal.draw(|f| self.draw(f))?;
            }
            needs_redraw = false;

            if self.should_quit {
                break;
            }

            tokio::select! {
                Some(msg) = rx.recv() => {
                    match msg {
                        AppMessage::Event(Event::Key(key)) => {
                            if let Some(action) = action_for_key(key) {
                                self.dispatch(action);
                            }
                        }
                        AppMessage::Event(_) => {}
                    }
                    needs_redraw = true;
                }

                Ok(()) = scheduler_rx.changed() => {
                    let previous = self.state.derived_mode();
                    self.state.scheduler = scheduler_rx.borrow_and_update().clone();
                    let mode = self.state.derived_mode();
                    if mode != previous {
                        info!("channel mode {} -> {}", previous.as_str(), mode.as_str());
                    }
                    needs_redraw = true;
                }

                Ok(()) = fixtures_rx.changed() => {
                    self.state.fixtures = fixtures_rx.borrow_and_update().clone();
                    needs_redraw = true;
                }

                Ok(()) = ticker_rx.changed() => {
                    self.state.ticker = ticker_rx.borrow_and_update().clone();
                    needs_redraw = true;
                }

                _ = ui_tick.tick() => {
                    self.state.now = chrono::Local::now();
                    self.body.tick(&self.state);
                    self.schedule.tick(&self.state);
                    needs_redraw = true;
                }
            }
        }

        Ok(())
    }

    fn dispatch(&mut self, action: Action) {
        debug!("dispatch {:?}", action);
        match action {
            Action::Quit => self.should_quit = true,
            Action::Refresh => {
                info!("manual refresh");
                self.poller.refresh();
            }
            Action::ToggleSchedule => self.state.show_schedule = !self.state.show_schedule,
            Action::CycleLayout => {
                self.state.cycle_override();
                info!("layout override: {:?}", self.state.mode_override);
            }
            Action::ClearLayoutOverride => self.state.mode_override = None,
            Action::ScrollUp(_) | Action::ScrollDown(_) => {
                if self.state.show_schedule {
                    self.schedule.on_action(&action, &self.state);
                } else {
                    self.body.on_action(&action, &self.state);
                }
            }
        }
    }

    fn draw(&mut self, frame: &mut Frame) {
        let [header, main, status] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Fill(1),
            Constraint::Length(1),
        ])
        .areas(frame.area());

        draw_header(frame, header, &self.state);

        if self.state.show_schedule {
            let [body, side] =
                Layout::horizontal([Constraint::Fill(1), Constraint::Length(48)]).areas(main);
            self.body.draw(frame, body, &self.state);
            self.schedule.draw(frame, side, &self.state);
        } else {
            self.body.draw(frame, main, &self.state);
        }

        draw_status_bar(frame, status, &self.state);
    }
}
