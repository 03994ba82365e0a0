//! Polling controller.
//!
//! Three independent loops, each publishing into its own `watch` slot:
//!
//! - scheduler: always on, every `scheduler_interval`
//! - fixtures: only while the derived mode is LIVE with a non-empty id set,
//!   every `fixtures_interval`; restarted whenever the id set changes
//! - ticker: always on, every `ticker_interval`
//!
//! A supervisor task watches the scheduler slot and starts, stops or
//! retargets the fixture loop.  A failed fetch never clears a slot's data;
//! it only records the error until the next success.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Local};
use serde::Serialize;
use tokio::sync::{watch, Notify};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::client::{FetchError, WatchApi};
use crate::config::PollingConfig;
use crate::mode::derive_mode;
use crate::navigator;
use crate::protocol::{FixturesResponse, LiveTickerResponse, SchedulerResponse};
use crate::schedule::{ChannelMode, FixtureId, ScheduleSnapshot};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LoopPhase {
    /// Not started, or stopped because it is not needed.
    #[default]
    Idle,
    /// First fetch in flight, nothing to show yet.
    Loading,
    Ready,
    /// Last fetch failed.  `data` still holds the last good payload if any.
    Error,
}

#[derive(Debug)]
pub struct LoopStatus<T> {
    pub phase: LoopPhase,
    pub data: Option<Arc<T>>,
    pub error: Option<String>,
    pub last_success: Option<DateTime<Local>>,
}

impl<T> Default for LoopStatus<T> {
    fn default() -> Self {
        Self {
            phase: LoopPhase::Idle,
            data: None,
            error: None,
            last_success: None,
        }
    }
}

impl<T> Clone for LoopStatus<T> {
    fn clone(&self) -> Self {
        Self {
            phase: self.phase,
            data: self.data.clone(),
            error: self.error.clone(),
            last_success: self.last_success,
        }
    }
}

impl<T> LoopStatus<T> {
    pub fn is_first_load(&self) -> bool {
        self.phase == LoopPhase::Loading && self.data.is_none()
    }
}

pub type SchedulerStatus = LoopStatus<SchedulerResponse>;
pub type FixturesStatus = LoopStatus<FixturesResponse>;
pub type TickerStatus = LoopStatus<LiveTickerResponse>;

impl SchedulerStatus {
    pub fn snapshot(&self) -> Option<&ScheduleSnapshot> {
        self.data.as_ref().and_then(|d| d.bundle.as_ref())
    }

    pub fn mode(&self) -> ChannelMode {
        derive_mode(self.snapshot())
    }
}

type Slot<T> = Arc<watch::Sender<LoopStatus<T>>>;

fn slot<T>() -> (Slot<T>, watch::Receiver<LoopStatus<T>>) {
    let (tx, rx) = watch::channel(LoopStatus::default());
    (Arc::new(tx), rx)
}

/// Fetch immediately, then every `period`, until `token` is cancelled.  A
/// refresh notification fetches right away and restarts the period.
async fn run_loop<T, F, Fut>(
    name: &'static str,
    period: Duration,
    tx: Slot<T>,
    token: CancellationToken,
    refresh: Arc<Notify>,
    mut fetch: F,
) where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, FetchError>>,
{
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    debug!("{} loop started ({:?})", name, period);
    let mut first_fetch = true;

    loop {
        let refreshed = tokio::select! {
            biased;
            _ = token.cancelled() => break,
            _ = ticker.tick() => false,
            _ = refresh.notified() => true,
        };
        if refreshed {
            ticker.reset();
        }

        // Only the first fetch of a loop's lifetime shows as loading; retries
        // after a failure stay in `Error` until one succeeds.
        if std::mem::take(&mut first_fetch) {
            tx.send_if_modified(|s| {
                if s.data.is_none() && s.phase != LoopPhase::Loading {
                    s.phase = LoopPhase::Loading;
                    true
                } else {
                    false
                }
            });
        }

        let result = tokio::select! {
            biased;
            _ = token.cancelled() => break,
            r = fetch() => r,
        };

        match result {
            Ok(data) => tx.send_modify(|s| {
                s.phase = LoopPhase::Ready;
                s.data = Some(Arc::new(data));
                s.error = None;
                s.last_success = Some(Local::now());
            }),
            Err(e) => {
                warn!("{} poll failed: {}", name, e);
                tx.send_modify(|s| {
                    s.phase = LoopPhase::Error;
                    s.error = Some(e.to_string());
                });
            }
        }
    }

    debug!("{} loop stopped", name);
}

struct FixtureLoop {
    ids: Vec<FixtureId>,
    token: CancellationToken,
    task: JoinHandle<()>,
}

impl FixtureLoop {
    async fn stop(self) {
        self.token.cancel();
        if let Err(e) = self.task.await {
            warn!("fixtures loop ended abnormally: {}", e);
        }
    }
}

struct Supervisor<A> {
    api: Arc<A>,
    period: Duration,
    fixtures: Slot<FixturesResponse>,
    root: CancellationToken,
    refresh: Arc<Notify>,
    active: Option<FixtureLoop>,
}

impl<A: WatchApi> Supervisor<A> {
    fn start_fixtures(&mut self, ids: Vec<FixtureId>) {
        let token = self.root.child_token();
        let api = self.api.clone();
        let loop_ids = ids.clone();
        let task = tokio::spawn(run_loop(
            "fixtures",
            self.period,
            self.fixtures.clone(),
            token.clone(),
            self.refresh.clone(),
            move || {
                let api = api.clone();
                let ids = loop_ids.clone();
                async move { api.fixtures_by_ids(ids).await }
            },
        ));
        self.active = Some(FixtureLoop { ids, token, task });
    }

    async fn stop_fixtures(&mut self) {
        if let Some(active) = self.active.take() {
            active.stop().await;
        }
        // Fixtures of a previous LIVE slot are never shown under another one
        self.fixtures.send_replace(LoopStatus::default());
    }

    /// Bring the fixture loop in line with the latest scheduler data.
    async fn reconcile(&mut self, wanted: Option<Vec<FixtureId>>) {
        match wanted {
            None => {
                if self.active.is_some() {
                    info!("leaving LIVE, stopping fixtures loop");
                    self.stop_fixtures().await;
                }
            }
            Some(wanted) => {
                if self.active.as_ref().is_some_and(|a| a.ids == wanted) {
                    return;
                }
                info!("fixtures loop targeting {:?}", wanted);
                self.stop_fixtures().await;
                self.start_fixtures(wanted);
            }
        }
    }

    async fn run(mut self, mut scheduler: watch::Receiver<SchedulerStatus>) {
        loop {
            let wanted = {
                let status = scheduler.borrow_and_update();
                let snapshot = status.snapshot();
                let ids = navigator::fixture_ids_for_live(snapshot);
                (derive_mode(snapshot) == ChannelMode::Live && !ids.is_empty())
                    .then(|| ids.to_vec())
            };
            self.reconcile(wanted).await;

            tokio::select! {
                biased;
                _ = self.root.cancelled() => break,
                changed = scheduler.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
            }
        }

        if let Some(active) = self.active.take() {
            active.stop().await;
        }
        debug!("supervisor stopped");
    }
}

/// Owns the configuration needed to start polling.
pub struct PollingController<A> {
    api: Arc<A>,
    config: PollingConfig,
}

impl<A: WatchApi> PollingController<A> {
    pub fn new(api: Arc<A>, config: PollingConfig) -> Self {
        Self { api, config }
    }

    /// Spawn the loops.  Must be called inside a tokio runtime.
    pub fn start(self) -> PollingHandle {
        let root = CancellationToken::new();
        let refresh = Arc::new(Notify::new());

        let (scheduler_tx, scheduler_rx) = slot::<SchedulerResponse>();
        let (fixtures_tx, fixtures_rx) = slot::<FixturesResponse>();
        let (ticker_tx, ticker_rx) = slot::<LiveTickerResponse>();

        let api = self.api.clone();
        let scheduler = tokio::spawn(run_loop(
            "scheduler",
            self.config.scheduler_interval(),
            scheduler_tx,
            root.child_token(),
            refresh.clone(),
            move || {
                let api = api.clone();
                async move { api.scheduler_state().await }
            },
        ));

        let api = self.api.clone();
        let ticker = tokio::spawn(run_loop(
            "ticker",
            self.config.ticker_interval(),
            ticker_tx,
            root.child_token(),
            refresh.clone(),
            move || {
                let api = api.clone();
                async move { api.live_ticker().await }
            },
        ));

        let supervisor = Supervisor {
            api: self.api,
            period: self.config.fixtures_interval(),
            fixtures: fixtures_tx,
            root: root.clone(),
            refresh: refresh.clone(),
            active: None,
        };
        let supervisor = tokio::spawn(supervisor.run(scheduler_rx.clone()));

        info!("polling started");
        PollingHandle {
            scheduler: scheduler_rx,
            fixtures: fixtures_rx,
            ticker: ticker_rx,
            refresh,
            root,
            tasks: vec![scheduler, ticker, supervisor],
        }
    }
}

/// Read side of the controller plus its lifecycle.
pub struct PollingHandle {
    scheduler: watch::Receiver<SchedulerStatus>,
    fixtures: watch::Receiver<FixturesStatus>,
    ticker: watch::Receiver<TickerStatus>,
    refresh: Arc<Notify>,
    root: CancellationToken,
    tasks: Vec<JoinHandle<()>>,
}

impl PollingHandle {
    pub fn scheduler(&self) -> watch::Receiver<SchedulerStatus> {
        self.scheduler.clone()
    }

    pub fn fixtures(&self) -> watch::Receiver<FixturesStatus> {
        self.fixtures.clone()
    }

    pub fn ticker(&self) -> watch::Receiver<TickerStatus> {
        self.ticker.clone()
    }

    pub fn mode(&self) -> ChannelMode {
        self.scheduler.borrow().mode()
    }

    /// Ask every running loop to fetch now.
    pub fn refresh(&self) {
        self.refresh.notify_waiters();
    }

    /// Cancel every loop and wait for them to finish.  No fetch is issued
    /// after this returns.
    pub async fn shutdown(self) {
        self.root.cancel();
        for task in self.tasks {
            if let Err(e) = task.await {
                warn!("polling task ended abnormally: {}", e);
            }
        }
        info!("polling stopped");
    }
}
