use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::json;
use tokio::time::sleep;
use watch_proto::client::{FetchError, WatchApi};
use watch_proto::config::PollingConfig;
use watch_proto::fixture::Fixture;
use watch_proto::poller::{LoopPhase, PollingController, PollingHandle};
use watch_proto::protocol::{FixturesResponse, LiveTickerResponse, SchedulerResponse};
use watch_proto::schedule::{ChannelMode, FixtureId, ScheduleSnapshot};

#[derive(Default)]
struct FakeApi {
    bundle: Mutex<Option<ScheduleSnapshot>>,
    fail_scheduler: AtomicBool,
    scheduler_delay: Mutex<Duration>,
    scheduler_calls: AtomicUsize,
    ticker_calls: AtomicUsize,
    fixture_calls: Mutex<Vec<Vec<FixtureId>>>,
}

impl FakeApi {
    fn with_bundle(bundle: ScheduleSnapshot) -> Arc<Self> {
        let api = Arc::new(Self::default());
        api.set_bundle(bundle);
        api
    }

    fn set_bundle(&self, bundle: ScheduleSnapshot) {
        *self.bundle.lock().unwrap() = Some(bundle);
    }

    fn fixture_call_count(&self) -> usize {
        self.fixture_calls.lock().unwrap().len()
    }

    fn last_fixture_call(&self) -> Option<Vec<FixtureId>> {
        self.fixture_calls.lock().unwrap().last().cloned()
    }
}

impl WatchApi for FakeApi {
    async fn scheduler_state(&self) -> Result<SchedulerResponse, FetchError> {
        self.scheduler_calls.fetch_add(1, Ordering::SeqCst);
        let delay = *self.scheduler_delay.lock().unwrap();
        if !delay.is_zero() {
            sleep(delay).await;
        }
        if self.fail_scheduler.load(Ordering::SeqCst) {
            return Err(FetchError::Status {
                endpoint: "get-scheduler-state",
                status: 502,
            });
        }
        Ok(SchedulerResponse {
            mode: None,
            bundle: self.bundle.lock().unwrap().clone(),
            last_updated: None,
            error: None,
        })
    }

    async fn fixtures_by_ids(&self, ids: Vec<FixtureId>) -> Result<FixturesResponse, FetchError> {
        self.fixture_calls.lock().unwrap().push(ids.clone());
        Ok(FixturesResponse {
            fixtures: ids
                .iter()
                .map(|&fixture_id| Fixture {
                    fixture_id,
                    ..Default::default()
                })
                .collect(),
            requested: ids.len(),
            found: ids.len(),
            ..Default::default()
        })
    }

    async fn live_ticker(&self) -> Result<LiveTickerResponse, FetchError> {
        self.ticker_calls.fetch_add(1, Ordering::SeqCst);
        Ok(LiveTickerResponse::default())
    }
}

fn live(ids: &[FixtureId]) -> ScheduleSnapshot {
    serde_json::from_value(json!({
        "channel_state": { "mode": "MATCHDAY" },
        "now": { "current_schedule_item_id": "live-1" },
        "items": [ { "schedule_item_id": "live-1", "schedule_item_type": "LIVE",
                     "payload": { "fixture_ids": ids } } ]
    }))
    .unwrap()
}

fn news() -> ScheduleSnapshot {
    serde_json::from_value(json!({
        "channel_state": { "mode": "MATCHDAY" },
        "now": { "current_schedule_item_id": "news-1" },
        "items": [ { "schedule_item_id": "news-1", "schedule_item_type": "NEWS",
                     "payload": { "scope": "general" } } ]
    }))
    .unwrap()
}

fn start(api: &Arc<FakeApi>) -> PollingHandle {
    PollingController::new(api.clone(), PollingConfig::default()).start()
}

#[tokio::test(start_paused = true)]
async fn fixture_loop_stops_when_mode_leaves_live() {
    let api = FakeApi::with_bundle(live(&[1, 2, 3]));
    let handle = start(&api);

    sleep(Duration::from_secs(50)).await;
    assert_eq!(handle.mode(), ChannelMode::Live);
    assert!(api.fixture_call_count() >= 3);
    assert_eq!(api.last_fixture_call(), Some(vec![1, 2, 3]));

    api.set_bundle(news());
    sleep(Duration::from_secs(50)).await;
    assert_eq!(handle.mode(), ChannelMode::News);
    let stopped_at = api.fixture_call_count();

    sleep(Duration::from_secs(200)).await;
    assert_eq!(api.fixture_call_count(), stopped_at);

    let fixtures = handle.fixtures().borrow().clone();
    assert_eq!(fixtures.phase, LoopPhase::Idle);
    assert!(fixtures.data.is_none());

    handle.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn fixture_loop_resumes_when_live_returns() {
    let api = FakeApi::with_bundle(news());
    let handle = start(&api);

    sleep(Duration::from_secs(100)).await;
    assert_eq!(api.fixture_call_count(), 0);

    api.set_bundle(live(&[4, 5, 6]));
    sleep(Duration::from_secs(50)).await;
    assert!(api.fixture_call_count() >= 1);
    let fixtures = handle.fixtures().borrow().clone();
    assert_eq!(fixtures.phase, LoopPhase::Ready);
    assert_eq!(fixtures.data.unwrap().found, 3);

    handle.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn live_without_fixture_ids_does_not_poll_fixtures() {
    let api = FakeApi::with_bundle(live(&[]));
    let handle = start(&api);

    sleep(Duration::from_secs(120)).await;
    assert_eq!(handle.mode(), ChannelMode::Live);
    assert_eq!(api.fixture_call_count(), 0);

    handle.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn new_fixture_set_is_fetched_straight_away() {
    let api = FakeApi::with_bundle(live(&[1, 2]));
    let handle = start(&api);

    sleep(Duration::from_secs(50)).await;
    api.set_bundle(live(&[9]));
    // Scheduler picks the change up at t=90
    sleep(Duration::from_secs(41)).await;
    assert_eq!(api.last_fixture_call(), Some(vec![9]));

    handle.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn failed_poll_keeps_last_known_good() {
    let api = FakeApi::with_bundle(live(&[1]));
    let handle = start(&api);
    let scheduler = handle.scheduler();

    sleep(Duration::from_secs(10)).await;
    assert_eq!(scheduler.borrow().phase, LoopPhase::Ready);

    api.fail_scheduler.store(true, Ordering::SeqCst);
    sleep(Duration::from_secs(40)).await;
    {
        let status = scheduler.borrow();
        assert_eq!(status.phase, LoopPhase::Error);
        assert!(status.error.as_deref().unwrap().contains("502"));
        assert!(status.data.is_some());
        assert_eq!(status.mode(), ChannelMode::Live);
    }
    // Fixtures keep flowing off the retained snapshot
    let before = api.fixture_call_count();
    sleep(Duration::from_secs(20)).await;
    assert!(api.fixture_call_count() > before);

    api.fail_scheduler.store(false, Ordering::SeqCst);
    sleep(Duration::from_secs(30)).await;
    let status = scheduler.borrow().clone();
    assert_eq!(status.phase, LoopPhase::Ready);
    assert!(status.error.is_none());

    handle.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn loading_flag_only_on_first_fetch() {
    let api = FakeApi::with_bundle(news());
    *api.scheduler_delay.lock().unwrap() = Duration::from_secs(5);
    let handle = start(&api);
    let scheduler = handle.scheduler();

    sleep(Duration::from_secs(1)).await;
    assert!(scheduler.borrow().is_first_load());

    sleep(Duration::from_secs(5)).await;
    assert!(!scheduler.borrow().is_first_load());

    // Second fetch is in flight at t=47
    sleep(Duration::from_secs(41)).await;
    assert_eq!(api.scheduler_calls.load(Ordering::SeqCst), 2);
    assert!(!scheduler.borrow().is_first_load());
    assert_eq!(scheduler.borrow().phase, LoopPhase::Ready);

    handle.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn retry_after_failed_first_fetch_is_not_a_first_load() {
    let api = FakeApi::with_bundle(news());
    api.fail_scheduler.store(true, Ordering::SeqCst);
    *api.scheduler_delay.lock().unwrap() = Duration::from_secs(5);
    let handle = start(&api);
    let scheduler = handle.scheduler();

    sleep(Duration::from_secs(1)).await;
    assert!(scheduler.borrow().is_first_load());

    sleep(Duration::from_secs(9)).await;
    assert_eq!(scheduler.borrow().phase, LoopPhase::Error);

    // Second fetch is in flight at t=47
    sleep(Duration::from_secs(37)).await;
    assert_eq!(api.scheduler_calls.load(Ordering::SeqCst), 2);
    {
        let status = scheduler.borrow();
        assert_eq!(status.phase, LoopPhase::Error);
        assert!(!status.is_first_load());
    }

    handle.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn refresh_fetches_immediately() {
    let api = FakeApi::with_bundle(news());
    let handle = start(&api);

    sleep(Duration::from_secs(10)).await;
    assert_eq!(api.scheduler_calls.load(Ordering::SeqCst), 1);
    assert_eq!(api.ticker_calls.load(Ordering::SeqCst), 1);

    handle.refresh();
    sleep(Duration::from_secs(1)).await;
    assert_eq!(api.scheduler_calls.load(Ordering::SeqCst), 2);
    assert_eq!(api.ticker_calls.load(Ordering::SeqCst), 2);

    handle.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn no_fetches_after_shutdown() {
    let api = FakeApi::with_bundle(live(&[1, 2, 3]));
    let handle = start(&api);

    sleep(Duration::from_secs(10)).await;
    handle.shutdown().await;

    let scheduler = api.scheduler_calls.load(Ordering::SeqCst);
    let ticker = api.ticker_calls.load(Ordering::SeqCst);
    let fixtures = api.fixture_call_count();

    sleep(Duration::from_secs(600)).await;
    assert_eq!(api.scheduler_calls.load(Ordering::SeqCst), scheduler);
    assert_eq!(api.ticker_calls.load(Ordering::SeqCst), ticker);
    assert_eq!(api.fixture_call_count(), fixtures);
}
