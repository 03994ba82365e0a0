use axum::{extract::State, response::Json, routing::get, Router};
use chrono::{DateTime, Local};
use serde::Serialize;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tower_http::cors::CorsLayer;
use tracing::{error, info};

use watch_proto::navigator::{self, item_status, ItemStatus};
use watch_proto::poller::{FixturesStatus, LoopPhase, LoopStatus, SchedulerStatus, TickerStatus};
use watch_proto::protocol::FixturesResponse;
use watch_proto::schedule::{ChannelMode, FixtureId, ScheduleItem};

#[derive(Clone)]
struct HttpState {
    scheduler: watch::Receiver<SchedulerStatus>,
    fixtures: watch::Receiver<FixturesStatus>,
    ticker: watch::Receiver<TickerStatus>,
}

#[derive(Serialize)]
struct LoopInfo {
    phase: LoopPhase,
    error: Option<String>,
    last_success: Option<DateTime<Local>>,
}

impl<T> From<&LoopStatus<T>> for LoopInfo {
    fn from(status: &LoopStatus<T>) -> Self {
        Self {
            phase: status.phase,
            error: status.error.clone(),
            last_success: status.last_success,
        }
    }
}

#[derive(Serialize)]
struct ItemInfo {
    id: String,
    title: String,
    #[serde(rename = "type")]
    item_type: &'static str,
    scheduled_for_uk: Option<String>,
}

impl From<&ScheduleItem> for ItemInfo {
    fn from(item: &ScheduleItem) -> Self {
        Self {
            id: item.id.clone(),
            title: item.display_title(),
            item_type: item.item_type().as_str(),
            scheduled_for_uk: item.scheduled_for_uk.clone(),
        }
    }
}

#[derive(Serialize)]
struct Loops {
    scheduler: LoopInfo,
    fixtures: LoopInfo,
    ticker: LoopInfo,
}

#[derive(Serialize)]
struct ApiState {
    mode: ChannelMode,
    current_item: Option<ItemInfo>,
    next_item: Option<ItemInfo>,
    fixture_ids: Vec<FixtureId>,
    loops: Loops,
}

#[derive(Serialize)]
struct ScheduleEntry {
    #[serde(flatten)]
    item: ItemInfo,
    status: ItemStatus,
}

/// Read-only view of the poller for scripts and overlays.
pub fn start_server(
    bind_address: String,
    port: u16,
    scheduler: watch::Receiver<SchedulerStatus>,
    fixtures: watch::Receiver<FixturesStatus>,
    ticker: watch::Receiver<TickerStatus>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let app_state = HttpState {
            scheduler,
            fixtures,
            ticker,
        };

        let app = Router::new()
            .route("/api/state", get(get_state))
            .route("/api/schedule", get(get_schedule))
            .route("/api/fixtures", get(get_fixtures))
            .layer(CorsLayer::permissive())
            .with_state(app_state);

        let addr = format!("{}:{}", bind_address, port);
        let listener = match TcpListener::bind(&addr).await {
            Ok(l) => l,
            Err(e) => {
                error!("Failed to bind HTTP server to {}: {}", addr, e);
                return;
            }
        };

        info!("HTTP API server listening on http://{}", addr);

        if let Err(e) = axum::serve(listener, app).await {
            error!("HTTP server error: {}", e);
        }
    })
}

async fn get_state(State(state): State<HttpState>) -> Json<ApiState> {
    let scheduler = state.scheduler.borrow().clone();
    let snapshot = scheduler.snapshot();

    Json(ApiState {
        mode: scheduler.mode(),
        current_item: navigator::current_item(snapshot).map(ItemInfo::from),
        next_item: navigator::next_item(snapshot).map(ItemInfo::from),
        fixture_ids: navigator::fixture_ids_for_live(snapshot).to_vec(),
        loops: Loops {
            scheduler: LoopInfo::from(&scheduler),
            fixtures: LoopInfo::from(&*state.fixtures.borrow()),
            ticker: LoopInfo::from(&*state.ticker.borrow()),
        },
    })
}

async fn get_schedule(State(state): State<HttpState>) -> Json<Vec<ScheduleEntry>> {
    let scheduler = state.scheduler.borrow().clone();
    let Some(snapshot) = scheduler.snapshot() else {
        return Json(Vec::new());
    };
    let current = snapshot.now.current_schedule_item_id.as_deref();
    let now = Local::now().naive_local();

    Json(
        snapshot
            .items
            .iter()
            .map(|item| ScheduleEntry {
                item: ItemInfo::from(item),
                status: item_status(item, current, now),
            })
            .collect(),
    )
}

async fn get_fixtures(State(state): State<HttpState>) -> Json<FixturesResponse> {
    let data = state.fixtures.borrow().data.clone();
    Json(data.map(|d| (*d).clone()).unwrap_or_default())
}
