mod action;
mod app;
mod app_state;
mod component;
mod components;
mod http;
mod theme;
mod widgets;

use std::sync::Arc;

use tracing::{info, warn};

use watch_proto::{Config, HttpWatchApi, PollingController};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let data_dir = watch_proto::platform::data_dir();
    std::fs::create_dir_all(&data_dir)?;

    let log_path = watch_proto::platform::log_path();
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)?;

    // Allow RUST_LOG override; keep HTTP client internals quiet by default.
    let log_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "debug,hyper_util=warn,reqwest=warn,hyper=warn".to_string());
    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_env_filter(log_filter.as_str())
        .with_ansi(false)
        .init();

    // The TUI owns the terminal, so the log path goes to stderr before it starts.
    eprintln!("watch log: {}", log_path.display());

    info!("watch starting…");

    // ── Load config ──────────────────────────────────────────────────────────
    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            warn!("config load failed, using defaults: {:#}", e);
            Config::default()
        }
    };
    info!("functions endpoint: {}", config.api.functions_url);

    // ── Polling ──────────────────────────────────────────────────────────────
    let api = Arc::new(HttpWatchApi::new(&config.api)?);
    let poller = PollingController::new(api, config.polling.clone()).start();

    // ── HTTP status API ──────────────────────────────────────────────────────
    let http_address = if config.http.enabled {
        http::start_server(
            config.http.bind_address.clone(),
            config.http.port,
            poller.scheduler(),
            poller.fixtures(),
            poller.ticker(),
        );
        Some(format!("{}:{}", config.http.bind_address, config.http.port))
    } else {
        None
    };

    // ── Run TUI ──────────────────────────────────────────────────────────────
    app::App::new(poller, http_address).run().await?;

    info!("watch exited");
    Ok(())
}
