//! Backend client.
//!
//! `WatchApi` is the seam the poller talks through; `HttpWatchApi` is the
//! real implementation over the hosted functions.

use std::future::Future;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::ApiConfig;
use crate::protocol::{
    FixturesRequest, FixturesResponse, LiveTickerResponse, SchedulerResponse, FIXTURES_BY_IDS,
    LIVE_TICKER, SCHEDULER_STATE,
};
use crate::schedule::FixtureId;

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("transport: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("{endpoint} returned {status}")]
    Status {
        endpoint: &'static str,
        status: u16,
    },
    #[error("{endpoint}: bad response body: {source}")]
    Decode {
        endpoint: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

pub trait WatchApi: Send + Sync + 'static {
    fn scheduler_state(&self) -> impl Future<Output = Result<SchedulerResponse, FetchError>> + Send;

    /// Callers may pass an empty list; implementations answer it with an
    /// empty result and no request.
    fn fixtures_by_ids(
        &self,
        ids: Vec<FixtureId>,
    ) -> impl Future<Output = Result<FixturesResponse, FetchError>> + Send;

    fn live_ticker(&self) -> impl Future<Output = Result<LiveTickerResponse, FetchError>> + Send;
}

pub struct HttpWatchApi {
    client: reqwest::Client,
    base_url: String,
    anon_key: String,
}

impl HttpWatchApi {
    pub fn new(config: &ApiConfig) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs.max(1)))
            .build()?;
        Ok(Self {
            client,
            base_url: config.functions_url.trim_end_matches('/').to_string(),
            anon_key: config.anon_key.clone(),
        })
    }

    async fn call<B, T>(&self, endpoint: &'static str, body: &B) -> Result<T, FetchError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = format!("{}/{}", self.base_url, endpoint);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.anon_key)
            .header("apikey", &self.anon_key)
            .header("Accept", "application/json")
            .json(body)
            .send()
            .await?;

        let status = response.status();
        let bytes = response.bytes().await?;
        debug!("{} -> {} ({} bytes)", endpoint, status, bytes.len());

        match serde_json::from_slice::<T>(&bytes) {
            Ok(data) => {
                // Error paths upstream still return a usable (often empty) body
                if !status.is_success() {
                    warn!("{} returned {} with a payload; using it", endpoint, status);
                }
                Ok(data)
            }
            Err(_) if !status.is_success() => Err(FetchError::Status {
                endpoint,
                status: status.as_u16(),
            }),
            Err(source) => Err(FetchError::Decode { endpoint, source }),
        }
    }
}

impl WatchApi for HttpWatchApi {
    async fn scheduler_state(&self) -> Result<SchedulerResponse, FetchError> {
        let response: SchedulerResponse =
            self.call(SCHEDULER_STATE, &serde_json::json!({})).await?;
        if let Some(err) = &response.error {
            warn!("scheduler fell back to {:?}: {}", response.mode, err);
        }
        Ok(response)
    }

    async fn fixtures_by_ids(&self, ids: Vec<FixtureId>) -> Result<FixturesResponse, FetchError> {
        if ids.is_empty() {
            return Ok(FixturesResponse::empty());
        }
        self.call(FIXTURES_BY_IDS, &FixturesRequest { fixture_ids: ids })
            .await
    }

    async fn live_ticker(&self) -> Result<LiveTickerResponse, FetchError> {
        self.call(LIVE_TICKER, &serde_json::json!({})).await
    }
}
