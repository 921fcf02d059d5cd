//! HTTP client for the position feed and the periodic refresh service.
//!
//! This module provides:
//! - Cache-busted fetching of the positions, statistics and photos files
//! - Graceful degradation when the optional files are absent
//! - A refresh loop that ticks on a fixed interval and skips a tick while a
//!   previous run is still in flight
//!
//! Every failure here is locally contained: a failed fetch logs a warning,
//! the previous snapshot stays on screen and the next tick retries.

use crate::error::{Result, TrackError};
use crate::feed::{self, Photo};
use crate::pipeline::{PipelineOutput, TrackPipeline};
use crate::summary::StatsTable;
use crate::GeoFix;
use chrono::Utc;
use log::{debug, info, warn};
use reqwest::Client;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::sync::Mutex;

const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Where the tracker's files live. The statistics and photos files are
/// optional side feeds; `None` simply disables them.
#[derive(Debug, Clone)]
pub struct FeedUrls {
    pub positions: String,
    pub daily_stats: Option<String>,
    pub photos: Option<String>,
}

impl FeedUrls {
    /// Feed with positions only.
    pub fn positions_only(positions: &str) -> Self {
        Self {
            positions: positions.to_string(),
            daily_stats: None,
            photos: None,
        }
    }
}

/// Snapshot delivery callback used by [`TrackerService::run_forever`].
pub type SnapshotHandler = Arc<dyn Fn(&PipelineOutput) + Send + Sync>;

/// HTTP fetcher for the tracker's data files.
pub struct FeedClient {
    client: Client,
    urls: FeedUrls,
}

impl FeedClient {
    /// Create a client with a connection pool and request timeout.
    pub fn new(urls: FeedUrls) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| TrackError::HttpError {
                message: format!("failed to create HTTP client: {}", e),
                status_code: None,
            })?;

        Ok(Self { client, urls })
    }

    /// Fetch and parse the position feed.
    pub async fn fetch_positions(&self) -> Result<Vec<GeoFix>> {
        let body = self.get_fresh(&self.urls.positions).await?;
        feed::parse_positions(&body)
    }

    /// Fetch and parse the daily statistics. A missing file (404) or an
    /// unconfigured URL is the valid "no statistics yet" state, not an error.
    pub async fn fetch_daily_stats(&self) -> Result<StatsTable> {
        let Some(url) = self.urls.daily_stats.as_deref() else {
            return Ok(StatsTable::default());
        };
        match self.get_fresh(url).await {
            Ok(body) => feed::parse_daily_stats(&body),
            Err(TrackError::HttpError {
                status_code: Some(404),
                ..
            }) => {
                debug!("no statistics file yet");
                Ok(StatsTable::default())
            }
            Err(err) => Err(err),
        }
    }

    /// Fetch and parse the photo markers; absent file means no photos.
    pub async fn fetch_photos(&self) -> Result<Vec<Photo>> {
        let Some(url) = self.urls.photos.as_deref() else {
            return Ok(Vec::new());
        };
        match self.get_fresh(url).await {
            Ok(body) => feed::parse_photos(&body),
            Err(TrackError::HttpError {
                status_code: Some(404),
                ..
            }) => Ok(Vec::new()),
            Err(err) => Err(err),
        }
    }

    /// GET a URL with a cache-busting query parameter, returning the body on
    /// a success status.
    async fn get_fresh(&self, url: &str) -> Result<String> {
        let url = cache_busted(url);
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| TrackError::HttpError {
                message: e.to_string(),
                status_code: None,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(TrackError::HttpError {
                message: format!("request to {} failed", url),
                status_code: Some(status.as_u16()),
            });
        }

        response.text().await.map_err(|e| TrackError::HttpError {
            message: e.to_string(),
            status_code: None,
        })
    }
}

/// Append a `cache=<unix-millis>` query parameter so intermediaries never
/// serve a stale feed.
fn cache_busted(url: &str) -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0);
    let separator = if url.contains('?') { '&' } else { '?' };
    format!("{}{}cache={}", url, separator, millis)
}

/// Periodic refresh service: fetch, classify, deliver.
///
/// Owns the pipeline context and the feed client. Triggered immediately on
/// startup and thereafter on every interval tick; a tick that arrives while a
/// run is still in flight is skipped instead of piling up.
pub struct TrackerService {
    client: FeedClient,
    pipeline: Mutex<TrackPipeline>,
    in_flight: AtomicBool,
}

impl TrackerService {
    pub fn new(client: FeedClient, pipeline: TrackPipeline) -> Self {
        Self {
            client,
            pipeline: Mutex::new(pipeline),
            in_flight: AtomicBool::new(false),
        }
    }

    /// One fetch-and-classify cycle.
    ///
    /// The statistics table is refreshed first; on failure the previous table
    /// stays in place and the run continues with it. A position-feed failure
    /// aborts the cycle so the caller keeps its previous snapshot.
    pub async fn run_once(&self) -> Result<PipelineOutput> {
        let mut pipeline = self.pipeline.lock().await;

        match self.client.fetch_daily_stats().await {
            Ok(table) => pipeline.set_daily_stats(table),
            Err(err) => warn!("statistics fetch failed, keeping previous table: {}", err),
        }

        let fixes = self.client.fetch_positions().await?;
        info!("feed returned {} fixes", fixes.len());

        pipeline.run(&fixes, Utc::now())
    }

    /// Refresh on every interval tick, forever. The first tick fires
    /// immediately. Each completed run is handed to `handler`; failed runs
    /// are logged and the previous state stands until the next tick.
    pub async fn run_forever(self: Arc<Self>, handler: SnapshotHandler) {
        let period = {
            let pipeline = self.pipeline.lock().await;
            Duration::from_secs(pipeline.config().refresh_interval_secs)
        };
        let mut ticker = tokio::time::interval(period);

        loop {
            ticker.tick().await;

            if self
                .in_flight
                .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
                .is_err()
            {
                debug!("previous refresh still in flight, skipping tick");
                continue;
            }

            let service = Arc::clone(&self);
            let handler = Arc::clone(&handler);
            tokio::spawn(async move {
                match service.run_once().await {
                    Ok(output) => handler(&output),
                    Err(err) => warn!("refresh failed, keeping previous state: {}", err),
                }
                service.in_flight.store(false, Ordering::SeqCst);
            });
        }
    }
}
