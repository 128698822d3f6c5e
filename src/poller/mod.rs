//! Market pollers
//!
//! One poller per open view. The race-list poller drives the adaptive
//! refresh cycle for the main list; each race window gets its own detail
//! poller with an independent cadence. Snapshots are replaced atomically,
//! so a reader that captured one before a refresh keeps a consistent view.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::time::Instant;

use crate::api::FetchError;
use crate::book::{book_metrics, BookMetric};
use crate::market::{MarketDetail, MarketSource, RaceSummary};
use crate::schedule::Scheduler;
use crate::telemetry::{record_latency, set_gauge, GaugeMetric, LatencyMetric};

/// Result of one race-list refresh trigger.
#[derive(Debug)]
pub enum RefreshOutcome {
    /// Snapshot replaced; arm the timer with `next_interval`.
    Refreshed {
        races: Arc<Vec<RaceSummary>>,
        next_interval: Duration,
        /// Server display clock, when the backend sent one
        server_time: Option<String>,
    },
    /// Another fetch was already outstanding; nothing changed.
    AlreadyLoading,
    /// The view closed while the fetch was in flight; result discarded.
    Stale,
}

/// Poller for the race-list view.
///
/// Owns the snapshot and the loading gate; the owning view holds the timer
/// and arms it with the interval a successful refresh hands back. A failed
/// refresh never consults the scheduler, so the previous cadence keeps
/// running.
pub struct RaceListPoller<S> {
    source: Arc<S>,
    scheduler: Scheduler,
    snapshot: RwLock<Arc<Vec<RaceSummary>>>,
    /// Gates the trigger: manual refresh and timer fire share it, and a
    /// second trigger while a fetch is outstanding is a no-op, not queued.
    loading: AtomicBool,
    /// Cleared on view close; a late response is then discarded unapplied.
    live: AtomicBool,
}

impl<S: MarketSource> RaceListPoller<S> {
    /// Create a poller for a freshly opened race-list view.
    pub fn new(source: Arc<S>, scheduler: Scheduler) -> Self {
        Self {
            source,
            scheduler,
            snapshot: RwLock::new(Arc::new(Vec::new())),
            loading: AtomicBool::new(false),
            live: AtomicBool::new(true),
        }
    }

    /// Trigger a refresh (timer fire or manual action).
    pub async fn refresh(&self) -> Result<RefreshOutcome, FetchError> {
        if self.loading.swap(true, Ordering::SeqCst) {
            tracing::debug!("race-list refresh already in flight, skipping trigger");
            return Ok(RefreshOutcome::AlreadyLoading);
        }

        let result = self.fetch_and_store().await;
        self.loading.store(false, Ordering::SeqCst);
        result
    }

    async fn fetch_and_store(&self) -> Result<RefreshOutcome, FetchError> {
        let started = Instant::now();
        let page = self.source.race_list().await?;
        record_latency(LatencyMetric::RaceList, started.elapsed());

        if !self.live.load(Ordering::SeqCst) {
            tracing::debug!("race-list view closed mid-fetch, discarding response");
            return Ok(RefreshOutcome::Stale);
        }

        let races = Arc::new(page.races);
        *self.snapshot.write().await = Arc::clone(&races);

        let upcoming = races
            .iter()
            .filter(|r| r.time_to_start_minutes > 0.0)
            .count();
        set_gauge(GaugeMetric::TrackedRaces, races.len() as f64);
        set_gauge(GaugeMetric::UpcomingRaces, upcoming as f64);

        let next_interval = self.scheduler.next_interval(&races);

        tracing::info!(
            races = races.len(),
            upcoming = upcoming,
            next_poll_secs = next_interval.as_secs(),
            "race list refreshed"
        );

        Ok(RefreshOutcome::Refreshed {
            races,
            next_interval,
            server_time: page.current_time_uk,
        })
    }

    /// The last good snapshot; empty until the first successful poll.
    pub async fn snapshot(&self) -> Arc<Vec<RaceSummary>> {
        self.snapshot.read().await.clone()
    }

    /// Whether a fetch is currently outstanding.
    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::SeqCst)
    }

    /// Mark the owning view closed. The caller stops its timer; any fetch
    /// still in flight resolves to `Stale` instead of touching state.
    pub fn close(&self) {
        self.live.store(false, Ordering::SeqCst);
    }

    /// The scheduler this view polls with.
    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }
}

/// Result of one race-detail refresh trigger.
#[derive(Debug)]
pub enum DetailOutcome {
    /// Fresh runner data with its three book metrics.
    Loaded {
        detail: Arc<MarketDetail>,
        metrics: [BookMetric; 3],
    },
    /// Another fetch was already outstanding; nothing changed.
    AlreadyLoading,
    /// The view closed while the fetch was in flight; result discarded.
    Stale,
}

/// Poller for one race-detail window.
///
/// Independent of the race-list poll and of every other detail view: each
/// window owns its poller, loading gate and timer, with no shared mutable
/// state across views.
pub struct RaceDetailPoller<S> {
    source: Arc<S>,
    market_id: String,
    detail: RwLock<Option<Arc<MarketDetail>>>,
    loading: AtomicBool,
    live: AtomicBool,
}

impl<S: MarketSource> RaceDetailPoller<S> {
    /// Create a poller for a freshly opened race window.
    pub fn new(source: Arc<S>, market_id: impl Into<String>) -> Self {
        Self {
            source,
            market_id: market_id.into(),
            detail: RwLock::new(None),
            loading: AtomicBool::new(false),
            live: AtomicBool::new(true),
        }
    }

    /// The market this view is bound to.
    pub fn market_id(&self) -> &str {
        &self.market_id
    }

    /// Fetch runners and prices, recomputing the book metrics.
    pub async fn refresh(&self) -> Result<DetailOutcome, FetchError> {
        if self.loading.swap(true, Ordering::SeqCst) {
            tracing::debug!(market_id = %self.market_id, "detail refresh already in flight");
            return Ok(DetailOutcome::AlreadyLoading);
        }

        let result = self.fetch_and_store().await;
        self.loading.store(false, Ordering::SeqCst);
        result
    }

    async fn fetch_and_store(&self) -> Result<DetailOutcome, FetchError> {
        let started = Instant::now();
        let mut detail = self.source.market_detail(&self.market_id).await?;
        record_latency(LatencyMetric::MarketDetail, started.elapsed());

        if !self.live.load(Ordering::SeqCst) {
            tracing::debug!(market_id = %self.market_id, "race window closed mid-fetch");
            return Ok(DetailOutcome::Stale);
        }

        detail.seed_display_fields();
        let metrics = book_metrics(&detail.runners);

        let detail = Arc::new(detail);
        *self.detail.write().await = Some(Arc::clone(&detail));

        tracing::info!(
            market_id = %self.market_id,
            runners = detail.runners.len(),
            non_runners = detail.non_runner_count,
            in_play = detail.in_play,
            "market detail refreshed"
        );

        Ok(DetailOutcome::Loaded { detail, metrics })
    }

    /// The last good detail payload, if any fetch has succeeded yet.
    pub async fn detail(&self) -> Option<Arc<MarketDetail>> {
        self.detail.read().await.clone()
    }

    /// Whether a fetch is currently outstanding.
    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::SeqCst)
    }

    /// Mark the owning window closed; see [`RaceListPoller::close`].
    pub fn close(&self) {
        self.live.store(false, Ordering::SeqCst);
    }
}
