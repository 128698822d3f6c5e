//! Market domain model
//!
//! Race-list and race-detail types as served by the backend, plus the
//! `MarketSource` seam the pollers fetch through.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::api::FetchError;

/// One row in the race list.
///
/// A poll replaces the whole snapshot with a fresh ordered sequence; a
/// `RaceSummary` is never mutated in place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RaceSummary {
    /// Display label, e.g. "14:30 Ascot"
    #[serde(default)]
    pub race_info: String,
    /// Course name
    #[serde(default)]
    pub venue: String,
    /// Row grouping/striping hint
    #[serde(default)]
    pub color_index: i32,
    /// Unique market key
    pub market_id: String,
    #[serde(default)]
    pub market_name: String,
    /// Authoritative start time from the backend
    pub start_time: DateTime<Utc>,
    #[serde(default)]
    pub event_name: String,
    /// Minutes until the off as computed by the backend at fetch time;
    /// negative once the race has started
    pub time_to_start_minutes: f64,
    #[serde(default)]
    pub race_status: String,
    #[serde(default)]
    pub status_color: String,
}

/// Runner trading state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RunnerStatus {
    #[default]
    Active,
    NonRunner,
    Removed,
    /// Anything else the exchange reports (winner, loser, ...)
    #[serde(other)]
    Unknown,
}

/// One selection within a market-detail fetch.
///
/// Price fields are decimal odds; a quote at or below 1.0 is not a valid
/// price and is excluded from metric computation rather than coerced to
/// zero. Absent and invalid quotes stay distinct states.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunnerQuote {
    pub selection_id: i64,
    #[serde(default)]
    pub name: String,
    pub back_price: Option<Decimal>,
    pub lay_price: Option<Decimal>,
    pub last_price_traded: Option<Decimal>,
    #[serde(default)]
    pub status: RunnerStatus,
    #[serde(default)]
    pub total_matched: Decimal,

    // Display placeholders filled in by the client, never derived from
    // price data here.
    #[serde(default)]
    pub profit_loss: String,
    #[serde(default)]
    pub optimum: String,
    #[serde(default)]
    pub bets: String,
}

/// Aggregate payload for one race window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketDetail {
    pub runners: Vec<RunnerQuote>,
    pub non_runner_count: u32,
    pub total_matched: Decimal,
    pub in_play: bool,
    pub status_message: String,
}

impl MarketDetail {
    /// Populate the client-side display placeholders on every runner.
    pub fn seed_display_fields(&mut self) {
        for runner in &mut self.runners {
            runner.profit_loss = "£0.00".to_string();
            runner.optimum = "TBC".to_string();
            runner.bets = "-".to_string();
        }
    }
}

/// One fetched race list, with the server's display clock when provided.
#[derive(Debug, Clone)]
pub struct RaceListPage {
    pub races: Vec<RaceSummary>,
    pub current_time_uk: Option<String>,
}

/// Enforce the snapshot invariant at the parse boundary: every market id
/// non-empty and unique within the batch.
pub fn validate_snapshot(races: &[RaceSummary]) -> Result<(), FetchError> {
    let mut seen = HashSet::with_capacity(races.len());
    for race in races {
        if race.market_id.is_empty() {
            return Err(FetchError::Data("race with empty market_id".to_string()));
        }
        if !seen.insert(race.market_id.as_str()) {
            return Err(FetchError::Data(format!(
                "duplicate market_id {} in race list",
                race.market_id
            )));
        }
    }
    Ok(())
}

/// Fetch seam between the pollers and the backend service.
#[async_trait]
pub trait MarketSource: Send + Sync {
    /// Fetch the current race list.
    async fn race_list(&self) -> Result<RaceListPage, FetchError>;
    /// Fetch runners and prices for one market.
    async fn market_detail(&self, market_id: &str) -> Result<MarketDetail, FetchError>;
}
