//! Shared test harness: scripted market source and domain fixtures
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use rust_decimal::Decimal;
use tokio::sync::Notify;

use paddock::api::FetchError;
use paddock::market::{MarketDetail, MarketSource, RaceListPage, RaceSummary, RunnerQuote};

/// A market source that replays scripted responses in order.
///
/// With `hold_lists` set, race-list fetches park until `release` is called,
/// which lets a test observe the in-flight state.
pub struct ScriptedSource {
    lists: Mutex<VecDeque<Result<RaceListPage, FetchError>>>,
    details: Mutex<VecDeque<Result<MarketDetail, FetchError>>>,
    pub list_calls: AtomicUsize,
    pub detail_calls: AtomicUsize,
    hold_lists: AtomicBool,
    release: Notify,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self {
            lists: Mutex::new(VecDeque::new()),
            details: Mutex::new(VecDeque::new()),
            list_calls: AtomicUsize::new(0),
            detail_calls: AtomicUsize::new(0),
            hold_lists: AtomicBool::new(false),
            release: Notify::new(),
        }
    }

    pub fn push_list(&self, response: Result<RaceListPage, FetchError>) {
        self.lists.lock().unwrap().push_back(response);
    }

    pub fn push_detail(&self, response: Result<MarketDetail, FetchError>) {
        self.details.lock().unwrap().push_back(response);
    }

    /// Park subsequent race-list fetches until `release`.
    pub fn hold_lists(&self) {
        self.hold_lists.store(true, Ordering::SeqCst);
    }

    /// Let one parked fetch proceed.
    pub fn release(&self) {
        self.hold_lists.store(false, Ordering::SeqCst);
        self.release.notify_one();
    }

    pub fn list_call_count(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MarketSource for ScriptedSource {
    async fn race_list(&self) -> Result<RaceListPage, FetchError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if self.hold_lists.load(Ordering::SeqCst) {
            self.release.notified().await;
        }
        self.lists
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(FetchError::Transport("script exhausted".to_string())))
    }

    async fn market_detail(&self, _market_id: &str) -> Result<MarketDetail, FetchError> {
        self.detail_calls.fetch_add(1, Ordering::SeqCst);
        self.details
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(FetchError::Transport("script exhausted".to_string())))
    }
}

pub fn race(market_id: &str, minutes_to_start: f64) -> RaceSummary {
    RaceSummary {
        race_info: String::new(),
        venue: "Kempton".to_string(),
        color_index: 0,
        market_id: market_id.to_string(),
        market_name: "1m Mdn Stks".to_string(),
        start_time: Utc.with_ymd_and_hms(2026, 3, 14, 15, 0, 0).unwrap(),
        event_name: "Kempton 14th Mar".to_string(),
        time_to_start_minutes: minutes_to_start,
        race_status: String::new(),
        status_color: String::new(),
    }
}

pub fn page(races: Vec<RaceSummary>) -> RaceListPage {
    RaceListPage {
        races,
        current_time_uk: None,
    }
}

pub fn runner(selection_id: i64, back: Option<Decimal>, lay: Option<Decimal>) -> RunnerQuote {
    RunnerQuote {
        selection_id,
        name: format!("Runner {selection_id}"),
        back_price: back,
        lay_price: lay,
        last_price_traded: back,
        status: Default::default(),
        total_matched: Decimal::from(500),
        profit_loss: String::new(),
        optimum: String::new(),
        bets: String::new(),
    }
}

pub fn detail(runners: Vec<RunnerQuote>) -> MarketDetail {
    MarketDetail {
        runners,
        non_runner_count: 0,
        total_matched: Decimal::from(25_000),
        in_play: false,
        status_message: String::new(),
    }
}
