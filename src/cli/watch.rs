//! Watch command implementation
//!
//! Drives the race-list view: an adaptive poll loop that re-arms its timer
//! after every successful fetch, interleaved with a one-second countdown
//! tick that re-renders from the held snapshot without touching the network.

use clap::Args;
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use crate::api::BackendClient;
use crate::clock::{format_countdown, ClockDriver};
use crate::config::Config;
use crate::market::{MarketSource, RaceSummary};
use crate::poller::{RaceListPoller, RefreshOutcome};
use crate::schedule::{RefreshTimer, Scheduler};
use crate::telemetry::{set_gauge, GaugeMetric};

#[derive(Args, Debug)]
pub struct WatchArgs {
    /// Fetch once, print the list, and exit
    #[arg(long)]
    pub once: bool,
}

impl WatchArgs {
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let client = Arc::new(BackendClient::new(&config.backend)?);
        let scheduler = Scheduler::new(config.schedule.to_schedule_config());
        let poller = RaceListPoller::new(client, scheduler);
        let mut timer = RefreshTimer::new();
        let mut clock = ClockDriver::start();

        // First fetch happens immediately, like opening the window
        apply_refresh(&poller, &mut timer).await;

        if self.once {
            return Ok(());
        }

        loop {
            tokio::select! {
                _ = timer.fired() => {
                    apply_refresh(&poller, &mut timer).await;
                }
                _ = clock.tick() => {
                    render_countdown(&poller).await;
                }
                _ = tokio::signal::ctrl_c() => {
                    // Stop the timer before the view goes away; a fetch
                    // still in flight resolves as stale and is discarded.
                    poller.close();
                    timer.stop();
                    println!();
                    tracing::info!("race-list view closed");
                    break;
                }
            }
        }

        Ok(())
    }
}

/// Run one refresh trigger, re-arming the timer only on success.
async fn apply_refresh<S: MarketSource>(poller: &RaceListPoller<S>, timer: &mut RefreshTimer) {
    match poller.refresh().await {
        Ok(RefreshOutcome::Refreshed {
            races,
            next_interval,
            server_time,
        }) => {
            timer.arm(next_interval);
            set_gauge(GaugeMetric::PollIntervalSecs, next_interval.as_secs_f64());
            render_race_list(&races, server_time.as_deref());
            println!("Next refresh: {}", describe_interval(next_interval));
        }
        Ok(RefreshOutcome::AlreadyLoading) | Ok(RefreshOutcome::Stale) => {}
        Err(e) => {
            // Timer untouched: polling continues at the last known cadence
            tracing::warn!(error = %e, "race-list refresh failed, keeping previous snapshot");
            println!("Refresh failed: {e}");
        }
    }
}

fn render_race_list(races: &[RaceSummary], server_time: Option<&str>) {
    if let Some(server_time) = server_time {
        println!("Server time: {server_time}");
    }
    if races.is_empty() {
        println!("No WIN markets in the next 24 hours.");
        return;
    }

    let now = chrono::Utc::now();
    for race in races {
        println!(
            "{:<14} {:<22} {:>5}  {:>12}  {}",
            race.venue,
            race.market_name,
            race.start_time.format("%H:%M"),
            format_countdown(race.start_time, now),
            race.race_status,
        );
    }
    println!("Loaded {} WIN markets.", races.len());
}

/// One-second display tick; skipped while no snapshot exists yet.
async fn render_countdown<S: MarketSource>(poller: &RaceListPoller<S>) {
    let races = poller.snapshot().await;
    if races.is_empty() {
        return;
    }

    let now = chrono::Utc::now();
    if let Some(next) = races
        .iter()
        .filter(|r| r.start_time > now)
        .min_by_key(|r| r.start_time)
    {
        print!(
            "\r{} {} in {}   ",
            next.venue,
            next.market_name,
            format_countdown(next.start_time, now)
        );
        let _ = std::io::stdout().flush();
    }
}

fn describe_interval(interval: Duration) -> String {
    let secs = interval.as_secs();
    if secs < 60 {
        format!("{secs} seconds")
    } else if secs % 60 == 0 {
        let minutes = secs / 60;
        format!("{minutes} minute{}", if minutes == 1 { "" } else { "s" })
    } else {
        format!("{}m {:02}s", secs / 60, secs % 60)
    }
}
