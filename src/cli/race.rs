//! Race command implementation
//!
//! Opens one race window: runners, best prices and the three book
//! percentages. Each window owns its own poll cycle, independent of the
//! race list and of any other open window.

use clap::Args;
use std::sync::Arc;
use std::time::Duration;

use crate::api::BackendClient;
use crate::book::BookMetric;
use crate::config::Config;
use crate::market::{MarketDetail, MarketSource, RunnerStatus};
use crate::poller::{DetailOutcome, RaceDetailPoller};
use crate::schedule::RefreshTimer;

#[derive(Args, Debug)]
pub struct RaceArgs {
    /// Market id of the race to open
    pub market_id: String,

    /// Keep the window open, refreshing every this many seconds
    #[arg(long)]
    pub refresh_secs: Option<u64>,
}

impl RaceArgs {
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let client = Arc::new(BackendClient::new(&config.backend)?);
        let poller = RaceDetailPoller::new(client, self.market_id.clone());

        refresh_once(&poller).await;

        let Some(secs) = self.refresh_secs else {
            return Ok(());
        };

        let mut timer = RefreshTimer::new();
        timer.arm(Duration::from_secs(secs.max(1)));

        loop {
            tokio::select! {
                _ = timer.fired() => refresh_once(&poller).await,
                _ = tokio::signal::ctrl_c() => {
                    poller.close();
                    timer.stop();
                    println!();
                    break;
                }
            }
        }

        Ok(())
    }
}

async fn refresh_once<S: MarketSource>(poller: &RaceDetailPoller<S>) {
    match poller.refresh().await {
        Ok(DetailOutcome::Loaded { detail, metrics }) => {
            render_detail(poller.market_id(), &detail, &metrics);
        }
        Ok(DetailOutcome::AlreadyLoading) | Ok(DetailOutcome::Stale) => {}
        Err(e) => {
            tracing::warn!(market_id = %poller.market_id(), error = %e, "detail refresh failed");
            println!("{e}");
        }
    }
}

fn render_detail(market_id: &str, detail: &MarketDetail, metrics: &[BookMetric; 3]) {
    println!("Market {market_id}{}", detail.status_message);

    for runner in &detail.runners {
        println!(
            "{:>10}  {:<24} {:>7} {:>7} {:>7}  {:>12}  {}",
            runner.selection_id,
            runner.name,
            price_cell(runner.back_price),
            price_cell(runner.lay_price),
            price_cell(runner.last_price_traded),
            runner.total_matched,
            status_cell(runner.status),
        );
    }

    for metric in metrics {
        println!(
            "{:<18} {:>6.1}%  {:?}",
            metric.kind.label(),
            metric.percentage,
            metric.health,
        );
    }

    let mut status = format!(
        "Loaded {} runners • Total matched: £{}",
        detail.runners.len(),
        detail.total_matched
    );
    if detail.non_runner_count > 0 {
        status.push_str(&format!(
            " • {} Non-Runner{}",
            detail.non_runner_count,
            if detail.non_runner_count > 1 { "s" } else { "" }
        ));
    }
    if detail.in_play {
        status.push_str(" • Race is IN-PLAY");
    }
    println!("{status}");
}

fn price_cell(price: Option<rust_decimal::Decimal>) -> String {
    price.map(|p| p.to_string()).unwrap_or_else(|| "-".to_string())
}

fn status_cell(status: RunnerStatus) -> &'static str {
    match status {
        RunnerStatus::Active => "",
        RunnerStatus::NonRunner => "NR",
        RunnerStatus::Removed => "REMOVED",
        RunnerStatus::Unknown => "?",
    }
}
