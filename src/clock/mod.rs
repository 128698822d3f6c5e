//! Wall-clock countdown driver
//!
//! Ticks once per second, independent of the poll timers, and recomputes
//! only the human-readable countdown text from the snapshot already in
//! memory. It never fetches; its only "failure mode" is being skipped while
//! no snapshot exists yet.

use chrono::{DateTime, Utc};
use std::time::Duration;
use tokio::time::{interval, Interval, MissedTickBehavior};

/// Tick period for countdown refresh.
pub const TICK: Duration = Duration::from_secs(1);

/// Signed minutes until the off, derived locally between polls.
pub fn minutes_until_start(start_time: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    (start_time - now).num_seconds() as f64 / 60.0
}

/// Human-readable countdown for a race, e.g. "1h 05m", "12m 30s", "45s",
/// or "off 3m ago" once it has started.
pub fn format_countdown(start_time: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let secs = (start_time - now).num_seconds();
    if secs >= 3600 {
        format!("{}h {:02}m", secs / 3600, (secs % 3600) / 60)
    } else if secs >= 60 {
        format!("{}m {:02}s", secs / 60, secs % 60)
    } else if secs >= 0 {
        format!("{secs}s")
    } else if secs > -60 {
        format!("off {}s ago", -secs)
    } else {
        format!("off {}m ago", -secs / 60)
    }
}

/// One-second ticker for the countdown display.
///
/// A thin wrapper over the runtime interval so views depend on a tick, not
/// on `tokio::time` directly. Missed ticks are skipped, not replayed.
pub struct ClockDriver {
    interval: Interval,
}

impl ClockDriver {
    /// Start a ticker at the 1 s display cadence.
    pub fn start() -> Self {
        let mut interval = interval(TICK);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        Self { interval }
    }

    /// Wait for the next display tick.
    pub async fn tick(&mut self) {
        self.interval.tick().await;
    }
}
