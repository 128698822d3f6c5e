//! Poll cycle instrumentation

use std::time::Duration;

/// Latency metric types
#[derive(Debug, Clone, Copy)]
pub enum LatencyMetric {
    /// Race-list fetch round trip
    RaceList,
    /// Market-detail fetch round trip
    MarketDetail,
    /// Backend login round trip
    Login,
}

/// Gauge metric types
#[derive(Debug, Clone, Copy)]
pub enum GaugeMetric {
    /// Races in the current snapshot
    TrackedRaces,
    /// Races still to start
    UpcomingRaces,
    /// Armed poll interval in seconds
    PollIntervalSecs,
}

/// Record a latency measurement
pub fn record_latency(metric: LatencyMetric, duration: Duration) {
    let metric_name = match metric {
        LatencyMetric::RaceList => "paddock_race_list_latency_ms",
        LatencyMetric::MarketDetail => "paddock_market_detail_latency_ms",
        LatencyMetric::Login => "paddock_login_latency_ms",
    };

    metrics::histogram!(metric_name).record(duration.as_millis() as f64);
}

/// Set a gauge value
pub fn set_gauge(metric: GaugeMetric, value: f64) {
    let metric_name = match metric {
        GaugeMetric::TrackedRaces => "paddock_tracked_races",
        GaugeMetric::UpcomingRaces => "paddock_upcoming_races",
        GaugeMetric::PollIntervalSecs => "paddock_poll_interval_secs",
    };

    metrics::gauge!(metric_name).set(value);
}
