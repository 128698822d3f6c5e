//! Adaptive refresh scheduling
//!
//! Maps the closest upcoming race's time-to-start onto a poll interval and
//! re-arms a reprogrammable repeating timer with it after every successful
//! poll. Races already off never drive the cadence.

mod timer;

pub use timer::RefreshTimer;

use std::time::Duration;

use crate::market::RaceSummary;

/// Interval bands for the adaptive poll cadence.
///
/// Thresholds are strict upper bounds in minutes-to-start, compared against
/// the closest upcoming race: below `imminent`, poll every 10 s; below
/// `soon`, every 30 s; below `near`, every 60 s; otherwise every 120 s.
/// With no upcoming race at all, fall back to the idle interval.
#[derive(Debug, Clone)]
pub struct ScheduleConfig {
    pub imminent_threshold_minutes: f64,
    pub soon_threshold_minutes: f64,
    pub near_threshold_minutes: f64,
    pub imminent_interval: Duration,
    pub soon_interval: Duration,
    pub near_interval: Duration,
    pub far_interval: Duration,
    /// Used when the list is empty or every race has already started
    pub idle_interval: Duration,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            imminent_threshold_minutes: 2.0,
            soon_threshold_minutes: 5.0,
            near_threshold_minutes: 10.0,
            imminent_interval: Duration::from_secs(10),
            soon_interval: Duration::from_secs(30),
            near_interval: Duration::from_secs(60),
            far_interval: Duration::from_secs(120),
            idle_interval: Duration::from_secs(300),
        }
    }
}

/// Chooses the next poll interval from the current race list.
///
/// Pure over already-validated in-memory data; it cannot fail, so a failed
/// poll simply never consults it and the previous cadence keeps running.
#[derive(Debug, Clone)]
pub struct Scheduler {
    config: ScheduleConfig,
}

impl Scheduler {
    /// Create a scheduler with the given bands.
    pub fn new(config: ScheduleConfig) -> Self {
        Self { config }
    }

    /// Create a scheduler with the default bands.
    pub fn with_defaults() -> Self {
        Self::new(ScheduleConfig::default())
    }

    /// The race driving the cadence: minimum positive time-to-start.
    ///
    /// Ties on the minimum resolve to the first occurrence in snapshot
    /// order, so the pick is deterministic for a given list.
    pub fn closest_upcoming<'a>(&self, races: &'a [RaceSummary]) -> Option<&'a RaceSummary> {
        let mut closest: Option<&RaceSummary> = None;
        for race in races.iter().filter(|r| r.time_to_start_minutes > 0.0) {
            match closest {
                Some(current) if race.time_to_start_minutes < current.time_to_start_minutes => {
                    closest = Some(race)
                }
                None => closest = Some(race),
                _ => {}
            }
        }
        closest
    }

    /// Compute the interval for the next poll.
    pub fn next_interval(&self, races: &[RaceSummary]) -> Duration {
        let Some(closest) = self.closest_upcoming(races) else {
            return self.config.idle_interval;
        };

        let minutes = closest.time_to_start_minutes;
        let interval = if minutes < self.config.imminent_threshold_minutes {
            self.config.imminent_interval
        } else if minutes < self.config.soon_threshold_minutes {
            self.config.soon_interval
        } else if minutes < self.config.near_threshold_minutes {
            self.config.near_interval
        } else {
            self.config.far_interval
        };

        tracing::debug!(
            market_id = %closest.market_id,
            minutes_to_start = minutes,
            interval_secs = interval.as_secs(),
            "next poll interval"
        );

        interval
    }

    /// The configured bands.
    pub fn config(&self) -> &ScheduleConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn race(market_id: &str, minutes: f64) -> RaceSummary {
        RaceSummary {
            race_info: String::new(),
            venue: String::new(),
            color_index: 0,
            market_id: market_id.to_string(),
            market_name: String::new(),
            start_time: Utc.with_ymd_and_hms(2026, 3, 14, 14, 30, 0).unwrap(),
            event_name: String::new(),
            time_to_start_minutes: minutes,
            race_status: String::new(),
            status_color: String::new(),
        }
    }

    #[test]
    fn test_empty_list_uses_idle_interval() {
        let scheduler = Scheduler::with_defaults();
        assert_eq!(scheduler.next_interval(&[]), Duration::from_secs(300));
    }

    #[test]
    fn test_all_started_uses_idle_interval() {
        let scheduler = Scheduler::with_defaults();
        let races = vec![race("1.1", -3.0), race("1.2", 0.0)];
        assert_eq!(scheduler.next_interval(&races), Duration::from_secs(300));
    }

    #[test]
    fn test_minimum_governs() {
        let scheduler = Scheduler::with_defaults();
        let races = vec![race("1.1", 20.0), race("1.2", 1.5)];
        assert_eq!(scheduler.next_interval(&races), Duration::from_secs(10));
    }

    #[test]
    fn test_soon_band() {
        let scheduler = Scheduler::with_defaults();
        let races = vec![race("1.1", 3.0)];
        assert_eq!(scheduler.next_interval(&races), Duration::from_secs(30));
    }

    #[test]
    fn test_near_band() {
        let scheduler = Scheduler::with_defaults();
        let races = vec![race("1.1", 7.0)];
        assert_eq!(scheduler.next_interval(&races), Duration::from_secs(60));
    }

    #[test]
    fn test_band_edges_are_strict() {
        // Each threshold is a strict upper bound: exactly 10 minutes out is
        // already the far band, exactly 2 the soon band, exactly 5 the near.
        let scheduler = Scheduler::with_defaults();
        assert_eq!(
            scheduler.next_interval(&[race("1.1", 10.0)]),
            Duration::from_secs(120)
        );
        assert_eq!(
            scheduler.next_interval(&[race("1.1", 5.0)]),
            Duration::from_secs(60)
        );
        assert_eq!(
            scheduler.next_interval(&[race("1.1", 2.0)]),
            Duration::from_secs(30)
        );
    }

    #[test]
    fn test_started_races_do_not_drive_interval() {
        // The in-play race at -1 minute is ignored; the 7-minute race wins.
        let scheduler = Scheduler::with_defaults();
        let races = vec![race("1.1", -1.0), race("1.2", 7.0)];
        assert_eq!(scheduler.next_interval(&races), Duration::from_secs(60));
    }

    #[test]
    fn test_tie_break_is_first_in_snapshot_order() {
        let scheduler = Scheduler::with_defaults();
        let races = vec![race("1.1", 4.0), race("1.2", 4.0)];
        let closest = scheduler.closest_upcoming(&races).unwrap();
        assert_eq!(closest.market_id, "1.1");
    }

    #[test]
    fn test_closest_upcoming_none_when_all_started() {
        let scheduler = Scheduler::with_defaults();
        assert!(scheduler.closest_upcoming(&[race("1.1", -2.0)]).is_none());
    }
}
