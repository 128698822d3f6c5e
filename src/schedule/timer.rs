//! Reprogrammable repeating timer
//!
//! The pollers depend only on this capability: a single repeating deadline
//! whose interval can be replaced mid-countdown and which can be cancelled
//! when the owning view closes. At most one callback is ever waiting on it.

use std::time::Duration;

use tokio::time::{sleep_until, Instant};

#[derive(Debug, Clone, Copy)]
enum State {
    Stopped,
    Armed { interval: Duration, deadline: Instant },
}

/// A repeating timer that starts stopped, is armed with an interval, and
/// keeps firing at that interval until re-armed or stopped.
#[derive(Debug)]
pub struct RefreshTimer {
    state: State,
}

impl RefreshTimer {
    /// A stopped timer; `fired` pends until `arm` is called.
    pub fn new() -> Self {
        Self {
            state: State::Stopped,
        }
    }

    /// Arm (or re-arm) the repeating interval.
    ///
    /// The next fire is `interval` from now. Re-arming mid-countdown
    /// replaces the running deadline entirely: the countdown restarts at
    /// the moment of re-arming, not at the original arm point.
    pub fn arm(&mut self, interval: Duration) {
        self.state = State::Armed {
            interval,
            deadline: Instant::now() + interval,
        };
    }

    /// Cancel the timer; `fired` stops waking until the next `arm`.
    pub fn stop(&mut self) {
        self.state = State::Stopped;
    }

    /// Whether an interval is currently counting down.
    pub fn is_armed(&self) -> bool {
        matches!(self.state, State::Armed { .. })
    }

    /// The armed interval, if any.
    pub fn interval(&self) -> Option<Duration> {
        match self.state {
            State::Stopped => None,
            State::Armed { interval, .. } => Some(interval),
        }
    }

    /// Wait for the next fire, then schedule the following one at the same
    /// interval. Pends forever while stopped, so it can sit in a `select!`
    /// alongside other branches without spinning.
    pub async fn fired(&mut self) {
        match self.state {
            State::Stopped => std::future::pending().await,
            State::Armed { interval, deadline } => {
                sleep_until(deadline).await;
                self.state = State::Armed {
                    interval,
                    deadline: deadline + interval,
                };
            }
        }
    }
}

impl Default for RefreshTimer {
    fn default() -> Self {
        Self::new()
    }
}
