//! Rest countdown between steps.

use std::time::Duration;

use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};

/// A cancelable once-per-period countdown.
///
/// Only one countdown exists at a time: [`RestScheduler::start`] replaces
/// whatever was running, so no timer can outlive its replacement.
#[derive(Debug)]
pub struct RestScheduler {
    period: Duration,
    countdown: Option<Countdown>,
}

#[derive(Debug)]
struct Countdown {
    interval: Interval,
    remaining: u32,
}

impl RestScheduler {
    /// Scheduler ticking once per second.
    pub fn new() -> Self {
        Self::with_period(Duration::from_secs(1))
    }

    pub fn with_period(period: Duration) -> Self {
        Self {
            period,
            countdown: None,
        }
    }

    /// Begin counting down from `ticks`. Zero ticks starts nothing.
    pub fn start(&mut self, ticks: u32) {
        if self.countdown.take().is_some() {
            tracing::debug!("Replacing active rest countdown");
        }
        if ticks == 0 {
            return;
        }
        let mut interval = interval_at(Instant::now() + self.period, self.period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        self.countdown = Some(Countdown {
            interval,
            remaining: ticks,
        });
    }

    /// Drop the active countdown, if any.
    pub fn cancel(&mut self) {
        if self.countdown.take().is_some() {
            tracing::debug!("Rest countdown cancelled");
        }
    }

    pub fn is_active(&self) -> bool {
        self.countdown.is_some()
    }

    /// Ticks left on the active countdown.
    pub fn remaining(&self) -> Option<u32> {
        self.countdown.as_ref().map(|c| c.remaining)
    }

    /// Wait for the next period and return the ticks left after it.
    ///
    /// The countdown ends itself when this returns zero. With no active
    /// countdown the future never resolves, so it is safe to poll from a
    /// `select!` loop.
    pub async fn tick(&mut self) -> u32 {
        let Some(countdown) = self.countdown.as_mut() else {
            return std::future::pending().await;
        };
        countdown.interval.tick().await;
        countdown.remaining = countdown.remaining.saturating_sub(1);
        let remaining = countdown.remaining;
        if remaining == 0 {
            self.countdown = None;
        }
        remaining
    }
}

impl Default for RestScheduler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_counts_down_once_per_period() {
        let mut rest = RestScheduler::new();
        rest.start(3);
        let started = Instant::now();

        assert_eq!(rest.tick().await, 2);
        assert_eq!(rest.tick().await, 1);
        assert_eq!(rest.tick().await, 0);
        assert!(!rest.is_active());
        assert!(started.elapsed() >= Duration::from_secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_replaces_countdown() {
        let mut rest = RestScheduler::new();
        rest.start(5);
        assert_eq!(rest.tick().await, 4);
        rest.start(2);
        assert_eq!(rest.remaining(), Some(2));
        assert_eq!(rest.tick().await, 1);
        assert_eq!(rest.tick().await, 0);
        assert!(!rest.is_active());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_countdown_never_fires() {
        let mut rest = RestScheduler::new();
        rest.start(2);
        rest.cancel();
        assert!(!rest.is_active());

        let fired = tokio::time::timeout(Duration::from_secs(10), rest.tick()).await;
        assert!(fired.is_err());
    }

    #[test]
    fn test_zero_ticks_is_inactive() {
        let mut rest = RestScheduler::new();
        rest.start(0);
        assert!(!rest.is_active());
    }
}
