use std::time::{Duration, Instant};

use crate::constants::{DEFAULT_MOVETIME_MS, SOFT_TO_HARD_LIMIT_RATIO};

#[derive(Debug, Clone, Copy)]
pub struct TimeManager {
    pub start_time: Instant,
    /// Past this, no new iterative-deepening depth is started
    pub soft_limit: Option<Duration>,
    /// Past this, the running search is aborted
    pub hard_limit: Option<Duration>,
}

/// For ease of use in tests
impl Default for TimeManager {
    fn default() -> Self {
        TimeManager::new(DEFAULT_MOVETIME_MS)
    }
}

impl TimeManager {
    /// Budget of `movetime` ms per move, starting now
    pub fn new(movetime: u64) -> Self {
        let soft_limit_ms = (movetime as f64 * SOFT_TO_HARD_LIMIT_RATIO) as u64;

        Self {
            start_time: Instant::now(),
            soft_limit: Some(Duration::from_millis(soft_limit_ms)),
            hard_limit: Some(Duration::from_millis(movetime)),
        }
    }

    /// No deadline; the search is bounded by depth or nodes only
    pub fn unlimited() -> Self {
        Self {
            start_time: Instant::now(),
            soft_limit: None,
            hard_limit: None,
        }
    }

    /// Abort at an absolute instant chosen by the caller
    pub fn with_deadline(deadline: Instant) -> Self {
        let start_time = Instant::now();
        let budget = deadline.saturating_duration_since(start_time);

        Self {
            start_time,
            soft_limit: Some(budget.mul_f64(SOFT_TO_HARD_LIMIT_RATIO)),
            hard_limit: Some(budget),
        }
    }

    /// Time since search began
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Check if we should stop before the next iteration
    pub fn is_soft_limit_reached(&self) -> bool {
        self.soft_limit.is_some_and(|limit| self.elapsed() >= limit)
    }

    /// Check if we must abort immediately
    pub fn is_hard_limit_reached(&self) -> bool {
        self.hard_limit.is_some_and(|limit| self.elapsed() >= limit)
    }
}
