// Algo Bench - Free and Open Source Software Statement
//
// This project, algo-bench, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/benchmark/scheduler.rs
// Version: 0.3.0
//
// This file implements nonce bookkeeping for one challenge/algorithm run.
// The scheduler itself is immutable; the mutable cursor lives in a RunState
// value that is passed into each step and handed back advanced.
//
// Tree Location:
// - src/benchmark/scheduler.rs (nonce range and time budget accounting)
// - Depends on: core/power

use crate::core::power::next_power_of_two;
use std::time::{Duration, Instant};

/// Where a run stands at an iteration boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Active,
    /// All requested nonces have been handed out
    Exhausted,
    /// The time budget ran out with nonces left
    TimedOut,
}

impl RunStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, RunStatus::Active)
    }
}

/// Mutable accounting for one run.
///
/// `current_nonce - start_nonce + remaining_nonces` always equals the number
/// of nonces requested for the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunState {
    pub remaining_nonces: u64,
    pub current_nonce: u64,
    pub run_start: Instant,
}

/// Nonce range and parallelism for the next batch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchPlan {
    pub nonce_start: u64,
    pub nonce_count: u64,
    pub worker_parallelism: u64,
}

#[derive(Debug, Clone)]
pub struct NonceScheduler {
    start_nonce: u64,
    total_nonces: u64,
    parallelism_unit: u64,
    time_budget: Duration,
}

impl NonceScheduler {
    pub fn new(
        start_nonce: u64,
        total_nonces: u64,
        parallelism_unit: u64,
        time_budget: Duration,
    ) -> Self {
        Self {
            start_nonce,
            total_nonces,
            parallelism_unit: parallelism_unit.max(1),
            time_budget,
        }
    }

    pub fn total_nonces(&self) -> u64 {
        self.total_nonces
    }

    pub fn time_budget(&self) -> Duration {
        self.time_budget
    }

    /// Fresh state for a run starting at `now`
    pub fn begin(&self, now: Instant) -> RunState {
        RunState {
            remaining_nonces: self.total_nonces,
            current_nonce: self.start_nonce,
            run_start: now,
        }
    }

    /// Exhaustion wins over timeout when both hold.
    pub fn status(&self, state: &RunState, now: Instant) -> RunStatus {
        if state.remaining_nonces == 0 {
            RunStatus::Exhausted
        } else if now.saturating_duration_since(state.run_start) >= self.time_budget {
            RunStatus::TimedOut
        } else {
            RunStatus::Active
        }
    }

    /// Plan the next batch, or `None` once the range is used up
    pub fn next_batch(&self, state: &RunState) -> Option<BatchPlan> {
        if state.remaining_nonces == 0 {
            return None;
        }
        let nonce_count = self.parallelism_unit.min(state.remaining_nonces);
        Some(BatchPlan {
            nonce_start: state.current_nonce,
            nonce_count,
            worker_parallelism: next_power_of_two(nonce_count),
        })
    }

    /// Mark a planned batch as consumed
    pub fn complete(&self, state: RunState, plan: &BatchPlan) -> RunState {
        debug_assert_eq!(state.current_nonce, plan.nonce_start);
        debug_assert!(plan.nonce_count <= state.remaining_nonces);
        RunState {
            remaining_nonces: state.remaining_nonces - plan.nonce_count,
            current_nonce: state.current_nonce + plan.nonce_count,
            run_start: state.run_start,
        }
    }

    /// Nonces handed out so far
    pub fn consumed(&self, state: &RunState) -> u64 {
        state.current_nonce - self.start_nonce
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(scheduler: &NonceScheduler) -> (Vec<BatchPlan>, RunState) {
        let now = Instant::now();
        let mut state = scheduler.begin(now);
        let mut plans = Vec::new();
        while scheduler.status(&state, now) == RunStatus::Active {
            let plan = scheduler.next_batch(&state).unwrap();
            plans.push(plan);
            state = scheduler.complete(state, &plan);
            assert_eq!(
                scheduler.consumed(&state) + state.remaining_nonces,
                scheduler.total_nonces()
            );
        }
        (plans, state)
    }

    #[test]
    fn test_ten_nonces_in_units_of_four() {
        let scheduler = NonceScheduler::new(1, 10, 4, Duration::from_secs(60));
        let (plans, state) = drain(&scheduler);

        let sizes: Vec<u64> = plans.iter().map(|p| p.nonce_count).collect();
        let lanes: Vec<u64> = plans.iter().map(|p| p.worker_parallelism).collect();
        let starts: Vec<u64> = plans.iter().map(|p| p.nonce_start).collect();
        assert_eq!(sizes, vec![4, 4, 2]);
        assert_eq!(lanes, vec![4, 4, 2]);
        assert_eq!(starts, vec![1, 5, 9]);
        assert_eq!(state.current_nonce, 11);
        assert_eq!(state.remaining_nonces, 0);
        assert_eq!(scheduler.status(&state, Instant::now()), RunStatus::Exhausted);
    }

    #[test]
    fn test_tail_batch_rounds_parallelism_up() {
        let scheduler = NonceScheduler::new(0, 23, 10, Duration::from_secs(60));
        let (plans, _) = drain(&scheduler);
        let last = plans.last().unwrap();
        assert_eq!(last.nonce_count, 3);
        assert_eq!(last.worker_parallelism, 4);
        assert_eq!(plans[0].worker_parallelism, 16);
    }

    #[test]
    fn test_batch_sizes_sum_to_consumed_range() {
        for (total, unit) in [(1, 1), (7, 3), (100, 16), (23040, 16), (5, 50)] {
            let scheduler = NonceScheduler::new(42, total, unit, Duration::from_secs(60));
            let (plans, state) = drain(&scheduler);
            let sum: u64 = plans.iter().map(|p| p.nonce_count).sum();
            assert_eq!(sum, state.current_nonce - 42);
            assert_eq!(state.remaining_nonces, 0);
            assert!(plans.iter().all(|p| p.worker_parallelism >= p.nonce_count));
        }
    }

    #[test]
    fn test_zero_unit_still_makes_progress() {
        let scheduler = NonceScheduler::new(0, 3, 0, Duration::from_secs(60));
        let (plans, state) = drain(&scheduler);
        assert_eq!(plans.len(), 3);
        assert_eq!(state.remaining_nonces, 0);
    }

    #[test]
    fn test_times_out_at_budget_boundary() {
        let scheduler = NonceScheduler::new(0, 100, 10, Duration::from_secs(30));
        let start = Instant::now();
        let state = scheduler.begin(start);
        assert_eq!(
            scheduler.status(&state, start + Duration::from_secs(29)),
            RunStatus::Active
        );
        assert_eq!(
            scheduler.status(&state, start + Duration::from_secs(30)),
            RunStatus::TimedOut
        );
    }

    #[test]
    fn test_exhausted_takes_precedence_over_timeout() {
        let scheduler = NonceScheduler::new(0, 4, 4, Duration::from_secs(1));
        let start = Instant::now();
        let state = scheduler.begin(start);
        let plan = scheduler.next_batch(&state).unwrap();
        let state = scheduler.complete(state, &plan);
        let status = scheduler.status(&state, start + Duration::from_secs(5));
        assert_eq!(status, RunStatus::Exhausted);
        assert!(status.is_terminal());
        assert!(scheduler.next_batch(&state).is_none());
    }

    #[test]
    fn test_largest_batch_size_plans_without_overflow() {
        let unit = 1u64 << 63;
        let scheduler = NonceScheduler::new(0, unit + 1, unit, Duration::from_secs(60));
        let (plans, state) = drain(&scheduler);
        assert_eq!(plans.len(), 2);
        assert_eq!(plans[0].nonce_count, unit);
        assert_eq!(plans[0].worker_parallelism, unit);
        assert_eq!(plans[1].nonce_count, 1);
        assert_eq!(plans[1].worker_parallelism, 1);
        assert_eq!(state.current_nonce, unit + 1);
    }
}
