//! Fitness: estimated cubic-weighted latency of a candidate schedule.
//!
//! The external driver scores the cube of each solution's latency in
//! ticks, so the fitness mirrors that: assume solutions complete in
//! schedule order, accumulate their estimated remaining times into a
//! running clock, and sum the cubed projected latencies. Lower is better.

use crate::store::{Problem, Solution, SolutionId, Store, TICK_MS};

/// Estimated remaining grading time of a solution in milliseconds.
///
/// Before the first verdict the estimate is the worst case per test;
/// afterwards the mean observed test time extrapolates over the
/// undispatched remainder.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn estimated_remaining(solution: &Solution, problem: &Problem) -> f64 {
    let remaining = (problem.test_count - solution.tests_run()) as f64;
    if solution.tests_run() == 0 {
        problem.time_limit as f64 * remaining
    } else {
        solution.time_consumed() as f64 * remaining / solution.tests_run() as f64
    }
}

/// Score a schedule against the current store state. Lower is better.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn score(order: &[SolutionId], store: &Store) -> f64 {
    let now = store.now() as f64;
    let mut clock = 0.0;
    let mut total = 0.0;
    for &id in order {
        let solution = store.solution(id);
        if solution.done() {
            continue;
        }
        clock += estimated_remaining(solution, store.problem(solution.problem()));
        let latency = (now - solution.submitted_at() as f64) + clock;
        total += (latency / TICK_MS as f64).powi(3);
    }
    total
}
