//! Priority policy: expected total grading time per solution.
//!
//! Before the first verdict the estimate is the worst case, `test_count`
//! times the problem's time limit. After that it extrapolates the mean
//! observed test time over the full test count. The pending queue is a
//! min-heap on this key, so solutions predicted to finish cheaply run
//! first and release invokers early.

use crate::store::{Problem, Solution, SolutionId};
use std::cmp::Ordering;

/// Heap ordering key for a pending solution. Smaller keys dispatch first;
/// ties break by solution id so selection is deterministic.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Key {
    cost: f64,
    id: SolutionId,
}

impl Key {
    /// Build a key from a precomputed cost estimate.
    #[must_use]
    pub fn new(cost: f64, id: SolutionId) -> Self {
        Self { cost, id }
    }
}

impl Eq for Key {}

impl PartialOrd for Key {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Key {
    fn cmp(&self, other: &Self) -> Ordering {
        self.cost
            .total_cmp(&other.cost)
            .then_with(|| self.id.cmp(&other.id))
    }
}

/// Expected total grading time of a solution in milliseconds.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn expected_cost(solution: &Solution, problem: &Problem) -> f64 {
    if solution.tests_run() == 0 {
        (problem.test_count as u64 * problem.time_limit) as f64
    } else {
        solution.time_consumed() as f64 * problem.test_count as f64 / solution.tests_run() as f64
    }
}

/// The current ordering key of a solution.
#[must_use]
pub fn key(solution: &Solution, problem: &Problem) -> Key {
    Key::new(expected_cost(solution, problem), solution.id())
}
