//! A candidate schedule: one permutation of live solution ids.

use crate::store::{SolutionId, Store};

/// Multiplier of the rolling identity hash.
const HASH_PRIME: u64 = 4_999_999;

/// One permutation of currently live solutions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Candidate {
    order: Vec<SolutionId>,
}

impl Candidate {
    /// An empty schedule.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an explicit ordering.
    #[must_use]
    pub fn from_order(order: Vec<SolutionId>) -> Self {
        Self { order }
    }

    /// The ordering, front first.
    #[must_use]
    pub fn order(&self) -> &[SolutionId] {
        &self.order
    }

    /// Mutable access for variation operators.
    pub fn order_mut(&mut self) -> &mut [SolutionId] {
        &mut self.order
    }

    /// Append a newly arrived solution at the back.
    pub fn push(&mut self, id: SolutionId) {
        self.order.push(id);
    }

    /// Copy with all done solutions dropped.
    #[must_use]
    pub fn cleaned(&self, store: &Store) -> Self {
        Self {
            order: self
                .order
                .iter()
                .copied()
                .filter(|&id| !store.solution(id).done())
                .collect(),
        }
    }

    /// Rolling hash over the ordering, for population deduplication.
    /// Two candidates hash equal iff they schedule the same ids in the
    /// same order (modulo 2^64 collisions).
    #[must_use]
    pub fn ident_hash(&self) -> u64 {
        self.order.iter().fold(0u64, |h, &id| {
            h.wrapping_mul(HASH_PRIME).wrapping_add(id as u64)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Verdict;

    #[test]
    fn test_cleaned_drops_done_solutions() {
        let mut store = Store::new();
        store.add_problem(100, 1);
        for _ in 0..3 {
            store.add_solution(0).unwrap();
        }
        store.begin_invocation(1);
        store.apply_verdict(1, 0, Verdict::Rejected).unwrap();

        let candidate = Candidate::from_order(vec![2, 1, 0]);
        assert_eq!(candidate.cleaned(&store).order(), &[2, 0]);
    }

    #[test]
    fn test_hash_distinguishes_orderings() {
        let a = Candidate::from_order(vec![0, 1, 2]);
        let b = Candidate::from_order(vec![2, 1, 0]);
        let c = Candidate::from_order(vec![0, 1, 2]);
        assert_ne!(a.ident_hash(), b.ident_hash());
        assert_eq!(a.ident_hash(), c.ident_hash());
    }
}
