//! Mutation: random index swaps within a schedule.

use crate::store::SolutionId;
use rand::Rng;

/// Swap `swaps` random index pairs in place.
///
/// Swapping the same index with itself is allowed, so some swaps may be
/// no-ops; schedules shorter than two entries are left alone.
pub fn mutate<R: Rng>(order: &mut [SolutionId], swaps: usize, rng: &mut R) {
    if order.len() < 2 {
        return;
    }
    for _ in 0..swaps {
        let i = rng.gen_range(0..order.len());
        let j = rng.gen_range(0..order.len());
        order.swap(i, j);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn test_mutation_preserves_membership() {
        let mut rng = SmallRng::seed_from_u64(42);
        let mut order: Vec<SolutionId> = (0..20).collect();
        mutate(&mut order, 5, &mut rng);

        let mut sorted = order.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..20).collect::<Vec<_>>());
    }

    #[test]
    fn test_mutation_changes_order_eventually() {
        let mut rng = SmallRng::seed_from_u64(7);
        let original: Vec<SolutionId> = (0..20).collect();
        let mut changed = false;
        for _ in 0..10 {
            let mut order = original.clone();
            mutate(&mut order, 3, &mut rng);
            if order != original {
                changed = true;
                break;
            }
        }
        assert!(changed);
    }

    #[test]
    fn test_short_schedules_untouched() {
        let mut rng = SmallRng::seed_from_u64(1);
        let mut single = vec![9];
        mutate(&mut single, 5, &mut rng);
        assert_eq!(single, vec![9]);

        let mut empty: Vec<SolutionId> = Vec::new();
        mutate(&mut empty, 5, &mut rng);
        assert!(empty.is_empty());
    }

    #[test]
    fn test_seeded_mutation_is_deterministic() {
        let mut a: Vec<SolutionId> = (0..10).collect();
        let mut b: Vec<SolutionId> = (0..10).collect();
        mutate(&mut a, 4, &mut SmallRng::seed_from_u64(99));
        mutate(&mut b, 4, &mut SmallRng::seed_from_u64(99));
        assert_eq!(a, b);
    }
}
