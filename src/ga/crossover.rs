//! Crossover: random interleaving of two parent schedules.

use crate::store::SolutionId;
use rand::Rng;
use std::collections::HashSet;

/// Interleave two parents by repeatedly consuming the front element of a
/// randomly chosen parent, skipping elements already placed in the child.
/// The result is a permutation of the union of the two inputs.
#[must_use]
pub fn crossover<R: Rng>(a: &[SolutionId], b: &[SolutionId], rng: &mut R) -> Vec<SolutionId> {
    let mut child = Vec::with_capacity(a.len().max(b.len()));
    let mut placed = HashSet::with_capacity(a.len() + b.len());
    let (mut i, mut j) = (0, 0);
    while i < a.len() || j < b.len() {
        let from_a = if i == a.len() {
            false
        } else if j == b.len() {
            true
        } else {
            rng.gen_bool(0.5)
        };
        let id = if from_a {
            i += 1;
            a[i - 1]
        } else {
            j += 1;
            b[j - 1]
        };
        if placed.insert(id) {
            child.push(id);
        }
    }
    child
}
