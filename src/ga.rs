//! Genetic-algorithm scheduler: searches for low-latency dispatch orders.
//!
//! Instead of a keyed queue, the whole schedule is a permutation of live
//! solutions. A fixed-size population of candidate permutations evolves in
//! the background; the best candidate is the active schedule, and each tick
//! drains the free-invoker budget by walking it from the front.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │      Optimizer thread (~1 ms)       │
//! ├─────────────────────────────────────┤
//! │  Clean │ Mutation │ Crossover       │
//! ├─────────────────────────────────────┤
//! │   Cubic-latency fitness scoring     │
//! ├─────────────────────────────────────┤
//! │  Shared core (one mutex): store +   │
//! │  population, read by the tick loop  │
//! └─────────────────────────────────────┘
//! ```

mod candidate;
mod crossover;
mod fitness;
mod mutation;
mod population;
mod scheduler;

pub use candidate::Candidate;
pub use crossover::crossover;
pub use fitness::{estimated_remaining, score};
pub use mutation::mutate;
pub use population::{GaConfig, Population};
pub use scheduler::{GaCore, GaScheduler};
