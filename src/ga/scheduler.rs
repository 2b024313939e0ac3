//! GA-driven scheduler and its background optimizer thread.
//!
//! One mutex guards everything the optimizer and the tick loop share: the
//! entity store (whose solution fields the fitness reads) and the candidate
//! population. The tick loop holds it per event; the optimizer holds it for
//! one whole generation and sleeps unlocked in between.

use crate::error::ProtocolError;
use crate::ga::population::{GaConfig, Population};
use crate::sched::Schedule;
use crate::store::{Invocation, ProblemId, SolutionId, Store, TestIndex, Verdict};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread;
use std::time::Duration;

/// Sleep between optimizer generations.
const OPTIMIZER_INTERVAL: Duration = Duration::from_millis(1);

/// The shared scheduling state: store, population, and invoker budget.
#[derive(Debug)]
pub struct GaCore {
    store: Store,
    population: Population,
    invoker_count: u32,
    free_invokers: u32,
    rng: SmallRng,
}

impl GaCore {
    /// Create a core with the given invoker budget and tunables.
    #[must_use]
    pub fn new(invoker_count: u32, config: GaConfig) -> Self {
        Self {
            store: Store::new(),
            population: Population::new(config),
            invoker_count,
            free_invokers: invoker_count,
            rng: SmallRng::seed_from_u64(config.seed),
        }
    }

    /// The entity store, for inspection.
    #[must_use]
    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Invokers not currently running a test.
    #[must_use]
    pub fn free_invokers(&self) -> u32 {
        self.free_invokers
    }

    /// The configured invoker budget.
    #[must_use]
    pub fn invoker_count(&self) -> u32 {
        self.invoker_count
    }

    /// The candidate population, for inspection.
    #[must_use]
    pub fn population(&self) -> &Population {
        &self.population
    }

    /// Run one optimizer generation against current state.
    pub fn generation_step(&mut self) {
        let Self {
            store,
            population,
            rng,
            ..
        } = self;
        population.evolve(store, rng);
    }

    /// Register a problem.
    pub fn add_problem(&mut self, time_limit: u64, test_count: usize) {
        let id = self.store.add_problem(time_limit, test_count);
        crate::debug_log!("problem {id} has {test_count} tests and TL {time_limit} ms");
    }

    /// Ingest a submission, appending it to every candidate schedule.
    ///
    /// # Errors
    ///
    /// Fails if the problem id was never declared.
    pub fn add_solution(&mut self, problem: ProblemId) -> Result<SolutionId, ProtocolError> {
        let id = self.store.add_solution(problem)?;
        self.population.admit(id);
        crate::debug_log!("new solution {id} for problem {problem}");
        Ok(id)
    }

    /// Apply a verdict and free its invoker.
    ///
    /// # Errors
    ///
    /// Fails on verdicts that match no outstanding invocation.
    pub fn apply_verdict(
        &mut self,
        solution: SolutionId,
        test: TestIndex,
        verdict: Verdict,
    ) -> Result<(), ProtocolError> {
        let outcome = self.store.apply_verdict(solution, test, verdict)?;
        self.free_invokers += 1;
        crate::debug_log!(
            "verdict for solution {solution} test {test} is {verdict:?}, took {} ms",
            outcome.latency
        );
        Ok(())
    }

    /// Drain the free budget over the active schedule in two passes.
    ///
    /// The forward pass gives each idle live solution one test, spreading
    /// invokers across distinct solutions. The second pass drains any
    /// budget left into the remaining tests of front-most live solutions.
    pub fn schedule_invocations(&mut self) -> Vec<Invocation> {
        let order: Vec<SolutionId> = self.population.active().to_vec();
        let mut requests = Vec::new();

        for &id in &order {
            if self.free_invokers == 0 {
                break;
            }
            let s = self.store.solution(id);
            if s.done() || s.dispatch_done() || s.running_tests() > 0 {
                continue;
            }
            self.dispatch(id, &mut requests);
        }

        'second: for &id in &order {
            loop {
                if self.free_invokers == 0 {
                    break 'second;
                }
                let s = self.store.solution(id);
                if s.done() || s.dispatch_done() {
                    break;
                }
                self.dispatch(id, &mut requests);
            }
        }
        requests
    }

    /// Advance the simulated clock by one tick.
    pub fn advance_tick(&mut self) {
        self.store.advance_tick();
        crate::debug_log!("time is {}", self.store.now());
    }

    fn dispatch(&mut self, id: SolutionId, requests: &mut Vec<Invocation>) {
        let invocation = self.store.begin_invocation(id);
        crate::debug_log!(
            "scheduling test {} for solution {}",
            invocation.test,
            invocation.solution
        );
        requests.push(invocation);
        self.free_invokers -= 1;
    }
}

/// `Schedule` front for a shared [`GaCore`], usable from the session loop
/// while an optimizer thread evolves the population.
#[derive(Debug, Clone)]
pub struct GaScheduler {
    core: Arc<Mutex<GaCore>>,
}

impl GaScheduler {
    /// Create a scheduler with the given invoker budget and tunables.
    #[must_use]
    pub fn new(invoker_count: u32, config: GaConfig) -> Self {
        Self {
            core: Arc::new(Mutex::new(GaCore::new(invoker_count, config))),
        }
    }

    /// Lock the shared core.
    ///
    /// A poisoned lock only means the optimizer thread panicked between
    /// generations; the core itself stays consistent, so keep going.
    pub fn lock(&self) -> MutexGuard<'_, GaCore> {
        self.core.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Spawn the background optimizer.
    ///
    /// The thread wakes every millisecond, runs one generation under the
    /// shared lock, and never exits; it dies with the process. The
    /// scheduler stays correct without it, only schedule quality suffers.
    ///
    /// # Errors
    ///
    /// Fails if the OS refuses to spawn the thread.
    pub fn spawn_optimizer(&self) -> std::io::Result<thread::JoinHandle<()>> {
        let core = Arc::clone(&self.core);
        thread::Builder::new()
            .name("ga-optimizer".into())
            .spawn(move || loop {
                thread::sleep(OPTIMIZER_INTERVAL);
                let mut core = core.lock().unwrap_or_else(PoisonError::into_inner);
                core.generation_step();
            })
    }
}

impl Schedule for GaScheduler {
    fn add_problem(&mut self, time_limit: u64, test_count: usize) {
        self.lock().add_problem(time_limit, test_count);
    }

    fn add_solution(&mut self, problem: ProblemId) -> Result<SolutionId, ProtocolError> {
        self.lock().add_solution(problem)
    }

    fn apply_verdict(
        &mut self,
        solution: SolutionId,
        test: TestIndex,
        verdict: Verdict,
    ) -> Result<(), ProtocolError> {
        self.lock().apply_verdict(solution, test, verdict)
    }

    fn schedule_invocations(&mut self) -> Vec<Invocation> {
        self.lock().schedule_invocations()
    }

    fn advance_tick(&mut self) {
        self.lock().advance_tick();
    }
}
