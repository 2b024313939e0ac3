//! Scheduler loop: the `Schedule` seam, the heap-based scheduler, and the
//! protocol session driver.
//!
//! Per tick, ordering is fixed: apply all submissions, then all verdicts,
//! then drain the free-invoker budget into invocations. A solution arriving
//! in the same tick as a verdict that frees an invoker is therefore
//! eligible for that invoker immediately.

use crate::error::ProtocolError;
use crate::policy;
use crate::proto::{read_startup, read_tick, write_tick, Tokenizer};
use crate::queue::PendingQueue;
use crate::store::{Invocation, ProblemId, SolutionId, Store, TestIndex, Verdict};
use std::io::{BufRead, Write};

/// The scheduling core consumed by the session loop.
///
/// Both the pending-queue scheduler and the GA scheduler implement this;
/// the session loop and the test suites are generic over it.
pub trait Schedule {
    /// Register a problem. Called only before the first tick.
    fn add_problem(&mut self, time_limit: u64, test_count: usize);

    /// Ingest a newly submitted solution.
    ///
    /// # Errors
    ///
    /// Fails if the problem id was never declared.
    fn add_solution(&mut self, problem: ProblemId) -> Result<SolutionId, ProtocolError>;

    /// Apply a verdict, freeing the invoker that ran the test.
    ///
    /// # Errors
    ///
    /// Fails on verdicts that match no outstanding invocation.
    fn apply_verdict(
        &mut self,
        solution: SolutionId,
        test: TestIndex,
        verdict: Verdict,
    ) -> Result<(), ProtocolError>;

    /// Drain the free-invoker budget into invocation requests.
    fn schedule_invocations(&mut self) -> Vec<Invocation>;

    /// Advance the simulated clock by one tick.
    fn advance_tick(&mut self);
}

/// Heap-based scheduler: a pending queue ordered by expected total time.
///
/// A solution is queued exactly while it is dispatchable: no test running,
/// not done, tests left to dispatch. Dispatch pops it; an accepting verdict
/// re-enters it with its refreshed key. At most one test of a solution runs
/// at a time, so a tick spreads free invokers across distinct solutions.
#[derive(Debug)]
pub struct QueueScheduler {
    store: Store,
    pending: PendingQueue,
    invoker_count: u32,
    free_invokers: u32,
}

impl QueueScheduler {
    /// Create a scheduler with the given invoker budget.
    #[must_use]
    pub fn new(invoker_count: u32) -> Self {
        Self {
            store: Store::new(),
            pending: PendingQueue::new(),
            invoker_count,
            free_invokers: invoker_count,
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

    /// Number of dispatchable solutions.
    #[must_use]
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }
}

impl Schedule for QueueScheduler {
    fn add_problem(&mut self, time_limit: u64, test_count: usize) {
        let id = self.store.add_problem(time_limit, test_count);
        crate::debug_log!("problem {id} has {test_count} tests and TL {time_limit} ms");
    }

    fn add_solution(&mut self, problem: ProblemId) -> Result<SolutionId, ProtocolError> {
        let id = self.store.add_solution(problem)?;
        let s = self.store.solution(id);
        self.pending.push(id, policy::key(s, self.store.problem(problem)));
        crate::debug_log!("new solution {id} for problem {problem}");
        Ok(id)
    }

    fn apply_verdict(
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
        let s = self.store.solution(solution);
        if s.done() {
            // Removes the entry if one is somehow still present.
            self.pending.remove(solution);
        } else if !s.dispatch_done() && s.running_tests() == 0 {
            self.pending
                .update(solution, policy::key(s, self.store.problem(s.problem())));
        }
        Ok(())
    }

    fn schedule_invocations(&mut self) -> Vec<Invocation> {
        let mut requests = Vec::new();
        while self.free_invokers > 0 {
            let Some(id) = self.pending.peek() else {
                break;
            };
            self.pending.pop();
            let invocation = self.store.begin_invocation(id);
            crate::debug_log!(
                "scheduling test {} for solution {}",
                invocation.test,
                invocation.solution
            );
            requests.push(invocation);
            self.free_invokers -= 1;
        }
        requests
    }

    fn advance_tick(&mut self) {
        self.store.advance_tick();
        crate::debug_log!("time is {}", self.store.now());
    }
}

/// Run one protocol session: startup frame, then ticks until clean EOF.
///
/// The scheduler is built by `make` once the invoker count is known. This
/// is the whole binary behind a pure function, so tests can drive complete
/// sessions from byte buffers.
///
/// # Errors
///
/// Fails on I/O errors, malformed input, and driver protocol violations.
pub fn run_session<R, W, S, F>(input: R, mut output: W, make: F) -> Result<(), ProtocolError>
where
    R: BufRead,
    W: Write,
    S: Schedule,
    F: FnOnce(u32) -> S,
{
    let mut tok = Tokenizer::new(input);
    let startup = read_startup(&mut tok)?;
    let mut sched = make(startup.invoker_count);
    for (time_limit, test_count) in startup.problems {
        sched.add_problem(time_limit, test_count);
    }

    while tok.has_more()? {
        let tick = read_tick(&mut tok)?;
        for problem in tick.submissions {
            sched.add_solution(problem)?;
        }
        for event in tick.verdicts {
            sched.apply_verdict(event.solution, event.test, event.verdict)?;
        }
        let requests = sched.schedule_invocations();
        write_tick(&mut output, &requests)?;
        sched.advance_tick();
    }
    Ok(())
}
