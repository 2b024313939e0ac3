#![no_main]

//! Structured session fuzzer.
//!
//! Drives both schedulers through arbitrary but protocol-consistent
//! scripts and checks the budget invariant after every tick.

use arbitrary::Arbitrary;
use gavel::ga::{GaConfig, GaScheduler};
use gavel::{QueueScheduler, Schedule, Verdict};
use libfuzzer_sys::fuzz_target;

/// One tick of fuzzer-driven input.
#[derive(Arbitrary, Debug)]
struct FuzzTick {
    /// Problem index per arrival, reduced modulo the problem count.
    arrivals: Vec<u8>,
    /// Coin flips deciding which outstanding verdicts come back.
    deliver: Vec<(bool, bool)>,
}

/// Structured input for session fuzzing.
#[derive(Arbitrary, Debug)]
struct SessionInput {
    invokers: u8,
    problems: Vec<(u8, u8)>,
    ticks: Vec<FuzzTick>,
}

fuzz_target!(|input: SessionInput| {
    // Cap sizes to keep a single run fast.
    let invokers = u32::from(input.invokers % 8);
    let problems: Vec<(u64, usize)> = input
        .problems
        .iter()
        .take(4)
        .map(|&(tl, tc)| (u64::from(tl % 200) + 1, usize::from(tc % 6) + 1))
        .collect();
    if problems.is_empty() {
        return;
    }
    let ticks: Vec<&FuzzTick> = input.ticks.iter().take(50).collect();

    run(QueueScheduler::new(invokers), invokers, &problems, &ticks);
    run(
        GaScheduler::new(invokers, GaConfig::default()),
        invokers,
        &problems,
        &ticks,
    );
});

fn run<S: Schedule>(mut sched: S, invokers: u32, problems: &[(u64, usize)], ticks: &[&FuzzTick]) {
    for &(time_limit, test_count) in problems {
        sched.add_problem(time_limit, test_count);
    }

    let mut outstanding = Vec::new();
    for tick in ticks {
        for &arrival in tick.arrivals.iter().take(4) {
            sched
                .add_solution(usize::from(arrival) % problems.len())
                .expect("in-range problem id");
        }

        let mut flips = tick.deliver.iter().copied();
        let mut still_out = Vec::new();
        for inv in outstanding {
            let (deliver, accept) = flips.next().unwrap_or((false, false));
            if deliver {
                let verdict = if accept {
                    Verdict::Accepted
                } else {
                    Verdict::Rejected
                };
                sched
                    .apply_verdict(inv.solution, inv.test, verdict)
                    .expect("verdict matches an outstanding invocation");
            } else {
                still_out.push(inv);
            }
        }
        outstanding = still_out;

        let requests = sched.schedule_invocations();
        outstanding.extend(requests);
        assert!(
            outstanding.len() <= invokers as usize,
            "more outstanding invocations than invokers"
        );
        sched.advance_tick();
    }
}
