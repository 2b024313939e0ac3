//! Full-protocol integration tests: complete sessions driven through byte
//! buffers, with outputs compared tick for tick.
//!
//! Run with: cargo test scheduler_integration

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

use gavel::ga::{GaConfig, GaScheduler};
use gavel::{run_session, ProtocolError, QueueScheduler};

/// Run one session with the pending-queue scheduler.
fn run_queue(input: &str) -> Result<String, ProtocolError> {
    let mut out = Vec::new();
    run_session(input.as_bytes(), &mut out, QueueScheduler::new)?;
    Ok(String::from_utf8(out).unwrap())
}

/// Run one session with the GA scheduler, optimizer thread off so the
/// output is a pure function of the input.
fn run_ga(input: &str) -> Result<String, ProtocolError> {
    let mut out = Vec::new();
    run_session(input.as_bytes(), &mut out, |invokers| {
        GaScheduler::new(invokers, GaConfig::default())
    })?;
    Ok(String::from_utf8(out).unwrap())
}

#[test]
fn test_trivial_accept_walks_all_tests() {
    let input = "\
2 1
100 3
0 -1
-1 -1
-1
0 0 OK -1 -1
-1
0 1 OK -1 -1
-1
0 2 OK -1 -1
";
    let expected = "\
0 0
-1 -1
0 1
-1 -1
0 2
-1 -1
-1 -1
";
    assert_eq!(run_queue(input).unwrap(), expected);
}

#[test]
fn test_reject_short_circuits() {
    let input = "\
2 1
100 3
0 0 -1
-1 -1
-1
0 0 WA 1 0 OK -1 -1
";
    // Tick 1 frees both invokers but solution 0 is done, so only the
    // surviving solution's next test goes out.
    let expected = "\
0 0
1 0
-1 -1
1 1
-1 -1
";
    assert_eq!(run_queue(input).unwrap(), expected);
}

#[test]
fn test_invoker_budget_enforced() {
    let input = "\
1 1
100 3
0 0 0 -1
-1 -1
-1
0 0 WA -1 -1
";
    let expected = "\
0 0
-1 -1
1 0
-1 -1
";
    assert_eq!(run_queue(input).unwrap(), expected);
}

#[test]
fn test_priority_prefers_cheap_expected_total() {
    let input = "\
1 2
100 10
100 2
0 1 -1
-1 -1
";
    // Expected totals: 1000 ms for problem 0, 200 ms for problem 1.
    assert_eq!(run_queue(input).unwrap(), "1 0\n-1 -1\n");
}

#[test]
fn test_requeue_after_key_change() {
    let input = "\
1 2
100 10
100 2
0 1 -1
-1 -1
-1
1 0 OK -1 -1
-1
1 1 OK -1 -1
-1
0 0 OK -1 -1
";
    // The short solution keeps winning while alive; once it is done the
    // long one runs and its first accept reprices it from 1000 to 100.
    let expected = "\
1 0
-1 -1
1 1
-1 -1
0 0
-1 -1
0 1
-1 -1
";
    assert_eq!(run_queue(input).unwrap(), expected);
}

#[test]
fn test_late_verdict_tolerated_forever() {
    let mut input = String::from("2 1\n100 3\n0 -1\n-1 -1\n");
    let mut expected = String::from("0 0\n-1 -1\n");
    for _ in 0..20 {
        input.push_str("-1\n-1 -1\n");
        expected.push_str("-1 -1\n");
    }
    assert_eq!(run_queue(&input).unwrap(), expected);
}

#[test]
fn test_zero_invokers_emit_only_terminators() {
    let input = "\
0 1
100 3
0 0 -1
-1 -1
-1
-1 -1
";
    assert_eq!(run_queue(input).unwrap(), "-1 -1\n-1 -1\n");
}

#[test]
fn test_single_test_problem_finishes_in_one_invocation() {
    let input = "\
2 1
100 1
0 -1
-1 -1
-1
0 0 OK -1 -1
-1
-1 -1
";
    assert_eq!(run_queue(input).unwrap(), "0 0\n-1 -1\n-1 -1\n-1 -1\n");
}

#[test]
fn test_tick_zero_burst_gets_one_test_per_solution() {
    let input = "\
3 1
100 5
0 0 0 0 0 -1
-1 -1
";
    // Five submissions, three invokers: one test each for the first
    // three solutions (equal keys break ties by id).
    assert_eq!(run_queue(input).unwrap(), "0 0\n1 0\n2 0\n-1 -1\n");
}

#[test]
fn test_same_tick_verdict_and_submission() {
    let input = "\
1 1
100 1
0 -1
-1 -1
0 -1
0 0 OK -1 -1
";
    // The tick-1 submission rides the invoker freed by the tick-1 verdict.
    assert_eq!(run_queue(input).unwrap(), "0 0\n-1 -1\n1 0\n-1 -1\n");
}

#[test]
fn test_session_without_ticks_is_clean() {
    assert_eq!(run_queue("2 1\n100 3\n").unwrap(), "");
}

#[test]
fn test_tokens_flow_across_lines() {
    let input = "2 1 100\n3 0\n-1 -1\n-1\n";
    assert_eq!(run_queue(input).unwrap(), "0 0\n-1 -1\n");
}

#[test]
fn test_parse_failure_is_fatal() {
    let err = run_queue("2 1\n100 3\nbogus -1\n-1 -1\n").unwrap_err();
    assert!(matches!(err, ProtocolError::BadToken(word) if word == "bogus"));

    let err = run_queue("2 1\n100 3\n0 -1\n-1").unwrap_err();
    assert!(matches!(err, ProtocolError::UnexpectedEof));
}

#[test]
fn test_unknown_problem_is_fatal() {
    let err = run_queue("2 1\n100 3\n7 -1\n-1 -1\n").unwrap_err();
    assert!(matches!(err, ProtocolError::UnknownProblem { problem: 7, .. }));
}

#[test]
fn test_unrequested_verdict_is_fatal() {
    let err = run_queue("2 1\n100 3\n0 -1\n0 2 OK -1 -1\n").unwrap_err();
    assert!(matches!(
        err,
        ProtocolError::UnexpectedVerdict { solution: 0, test: 2 }
    ));
}

#[test]
fn test_ga_walks_single_solution_to_completion() {
    let input = "\
1 1
100 2
0 -1
-1 -1
-1
0 0 OK -1 -1
-1
0 1 OK -1 -1
-1
-1 -1
";
    assert_eq!(run_ga(input).unwrap(), "0 0\n-1 -1\n0 1\n-1 -1\n-1 -1\n-1 -1\n");
}

#[test]
fn test_ga_two_pass_drain_uses_whole_budget() {
    let input = "\
5 1
100 3
0 0 -1
-1 -1
";
    // Forward pass: one test each. Second pass: the front solution's
    // remaining tests, then the next solution's.
    assert_eq!(
        run_ga(input).unwrap(),
        "0 0\n1 0\n0 1\n0 2\n1 1\n-1 -1\n"
    );
}

#[test]
fn test_ga_rejection_stops_dispatching() {
    let input = "\
1 1
100 3
0 0 -1
-1 -1
-1
0 0 WA -1 -1
";
    assert_eq!(run_ga(input).unwrap(), "0 0\n-1 -1\n1 0\n-1 -1\n");
}

#[test]
fn test_ga_session_is_deterministic() {
    let input = "\
2 2
100 4
50 2
0 1 0 -1
-1 -1
-1
0 0 OK 1 0 OK -1 -1
-1
-1 -1
";
    let first = run_ga(input).unwrap();
    let second = run_ga(input).unwrap();
    assert_eq!(first, second);
}
