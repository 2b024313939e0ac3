//! Tick I/O adapter for the driver protocol.
//!
//! The tokenizer fills a per-line word buffer and yields one word at a
//! time, so frames may be laid out with any mix of spaces and newlines.
//! Output is flushed at the end of every tick; the driver blocks on it.

use crate::error::ProtocolError;
use crate::store::{Invocation, ProblemId, SolutionId, TestIndex, Verdict};
use std::collections::VecDeque;
use std::io::{BufRead, Write};

/// Streaming word tokenizer over buffered input.
#[derive(Debug)]
pub struct Tokenizer<R> {
    input: R,
    words: VecDeque<String>,
}

impl<R: BufRead> Tokenizer<R> {
    /// Wrap a buffered reader.
    pub fn new(input: R) -> Self {
        Self {
            input,
            words: VecDeque::new(),
        }
    }

    fn refill(&mut self) -> Result<(), ProtocolError> {
        let mut line = String::new();
        while self.words.is_empty() {
            line.clear();
            if self.input.read_line(&mut line)? == 0 {
                return Ok(());
            }
            self.words.extend(line.split_whitespace().map(String::from));
        }
        Ok(())
    }

    /// Whether another word exists. The clean-EOF probe between ticks.
    ///
    /// # Errors
    ///
    /// Fails on I/O errors from the underlying reader.
    pub fn has_more(&mut self) -> Result<bool, ProtocolError> {
        self.refill()?;
        Ok(!self.words.is_empty())
    }

    /// The next word.
    ///
    /// # Errors
    ///
    /// Fails at end of stream; mid-frame that is a protocol violation.
    pub fn next_word(&mut self) -> Result<String, ProtocolError> {
        self.refill()?;
        self.words.pop_front().ok_or(ProtocolError::UnexpectedEof)
    }

    /// The next word parsed as an integer.
    ///
    /// # Errors
    ///
    /// Fails at end of stream or on a non-integer token.
    pub fn next_int(&mut self) -> Result<i64, ProtocolError> {
        let word = self.next_word()?;
        word.parse().map_err(|_| ProtocolError::BadToken(word))
    }
}

/// Largest accepted per-test time limit in milliseconds.
pub const MAX_TIME_LIMIT: i64 = 1_000_000;

/// Largest accepted per-problem test count.
pub const MAX_TEST_COUNT: i64 = 10_000;

/// The startup frame: invoker budget and problem declarations.
#[derive(Debug, Clone)]
pub struct Startup {
    /// Number of parallel invokers.
    pub invoker_count: u32,
    /// `(time_limit_ms, test_count)` per problem, in declaration order.
    pub problems: Vec<(u64, usize)>,
}

/// Read the startup frame.
///
/// `invoker_count` may be zero (the scheduler then never dispatches); the
/// per-problem integers must be positive and within the sanity bounds
/// [`MAX_TIME_LIMIT`] and [`MAX_TEST_COUNT`].
///
/// # Errors
///
/// Fails on malformed tokens and out-of-range problem fields.
pub fn read_startup<R: BufRead>(tok: &mut Tokenizer<R>) -> Result<Startup, ProtocolError> {
    let invoker_count = tok.next_int()?;
    let invoker_count = u32::try_from(invoker_count).map_err(|_| ProtocolError::BadStartup {
        field: "invoker count",
        value: invoker_count,
    })?;
    let problem_count = tok.next_int()?;
    let problem_count = usize::try_from(problem_count).map_err(|_| ProtocolError::BadStartup {
        field: "problem count",
        value: problem_count,
    })?;

    let mut problems = Vec::with_capacity(problem_count.min(1024));
    for _ in 0..problem_count {
        let time_limit = tok.next_int()?;
        if !(1..=MAX_TIME_LIMIT).contains(&time_limit) {
            return Err(ProtocolError::BadStartup {
                field: "time limit",
                value: time_limit,
            });
        }
        let test_count = tok.next_int()?;
        if !(1..=MAX_TEST_COUNT).contains(&test_count) {
            return Err(ProtocolError::BadStartup {
                field: "test count",
                value: test_count,
            });
        }
        #[allow(clippy::cast_sign_loss)]
        problems.push((time_limit as u64, test_count as usize));
    }
    Ok(Startup {
        invoker_count,
        problems,
    })
}

/// One verdict event within a tick frame.
#[derive(Debug, Clone, Copy)]
pub struct VerdictEvent {
    /// Solution the verdict belongs to.
    pub solution: SolutionId,
    /// Test index the verdict belongs to.
    pub test: TestIndex,
    /// Accepted for `"OK"`, Rejected for any other word.
    pub verdict: Verdict,
}

/// One tick's input: submissions, then verdicts.
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Problem ids of newly submitted solutions.
    pub submissions: Vec<ProblemId>,
    /// Verdicts for previously dispatched tests.
    pub verdicts: Vec<VerdictEvent>,
}

/// Read one tick's input frame.
///
/// The submission list is terminated by `-1`, the verdict list by the pair
/// `-1 -1` (no verdict word follows the sentinel pair).
///
/// # Errors
///
/// Fails on malformed tokens, bad sentinels, or end of stream mid-frame.
pub fn read_tick<R: BufRead>(tok: &mut Tokenizer<R>) -> Result<TickInput, ProtocolError> {
    let mut tick = TickInput::default();
    loop {
        let value = tok.next_int()?;
        if value == -1 {
            break;
        }
        let problem =
            usize::try_from(value).map_err(|_| ProtocolError::BadSentinel(value))?;
        tick.submissions.push(problem);
    }
    loop {
        let solution = tok.next_int()?;
        let test = tok.next_int()?;
        if solution == -1 && test == -1 {
            break;
        }
        let solution =
            usize::try_from(solution).map_err(|_| ProtocolError::BadSentinel(solution))?;
        let test = usize::try_from(test).map_err(|_| ProtocolError::BadSentinel(test))?;
        let word = tok.next_word()?;
        tick.verdicts.push(VerdictEvent {
            solution,
            test,
            verdict: Verdict::from_word(&word),
        });
    }
    Ok(tick)
}

/// Write one tick's invocation requests and the closing sentinel, flushed.
///
/// # Errors
///
/// Fails on I/O errors from the underlying writer.
pub fn write_tick<W: Write>(out: &mut W, invocations: &[Invocation]) -> Result<(), ProtocolError> {
    for invocation in invocations {
        writeln!(out, "{} {}", invocation.solution, invocation.test)?;
    }
    writeln!(out, "-1 -1")?;
    out.flush()?;
    Ok(())
}
