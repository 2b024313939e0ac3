// Allow unwrap in tests (test code is not production)
#![cfg_attr(test, allow(clippy::unwrap_used))]
//! Gavel: the decision core of an online judge scheduler.
//!
//! A fixed pool of invokers grades solutions test by test. Every 10 ms
//! tick the driver delivers new submissions and verdicts on stdin and
//! expects a batch of invocation requests on stdout, at most one per free
//! invoker. The driver scores the cube of each solution's latency, so the
//! scheduler's whole job is deciding which pending test runs next.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │        Session loop (sched)         │
//! ├──────────────────┬──────────────────┤
//! │  Pending queue   │  GA population   │
//! │  (policy key)    │  (ga feature)    │
//! ├──────────────────┴──────────────────┤
//! │        Entity store (store)         │
//! ├─────────────────────────────────────┤
//! │      Tick I/O adapter (proto)       │
//! └─────────────────────────────────────┘
//! ```

pub mod error;
pub mod ga;
pub mod policy;
pub mod proto;
pub mod queue;
pub mod sched;
pub mod store;

pub use error::ProtocolError;
pub use sched::{run_session, QueueScheduler, Schedule};
pub use store::{Invocation, Solution, Store, Verdict, TICK_MS};

/// Whether stderr tracing is compiled in. Without the `debug-log` feature
/// the tracing macro folds to nothing and the process is silent on
/// success.
pub const DEBUG_LOG: bool = cfg!(feature = "debug-log");

/// Trace a line to stderr in `debug-log` builds.
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        if $crate::DEBUG_LOG {
            eprintln!($($arg)*);
        }
    };
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_debug_log_compiles_against_expressions() {
        let id = 3usize;
        crate::debug_log!("solution {id} with {} tests", 5);
    }
}
