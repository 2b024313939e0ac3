//! Gavel binary: reads the driver protocol on stdin, answers on stdout.
//!
//! No flags, no subcommands. Exit code 0 on clean end of input; on any
//! protocol failure, one diagnostic line on stderr and a nonzero exit.

use std::io::{self, BufRead, Write};
use std::process::ExitCode;

fn main() -> ExitCode {
    let stdin = io::stdin();
    let stdout = io::stdout();
    match run(stdin.lock(), stdout.lock()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(not(feature = "ga"))]
fn run<R: BufRead, W: Write>(input: R, output: W) -> Result<(), gavel::ProtocolError> {
    gavel::run_session(input, output, gavel::QueueScheduler::new)
}

#[cfg(feature = "ga")]
fn run<R: BufRead, W: Write>(input: R, output: W) -> Result<(), gavel::ProtocolError> {
    use gavel::ga::{GaConfig, GaScheduler};

    let mut config = GaConfig::default();
    if let Some(seed) = std::env::var("GAVEL_SEED")
        .ok()
        .and_then(|s| s.parse().ok())
    {
        config.seed = seed;
    }
    gavel::run_session(input, output, |invoker_count| {
        let sched = GaScheduler::new(invoker_count, config);
        // The schedule stays valid without the optimizer thread; a failed
        // spawn only costs ordering quality.
        let _ = sched.spawn_optimizer();
        sched
    })
}
