#![no_main]

//! Protocol parser fuzzer.
//!
//! Feeds arbitrary bytes to a full session. Malformed input must surface
//! as a `ProtocolError`, never as a panic.

use gavel::QueueScheduler;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Bound the session size; a longer prefix adds no new parser states.
    let data = &data[..data.len().min(16 * 1024)];
    let mut out = std::io::sink();
    let _ = gavel::run_session(data, &mut out, QueueScheduler::new);
});
