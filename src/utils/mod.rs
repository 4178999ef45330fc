//! Small helpers shared by the binary and the benchmark runner.

pub mod progress;

pub use progress::phase_spinner;

use std::time::{Duration, Instant};

/// Run `f`, returning its result and how long it took
pub fn timed<R>(f: impl FnOnce() -> R) -> (R, Duration) {
    let start = Instant::now();
    let result = f();
    (result, start.elapsed())
}
