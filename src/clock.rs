// SPDX-License-Identifier: Apache-2.0 OR MIT
// Tick-to-nanosecond conversion, calibrated once per process

use crate::platform::{cpu_relax, read_tick};
use std::sync::OnceLock;
use std::time::Instant;

static TICKS_PER_NS: OnceLock<f64> = OnceLock::new();

/// Convert a producer-captured tick to nanoseconds.
///
/// The first call calibrates the tick rate against the OS monotonic clock
/// and publishes the ratio; every later call only reads it. Intended for the
/// consumer thread; never called on the producer hot path.
pub fn tick_to_ns(tick: u64) -> u64 {
    let ticks_per_ns = *TICKS_PER_NS.get_or_init(calibrate);
    (tick as f64 / ticks_per_ns) as u64
}

/// Measure ticks against wall time over at least one millisecond, bounding
/// the quantization error at one part in a thousand.
fn calibrate() -> f64 {
    let t0 = Instant::now();
    let c0 = read_tick();

    let mut elapsed = t0.elapsed();
    while elapsed.as_nanos() < 1_000_000 {
        cpu_relax();
        elapsed = t0.elapsed();
    }

    let c1 = read_tick();
    let ratio = c1.wrapping_sub(c0) as f64 / elapsed.as_nanos() as f64;
    if ratio > 0.0 {
        ratio
    } else {
        // Degenerate tick source; timestamps stay well-defined.
        1.0
    }
}
