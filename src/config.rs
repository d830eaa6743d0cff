// SPDX-License-Identifier: Apache-2.0 OR MIT
// Build-time tuning constants for the logging pipeline

use std::time::Duration;

/// Size in bytes of the inline message buffer carried by every record.
///
/// The payload itself is capped at `MAX_MESSAGE_SIZE - 1` bytes; the last
/// byte holds the terminator. Larger values cost stack and ring space per
/// record, never heap.
pub const MAX_MESSAGE_SIZE: usize = 1024;

/// Spin iterations the consumer performs on an empty ring before sleeping.
///
/// Higher values trade CPU for wakeup latency.
pub const SPIN_COUNT: usize = 1000;

/// How long the consumer sleeps when the spin phase found no work.
pub const SLEEP_INTERVAL: Duration = Duration::from_micros(500);

/// Headroom on top of [`MAX_MESSAGE_SIZE`] for one rendered line:
/// timestamp (~30 bytes), level (~10), thread id (~20), source location
/// (~150), brackets and separators (~46).
pub const FORMAT_OVERHEAD: usize = 256;

/// Scratch buffer size the consumer uses to render a single record.
pub const SCRATCH_BUFFER_SIZE: usize = MAX_MESSAGE_SIZE + FORMAT_OVERHEAD;

/// Drop notifications go out on the first drop and every Nth thereafter.
pub const DROP_REPORT_INTERVAL: u64 = 1000;
