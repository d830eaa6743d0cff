// SPDX-License-Identifier: Apache-2.0 OR MIT
// Producer facade: non-blocking log entry points and lifecycle

use crate::config::DROP_REPORT_INTERVAL;
use crate::consumer::Consumer;
use crate::error;
use crate::formatter::RecordFormatter;
use crate::level::Level;
use crate::record::Record;
use crate::ring::SpscRing;
use crate::sink::Sink;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Process-wide count of records dropped on a full ring. Advisory.
static DROPPED_RECORDS: AtomicU64 = AtomicU64::new(0);

/// Total records dropped because a ring was full, across all loggers in
/// the process.
pub fn dropped_records() -> u64 {
    DROPPED_RECORDS.load(Ordering::Relaxed)
}

/// Outcome of a single log call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogResult {
    /// Record enqueued for the consumer
    Success,
    /// Ring at capacity; the record was dropped and counted
    BufferFull,
    /// The record could not be prepared
    Error,
}

/// Producer facade over one SPSC ring and one consumer thread
///
/// All log methods are non-blocking and allocation-free: the record is
/// built on the caller's stack, stamped with level, tick, and thread id,
/// and pushed once. When the ring is full the record is dropped; dropping
/// is the only backpressure mechanism.
///
/// At most one thread may call the log methods of a given handle. To log
/// from several threads, give each its own `Logger` and fan the sinks in
/// above this crate.
///
/// Records logged while stopped accumulate in the ring (up to capacity)
/// and flow once [`Logger::start`] runs.
///
/// `CAP` is the ring capacity and must be a power of two >= 2; the usable
/// depth is `CAP - 1`.
pub struct Logger<const CAP: usize> {
    ring: Arc<SpscRing<Record, CAP>>,
    consumer: Consumer<CAP>,
}

impl<const CAP: usize> Logger<CAP> {
    /// Create a stopped logger draining into `formatter` and `sink`.
    pub fn new(
        formatter: Box<dyn RecordFormatter + Send>,
        sink: Box<dyn Sink + Send>,
    ) -> Self {
        let ring = Arc::new(SpscRing::new());
        let consumer = Consumer::new(Arc::clone(&ring), formatter, sink);
        Self { ring, consumer }
    }

    /// Start the background consumer thread. Idempotent.
    pub fn start(&self) {
        self.consumer.start();
    }

    /// Stop the consumer, draining pending records and flushing the sink
    /// before returning. Idempotent.
    pub fn stop(&self) {
        self.consumer.stop();
    }

    /// Whether the consumer thread is running
    pub fn is_running(&self) -> bool {
        self.consumer.is_running()
    }

    /// Non-blocking log of a preformatted message.
    #[inline]
    pub fn log(&self, level: Level, message: &str) -> LogResult {
        let mut record = Record::new(level);
        record.set_message(message.as_bytes());
        self.push_record(record)
    }

    /// As [`Logger::log`], recording the call site.
    ///
    /// The location strings must live for the whole program; `file!()` and
    /// `module_path!()` qualify.
    #[inline]
    pub fn log_with_location(
        &self,
        level: Level,
        message: &str,
        file: &'static str,
        line: u32,
        function: &'static str,
    ) -> LogResult {
        let mut record = Record::new(level);
        record.set_message(message.as_bytes());
        #[cfg(feature = "source-location")]
        record.set_source_location(file, line, function);
        #[cfg(not(feature = "source-location"))]
        let _ = (file, line, function);
        self.push_record(record)
    }

    /// Non-blocking log rendering `args` straight into the record's inline
    /// buffer; nothing is allocated on the way.
    #[inline]
    pub fn log_format(&self, level: Level, args: fmt::Arguments<'_>) -> LogResult {
        let mut record = Record::new(level);
        record.format_message(args);
        self.push_record(record)
    }

    /// As [`Logger::log_format`], recording the call site.
    #[inline]
    pub fn log_format_with_location(
        &self,
        level: Level,
        args: fmt::Arguments<'_>,
        file: &'static str,
        line: u32,
        function: &'static str,
    ) -> LogResult {
        let mut record = Record::new(level);
        record.format_message(args);
        #[cfg(feature = "source-location")]
        record.set_source_location(file, line, function);
        #[cfg(not(feature = "source-location"))]
        let _ = (file, line, function);
        self.push_record(record)
    }

    /// Log with trace level
    #[inline]
    pub fn trace(&self, message: &str) -> LogResult {
        self.log(Level::Trace, message)
    }

    /// Log with debug level
    #[inline]
    pub fn debug(&self, message: &str) -> LogResult {
        self.log(Level::Debug, message)
    }

    /// Log with info level
    #[inline]
    pub fn info(&self, message: &str) -> LogResult {
        self.log(Level::Info, message)
    }

    /// Log with warn level
    #[inline]
    pub fn warn(&self, message: &str) -> LogResult {
        self.log(Level::Warn, message)
    }

    /// Log with error level
    #[inline]
    pub fn error(&self, message: &str) -> LogResult {
        self.log(Level::Error, message)
    }

    /// Log with fatal level
    #[inline]
    pub fn fatal(&self, message: &str) -> LogResult {
        self.log(Level::Fatal, message)
    }

    /// Approximate number of records awaiting the consumer. May be stale.
    pub fn pending_count(&self) -> usize {
        self.ring.len()
    }

    /// Whether the ring is at capacity. May be stale.
    pub fn is_buffer_full(&self) -> bool {
        self.ring.is_full()
    }

    #[inline]
    fn push_record(&self, record: Record) -> LogResult {
        if self.ring.try_push(record) {
            return LogResult::Success;
        }

        // Drop policy is the only backpressure: count it and move on.
        let dropped = DROPPED_RECORDS.fetch_add(1, Ordering::Relaxed) + 1;
        if dropped == 1 || dropped % DROP_REPORT_INTERVAL == 0 {
            error::report_dropped(dropped);
        }
        LogResult::BufferFull
    }
}

impl<const CAP: usize> Drop for Logger<CAP> {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formatter::TextFormatter;
    use crate::sink::NullSink;

    fn null_logger<const CAP: usize>() -> Logger<CAP> {
        Logger::new(Box::new(TextFormatter::new()), Box::new(NullSink))
    }

    #[test]
    fn test_log_succeeds_with_room() {
        let logger: Logger<16> = null_logger();
        assert_eq!(logger.log(Level::Info, "hello"), LogResult::Success);
        assert_eq!(logger.pending_count(), 1);
    }

    #[test]
    fn test_level_helpers() {
        let logger: Logger<64> = null_logger();
        assert_eq!(logger.trace("t"), LogResult::Success);
        assert_eq!(logger.debug("d"), LogResult::Success);
        assert_eq!(logger.info("i"), LogResult::Success);
        assert_eq!(logger.warn("w"), LogResult::Success);
        assert_eq!(logger.error("e"), LogResult::Success);
        assert_eq!(logger.fatal("f"), LogResult::Success);
        assert_eq!(logger.pending_count(), 6);
    }

    #[test]
    fn test_log_format_renders_inline() {
        let logger: Logger<16> = null_logger();
        let result = logger.log_format(Level::Warn, format_args!("load {}%", 93));
        assert_eq!(result, LogResult::Success);
    }

    #[test]
    fn test_full_ring_reports_buffer_full() {
        let logger: Logger<4> = null_logger();
        let before = dropped_records();

        assert_eq!(logger.log(Level::Info, "a"), LogResult::Success);
        assert_eq!(logger.log(Level::Info, "b"), LogResult::Success);
        assert_eq!(logger.log(Level::Info, "c"), LogResult::Success);
        assert!(logger.is_buffer_full());
        assert_eq!(logger.log(Level::Info, "d"), LogResult::BufferFull);
        assert_eq!(logger.log(Level::Info, "e"), LogResult::BufferFull);

        assert_eq!(dropped_records() - before, 2);
    }

    #[test]
    fn test_lifecycle_via_facade() {
        let logger: Logger<16> = null_logger();
        assert!(!logger.is_running());
        logger.start();
        assert!(logger.is_running());
        logger.stop();
        assert!(!logger.is_running());
    }
}
