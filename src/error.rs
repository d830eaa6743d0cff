// SPDX-License-Identifier: Apache-2.0 OR MIT
// Consumer-side error taxonomy and the stderr diagnostic channel

use thiserror::Error;

/// Non-fatal consumer-side failure categories.
///
/// Producers never see these; they surface only as `[LOGGER]` lines on the
/// diagnostic channel and the drain loop continues unaffected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SinkError {
    /// The sink's backing file could not be opened
    #[error("FILE_OPEN_FAILED")]
    FileOpenFailed,
    /// A write to the underlying output failed
    #[error("WRITE_FAILED")]
    WriteFailed,
    /// Flushing buffered output failed
    #[error("FLUSH_FAILED")]
    FlushFailed,
}

/// Emit one `[LOGGER]`-tagged line on stderr for a sink failure.
///
/// Consumer thread only; never on the producer hot path.
#[cold]
pub(crate) fn report_sink_error(error: SinkError, context: &str) {
    #[cfg(feature = "stderr-diagnostics")]
    {
        let now = chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
        eprintln!("[LOGGER] [{}] {}: {}", now, context, error);
    }
    #[cfg(not(feature = "stderr-diagnostics"))]
    {
        let _ = (error, context);
    }
}

/// Rate-limited note that the producer dropped records on a full ring.
///
/// The only producer-side diagnostic; the caller already did the relaxed
/// counter increment, so this stays off the hot path for all but the
/// reported drops.
#[cold]
pub(crate) fn report_dropped(total_dropped: u64) {
    #[cfg(feature = "stderr-diagnostics")]
    {
        let now = chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
        eprintln!(
            "[LOGGER] [{}] buffer full, dropped {} record(s)",
            now, total_dropped
        );
    }
    #[cfg(not(feature = "stderr-diagnostics"))]
    {
        let _ = total_dropped;
    }
}

/// Internal lifecycle failure (thread spawn and the like).
#[cold]
pub(crate) fn report_internal(context: &str) {
    #[cfg(feature = "stderr-diagnostics")]
    {
        let now = chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
        eprintln!("[LOGGER] [{}] {}", now, context);
    }
    #[cfg(not(feature = "stderr-diagnostics"))]
    {
        let _ = context;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_strings() {
        assert_eq!(SinkError::FileOpenFailed.to_string(), "FILE_OPEN_FAILED");
        assert_eq!(SinkError::WriteFailed.to_string(), "WRITE_FAILED");
        assert_eq!(SinkError::FlushFailed.to_string(), "FLUSH_FAILED");
    }

    #[test]
    fn test_reporting_does_not_panic() {
        report_sink_error(SinkError::WriteFailed, "test sink");
        report_dropped(1);
        report_internal("test context");
    }
}
