// SPDX-License-Identifier: Apache-2.0 OR MIT
// Byte-level output destinations

use crate::error::{self, SinkError};
use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Stderr, Stdout, Write};
use std::path::Path;

/// Output destination for rendered log lines
///
/// Called only from the consumer thread, never from the logging hot path.
/// Implementations may block on I/O. Failures go to the diagnostic channel
/// and never propagate into the drain loop; writes are best-effort.
pub trait Sink: Send {
    /// Write one rendered line (or fragment) to the output
    fn write(&mut self, bytes: &[u8]);

    /// Flush any buffered output to the underlying destination
    fn flush(&mut self);
}

/// Append-only file sink with an internal write buffer
pub struct FileSink {
    file: Option<BufWriter<File>>,
}

impl FileSink {
    /// Open `path` for append, creating it if needed.
    ///
    /// On failure the open error is reported once and the sink swallows all
    /// subsequent writes, keeping the drain loop alive.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match OpenOptions::new().create(true).append(true).open(path) {
            Ok(file) => Self {
                file: Some(BufWriter::new(file)),
            },
            Err(_) => {
                error::report_sink_error(
                    SinkError::FileOpenFailed,
                    &path.to_string_lossy(),
                );
                Self { file: None }
            }
        }
    }
}

impl Sink for FileSink {
    fn write(&mut self, bytes: &[u8]) {
        if bytes.is_empty() {
            return;
        }
        if let Some(file) = self.file.as_mut() {
            if file.write_all(bytes).is_err() {
                error::report_sink_error(SinkError::WriteFailed, "file sink");
            }
        }
    }

    fn flush(&mut self) {
        if let Some(file) = self.file.as_mut() {
            if file.flush().is_err() {
                error::report_sink_error(SinkError::FlushFailed, "file sink");
            }
        }
    }
}

/// Standard output sink
pub struct StdoutSink {
    stdout: Stdout,
}

impl StdoutSink {
    pub fn new() -> Self {
        Self {
            stdout: io::stdout(),
        }
    }
}

impl Default for StdoutSink {
    fn default() -> Self {
        Self::new()
    }
}

impl Sink for StdoutSink {
    fn write(&mut self, bytes: &[u8]) {
        if self.stdout.lock().write_all(bytes).is_err() {
            error::report_sink_error(SinkError::WriteFailed, "stdout sink");
        }
    }

    fn flush(&mut self) {
        if self.stdout.lock().flush().is_err() {
            error::report_sink_error(SinkError::FlushFailed, "stdout sink");
        }
    }
}

/// Standard error sink
pub struct StderrSink {
    stderr: Stderr,
}

impl StderrSink {
    pub fn new() -> Self {
        Self {
            stderr: io::stderr(),
        }
    }
}

impl Default for StderrSink {
    fn default() -> Self {
        Self::new()
    }
}

impl Sink for StderrSink {
    fn write(&mut self, bytes: &[u8]) {
        if self.stderr.lock().write_all(bytes).is_err() {
            error::report_sink_error(SinkError::WriteFailed, "stderr sink");
        }
    }

    fn flush(&mut self) {
        if self.stderr.lock().flush().is_err() {
            error::report_sink_error(SinkError::FlushFailed, "stderr sink");
        }
    }
}

/// Discards all output; useful for measuring the transport alone
pub struct NullSink;

impl Sink for NullSink {
    fn write(&mut self, _bytes: &[u8]) {}

    fn flush(&mut self) {}
}
