// SPDX-License-Identifier: Apache-2.0 OR MIT
// Record-to-text rendering

use crate::clock::tick_to_ns;
use crate::record::{Record, TruncatingWriter};
use std::fmt::Write;

/// Renders one record into a caller-supplied buffer
///
/// Implementations must not allocate, panic, or block; they run on the
/// consumer thread only. Output that does not fit is truncated.
pub trait RecordFormatter: Send {
    /// Render `record` into `out`, returning the number of bytes written
    fn format_record(&mut self, record: &Record, out: &mut [u8]) -> usize;
}

/// Default line-oriented text formatter
///
/// Produces `[<ns>] [<LEVEL>] [tid=<id>] <file>:<line> <function> <message>\n`
/// with the tid and location segments present only when their features are
/// enabled. Converted timestamps are clamped to be non-decreasing within
/// this formatter's stream, which absorbs small cross-core tick skew.
pub struct TextFormatter {
    last_ns: u64,
}

impl TextFormatter {
    pub fn new() -> Self {
        Self { last_ns: 0 }
    }
}

impl Default for TextFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordFormatter for TextFormatter {
    fn format_record(&mut self, record: &Record, out: &mut [u8]) -> usize {
        if out.is_empty() {
            return 0;
        }

        let ns = tick_to_ns(record.tick).max(self.last_ns);
        self.last_ns = ns;

        let mut w = TruncatingWriter::new(out);
        let _ = write!(w, "[{}] [{}]", ns, record.level.as_str());

        #[cfg(feature = "thread-id")]
        let _ = write!(w, " [tid={}]", record.thread_id);

        #[cfg(feature = "source-location")]
        if let (Some(file), Some(function)) = (record.file, record.function) {
            let _ = write!(w, " {}:{} {}", file, record.line, function);
        }

        w.write_bytes(b" ");
        // Raw copy: the payload may hold a truncation-split UTF-8 tail.
        w.write_bytes(record.message());
        w.write_bytes(b"\n");
        w.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SCRATCH_BUFFER_SIZE;
    use crate::level::Level;

    fn render(formatter: &mut TextFormatter, record: &Record) -> String {
        let mut buf = [0u8; SCRATCH_BUFFER_SIZE];
        let len = formatter.format_record(record, &mut buf);
        String::from_utf8_lossy(&buf[..len]).into_owned()
    }

    #[test]
    fn test_line_segments_appear_in_order() {
        let mut record = Record::default();
        record.level = Level::Info;
        record.tick = 0;
        record.set_message(b"hello");

        #[cfg(feature = "thread-id")]
        {
            record.thread_id = 42;
        }

        #[cfg(feature = "source-location")]
        record.set_source_location("file.cc", 7, "func");

        let mut formatter = TextFormatter::new();
        let line = render(&mut formatter, &record);

        assert!(line.starts_with("[0] [INFO]"));

        #[cfg(feature = "thread-id")]
        assert!(line.contains("[tid=42]"));

        #[cfg(feature = "source-location")]
        assert!(line.contains("file.cc:7 func"));

        assert!(line.contains("hello"));
        assert!(line.ends_with('\n'));
    }

    #[test]
    fn test_timestamps_never_move_backwards() {
        let mut late = Record::default();
        late.tick = crate::platform::read_tick();
        late.set_message(b"late");

        let mut early = Record::default();
        early.tick = 0;
        early.set_message(b"early");

        let mut formatter = TextFormatter::new();
        let first = render(&mut formatter, &late);
        let second = render(&mut formatter, &early);

        let ns = |line: &str| -> u64 {
            line[1..line.find(']').unwrap()].parse().unwrap()
        };
        assert!(ns(&second) >= ns(&first));
    }

    #[test]
    fn test_missing_location_omits_segment() {
        let mut record = Record::default();
        record.set_message(b"plain");

        let mut formatter = TextFormatter::new();
        let line = render(&mut formatter, &record);
        assert!(!line.contains(':'));
        assert!(line.contains("plain"));
    }

    #[test]
    fn test_output_truncates_to_buffer() {
        let mut record = Record::default();
        record.set_message(&[b'm'; 100]);

        let mut formatter = TextFormatter::new();
        let mut small = [0u8; 32];
        let len = formatter.format_record(&record, &mut small);
        assert_eq!(len, 32);
    }

    #[test]
    fn test_empty_buffer_writes_nothing() {
        let record = Record::default();
        let mut formatter = TextFormatter::new();
        assert_eq!(formatter.format_record(&record, &mut []), 0);
    }
}
