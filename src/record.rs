// SPDX-License-Identifier: Apache-2.0 OR MIT
// Fixed-size log record with cache-line aligned layout

use crate::config::MAX_MESSAGE_SIZE;
use crate::level::Level;
use crate::platform::read_tick;
use std::fmt;

#[cfg(feature = "thread-id")]
use crate::platform::current_thread_id;

/// Fixed-size log record
///
/// The unit of transport between the producer and the consumer. Everything
/// is stored inline: filling a record never allocates, never locks, and
/// never fails. The payload is capped at `MAX_MESSAGE_SIZE - 1` bytes with
/// a zero terminator at `message[message_len]`.
///
/// Cache-line aligned so adjacent ring slots never share a line.
#[cfg_attr(
    all(target_arch = "aarch64", target_vendor = "apple"),
    repr(C, align(128))
)]
#[cfg_attr(
    not(all(target_arch = "aarch64", target_vendor = "apple")),
    repr(C, align(64))
)]
#[derive(Clone, Copy)]
pub struct Record {
    /// Severity of this record
    pub level: Level,
    /// Raw tick sampled on the producer; converted to nanoseconds by the
    /// consumer only
    pub tick: u64,
    /// Identifier of the producing thread
    #[cfg(feature = "thread-id")]
    pub thread_id: u64,
    /// Call-site file, program-lifetime storage
    #[cfg(feature = "source-location")]
    pub file: Option<&'static str>,
    /// Call-site function, program-lifetime storage
    #[cfg(feature = "source-location")]
    pub function: Option<&'static str>,
    /// Call-site line number
    #[cfg(feature = "source-location")]
    pub line: u32,
    message_len: usize,
    message: [u8; MAX_MESSAGE_SIZE],
}

// Records move through the ring by value; they must stay flat and modest.
const _: () = assert!(std::mem::size_of::<Record>() <= 4096);
const _: () = assert!(std::mem::align_of::<Record>() >= 64);

impl Record {
    /// Fresh empty record stamped with level, tick, and thread id.
    #[inline]
    pub fn new(level: Level) -> Self {
        Self {
            level,
            tick: read_tick(),
            #[cfg(feature = "thread-id")]
            thread_id: current_thread_id(),
            #[cfg(feature = "source-location")]
            file: None,
            #[cfg(feature = "source-location")]
            function: None,
            #[cfg(feature = "source-location")]
            line: 0,
            message_len: 0,
            message: [0; MAX_MESSAGE_SIZE],
        }
    }

    /// Copy bytes into the inline buffer.
    ///
    /// Over-length input is silently truncated to `MAX_MESSAGE_SIZE - 1`
    /// bytes; truncation is observable through [`Record::message_len`].
    #[inline]
    pub fn set_message(&mut self, bytes: &[u8]) {
        let len = bytes.len().min(MAX_MESSAGE_SIZE - 1);
        self.message[..len].copy_from_slice(&bytes[..len]);
        self.message[len] = 0;
        self.message_len = len;
    }

    /// Render `args` into the inline buffer with the same truncation policy
    /// as [`Record::set_message`].
    ///
    /// If the formatting machinery reports an error (a failing `Display`
    /// impl), the record becomes the empty message.
    pub fn format_message(&mut self, args: fmt::Arguments<'_>) {
        let len = {
            let mut writer = TruncatingWriter::new(&mut self.message[..MAX_MESSAGE_SIZE - 1]);
            match fmt::Write::write_fmt(&mut writer, args) {
                Ok(()) => writer.len(),
                Err(_) => 0,
            }
        };
        self.message_len = len;
        self.message[len] = 0;
    }

    /// Record the call site. Callers pass program-lifetime strings;
    /// `file!()` and `module_path!()` qualify.
    #[cfg(feature = "source-location")]
    #[inline]
    pub fn set_source_location(
        &mut self,
        file: &'static str,
        line: u32,
        function: &'static str,
    ) {
        self.file = Some(file);
        self.line = line;
        self.function = Some(function);
    }

    /// Valid payload bytes
    #[inline]
    pub fn message(&self) -> &[u8] {
        &self.message[..self.message_len]
    }

    /// Payload as text; empty when truncation split a UTF-8 sequence
    pub fn message_str(&self) -> &str {
        std::str::from_utf8(self.message()).unwrap_or("")
    }

    /// Byte count of the valid payload, always `< MAX_MESSAGE_SIZE`
    #[inline]
    pub fn message_len(&self) -> usize {
        self.message_len
    }
}

impl Default for Record {
    fn default() -> Self {
        Self {
            level: Level::Info,
            tick: 0,
            #[cfg(feature = "thread-id")]
            thread_id: 0,
            #[cfg(feature = "source-location")]
            file: None,
            #[cfg(feature = "source-location")]
            function: None,
            #[cfg(feature = "source-location")]
            line: 0,
            message_len: 0,
            message: [0; MAX_MESSAGE_SIZE],
        }
    }
}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut debug = f.debug_struct("Record");
        debug
            .field("level", &self.level)
            .field("tick", &self.tick)
            .field("message", &self.message_str());

        #[cfg(feature = "thread-id")]
        debug.field("thread_id", &self.thread_id);

        #[cfg(feature = "source-location")]
        if let (Some(file), Some(function)) = (self.file, self.function) {
            debug
                .field("file", &file)
                .field("line", &self.line)
                .field("function", &function);
        }

        debug.finish()
    }
}

/// `fmt::Write` adapter over a fixed byte buffer.
///
/// Output past the end of the buffer is dropped rather than reported, so
/// rendering into a record or scratch line never fails on overflow.
pub(crate) struct TruncatingWriter<'a> {
    buf: &'a mut [u8],
    len: usize,
}

impl<'a> TruncatingWriter<'a> {
    pub(crate) fn new(buf: &'a mut [u8]) -> Self {
        Self { buf, len: 0 }
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    /// Append raw bytes, truncating at the end of the buffer.
    pub(crate) fn write_bytes(&mut self, bytes: &[u8]) {
        let take = bytes.len().min(self.buf.len() - self.len);
        self.buf[self.len..self.len + take].copy_from_slice(&bytes[..take]);
        self.len += take;
    }
}

impl fmt::Write for TruncatingWriter<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.write_bytes(s.as_bytes());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_size_and_alignment() {
        assert!(std::mem::size_of::<Record>() <= 4096);
        assert!(std::mem::align_of::<Record>() >= 64);
    }

    #[test]
    fn test_set_message() {
        let mut record = Record::new(Level::Info);
        record.set_message(b"hello");
        assert_eq!(record.message(), b"hello");
        assert_eq!(record.message_str(), "hello");
        assert_eq!(record.message_len(), 5);
    }

    #[test]
    fn test_set_message_truncates() {
        let long = vec![b'a'; MAX_MESSAGE_SIZE + 100];
        let mut record = Record::new(Level::Info);
        record.set_message(&long);
        assert_eq!(record.message_len(), MAX_MESSAGE_SIZE - 1);
        assert_eq!(record.message(), &long[..MAX_MESSAGE_SIZE - 1]);
    }

    #[test]
    fn test_format_message() {
        let mut record = Record::new(Level::Info);
        record.format_message(format_args!("worker {} on core {}", 3, 1));
        assert_eq!(record.message_str(), "worker 3 on core 1");
    }

    #[test]
    fn test_format_message_truncates() {
        let filler = "x".repeat(MAX_MESSAGE_SIZE * 2);
        let mut record = Record::new(Level::Info);
        record.format_message(format_args!("{}", filler));
        assert_eq!(record.message_len(), MAX_MESSAGE_SIZE - 1);
    }

    #[test]
    fn test_failing_display_empties_message() {
        struct Failing;
        impl fmt::Display for Failing {
            fn fmt(&self, _: &mut fmt::Formatter<'_>) -> fmt::Result {
                Err(fmt::Error)
            }
        }

        let mut record = Record::new(Level::Info);
        record.set_message(b"overwritten");
        record.format_message(format_args!("{}", Failing));
        assert_eq!(record.message_len(), 0);
        assert_eq!(record.message(), b"");
    }

    #[cfg(feature = "source-location")]
    #[test]
    fn test_source_location() {
        let mut record = Record::new(Level::Debug);
        record.set_source_location("lib.rs", 42, "crate::module");
        assert_eq!(record.file, Some("lib.rs"));
        assert_eq!(record.line, 42);
        assert_eq!(record.function, Some("crate::module"));
    }

    #[test]
    fn test_ticks_do_not_go_backwards() {
        let first = Record::new(Level::Info);
        let second = Record::new(Level::Info);
        assert!(second.tick >= first.tick);
    }

    #[test]
    fn test_message_str_on_split_utf8() {
        // 'é' is two bytes; cut between them
        let mut payload = vec![b'a'; MAX_MESSAGE_SIZE - 2];
        payload.extend_from_slice("é".as_bytes());
        let mut record = Record::new(Level::Info);
        record.set_message(&payload);
        assert_eq!(record.message_len(), MAX_MESSAGE_SIZE - 1);
        assert_eq!(record.message_str(), "");
    }
}
