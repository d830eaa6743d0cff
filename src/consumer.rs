// SPDX-License-Identifier: Apache-2.0 OR MIT
// Background consumer thread draining the ring into formatter and sink

use crate::config::{SCRATCH_BUFFER_SIZE, SLEEP_INTERVAL, SPIN_COUNT};
use crate::error;
use crate::formatter::RecordFormatter;
use crate::platform::cpu_relax;
use crate::record::Record;
use crate::ring::SpscRing;
use crate::sink::Sink;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

/// Background log consumer
///
/// Owns the thread that continuously polls the ring for records, renders
/// them through the formatter, and hands the bytes to the sink. Idle
/// periods use a hybrid wait: spin for [`SPIN_COUNT`] iterations, then
/// sleep [`SLEEP_INTERVAL`]. Stopping drains whatever is left in the ring
/// and flushes the sink before returning.
pub struct Consumer<const CAP: usize> {
    ring: Arc<SpscRing<Record, CAP>>,
    running: Arc<AtomicBool>,
    // Formatter and sink live here while stopped and travel with the
    // drain thread while running, so the consumer can be restarted.
    parts: Mutex<Option<DrainParts>>,
    handle: Mutex<Option<JoinHandle<DrainParts>>>,
}

struct DrainParts {
    formatter: Box<dyn RecordFormatter + Send>,
    sink: Box<dyn Sink + Send>,
}

impl<const CAP: usize> Consumer<CAP> {
    pub fn new(
        ring: Arc<SpscRing<Record, CAP>>,
        formatter: Box<dyn RecordFormatter + Send>,
        sink: Box<dyn Sink + Send>,
    ) -> Self {
        Self {
            ring,
            running: Arc::new(AtomicBool::new(false)),
            parts: Mutex::new(Some(DrainParts { formatter, sink })),
            handle: Mutex::new(None),
        }
    }

    /// Spawn the drain thread. Only the first of repeated calls does
    /// anything; later calls return immediately.
    pub fn start(&self) {
        if self
            .running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return;
        }

        let parts = match self.parts.lock().unwrap().take() {
            Some(parts) => parts,
            None => {
                // A concurrent stop() has not returned the parts yet.
                self.running.store(false, Ordering::Release);
                return;
            }
        };

        let ring = Arc::clone(&self.ring);
        let running = Arc::clone(&self.running);
        let spawned = thread::Builder::new()
            .name("log-consumer".into())
            .spawn(move || drain_loop(ring, running, parts));

        match spawned {
            Ok(handle) => {
                *self.handle.lock().unwrap() = Some(handle);
            }
            Err(_) => {
                self.running.store(false, Ordering::Release);
                error::report_internal("failed to spawn consumer thread");
            }
        }
    }

    /// Signal shutdown and join the drain thread.
    ///
    /// The thread drains remaining records and flushes before exiting; the
    /// formatter and sink return to this handle so the consumer can start
    /// again. Only the first of repeated calls joins.
    pub fn stop(&self) {
        if self
            .running
            .compare_exchange(true, false, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return;
        }

        let handle = self.handle.lock().unwrap().take();
        if let Some(handle) = handle {
            if let Ok(parts) = handle.join() {
                *self.parts.lock().unwrap() = Some(parts);
            }
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Relaxed)
    }
}

impl<const CAP: usize> Drop for Consumer<CAP> {
    fn drop(&mut self) {
        self.stop();
    }
}

fn drain_loop<const CAP: usize>(
    ring: Arc<SpscRing<Record, CAP>>,
    running: Arc<AtomicBool>,
    mut parts: DrainParts,
) -> DrainParts {
    // One reusable line buffer; no allocation happens per record.
    let mut scratch = vec![0u8; SCRATCH_BUFFER_SIZE];

    'drain: while running.load(Ordering::Relaxed) {
        // Fast path: keep handling records while they are available.
        if let Some(record) = ring.try_pop() {
            let len = parts.formatter.format_record(&record, &mut scratch);
            parts.sink.write(&scratch[..len]);
            continue;
        }

        // Empty: flush buffered output while there is nothing else to do.
        parts.sink.flush();

        // Spin phase: stay hot for a short burst of new records, checking
        // the stop signal to remain responsive.
        let mut popped = None;
        for _ in 0..SPIN_COUNT {
            cpu_relax();
            if !running.load(Ordering::Relaxed) {
                break 'drain;
            }
            if let Some(record) = ring.try_pop() {
                popped = Some(record);
                break;
            }
        }

        match popped {
            Some(record) => {
                let len = parts.formatter.format_record(&record, &mut scratch);
                parts.sink.write(&scratch[..len]);
            }
            None => {
                // Sleep phase: cede the CPU; wakeup latency stays bounded
                // by SLEEP_INTERVAL.
                if running.load(Ordering::Relaxed) {
                    thread::sleep(SLEEP_INTERVAL);
                }
            }
        }
    }

    // Shutdown: drain everything the producer managed to push, then flush.
    while let Some(record) = ring.try_pop() {
        let len = parts.formatter.format_record(&record, &mut scratch);
        parts.sink.write(&scratch[..len]);
    }
    parts.sink.flush();

    parts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formatter::TextFormatter;
    use crate::level::Level;
    use std::time::Duration;

    struct TestSink {
        lines: Arc<Mutex<Vec<String>>>,
    }

    impl TestSink {
        fn new() -> (Self, Arc<Mutex<Vec<String>>>) {
            let lines = Arc::new(Mutex::new(Vec::new()));
            (
                Self {
                    lines: Arc::clone(&lines),
                },
                lines,
            )
        }
    }

    impl Sink for TestSink {
        fn write(&mut self, bytes: &[u8]) {
            self.lines
                .lock()
                .unwrap()
                .push(String::from_utf8_lossy(bytes).into_owned());
        }

        fn flush(&mut self) {}
    }

    fn record_with(message: &str) -> Record {
        let mut record = Record::new(Level::Info);
        record.set_message(message.as_bytes());
        record
    }

    #[test]
    fn test_consumer_drains_ring() {
        let ring: Arc<SpscRing<Record, 16>> = Arc::new(SpscRing::new());
        let (sink, lines) = TestSink::new();
        let consumer = Consumer::new(
            Arc::clone(&ring),
            Box::new(TextFormatter::new()),
            Box::new(sink),
        );

        assert!(ring.try_push(record_with("message one")));
        assert!(ring.try_push(record_with("message two")));

        consumer.start();
        thread::sleep(Duration::from_millis(20));
        consumer.stop();

        let lines = lines.lock().unwrap();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("message one"));
        assert!(lines[1].contains("message two"));
    }

    #[test]
    fn test_stop_drains_pending_records() {
        let ring: Arc<SpscRing<Record, 64>> = Arc::new(SpscRing::new());
        let (sink, lines) = TestSink::new();
        let consumer = Consumer::new(
            Arc::clone(&ring),
            Box::new(TextFormatter::new()),
            Box::new(sink),
        );

        for i in 0..10 {
            assert!(ring.try_push(record_with(&format!("pending {}", i))));
        }

        consumer.start();
        consumer.stop();

        let lines = lines.lock().unwrap();
        assert_eq!(lines.len(), 10);
        assert!(ring.is_empty());
    }

    #[test]
    fn test_lifecycle_is_idempotent() {
        let ring: Arc<SpscRing<Record, 16>> = Arc::new(SpscRing::new());
        let (sink, _lines) = TestSink::new();
        let consumer = Consumer::new(
            Arc::clone(&ring),
            Box::new(TextFormatter::new()),
            Box::new(sink),
        );

        assert!(!consumer.is_running());
        consumer.start();
        consumer.start();
        assert!(consumer.is_running());
        consumer.stop();
        consumer.stop();
        assert!(!consumer.is_running());
    }

    #[test]
    fn test_consumer_restarts_after_stop() {
        let ring: Arc<SpscRing<Record, 16>> = Arc::new(SpscRing::new());
        let (sink, lines) = TestSink::new();
        let consumer = Consumer::new(
            Arc::clone(&ring),
            Box::new(TextFormatter::new()),
            Box::new(sink),
        );

        assert!(ring.try_push(record_with("first session")));
        consumer.start();
        consumer.stop();

        assert!(ring.try_push(record_with("second session")));
        consumer.start();
        consumer.stop();

        let lines = lines.lock().unwrap();
        assert_eq!(lines.len(), 2);
        assert!(lines[1].contains("second session"));
    }
}
