// SPDX-License-Identifier: Apache-2.0 OR MIT
//! Low-latency asynchronous logging over a lock-free SPSC ring buffer.
//!
//! A producing thread stamps fixed-size [`Record`]s and pushes them onto a
//! bounded lock-free ring at nanosecond-scale cost; a background consumer
//! thread drains the ring, renders each record with a [`RecordFormatter`],
//! and hands the bytes to a [`Sink`]. The producer never blocks, allocates,
//! or takes a lock: when the ring is full the record is dropped and counted.
//!
//! Each ring is strictly single-producer/single-consumer. To log from
//! several threads, give each its own [`Logger`] and fan the sinks in above
//! this crate.
//!
//! ```no_run
//! use ringlog::{Logger, StdoutSink, TextFormatter};
//!
//! let logger: Logger<1024> = Logger::new(
//!     Box::new(TextFormatter::new()),
//!     Box::new(StdoutSink::new()),
//! );
//! logger.start();
//!
//! logger.info("engine ready");
//! ringlog::log_warn!(logger, "queue depth {}", 17);
//!
//! logger.stop();
//! ```

#[macro_use]
mod macros;

mod clock;
pub mod config;
mod consumer;
mod error;
mod formatter;
mod level;
mod logger;
mod platform;
mod record;
mod ring;
mod sink;

pub use clock::tick_to_ns;
pub use consumer::Consumer;
pub use error::SinkError;
pub use formatter::{RecordFormatter, TextFormatter};
pub use level::Level;
pub use logger::{dropped_records, LogResult, Logger};
pub use platform::{cpu_relax, read_tick, CacheAligned, CACHE_LINE_SIZE};
pub use record::Record;
pub use ring::SpscRing;
pub use sink::{FileSink, NullSink, Sink, StderrSink, StdoutSink};

#[cfg(feature = "thread-id")]
pub use platform::current_thread_id;
