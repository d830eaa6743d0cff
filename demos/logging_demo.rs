// SPDX-License-Identifier: Apache-2.0 OR MIT
// Example demonstrating the ringlog pipeline
//
// Run with: cargo run --example logging_demo

use ringlog::{log_error, log_info, log_warn};
use ringlog::{Level, LogResult, Logger, StdoutSink, TextFormatter};
use std::time::Duration;

fn main() {
    println!("=== ringlog demo ===\n");

    let logger: Logger<1024> = Logger::new(
        Box::new(TextFormatter::new()),
        Box::new(StdoutSink::new()),
    );
    logger.start();

    println!("1. Basic logging with severity helpers:");
    logger.info("consumer started");
    logger.debug("configuration loaded");
    logger.error("failed to bind socket");

    println!("\n2. Using macros (they capture the call site):");
    log_info!(logger, "worker spawned");
    log_warn!(logger, "high memory usage");
    log_error!(logger, "retry {} of {}", 2, 5);

    println!("\n3. Formatted logging without allocation:");
    logger.log_format(Level::Info, format_args!("pending={}", logger.pending_count()));

    println!("\n4. The producer never blocks:");
    match logger.log(Level::Info, "non-blocking by construction") {
        LogResult::Success => println!("   enqueued"),
        LogResult::BufferFull => println!("   dropped (ring full)"),
        LogResult::Error => println!("   rejected"),
    }

    // Give the consumer a moment, then drain and stop.
    std::thread::sleep(Duration::from_millis(50));
    logger.stop();

    println!("\ndropped so far: {}", ringlog::dropped_records());
}
