// SPDX-License-Identifier: Apache-2.0 OR MIT
// Logging macros capturing the call site

/// Log a message with trace level, attaching the call site
///
/// # Examples
/// ```ignore
/// log_trace!(logger, "entering parse loop");
/// log_trace!(logger, "slot {} reused", index);
/// ```
#[macro_export]
macro_rules! log_trace {
    ($logger:expr, $msg:expr) => {
        $logger.log_with_location(
            $crate::Level::Trace,
            $msg,
            file!(),
            line!(),
            module_path!(),
        )
    };
    ($logger:expr, $fmt:expr, $($arg:expr),+ $(,)?) => {
        $logger.log_format_with_location(
            $crate::Level::Trace,
            format_args!($fmt, $($arg),+),
            file!(),
            line!(),
            module_path!(),
        )
    };
}

/// Log a message with debug level, attaching the call site
///
/// # Examples
/// ```ignore
/// log_debug!(logger, "configuration loaded");
/// ```
#[macro_export]
macro_rules! log_debug {
    ($logger:expr, $msg:expr) => {
        $logger.log_with_location(
            $crate::Level::Debug,
            $msg,
            file!(),
            line!(),
            module_path!(),
        )
    };
    ($logger:expr, $fmt:expr, $($arg:expr),+ $(,)?) => {
        $logger.log_format_with_location(
            $crate::Level::Debug,
            format_args!($fmt, $($arg),+),
            file!(),
            line!(),
            module_path!(),
        )
    };
}

/// Log a message with info level, attaching the call site
///
/// # Examples
/// ```ignore
/// log_info!(logger, "worker started");
/// log_info!(logger, "forwarded {} packets", count);
/// ```
#[macro_export]
macro_rules! log_info {
    ($logger:expr, $msg:expr) => {
        $logger.log_with_location(
            $crate::Level::Info,
            $msg,
            file!(),
            line!(),
            module_path!(),
        )
    };
    ($logger:expr, $fmt:expr, $($arg:expr),+ $(,)?) => {
        $logger.log_format_with_location(
            $crate::Level::Info,
            format_args!($fmt, $($arg),+),
            file!(),
            line!(),
            module_path!(),
        )
    };
}

/// Log a message with warn level, attaching the call site
///
/// # Examples
/// ```ignore
/// log_warn!(logger, "buffer near capacity");
/// ```
#[macro_export]
macro_rules! log_warn {
    ($logger:expr, $msg:expr) => {
        $logger.log_with_location(
            $crate::Level::Warn,
            $msg,
            file!(),
            line!(),
            module_path!(),
        )
    };
    ($logger:expr, $fmt:expr, $($arg:expr),+ $(,)?) => {
        $logger.log_format_with_location(
            $crate::Level::Warn,
            format_args!($fmt, $($arg),+),
            file!(),
            line!(),
            module_path!(),
        )
    };
}

/// Log a message with error level, attaching the call site
///
/// # Examples
/// ```ignore
/// log_error!(logger, "failed to bind socket");
/// log_error!(logger, "retry {} of {}", attempt, limit);
/// ```
#[macro_export]
macro_rules! log_error {
    ($logger:expr, $msg:expr) => {
        $logger.log_with_location(
            $crate::Level::Error,
            $msg,
            file!(),
            line!(),
            module_path!(),
        )
    };
    ($logger:expr, $fmt:expr, $($arg:expr),+ $(,)?) => {
        $logger.log_format_with_location(
            $crate::Level::Error,
            format_args!($fmt, $($arg),+),
            file!(),
            line!(),
            module_path!(),
        )
    };
}

/// Log a message with fatal level, attaching the call site
///
/// # Examples
/// ```ignore
/// log_fatal!(logger, "worker crashed");
/// ```
#[macro_export]
macro_rules! log_fatal {
    ($logger:expr, $msg:expr) => {
        $logger.log_with_location(
            $crate::Level::Fatal,
            $msg,
            file!(),
            line!(),
            module_path!(),
        )
    };
    ($logger:expr, $fmt:expr, $($arg:expr),+ $(,)?) => {
        $logger.log_format_with_location(
            $crate::Level::Fatal,
            format_args!($fmt, $($arg),+),
            file!(),
            line!(),
            module_path!(),
        )
    };
}
