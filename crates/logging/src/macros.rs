//! crates/logging/src/macros.rs
//! Formatting shorthands for the per-level logger methods.
//!
//! Each macro formats its arguments into a single message part and calls the
//! matching [`LoggerMethods`](crate::LoggerMethods) method with default
//! options. The expansion happens at the call site, so the displayed frames
//! still start at the function that invoked the macro.

/// Emit a trace-level message.
///
/// # Example
/// ```ignore
/// log_trace!(log, "entering {}", name);
/// ```
#[macro_export]
macro_rules! log_trace {
    ($logger:expr, $($arg:tt)+) => {
        {
            use $crate::LoggerMethods as _;
            $logger.trace([::std::format!($($arg)+)], $crate::LogOption::new())
        }
    };
}

/// Emit a debug-level message.
///
/// # Example
/// ```ignore
/// log_debug!(log, "cache holds {} entries", count);
/// ```
#[macro_export]
macro_rules! log_debug {
    ($logger:expr, $($arg:tt)+) => {
        {
            use $crate::LoggerMethods as _;
            $logger.debug([::std::format!($($arg)+)], $crate::LogOption::new())
        }
    };
}

/// Emit an info-level message.
///
/// # Example
/// ```ignore
/// log_info!(log, "loaded {} modules", count);
/// ```
#[macro_export]
macro_rules! log_info {
    ($logger:expr, $($arg:tt)+) => {
        {
            use $crate::LoggerMethods as _;
            $logger.info([::std::format!($($arg)+)], $crate::LogOption::new())
        }
    };
}

/// Emit a warn-level message.
///
/// # Example
/// ```ignore
/// log_warn!(log, "retrying {}", attempt);
/// ```
#[macro_export]
macro_rules! log_warn {
    ($logger:expr, $($arg:tt)+) => {
        {
            use $crate::LoggerMethods as _;
            $logger.warn([::std::format!($($arg)+)], $crate::LogOption::new())
        }
    };
}

/// Emit a current-level message, for whatever is being worked on right now.
///
/// # Example
/// ```ignore
/// log_current!(log, "state = {:?}", state);
/// ```
#[macro_export]
macro_rules! log_current {
    ($logger:expr, $($arg:tt)+) => {
        {
            use $crate::LoggerMethods as _;
            $logger.current([::std::format!($($arg)+)], $crate::LogOption::new())
        }
    };
}

/// Emit an error-level message.
///
/// # Example
/// ```ignore
/// log_error!(log, "request failed: {}", err);
/// ```
#[macro_export]
macro_rules! log_error {
    ($logger:expr, $($arg:tt)+) => {
        {
            use $crate::LoggerMethods as _;
            $logger.error([::std::format!($($arg)+)], $crate::LogOption::new())
        }
    };
}

/// Emit a fatal-level message.
///
/// # Example
/// ```ignore
/// log_fatal!(log, "cannot continue: {}", reason);
/// ```
#[macro_export]
macro_rules! log_fatal {
    ($logger:expr, $($arg:tt)+) => {
        {
            use $crate::LoggerMethods as _;
            $logger.fatal([::std::format!($($arg)+)], $crate::LogOption::new())
        }
    };
}
