//! crates/logging/src/tracing_bridge.rs
//! Bridge between allowlog output and the tracing crate.
//!
//! The library reports its own diagnostics (registry replacement, environment
//! re-resolution, suppressed calls) as `tracing` events under the
//! [`TARGET`] target. Hosts that already run a `tracing` subscriber can also
//! route rendered log lines through it with [`TracingSink`] instead of
//! writing to the console.
//!
//! # Usage
//!
//! ```rust,ignore
//! use logging::{LoggerContext, LoggerConfig, TracingSink, init_tracing};
//!
//! init_tracing("allowlog=debug")?;
//! let ctx = LoggerContext::<&str>::with_sink(LoggerConfig::default(), TracingSink::new());
//! ```

use logging_sink::LogSink;
use tracing_subscriber::EnvFilter;

use crate::error::{LoggerError, LoggerResult};
use crate::level::Level;

/// Target of every event emitted by this crate.
pub const TARGET: &str = "allowlog";

/// Maps a logger level onto the closest `tracing` level.
///
/// `Current` is reported as `INFO` and `Fatal` as `ERROR`.
#[must_use]
pub const fn to_tracing_level(level: Level) -> tracing::Level {
    match level {
        Level::Trace => tracing::Level::TRACE,
        Level::Debug => tracing::Level::DEBUG,
        Level::Info | Level::Current => tracing::Level::INFO,
        Level::Warn => tracing::Level::WARN,
        Level::Error | Level::Fatal => tracing::Level::ERROR,
    }
}

/// Sink forwarding each rendered line as a `tracing` event.
///
/// Lines are emitted under [`TARGET`] at the level given at construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TracingSink {
    level: Level,
}

impl TracingSink {
    /// Sink emitting at `INFO`.
    #[must_use]
    pub const fn new() -> Self {
        Self { level: Level::Info }
    }

    /// Sink emitting at the `tracing` level mapped from `level`.
    #[must_use]
    pub const fn with_level(level: Level) -> Self {
        Self { level }
    }

    /// Level lines are emitted at.
    #[must_use]
    pub const fn level(&self) -> Level {
        self.level
    }
}

impl Default for TracingSink {
    fn default() -> Self {
        Self::new()
    }
}

impl LogSink for TracingSink {
    fn write_line(&mut self, line: &str) -> std::io::Result<()> {
        match self.level {
            Level::Trace => tracing::trace!(target: "allowlog", "{line}"),
            Level::Debug => tracing::debug!(target: "allowlog", "{line}"),
            Level::Info | Level::Current => tracing::info!(target: "allowlog", "{line}"),
            Level::Warn => tracing::warn!(target: "allowlog", "{line}"),
            Level::Error | Level::Fatal => tracing::error!(target: "allowlog", "{line}"),
        }
        Ok(())
    }
}

/// Installs a `tracing_subscriber` formatter filtered by `directives`
/// (`EnvFilter` syntax, for example `"allowlog=debug"`).
///
/// Fails when the directives do not parse or a global subscriber is already
/// installed.
pub fn init_tracing(directives: &str) -> LoggerResult<()> {
    let filter = EnvFilter::try_new(directives)
        .map_err(|err| LoggerError::config(format!("invalid tracing filter: {err}")))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|err| LoggerError::config(format!("tracing already initialised: {err}")))
}

/// Like [`init_tracing`], reading directives from `RUST_LOG` and falling back
/// to `default_directives` when it is unset.
pub fn init_tracing_from_env(default_directives: &str) -> LoggerResult<()> {
    match std::env::var(EnvFilter::DEFAULT_ENV) {
        Ok(directives) if !directives.trim().is_empty() => init_tracing(&directives),
        _ => init_tracing(default_directives),
    }
}
