#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! crates/logging/src/lib.rs
//!
//! # Overview
//!
//! `logging` decides whether a log call may produce output and, when it may,
//! renders a stack-trace enriched line into a [`LogSink`]. Hosts register
//! named modules with an allowance policy per severity [`Level`], optionally
//! with a different module list per runtime [`Env`], and log through a
//! per-module [`Logger`].
//!
//! # Design
//!
//! - [`LoggerContext`] owns the shared state: the [`AllowanceRegistry`], the
//!   [`ColorTable`], the observable [`CurrentEnv`] and the output sink. It is
//!   constructed explicitly and cloned into every logger.
//! - [`AllowanceControl`] carries the registry operations and is implemented
//!   by both the context and its loggers.
//! - [`LoggerMethods`] is the per-level capability set of a [`Logger`].
//! - Per-environment lists live in an [`EnvTable`] and are resolved by
//!   lookup, re-resolving automatically when the environment changes.
//!
//! # Invariants
//!
//! - Levels compare by declaration order:
//!   `trace < debug < info < warn < current < error < fatal`.
//! - Registration replaces the registry contents; the registry cell itself is
//!   never replaced, so every logger of a context observes the same registry.
//! - A disallowed call has no side effects: nothing is written and the
//!   logger's previous record is kept.
//! - Allowance is decided by the *registered* descriptor of a module name,
//!   never by the descriptor a logger was built with. The level is rewritten
//!   first, by the bound descriptor's handler when it has one and by the
//!   registered one otherwise.
//! - `trace_at` counts from the calling function at index 3, even when an
//!   optimized build drops the per-level method's frame.
//!
//! # Errors
//!
//! Registration and configuration return [`LoggerResult`]. Structural
//! problems in per-environment input surface as [`LoggerError::Assertion`],
//! rendered with an `AssertionError` prefix. Sink write failures are dropped.
//!
//! # Examples
//!
//! ```
//! use logging::{
//!     AllowanceByEnv, AllowanceControl, AllowedModule, CurrentEnv, Env, Level, LogOption, Logger,
//!     LoggerConfig, LoggerContext, LoggerMethods, MemorySink,
//! };
//!
//! let sink = MemorySink::new();
//! let config = LoggerConfig { colorize: false, default_stack_number: 0, ..LoggerConfig::default() };
//! let ctx = LoggerContext::new(config, CurrentEnv::new(Env::Test), sink.clone());
//!
//! ctx.set_logger_allowance_by_env(AllowanceByEnv::new(
//!     vec![AllowedModule::allow_all("Hobbits")],
//!     vec![AllowedModule::disallow_up_to("Hobbits", Level::Warn)],
//! ))
//! .unwrap();
//!
//! let log = Logger::for_module(&ctx, "Hobbits");
//! log.info(["quiet in tests"], LogOption::default());
//! assert!(sink.is_empty());
//!
//! ctx.env().set(Env::Develop);
//! log.info(["loud in develop"], LogOption::default());
//! assert_eq!(sink.lines(), vec!["[Hobbits] info loud in develop"]);
//! ```
//!
//! # See also
//!
//! - `logging-sink` for the output destinations re-exported here.

mod assert;
mod colors;
mod config;
mod context;
mod env;
mod error;
mod level;
mod logger;
mod macros;
mod module;
mod record;
mod registry;
mod stack;
#[cfg(feature = "tracing")]
mod tracing_bridge;

pub use assert::{AssertionError, assert, assert_with};
pub use colors::{ColorTable, Decorator, decorator, default_style, plain_decorator, style_decorator};
pub use config::{
    AllowanceDocument, COLOR_VAR, DEFAULT_STACK_NUMBER, DEFAULT_TRACE_AT, DUPLICATES_VAR,
    LoggerConfig, ModuleRule, STACK_NUMBER_VAR, TRACE_AT_VAR,
};
pub use context::{AllowanceControl, LoggerContext, SharedAllowance};
pub use env::{CurrentEnv, ENV_VAR, Env, EnvTable, ParseEnvError, SubscriptionId};
pub use error::{LoggerError, LoggerResult};
pub use level::{Level, ParseLevelError};
pub use logger::{Logger, LoggerMethods};
pub use logging_sink::{
    ConsoleSink, ConsoleStream, LineMode, LogSink, MemorySink, NullSink, WriterSink,
};
pub use module::{AllowedModule, DisallowedHandler, LogLevelHandler};
pub use record::{LogOption, LogRecord};
pub use registry::{
    AllowanceByEnv, AllowanceMode, AllowanceRegistry, DuplicatePolicy, ModuleMap,
    to_allowed_logger,
};
pub use stack::{CALLER_DEPTH, caller_index, capture_frames, parse_frames, rebase_bound, slice_frames};
#[cfg(feature = "tracing")]
pub use tracing_bridge::{TARGET, TracingSink, init_tracing, init_tracing_from_env, to_tracing_level};
