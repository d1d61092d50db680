#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! src/lib.rs
//!
//! # Overview
//!
//! `allowlog` is an environment-aware, per-module logging facility. A host
//! registers its modules with a per-level allowance policy (optionally a
//! different list per runtime environment), then logs through per-module
//! loggers that print stack-trace enriched lines and keep the last emitted
//! record for inspection.
//!
//! This crate re-exports the workspace crates:
//!
//! - [`logging`] for the allowance registry, contexts and loggers;
//! - [`logging_sink`] for output destinations.
//!
//! # Examples
//!
//! ```
//! use allowlog::{
//!     AllowanceControl, AllowedModule, Level, LogOption, Logger, LoggerConfig, LoggerContext,
//!     LoggerMethods, MemorySink,
//! };
//!
//! let sink = MemorySink::new();
//! let ctx = LoggerContext::with_sink(
//!     LoggerConfig { colorize: false, default_stack_number: 0, ..LoggerConfig::default() },
//!     sink.clone(),
//! );
//! ctx.set_logger_allowance(vec![
//!     AllowedModule::allow_all("Test"),
//!     AllowedModule::new("Hobbits", |level| level <= Level::Info),
//! ])
//! .unwrap();
//!
//! let hobbits = Logger::for_module(&ctx, "Hobbits");
//! hobbits.debug(["too early"], LogOption::default());
//! hobbits.current(["second breakfast"], LogOption::default());
//!
//! assert_eq!(sink.lines(), vec!["[Hobbits] current second breakfast"]);
//! ```

pub use logging;
pub use logging::*;
pub use logging_sink;
