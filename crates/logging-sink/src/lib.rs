#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! crates/logging-sink/src/lib.rs
//!
//! # Overview
//!
//! `logging-sink` provides the output side of the allowlog workspace: the
//! [`LogSink`] trait that receives fully rendered log lines, plus the concrete
//! sinks a host typically needs.
//!
//! # Design
//!
//! - [`ConsoleSink`] prints to standard output or standard error and is the
//!   default destination during development.
//! - [`WriterSink`] streams lines into any [`std::io::Write`] implementor and
//!   honours a [`LineMode`] for newline handling.
//! - [`MemorySink`] records lines in a shared buffer for tests and
//!   inspection.
//! - [`NullSink`] discards everything, silencing a context without touching
//!   its allowance rules.
//!
//! # Invariants
//!
//! - Lines handed to a sink never include their own trailing newline.
//! - Sinks never reorder lines; output order equals emission order.
//!
//! # Errors
//!
//! Sink operations surface [`std::io::Error`] values from the underlying
//! writer unchanged.
//!
//! # Examples
//!
//! ```
//! use logging_sink::{LineMode, LogSink, WriterSink};
//!
//! let mut sink = WriterSink::new(Vec::new());
//! sink.write_line("[Test] info ready").unwrap();
//! sink.set_line_mode(LineMode::WithoutNewline);
//! sink.write_line("[Test] info done").unwrap();
//!
//! let output = String::from_utf8(sink.into_inner()).unwrap();
//! assert_eq!(output, "[Test] info ready\n[Test] info done");
//! ```
//!
//! # See also
//!
//! - `logging` crate for the allowance registry and the `Logger` that
//!   renders lines into these sinks.

mod line_mode;
mod sink;

pub use line_mode::LineMode;
pub use sink::{ConsoleSink, ConsoleStream, LogSink, MemorySink, NullSink, WriterSink};
