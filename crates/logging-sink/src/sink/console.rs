use std::io::{self, Write};

use super::LogSink;

/// Standard stream a [`ConsoleSink`] writes to.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum ConsoleStream {
    /// Process standard output.
    #[default]
    Stdout,
    /// Process standard error.
    Stderr,
}

/// Sink that prints each line to the console.
///
/// The stream is locked for the duration of a single line so concurrent
/// writers in the host process cannot interleave inside it.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct ConsoleSink {
    stream: ConsoleStream,
}

impl ConsoleSink {
    /// Creates a sink that prints to standard output.
    #[must_use]
    pub const fn stdout() -> Self {
        Self {
            stream: ConsoleStream::Stdout,
        }
    }

    /// Creates a sink that prints to standard error.
    #[must_use]
    pub const fn stderr() -> Self {
        Self {
            stream: ConsoleStream::Stderr,
        }
    }

    /// Returns the stream this sink prints to.
    #[must_use]
    pub const fn stream(&self) -> ConsoleStream {
        self.stream
    }
}

impl LogSink for ConsoleSink {
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        match self.stream {
            ConsoleStream::Stdout => writeln!(io::stdout().lock(), "{line}"),
            ConsoleStream::Stderr => writeln!(io::stderr().lock(), "{line}"),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.stream {
            ConsoleStream::Stdout => io::stdout().flush(),
            ConsoleStream::Stderr => io::stderr().flush(),
        }
    }
}
