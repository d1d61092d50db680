use std::io;

mod console;
mod memory;
mod writer;

pub use console::{ConsoleSink, ConsoleStream};
pub use memory::MemorySink;
pub use writer::WriterSink;

/// Destination for rendered log lines.
///
/// A line handed to [`write_line`](Self::write_line) is fully composed (colors,
/// module prefix and any stack frames already applied) and never carries a
/// trailing newline; sinks decide how lines are terminated.
pub trait LogSink {
    /// Writes one rendered line.
    fn write_line(&mut self, line: &str) -> io::Result<()>;

    /// Flushes buffered output, if the sink buffers at all.
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<S> LogSink for Box<S>
where
    S: LogSink + ?Sized,
{
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        (**self).write_line(line)
    }

    fn flush(&mut self) -> io::Result<()> {
        (**self).flush()
    }
}

/// Sink that discards every line.
///
/// Installing it silences a logger context without touching its allowance
/// registry, which is how production builds typically redirect output away
/// from the console.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct NullSink;

impl LogSink for NullSink {
    fn write_line(&mut self, _line: &str) -> io::Result<()> {
        Ok(())
    }
}
