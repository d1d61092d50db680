use std::fmt;
use std::io::{self, Write};

use super::LogSink;
use crate::line_mode::LineMode;

/// Sink that streams rendered lines into an [`io::Write`] target.
///
/// Each call to [`write`](Self::write) emits the line followed by a newline
/// unless the sink was configured with [`LineMode::WithoutNewline`].
///
/// # Examples
///
/// ```
/// use logging_sink::{LineMode, WriterSink};
///
/// let mut sink = WriterSink::new(Vec::new());
/// sink.write("[Test] info hello")?;
/// sink.write_with_mode("no newline", LineMode::WithoutNewline)?;
///
/// assert_eq!(sink.into_inner(), b"[Test] info hello\nno newline".to_vec());
/// # Ok::<(), std::io::Error>(())
/// ```
#[derive(Clone, Default)]
pub struct WriterSink<W> {
    writer: W,
    line_mode: LineMode,
}

impl<W> WriterSink<W> {
    /// Creates a sink that appends a newline after each line.
    #[must_use]
    pub fn new(writer: W) -> Self {
        Self::with_line_mode(writer, LineMode::WithNewline)
    }

    /// Creates a sink with the provided [`LineMode`].
    #[must_use]
    pub const fn with_line_mode(writer: W, line_mode: LineMode) -> Self {
        Self { writer, line_mode }
    }

    /// Returns the current [`LineMode`].
    #[must_use]
    pub const fn line_mode(&self) -> LineMode {
        self.line_mode
    }

    /// Updates the [`LineMode`] used for subsequent writes.
    pub fn set_line_mode(&mut self, line_mode: LineMode) {
        self.line_mode = line_mode;
    }

    /// Borrows the underlying writer.
    #[must_use]
    pub const fn get_ref(&self) -> &W {
        &self.writer
    }

    /// Mutably borrows the underlying writer.
    pub fn get_mut(&mut self) -> &mut W {
        &mut self.writer
    }

    /// Consumes the sink and returns the wrapped writer.
    #[must_use]
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W> WriterSink<W>
where
    W: Write,
{
    /// Writes a single line using the sink's current [`LineMode`].
    pub fn write(&mut self, line: &str) -> io::Result<()> {
        self.write_with_mode(line, self.line_mode)
    }

    /// Writes `line` using an explicit [`LineMode`] without mutating the sink.
    pub fn write_with_mode(&mut self, line: &str, line_mode: LineMode) -> io::Result<()> {
        self.writer.write_all(line.as_bytes())?;
        if line_mode.append_newline() {
            self.writer.write_all(b"\n")?;
        }
        Ok(())
    }

    /// Writes each line from the iterator using the sink's [`LineMode`].
    pub fn write_all<I, L>(&mut self, lines: I) -> io::Result<()>
    where
        I: IntoIterator<Item = L>,
        L: AsRef<str>,
    {
        for line in lines {
            self.write(line.as_ref())?;
        }
        Ok(())
    }

    /// Flushes the underlying writer.
    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

impl<W> LogSink for WriterSink<W>
where
    W: Write,
{
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        self.write(line)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

impl<W> fmt::Debug for WriterSink<W>
where
    W: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WriterSink")
            .field("writer", &self.writer)
            .field("line_mode", &self.line_mode)
            .finish()
    }
}
