use std::cell::RefCell;
use std::io;
use std::rc::Rc;

use super::LogSink;

/// In-memory sink that records every line it receives.
///
/// Clones share the same buffer, so a test can hand one clone to a logger
/// context and inspect the captured output through another.
///
/// # Examples
///
/// ```
/// use logging_sink::{LogSink, MemorySink};
///
/// let captured = MemorySink::new();
/// let mut handle = captured.clone();
/// handle.write_line("[Test] info ready")?;
///
/// assert_eq!(captured.lines(), vec!["[Test] info ready".to_owned()]);
/// # Ok::<(), std::io::Error>(())
/// ```
#[derive(Clone, Debug, Default)]
pub struct MemorySink {
    lines: Rc<RefCell<Vec<String>>>,
}

impl MemorySink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of every captured line in emission order.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        self.lines.borrow().clone()
    }

    /// Returns the most recently captured line.
    #[must_use]
    pub fn last(&self) -> Option<String> {
        self.lines.borrow().last().cloned()
    }

    /// Drains the captured lines, leaving the buffer empty.
    pub fn take(&self) -> Vec<String> {
        self.lines.borrow_mut().drain(..).collect()
    }

    /// Number of captured lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.borrow().len()
    }

    /// Reports whether nothing has been captured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.borrow().is_empty()
    }

    /// Discards every captured line.
    pub fn clear(&self) {
        self.lines.borrow_mut().clear();
    }
}

impl LogSink for MemorySink {
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        self.lines.borrow_mut().push(line.to_owned());
        Ok(())
    }
}
