//! crates/logging/src/record.rs
//! The retained record of an emitted log call and per-call options.

use serde::Serialize;

use crate::level::Level;

/// Snapshot of one emitted log call.
///
/// A [`Logger`](crate::Logger) keeps the most recent record and replaces it on
/// every emitted call.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LogRecord {
    /// Every captured frame, starting at the capture point.
    pub all_stacks: Vec<String>,
    /// The displayed window `all_stacks[l_bound..r_bound]`, clamped.
    pub stacks_on_display: Vec<String>,
    /// First displayed index into `all_stacks`.
    pub l_bound: usize,
    /// One past the last requested index into `all_stacks`.
    pub r_bound: usize,
    /// Textual module name.
    pub module_name: String,
    /// Message parts in call order.
    pub message: Vec<String>,
    /// Level after any rewrite.
    pub level: Level,
}

impl LogRecord {
    /// Message parts joined with single spaces.
    #[must_use]
    pub fn joined_message(&self) -> String {
        self.message.join(" ")
    }
}

/// Per-call overrides for the displayed stack window.
///
/// Unset fields fall back to the context configuration.
///
/// # Examples
///
/// ```
/// use logging::LogOption;
///
/// let option = LogOption::new().trace_at(4).stack_number(1);
/// assert_eq!(option.bounds(3, 3), (4, 5));
/// assert_eq!(LogOption::default().bounds(3, 3), (3, 6));
/// ```
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct LogOption {
    /// Start of the displayed window, counted against
    /// [`CALLER_DEPTH`](crate::CALLER_DEPTH): the default of 3 is the calling
    /// function wherever it actually sits in the capture.
    pub trace_at: Option<usize>,
    /// Number of frames displayed.
    pub stack_number: Option<usize>,
}

impl LogOption {
    /// Option with every field unset.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            trace_at: None,
            stack_number: None,
        }
    }

    /// Sets the trace offset.
    #[must_use]
    pub const fn trace_at(mut self, trace_at: usize) -> Self {
        self.trace_at = Some(trace_at);
        self
    }

    /// Sets the number of displayed frames.
    #[must_use]
    pub const fn stack_number(mut self, stack_number: usize) -> Self {
        self.stack_number = Some(stack_number);
        self
    }

    /// Resolves `(l_bound, r_bound)` against the given defaults.
    #[must_use]
    pub fn bounds(&self, default_trace_at: usize, default_stack_number: usize) -> (usize, usize) {
        let l_bound = self.trace_at.unwrap_or(default_trace_at);
        let width = self.stack_number.unwrap_or(default_stack_number);
        (l_bound, l_bound.saturating_add(width))
    }
}
