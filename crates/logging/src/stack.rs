//! crates/logging/src/stack.rs
//! Call-stack capture and slicing for trace display.
//!
//! Frames are plain strings of the form `symbol at file:line:col` (the
//! location is omitted when the backtrace has none), so consumers can match
//! substrings such as a function name against them.

use std::backtrace::Backtrace;

/// Marker identifying the capture frame inside a rendered backtrace.
const CAPTURE_MARKER: &str = "stack::capture_frames";

/// Marker shared by the logger's own frames: the dispatch function and the
/// per-level methods.
const LOGGER_MARKER: &str = "logging::logger::Logger<";

/// Index of the calling function in the reference layout: capture point,
/// dispatch, public method, caller.
///
/// `trace_at` values are expressed against this layout.
pub const CALLER_DEPTH: usize = 3;

/// Splits rendered backtrace text into one description per frame.
///
/// Lines of the form `N: symbol` (or an unnumbered symbol line for inlined
/// frames) open a frame; a following `at location` line is appended to it.
/// Blank lines are ignored.
///
/// # Examples
///
/// ```
/// use logging::parse_frames;
///
/// let raw = "   0: app::sub_temp\n             at ./src/main.rs:4:5\n   1: app::main\n";
/// assert_eq!(
///     parse_frames(raw),
///     vec!["app::sub_temp at ./src/main.rs:4:5", "app::main"],
/// );
/// ```
#[must_use]
pub fn parse_frames(raw: &str) -> Vec<String> {
    let mut frames: Vec<String> = Vec::new();
    for line in raw.lines().map(str::trim) {
        if line.is_empty() {
            continue;
        }
        if let Some(location) = line.strip_prefix("at ") {
            if let Some(frame) = frames.last_mut() {
                frame.push_str(" at ");
                frame.push_str(location.trim());
            }
            continue;
        }
        frames.push(strip_index(line).to_owned());
    }
    frames
}

fn strip_index(line: &str) -> &str {
    match line.split_once(':') {
        Some((index, rest)) if !index.is_empty() && index.bytes().all(|b| b.is_ascii_digit()) => {
            rest.trim_start()
        }
        _ => line,
    }
}

/// Captures the current call stack.
///
/// Capture is forced regardless of `RUST_BACKTRACE`. Frames belonging to the
/// backtrace machinery are dropped so that index 0 is this function, index 1
/// its caller, and so on. When symbols are unavailable the full list is
/// returned unchanged.
#[inline(never)]
#[must_use]
pub fn capture_frames() -> Vec<String> {
    let frames = parse_frames(&Backtrace::force_capture().to_string());
    match frames.iter().position(|frame| frame.contains(CAPTURE_MARKER)) {
        Some(start) => frames.into_iter().skip(start).collect(),
        None => frames,
    }
}

/// Index of the first frame after the logger's own frames.
///
/// Optimized builds may turn the per-level method's call into a tail call,
/// which removes its frame, so the caller is located by name rather than
/// assumed at [`CALLER_DEPTH`]. Without symbols the reference depth is
/// returned.
///
/// # Examples
///
/// ```
/// use logging::{caller_index, parse_frames};
///
/// let frames = parse_frames(
///     "   0: logging::stack::capture_frames\n   1: logging::logger::Logger<M>::dispatch\n   2: app::sub_temp\n",
/// );
/// assert_eq!(caller_index(&frames), 2);
/// ```
#[must_use]
pub fn caller_index(frames: &[String]) -> usize {
    match frames.first() {
        Some(first) if first.contains(CAPTURE_MARKER) => {
            1 + frames[1..]
                .iter()
                .take_while(|frame| frame.contains(LOGGER_MARKER))
                .count()
        }
        _ => CALLER_DEPTH,
    }
}

/// Moves a bound expressed against [`CALLER_DEPTH`] onto a capture whose
/// caller sits at `caller`.
#[must_use]
pub const fn rebase_bound(bound: usize, caller: usize) -> usize {
    if caller >= CALLER_DEPTH {
        bound.saturating_add(caller - CALLER_DEPTH)
    } else {
        bound.saturating_sub(CALLER_DEPTH - caller)
    }
}

/// Returns `frames[l_bound..r_bound]`, clamped to the available frames.
///
/// Out-of-range or inverted bounds yield a shorter (possibly empty) slice
/// rather than panicking.
#[must_use]
pub fn slice_frames(frames: &[String], l_bound: usize, r_bound: usize) -> Vec<String> {
    let end = r_bound.min(frames.len());
    let start = l_bound.min(end);
    frames[start..end].to_vec()
}
