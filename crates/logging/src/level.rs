//! crates/logging/src/level.rs
//! Severity levels in declaration order.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Severity of a log call.
///
/// Ordering follows declaration order exactly: `Trace < Debug < Info < Warn <
/// Current < Error < Fatal`. `Current` sits between `Warn` and `Error`, and
/// disallow predicates written as `level <= Level::Info` rely on that.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Level {
    /// Fine-grained tracing output.
    Trace,
    /// Debugging output.
    Debug,
    /// Informational output.
    Info,
    /// Warnings.
    Warn,
    /// Output tied to the work currently in progress.
    Current,
    /// Errors.
    Error,
    /// Unrecoverable errors.
    Fatal,
}

impl Level {
    /// Every level, in declaration order.
    pub const ALL: [Self; 7] = [
        Self::Trace,
        Self::Debug,
        Self::Info,
        Self::Warn,
        Self::Current,
        Self::Error,
        Self::Fatal,
    ];

    /// Position of the level in declaration order.
    #[must_use]
    pub const fn ordinal(self) -> usize {
        self as usize
    }

    /// Returns the level at `ordinal`, if any.
    #[must_use]
    pub const fn from_ordinal(ordinal: usize) -> Option<Self> {
        if ordinal < Self::ALL.len() {
            Some(Self::ALL[ordinal])
        } else {
            None
        }
    }

    /// Lowercase label used in rendered lines and configuration documents.
    ///
    /// # Examples
    ///
    /// ```
    /// use logging::Level;
    ///
    /// assert_eq!(Level::Current.as_str(), "current");
    /// assert_eq!(Level::Fatal.as_str(), "fatal");
    /// ```
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Current => "current",
            Self::Error => "error",
            Self::Fatal => "fatal",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing a [`Level`] from a string fails.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
#[error("unrecognised log level: {input}")]
pub struct ParseLevelError {
    input: String,
}

impl FromStr for Level {
    type Err = ParseLevelError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(input.trim()))
            .ok_or_else(|| ParseLevelError {
                input: input.to_owned(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering_follows_declaration_order() {
        assert!(Level::Trace < Level::Debug);
        assert!(Level::Debug < Level::Info);
        assert!(Level::Info < Level::Warn);
        assert!(Level::Warn < Level::Current);
        assert!(Level::Current < Level::Error);
        assert!(Level::Error < Level::Fatal);
    }

    #[test]
    fn current_is_above_info() {
        assert!(Level::Current > Level::Info);
        assert!(Level::Current > Level::Warn);
    }

    #[test]
    fn ordinal_matches_position_in_all() {
        for (index, level) in Level::ALL.into_iter().enumerate() {
            assert_eq!(level.ordinal(), index);
            assert_eq!(Level::from_ordinal(index), Some(level));
        }
        assert_eq!(Level::from_ordinal(7), None);
    }

    #[test]
    fn parse_accepts_labels_case_insensitively() {
        assert_eq!("info".parse::<Level>(), Ok(Level::Info));
        assert_eq!("CURRENT".parse::<Level>(), Ok(Level::Current));
        assert_eq!(" warn ".parse::<Level>(), Ok(Level::Warn));
    }

    #[test]
    fn parse_rejects_unknown_labels() {
        let err = "verbose".parse::<Level>().unwrap_err();
        assert!(err.to_string().contains("verbose"));
    }

    #[test]
    fn display_matches_as_str() {
        for level in Level::ALL {
            assert_eq!(level.to_string(), level.as_str());
        }
    }

    #[test]
    fn serde_uses_lowercase_labels() {
        let json = serde_json::to_string(&Level::Current).unwrap();
        assert_eq!(json, "\"current\"");
        let decoded: Level = serde_json::from_str("\"fatal\"").unwrap();
        assert_eq!(decoded, Level::Fatal);
    }
}
