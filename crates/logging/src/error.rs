//! crates/logging/src/error.rs
//! Error model for registry and configuration operations.

use thiserror::Error;

use crate::assert::AssertionError;

/// Result type used by fallible logger operations.
pub type LoggerResult<T> = Result<T, LoggerError>;

/// Failure raised by registry or configuration operations.
///
/// Suppressed output is never an error: a disallowed module/level pair is a
/// silent no-op.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum LoggerError {
    /// A structural precondition on the input failed.
    #[error(transparent)]
    Assertion(#[from] AssertionError),

    /// The same module name appeared twice in one registration call while the
    /// duplicate policy rejects collisions.
    #[error("module `{0}` registered more than once")]
    DuplicateModule(String),

    /// A configuration document named a module the host does not know.
    #[error("unknown module `{0}`")]
    UnknownModule(String),

    /// A configuration value could not be read.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl LoggerError {
    /// Builds a [`LoggerError::DuplicateModule`].
    pub fn duplicate(name: impl Into<String>) -> Self {
        Self::DuplicateModule(name.into())
    }

    /// Builds a [`LoggerError::UnknownModule`].
    pub fn unknown_module(name: impl Into<String>) -> Self {
        Self::UnknownModule(name.into())
    }

    /// Builds a [`LoggerError::Config`].
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Reports whether the error came from a failed assertion.
    #[must_use]
    pub const fn is_assertion(&self) -> bool {
        matches!(self, Self::Assertion(_))
    }
}

impl From<serde_json::Error> for LoggerError {
    fn from(err: serde_json::Error) -> Self {
        Self::Config(err.to_string())
    }
}
