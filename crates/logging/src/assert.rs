//! crates/logging/src/assert.rs
//! Assertion primitive used to enforce structural preconditions.

use thiserror::Error;

/// A violated precondition.
///
/// The rendered form always starts with `AssertionError` so callers that only
/// see the message text can still identify the failure class.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
#[error("AssertionError: {message}")]
pub struct AssertionError {
    message: String,
}

impl AssertionError {
    /// Creates an error carrying `message`.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The precondition that was violated.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Fails with an [`AssertionError`] carrying `message` when `condition` is false.
///
/// # Examples
///
/// ```
/// use logging::assert;
///
/// assert(true, "never raised").unwrap();
/// let err = assert(false, "develop must be an array").unwrap_err();
/// assert_eq!(err.to_string(), "AssertionError: develop must be an array");
/// ```
pub fn assert(condition: bool, message: impl Into<String>) -> Result<(), AssertionError> {
    if condition {
        Ok(())
    } else {
        Err(AssertionError::new(message))
    }
}

/// Like [`assert`], but builds the message only on failure.
pub fn assert_with<F, S>(condition: bool, message: F) -> Result<(), AssertionError>
where
    F: FnOnce() -> S,
    S: Into<String>,
{
    if condition {
        Ok(())
    } else {
        Err(AssertionError::new(message()))
    }
}
