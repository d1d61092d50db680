//! crates/logging/src/module.rs
//! Module descriptors registered with the allowance registry.

use std::fmt;
use std::rc::Rc;

use crate::level::Level;

/// Predicate deciding whether output at a level is suppressed.
pub type DisallowedHandler = Rc<dyn Fn(Level) -> bool>;

/// Rewrites the level of a log call before the allowance check.
pub type LogLevelHandler = Rc<dyn Fn(Level) -> Level>;

/// Allowance policy of one named module.
///
/// Identity is the module name: two descriptors with the same name refer to
/// the same module regardless of their handlers. Cloning is cheap and clones
/// share their handlers.
///
/// # Examples
///
/// ```
/// use logging::{AllowedModule, Level};
///
/// let hobbits = AllowedModule::new("Hobbits", |level| level <= Level::Info);
/// assert!(hobbits.is_disallowed(Level::Debug));
/// assert!(!hobbits.is_disallowed(Level::Current));
/// ```
pub struct AllowedModule<M> {
    module_name: M,
    disallowed_handler: DisallowedHandler,
    log_level_handler: Option<LogLevelHandler>,
}

impl<M> AllowedModule<M> {
    /// Creates a descriptor whose `disallowed_handler` returns `true` for
    /// suppressed levels.
    pub fn new<F>(module_name: M, disallowed_handler: F) -> Self
    where
        F: Fn(Level) -> bool + 'static,
    {
        Self {
            module_name,
            disallowed_handler: Rc::new(disallowed_handler),
            log_level_handler: None,
        }
    }

    /// Descriptor that allows every level.
    pub fn allow_all(module_name: M) -> Self {
        Self::new(module_name, |_| false)
    }

    /// Descriptor that suppresses every level.
    pub fn disallow_all(module_name: M) -> Self {
        Self::new(module_name, |_| true)
    }

    /// Descriptor that suppresses every level up to and including `threshold`.
    pub fn disallow_up_to(module_name: M, threshold: Level) -> Self {
        Self::new(module_name, move |level| level <= threshold)
    }

    /// Attaches a handler that rewrites the level of each call.
    #[must_use]
    pub fn with_log_level_handler<F>(mut self, handler: F) -> Self
    where
        F: Fn(Level) -> Level + 'static,
    {
        self.log_level_handler = Some(Rc::new(handler));
        self
    }

    /// The module identifier.
    pub const fn module_name(&self) -> &M {
        &self.module_name
    }

    /// Evaluates the disallow predicate for `level`.
    pub fn is_disallowed(&self, level: Level) -> bool {
        (self.disallowed_handler)(level)
    }

    /// Applies the level rewrite, if one is attached.
    pub fn resolve_level(&self, level: Level) -> Level {
        self.log_level_handler
            .as_ref()
            .map_or(level, |handler| handler(level))
    }

    /// Reports whether a level rewrite is attached.
    pub const fn has_log_level_handler(&self) -> bool {
        self.log_level_handler.is_some()
    }
}

impl<M: Clone> Clone for AllowedModule<M> {
    fn clone(&self) -> Self {
        Self {
            module_name: self.module_name.clone(),
            disallowed_handler: Rc::clone(&self.disallowed_handler),
            log_level_handler: self.log_level_handler.clone(),
        }
    }
}

impl<M: fmt::Debug> fmt::Debug for AllowedModule<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AllowedModule")
            .field("module_name", &self.module_name)
            .field("log_level_handler", &self.log_level_handler.is_some())
            .finish_non_exhaustive()
    }
}
