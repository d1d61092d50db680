//! crates/logging/src/logger.rs
//! Per-module logger bound to a shared [`LoggerContext`].

use std::cell::{Ref, RefCell};
use std::fmt;
use std::hash::Hash;

use crate::context::{AllowanceControl, LoggerContext, SharedAllowance};
use crate::level::Level;
use crate::module::AllowedModule;
use crate::record::{LogOption, LogRecord};
use crate::stack;

/// Capability set of a logger instance: one method per level plus the
/// generic [`log`](Self::log).
///
/// Every method accepts any sequence of displayable message parts. A call
/// whose module/level pair is disallowed is a silent no-op.
pub trait LoggerMethods {
    /// Logs at [`Level::Info`].
    fn log<I>(&self, message: I, option: LogOption)
    where
        I: IntoIterator,
        I::Item: fmt::Display;

    /// Logs at [`Level::Trace`].
    fn trace<I>(&self, message: I, option: LogOption)
    where
        I: IntoIterator,
        I::Item: fmt::Display;

    /// Logs at [`Level::Debug`].
    fn debug<I>(&self, message: I, option: LogOption)
    where
        I: IntoIterator,
        I::Item: fmt::Display;

    /// Logs at [`Level::Info`].
    fn info<I>(&self, message: I, option: LogOption)
    where
        I: IntoIterator,
        I::Item: fmt::Display;

    /// Logs at [`Level::Warn`].
    fn warn<I>(&self, message: I, option: LogOption)
    where
        I: IntoIterator,
        I::Item: fmt::Display;

    /// Logs at [`Level::Current`].
    fn current<I>(&self, message: I, option: LogOption)
    where
        I: IntoIterator,
        I::Item: fmt::Display;

    /// Logs at [`Level::Error`].
    fn error<I>(&self, message: I, option: LogOption)
    where
        I: IntoIterator,
        I::Item: fmt::Display;

    /// Logs at [`Level::Fatal`].
    fn fatal<I>(&self, message: I, option: LogOption)
    where
        I: IntoIterator,
        I::Item: fmt::Display;
}

/// Logger bound to one module.
///
/// Construction never touches the registry; every call is checked against
/// whatever the shared registry holds for the bound module's name at that
/// moment. The last emitted [`LogRecord`] is retained for inspection.
///
/// # Examples
///
/// ```
/// use logging::{
///     AllowanceControl, AllowedModule, Level, LogOption, Logger, LoggerConfig, LoggerContext,
///     LoggerMethods, MemorySink,
/// };
///
/// let sink = MemorySink::new();
/// let ctx = LoggerContext::with_sink(
///     LoggerConfig { colorize: false, ..LoggerConfig::default() },
///     sink.clone(),
/// );
/// ctx.set_logger_allowance(vec![AllowedModule::disallow_up_to("Hobbits", Level::Info)])
///     .unwrap();
///
/// let log = Logger::for_module(&ctx, "Hobbits");
/// log.debug(["second breakfast"], LogOption::default());
/// assert!(log.prev_log().is_none());
///
/// log.current(["elevenses"], LogOption::new().stack_number(0));
/// assert_eq!(log.prev_log().unwrap().module_name, "Hobbits");
/// assert_eq!(sink.lines(), vec!["[Hobbits] current elevenses"]);
/// ```
pub struct Logger<M> {
    ctx: LoggerContext<M>,
    module: AllowedModule<M>,
    prev_log: RefCell<Option<LogRecord>>,
}

impl<M> Logger<M>
where
    M: Clone + Eq + Hash + fmt::Display + 'static,
{
    /// Binds `module` to the services of `ctx`.
    pub fn new(ctx: &LoggerContext<M>, module: AllowedModule<M>) -> Self {
        Self {
            ctx: ctx.clone(),
            module,
            prev_log: RefCell::new(None),
        }
    }

    /// Binds the module named `name`, reusing its registered descriptor when
    /// there is one.
    pub fn for_module(ctx: &LoggerContext<M>, name: M) -> Self {
        let registered = ctx.allowance.borrow().get(&name).cloned();
        Self::new(ctx, registered.unwrap_or_else(|| AllowedModule::allow_all(name)))
    }

    /// The bound module descriptor.
    pub const fn module(&self) -> &AllowedModule<M> {
        &self.module
    }

    /// The shared registry cell, identical for every logger of a context.
    pub const fn allowance(&self) -> &SharedAllowance<M> {
        self.ctx.allowance()
    }

    /// Copy of the last emitted record, if any.
    pub fn prev_log(&self) -> Option<LogRecord> {
        self.prev_log.borrow().clone()
    }

    /// Borrows the last emitted record without copying it.
    pub fn prev_log_ref(&self) -> Ref<'_, Option<LogRecord>> {
        self.prev_log.borrow()
    }

    /// Forgets the last emitted record.
    pub fn clear_prev_log(&self) {
        self.prev_log.borrow_mut().take();
    }

    /// Checks, captures, renders, writes and retains one call.
    ///
    /// The level rewrite of the bound descriptor wins; without one the
    /// registered descriptor's rewrite applies. Allowance is always decided by
    /// the registered descriptor. Handlers run on cloned descriptors, so they
    /// may touch the registry.
    #[inline(never)]
    fn dispatch<I>(&self, level: Level, message: I, option: LogOption)
    where
        I: IntoIterator,
        I::Item: fmt::Display,
    {
        let name = self.module.module_name();
        let registered = self.ctx.allowance.borrow().get(name).cloned();
        let rewrite = if self.module.has_log_level_handler() {
            Some(&self.module)
        } else {
            registered.as_ref()
        };
        let level = rewrite.map_or(level, |module| module.resolve_level(level));
        if registered
            .as_ref()
            .is_none_or(|module| module.is_disallowed(level))
        {
            #[cfg(feature = "tracing")]
            tracing::trace!(target: "allowlog", module = %name, level = %level, "suppressed");
            return;
        }

        let all_stacks = stack::capture_frames();
        let caller = stack::caller_index(&all_stacks);
        let config = self.ctx.config();
        let (trace_at, end) = option.bounds(config.default_trace_at, config.default_stack_number);
        let l_bound = stack::rebase_bound(trace_at, caller);
        let r_bound = stack::rebase_bound(end, caller);
        let stacks_on_display = stack::slice_frames(&all_stacks, l_bound, r_bound);

        let record = LogRecord {
            all_stacks,
            stacks_on_display,
            l_bound,
            r_bound,
            module_name: name.to_string(),
            message: message.into_iter().map(|part| part.to_string()).collect(),
            level,
        };
        self.ctx.emit(&record);
        *self.prev_log.borrow_mut() = Some(record);
    }
}

impl<M> LoggerMethods for Logger<M>
where
    M: Clone + Eq + Hash + fmt::Display + 'static,
{
    #[inline(never)]
    fn log<I>(&self, message: I, option: LogOption)
    where
        I: IntoIterator,
        I::Item: fmt::Display,
    {
        self.dispatch(Level::Info, message, option);
    }

    #[inline(never)]
    fn trace<I>(&self, message: I, option: LogOption)
    where
        I: IntoIterator,
        I::Item: fmt::Display,
    {
        self.dispatch(Level::Trace, message, option);
    }

    #[inline(never)]
    fn debug<I>(&self, message: I, option: LogOption)
    where
        I: IntoIterator,
        I::Item: fmt::Display,
    {
        self.dispatch(Level::Debug, message, option);
    }

    #[inline(never)]
    fn info<I>(&self, message: I, option: LogOption)
    where
        I: IntoIterator,
        I::Item: fmt::Display,
    {
        self.dispatch(Level::Info, message, option);
    }

    #[inline(never)]
    fn warn<I>(&self, message: I, option: LogOption)
    where
        I: IntoIterator,
        I::Item: fmt::Display,
    {
        self.dispatch(Level::Warn, message, option);
    }

    #[inline(never)]
    fn current<I>(&self, message: I, option: LogOption)
    where
        I: IntoIterator,
        I::Item: fmt::Display,
    {
        self.dispatch(Level::Current, message, option);
    }

    #[inline(never)]
    fn error<I>(&self, message: I, option: LogOption)
    where
        I: IntoIterator,
        I::Item: fmt::Display,
    {
        self.dispatch(Level::Error, message, option);
    }

    #[inline(never)]
    fn fatal<I>(&self, message: I, option: LogOption)
    where
        I: IntoIterator,
        I::Item: fmt::Display,
    {
        self.dispatch(Level::Fatal, message, option);
    }
}

impl<M> AllowanceControl<M> for Logger<M>
where
    M: Clone + Eq + Hash + fmt::Display + 'static,
{
    fn context(&self) -> &LoggerContext<M> {
        &self.ctx
    }
}

impl<M: fmt::Debug> fmt::Debug for Logger<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("module", &self.module)
            .field("prev_log", &self.prev_log.borrow().is_some())
            .finish_non_exhaustive()
    }
}
