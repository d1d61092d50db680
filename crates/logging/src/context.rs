//! crates/logging/src/context.rs
//! Services shared by every logger: allowance registry, color table,
//! environment and output sink.

use std::cell::RefCell;
use std::fmt;
use std::hash::Hash;
use std::rc::{Rc, Weak};

use logging_sink::{ConsoleSink, LogSink};
use serde_json::Value;

use crate::colors::{ColorTable, Decorator};
use crate::config::{AllowanceDocument, LoggerConfig};
use crate::env::{CurrentEnv, Env, SubscriptionId};
use crate::error::LoggerResult;
use crate::level::Level;
use crate::module::AllowedModule;
use crate::record::LogRecord;
use crate::registry::{AllowanceByEnv, AllowanceMode, AllowanceRegistry, ModuleMap, to_allowed_logger};

/// Registry cell shared by a context and its loggers.
pub type SharedAllowance<M> = Rc<RefCell<AllowanceRegistry<M>>>;

type EnvGetter = Rc<dyn Fn() -> Env>;

/// Explicitly constructed home of the state every [`Logger`](crate::Logger)
/// shares.
///
/// Cloning is cheap; clones refer to the same registry, color table,
/// environment and sink. The registry cell keeps its identity for the whole
/// lifetime of the context: registration calls replace its contents, never
/// the cell.
///
/// When the registry was populated per environment, a change of the
/// [`CurrentEnv`] re-resolves it automatically.
pub struct LoggerContext<M> {
    pub(crate) allowance: SharedAllowance<M>,
    pub(crate) colors: Rc<RefCell<ColorTable>>,
    pub(crate) sink: Rc<RefCell<Box<dyn LogSink>>>,
    current_env: CurrentEnv,
    env_getter: Rc<RefCell<Option<EnvGetter>>>,
    subscription: Rc<EnvSubscription>,
    config: LoggerConfig,
}

/// Environment listener owned by a context and its clones; dropping the last
/// handle unsubscribes.
struct EnvSubscription {
    current_env: CurrentEnv,
    id: SubscriptionId,
}

impl Drop for EnvSubscription {
    fn drop(&mut self) {
        self.current_env.unsubscribe(self.id);
    }
}

impl<M> LoggerContext<M>
where
    M: Clone + Eq + Hash + fmt::Display + 'static,
{
    /// Creates a context writing to `sink` and observing `current_env`.
    pub fn new<S>(config: LoggerConfig, current_env: CurrentEnv, sink: S) -> Self
    where
        S: LogSink + 'static,
    {
        let allowance = Rc::new(RefCell::new(AllowanceRegistry::new(config.duplicate_policy)));
        let colors = if config.colorize {
            ColorTable::default()
        } else {
            ColorTable::plain()
        };
        let env_getter: Rc<RefCell<Option<EnvGetter>>> = Rc::default();
        let id = current_env.subscribe(follow_env(
            Rc::downgrade(&allowance),
            Rc::downgrade(&env_getter),
        ));
        let subscription = Rc::new(EnvSubscription {
            current_env: current_env.clone(),
            id,
        });

        Self {
            allowance,
            colors: Rc::new(RefCell::new(colors)),
            sink: Rc::new(RefCell::new(Box::new(sink))),
            current_env,
            env_getter,
            subscription,
            config,
        }
    }

    /// Creates a context writing to `sink`, with the environment read from
    /// the process.
    pub fn with_sink<S>(config: LoggerConfig, sink: S) -> Self
    where
        S: LogSink + 'static,
    {
        Self::new(config, CurrentEnv::from_process_env(), sink)
    }

    /// Context configured entirely from process variables, writing to stdout.
    pub fn from_env() -> LoggerResult<Self> {
        Ok(Self::with_sink(LoggerConfig::from_env()?, ConsoleSink::stdout()))
    }

    /// The shared registry cell.
    pub const fn allowance(&self) -> &SharedAllowance<M> {
        &self.allowance
    }

    /// The observable environment this context follows.
    pub const fn env(&self) -> &CurrentEnv {
        &self.current_env
    }

    /// Active configuration.
    pub const fn config(&self) -> &LoggerConfig {
        &self.config
    }

    /// Environment used for per-environment resolution: the host getter when
    /// one is installed, the observable value otherwise.
    pub fn current_env(&self) -> Env {
        read_env(&self.env_getter, &self.current_env)
    }

    /// Replaces the output sink of every logger of this context.
    pub fn set_sink<S>(&self, sink: S)
    where
        S: LogSink + 'static,
    {
        *self.sink.borrow_mut() = Box::new(sink);
    }

    /// Whether the registry follows the environment.
    pub fn mode(&self) -> AllowanceMode {
        self.allowance.borrow().mode()
    }

    /// Renders `record` and writes it to the sink. Write failures are
    /// dropped, as are writes issued while the sink is already writing.
    pub(crate) fn emit(&self, record: &LogRecord) {
        let colors = self.colors.borrow().clone();
        let lines = render(&colors, record);
        let Ok(mut sink) = self.sink.try_borrow_mut() else {
            return;
        };
        for line in &lines {
            if sink.write_line(line).is_err() {
                break;
            }
        }
        let _ = sink.flush();
    }
}

impl<M> Default for LoggerContext<M>
where
    M: Clone + Eq + Hash + fmt::Display + 'static,
{
    fn default() -> Self {
        Self::with_sink(LoggerConfig::default(), ConsoleSink::stdout())
    }
}

impl<M> Clone for LoggerContext<M> {
    fn clone(&self) -> Self {
        Self {
            allowance: Rc::clone(&self.allowance),
            colors: Rc::clone(&self.colors),
            sink: Rc::clone(&self.sink),
            current_env: self.current_env.clone(),
            env_getter: Rc::clone(&self.env_getter),
            subscription: Rc::clone(&self.subscription),
            config: self.config,
        }
    }
}

impl<M> fmt::Debug for LoggerContext<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoggerContext")
            .field("current_env", &self.current_env)
            .field("env_getter", &self.env_getter.borrow().is_some())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

fn read_env(getter: &RefCell<Option<EnvGetter>>, current_env: &CurrentEnv) -> Env {
    let getter = getter.borrow().clone();
    getter.map_or_else(|| current_env.get(), |getter| getter())
}

fn follow_env<M>(
    allowance: Weak<RefCell<AllowanceRegistry<M>>>,
    env_getter: Weak<RefCell<Option<EnvGetter>>>,
) -> impl Fn(Env) + 'static
where
    M: Clone + Eq + Hash + fmt::Display + 'static,
{
    move |changed| {
        let Some(allowance) = allowance.upgrade() else {
            return;
        };
        let env = env_getter
            .upgrade()
            .and_then(|getter| getter.borrow().clone())
            .map_or(changed, |getter| getter());
        if allowance.borrow_mut().apply_env(env) {
            #[cfg(feature = "tracing")]
            tracing::debug!(target: "allowlog", env = %env, "allowance re-resolved for environment");
        }
    }
}

/// Formats `record` into output lines: a header `[module] level message`
/// followed by one indented line per displayed frame.
pub(crate) fn render(colors: &ColorTable, record: &LogRecord) -> Vec<String> {
    let level = record.level;
    let mut lines = Vec::with_capacity(1 + record.stacks_on_display.len());
    lines.push(format!(
        "{} {} {}",
        colors.decorate(level, &format!("[{}]", record.module_name)),
        colors.decorate(level, level.as_str()),
        colors.decorate(level, &record.joined_message()),
    ));
    lines.extend(
        record
            .stacks_on_display
            .iter()
            .map(|frame| format!("    at {frame}")),
    );
    lines
}

/// Registry-level operations, available on a [`LoggerContext`] and on every
/// [`Logger`](crate::Logger) built from it.
///
/// # Examples
///
/// ```
/// use logging::{AllowanceControl, AllowedModule, Level, LoggerConfig, LoggerContext, MemorySink};
///
/// let ctx = LoggerContext::with_sink(LoggerConfig::default(), MemorySink::new());
/// ctx.set_logger_allowance(vec![AllowedModule::disallow_up_to("Hobbits", Level::Info)])
///     .unwrap();
///
/// let hobbits = AllowedModule::allow_all("Hobbits");
/// assert!(ctx.has_module(&hobbits));
/// assert!(ctx.is_allowed(Some(&hobbits), Some(Level::Current)));
/// assert!(ctx.is_disallowed(Some(&hobbits), Some(Level::Debug)));
/// ```
pub trait AllowanceControl<M>
where
    M: Clone + Eq + Hash + fmt::Display + 'static,
{
    /// The context the operations act on.
    fn context(&self) -> &LoggerContext<M>;

    /// Redirects environment reads to `getter`.
    ///
    /// A registry populated per environment is re-resolved immediately.
    fn set_current_env<F>(&self, getter: F)
    where
        F: Fn() -> Env + 'static,
    {
        let ctx = self.context();
        *ctx.env_getter.borrow_mut() = Some(Rc::new(getter));
        let env = ctx.current_env();
        ctx.allowance.borrow_mut().apply_env(env);
    }

    /// Keys `modules` by name with the context's duplicate policy, without
    /// touching the registry.
    fn to_allowed_logger(&self, modules: Vec<AllowedModule<M>>) -> LoggerResult<ModuleMap<M>> {
        to_allowed_logger(modules, self.context().allowance.borrow().policy())
    }

    /// True iff `module` is given, registered, and its registered handler
    /// does not disallow `level`.
    fn is_allowed(&self, module: Option<&AllowedModule<M>>, level: Option<Level>) -> bool {
        let Some(module) = module else {
            return false;
        };
        let registered = self.context().allowance.borrow().get(module.module_name()).cloned();
        registered.is_some_and(|registered| level.is_none_or(|level| !registered.is_disallowed(level)))
    }

    /// Negation of [`is_allowed`](Self::is_allowed).
    fn is_disallowed(&self, module: Option<&AllowedModule<M>>, level: Option<Level>) -> bool {
        !self.is_allowed(module, level)
    }

    /// Merges per-level decorator overrides into the shared color table.
    fn set_level_colors<I>(&self, overrides: I)
    where
        I: IntoIterator<Item = (Level, Decorator)>,
    {
        self.context().colors.borrow_mut().set_level_colors(overrides);
    }

    /// Replaces the registry with `modules`, ignoring the environment.
    fn set_logger_allowance(&self, modules: Vec<AllowedModule<M>>) -> LoggerResult<ModuleMap<M>> {
        self.context().allowance.borrow_mut().set_allowance(modules)
    }

    /// Installs the list matching the current environment and keeps
    /// following environment changes.
    fn set_logger_allowance_by_env(&self, option: AllowanceByEnv<M>) -> LoggerResult<ModuleMap<M>> {
        let ctx = self.context();
        let env = ctx.current_env();
        ctx.allowance.borrow_mut().set_allowance_by_env(option, env)
    }

    /// Validates a per-environment JSON value, resolves module names with
    /// `resolve`, and installs it like
    /// [`set_logger_allowance_by_env`](Self::set_logger_allowance_by_env).
    ///
    /// Shape violations fail with an `AssertionError` and leave the registry
    /// untouched.
    fn set_logger_allowance_by_env_value<F>(&self, value: &Value, resolve: F) -> LoggerResult<ModuleMap<M>>
    where
        F: FnMut(&str) -> Option<M>,
    {
        let option = AllowanceDocument::from_value(value)?.into_allowance_by_env(resolve)?;
        self.set_logger_allowance_by_env(option)
    }

    /// JSON-text form of
    /// [`set_logger_allowance_by_env_value`](Self::set_logger_allowance_by_env_value).
    fn set_logger_allowance_by_env_json<F>(&self, text: &str, resolve: F) -> LoggerResult<ModuleMap<M>>
    where
        F: FnMut(&str) -> Option<M>,
    {
        let option = AllowanceDocument::from_json(text)?.into_allowance_by_env(resolve)?;
        self.set_logger_allowance_by_env(option)
    }

    /// Reports whether a module with the same name is registered.
    fn has_module(&self, module: &AllowedModule<M>) -> bool {
        self.context().allowance.borrow().has_module(module.module_name())
    }

    /// Empties the registry.
    fn clear_modules(&self) {
        self.context().allowance.borrow_mut().clear();
    }
}

impl<M> AllowanceControl<M> for LoggerContext<M>
where
    M: Clone + Eq + Hash + fmt::Display + 'static,
{
    fn context(&self) -> &LoggerContext<M> {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::DuplicatePolicy;
    use logging_sink::MemorySink;
    use serde_json::json;

    fn plain_config() -> LoggerConfig {
        LoggerConfig {
            colorize: false,
            ..LoggerConfig::default()
        }
    }

    fn context(env: Env) -> LoggerContext<&'static str> {
        LoggerContext::new(plain_config(), CurrentEnv::new(env), MemorySink::new())
    }

    fn resolve(name: &str) -> Option<&'static str> {
        ["Test", "Hobbits"].into_iter().find(|known| *known == name)
    }

    #[test]
    fn clones_share_the_registry_cell() {
        let ctx = context(Env::Test);
        let clone = ctx.clone();
        ctx.set_logger_allowance(vec![AllowedModule::allow_all("Test")])
            .unwrap();

        assert!(Rc::ptr_eq(ctx.allowance(), clone.allowance()));
        assert!(clone.has_module(&AllowedModule::allow_all("Test")));
    }

    #[test]
    fn registration_keeps_cell_identity() {
        let ctx = context(Env::Test);
        let before = Rc::clone(ctx.allowance());
        ctx.set_logger_allowance(vec![AllowedModule::allow_all("Test")])
            .unwrap();
        ctx.clear_modules();
        assert!(Rc::ptr_eq(&before, ctx.allowance()));
    }

    #[test]
    fn is_allowed_uses_registered_descriptor() {
        let ctx = context(Env::Test);
        ctx.set_logger_allowance(vec![AllowedModule::disallow_up_to("Hobbits", Level::Info)])
            .unwrap();

        let unrestricted = AllowedModule::allow_all("Hobbits");
        assert!(!ctx.is_allowed(Some(&unrestricted), Some(Level::Trace)));
        assert!(ctx.is_allowed(Some(&unrestricted), Some(Level::Current)));
        assert!(!ctx.is_allowed(None, Some(Level::Current)));
        assert!(ctx.is_disallowed(Some(&AllowedModule::allow_all("Test")), None));
    }

    #[test]
    fn by_env_follows_environment_changes() {
        let ctx = context(Env::Test);
        ctx.set_logger_allowance_by_env(AllowanceByEnv::new(
            vec![AllowedModule::allow_all("Hobbits")],
            vec![AllowedModule::allow_all("Test")],
        ))
        .unwrap();
        let hobbits = AllowedModule::allow_all("Hobbits");
        assert!(!ctx.has_module(&hobbits));
        assert_eq!(ctx.mode(), AllowanceMode::ByEnv);

        ctx.env().set(Env::Develop);
        assert!(ctx.has_module(&hobbits));

        ctx.env().set(Env::Release);
        assert!(ctx.allowance().borrow().is_empty());
    }

    #[test]
    fn env_getter_overrides_observable() {
        let ctx = context(Env::Test);
        ctx.set_logger_allowance_by_env(AllowanceByEnv::new(
            vec![AllowedModule::allow_all("Hobbits")],
            vec![AllowedModule::allow_all("Test")],
        ))
        .unwrap();

        ctx.set_current_env(|| Env::Develop);
        assert_eq!(ctx.current_env(), Env::Develop);
        assert!(ctx.has_module(&AllowedModule::allow_all("Hobbits")));

        ctx.env().set(Env::Production);
        assert!(ctx.has_module(&AllowedModule::allow_all("Hobbits")));
    }

    #[test]
    fn by_env_value_rejects_object_lists() {
        let ctx = context(Env::Test);
        ctx.set_logger_allowance(vec![AllowedModule::allow_all("Test")])
            .unwrap();

        let err = ctx
            .set_logger_allowance_by_env_value(&json!({ "test": {}, "develop": {} }), resolve)
            .unwrap_err();

        assert!(err.to_string().contains("AssertionError"));
        assert!(ctx.has_module(&AllowedModule::allow_all("Test")));
        assert_eq!(ctx.mode(), AllowanceMode::IgnoreEnv);
    }

    #[test]
    fn by_env_json_installs_current_env_list() {
        let ctx = context(Env::Test);
        let mapping = ctx
            .set_logger_allowance_by_env_json(
                r#"{ "develop": [], "test": [{ "module": "Hobbits", "disallow_up_to": "info" }] }"#,
                resolve,
            )
            .unwrap();

        assert_eq!(mapping.len(), 1);
        let hobbits = AllowedModule::allow_all("Hobbits");
        assert!(ctx.is_allowed(Some(&hobbits), Some(Level::Warn)));
        assert!(ctx.is_disallowed(Some(&hobbits), Some(Level::Info)));
    }

    #[test]
    fn to_allowed_logger_does_not_install() {
        let ctx = LoggerContext::new(
            LoggerConfig {
                duplicate_policy: DuplicatePolicy::Reject,
                ..plain_config()
            },
            CurrentEnv::new(Env::Test),
            MemorySink::new(),
        );
        let mapping = ctx
            .to_allowed_logger(vec![AllowedModule::allow_all("Test")])
            .unwrap();
        assert!(mapping.contains_key("Test"));
        assert!(ctx.allowance().borrow().is_empty());

        assert!(ctx
            .to_allowed_logger(vec![AllowedModule::allow_all("Test"), AllowedModule::allow_all("Test")])
            .is_err());
    }

    #[test]
    fn dropping_last_context_unsubscribes() {
        let env = CurrentEnv::new(Env::Test);
        let ctx: LoggerContext<&str> = LoggerContext::new(plain_config(), env.clone(), MemorySink::new());
        let clone = ctx.clone();
        assert_eq!(env.listener_count(), 1);

        drop(clone);
        assert_eq!(env.listener_count(), 1);
        drop(ctx);
        assert_eq!(env.listener_count(), 0);
    }

    #[test]
    fn held_registry_does_not_keep_listener() {
        let env = CurrentEnv::new(Env::Test);
        let ctx: LoggerContext<&str> = LoggerContext::new(plain_config(), env.clone(), MemorySink::new());
        let held = Rc::clone(ctx.allowance());

        drop(ctx);
        assert_eq!(env.listener_count(), 0);
        assert!(env.set(Env::Develop));
        assert!(held.borrow().is_empty());
    }

    #[test]
    fn is_allowed_handler_may_mutate_registry() {
        let ctx = context(Env::Test);
        let handle = ctx.clone();
        ctx.set_logger_allowance(vec![AllowedModule::new("Test", move |_| {
            handle.clear_modules();
            true
        })])
        .unwrap();

        let test = AllowedModule::allow_all("Test");
        assert!(!ctx.is_allowed(Some(&test), Some(Level::Info)));
        assert!(!ctx.has_module(&test));
    }

    #[test]
    fn render_places_frames_below_header() {
        let record = LogRecord {
            all_stacks: Vec::new(),
            stacks_on_display: vec!["app::sub_temp".into()],
            l_bound: 3,
            r_bound: 4,
            module_name: "Test".into(),
            message: vec!["hello".into(), "world".into()],
            level: Level::Warn,
        };
        let lines = render(&ColorTable::plain(), &record);
        assert_eq!(lines, vec!["[Test] warn hello world", "    at app::sub_temp"]);
    }

    #[test]
    fn set_level_colors_affects_rendering() {
        let ctx = context(Env::Test);
        ctx.set_level_colors([(Level::Error, crate::colors::decorator(|t| t.to_uppercase()))]);
        let record = LogRecord {
            all_stacks: Vec::new(),
            stacks_on_display: Vec::new(),
            l_bound: 3,
            r_bound: 6,
            module_name: "Test".into(),
            message: vec!["boom".into()],
            level: Level::Error,
        };
        let lines = render(&ctx.colors.borrow(), &record);
        assert_eq!(lines, vec!["[TEST] ERROR BOOM"]);
    }
}
