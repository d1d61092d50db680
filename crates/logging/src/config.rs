//! crates/logging/src/config.rs
//! Logger configuration and per-environment allowance documents.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::assert::{AssertionError, assert_with};
use crate::env::{Env, EnvTable};
use crate::error::{LoggerError, LoggerResult};
use crate::level::{Level, ParseLevelError};
use crate::module::AllowedModule;
use crate::registry::{AllowanceByEnv, DuplicatePolicy};

/// Environment variable overriding [`LoggerConfig::default_trace_at`].
pub const TRACE_AT_VAR: &str = "ALLOWLOG_TRACE_AT";
/// Environment variable overriding [`LoggerConfig::default_stack_number`].
pub const STACK_NUMBER_VAR: &str = "ALLOWLOG_STACK_NUMBER";
/// Environment variable overriding [`LoggerConfig::colorize`].
pub const COLOR_VAR: &str = "ALLOWLOG_COLOR";
/// Environment variable overriding [`LoggerConfig::duplicate_policy`].
pub const DUPLICATES_VAR: &str = "ALLOWLOG_DUPLICATES";

/// Frames between a public logger method and the capture point.
pub const DEFAULT_TRACE_AT: usize = 3;
/// Frames displayed below each emitted line.
pub const DEFAULT_STACK_NUMBER: usize = 3;

/// Settings shared by every logger of a context.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    /// Trace offset used when a call does not set one.
    pub default_trace_at: usize,
    /// Displayed frame count used when a call does not set one.
    pub default_stack_number: usize,
    /// Whether the default color table decorates output.
    pub colorize: bool,
    /// How registration calls treat repeated module names.
    pub duplicate_policy: DuplicatePolicy,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            default_trace_at: DEFAULT_TRACE_AT,
            default_stack_number: DEFAULT_STACK_NUMBER,
            colorize: true,
            duplicate_policy: DuplicatePolicy::LastWins,
        }
    }
}

impl LoggerConfig {
    /// Defaults overridden by the `ALLOWLOG_*` process variables.
    pub fn from_env() -> LoggerResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each variable.
    pub fn from_lookup<F>(lookup: F) -> LoggerResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        for key in [TRACE_AT_VAR, STACK_NUMBER_VAR, COLOR_VAR, DUPLICATES_VAR] {
            if let Some(value) = lookup(key) {
                config.apply_setting(key, &value)?;
            }
        }
        Ok(config)
    }

    /// Parses a JSON object; missing fields keep their defaults.
    pub fn from_json(text: &str) -> LoggerResult<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Applies one `KEY=value` setting.
    pub fn apply_setting(&mut self, key: &str, value: &str) -> LoggerResult<()> {
        let value = value.trim();
        match key {
            TRACE_AT_VAR => self.default_trace_at = parse_count(key, value)?,
            STACK_NUMBER_VAR => self.default_stack_number = parse_count(key, value)?,
            COLOR_VAR => self.colorize = parse_switch(key, value)?,
            DUPLICATES_VAR => self.duplicate_policy = parse_policy(key, value)?,
            _ => return Err(LoggerError::config(format!("unknown setting: {key}"))),
        }
        Ok(())
    }
}

fn parse_count(key: &str, value: &str) -> LoggerResult<usize> {
    value
        .parse()
        .map_err(|_| LoggerError::config(format!("{key}: expected a frame count, got `{value}`")))
}

fn parse_switch(key: &str, value: &str) -> LoggerResult<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" | "always" => Ok(true),
        "0" | "false" | "no" | "off" | "never" => Ok(false),
        _ => Err(LoggerError::config(format!(
            "{key}: expected on/off, got `{value}`"
        ))),
    }
}

fn parse_policy(key: &str, value: &str) -> LoggerResult<DuplicatePolicy> {
    match value.to_ascii_lowercase().replace('-', "_").as_str() {
        "last_wins" => Ok(DuplicatePolicy::LastWins),
        "reject" => Ok(DuplicatePolicy::Reject),
        _ => Err(LoggerError::config(format!(
            "{key}: expected last_wins or reject, got `{value}`"
        ))),
    }
}

/// One module entry of an [`AllowanceDocument`].
///
/// ```json
/// { "module": "Hobbits", "disallow_up_to": "info", "rewrite": { "current": "warn" } }
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ModuleRule {
    /// Module name as written in the document.
    pub module: String,
    /// Levels at or below this one are suppressed.
    pub disallow_up_to: Option<Level>,
    /// Additional suppressed levels.
    pub disallow: Vec<Level>,
    /// Level rewrites applied before the allowance check.
    pub rewrite: BTreeMap<Level, Level>,
}

impl ModuleRule {
    fn from_value(env: Env, index: usize, value: &Value) -> LoggerResult<Self> {
        let entry = value.as_object().ok_or_else(|| {
            AssertionError::new(format!("`{env}` entry {index} must be an object"))
        })?;
        let module = entry
            .get("module")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                AssertionError::new(format!("`{env}` entry {index} needs a string `module`"))
            })?;

        let mut rule = Self {
            module: module.to_owned(),
            ..Self::default()
        };

        if let Some(threshold) = entry.get("disallow_up_to") {
            rule.disallow_up_to = Some(parse_level(threshold)?);
        }
        if let Some(levels) = entry.get("disallow") {
            let levels = levels.as_array().ok_or_else(|| {
                AssertionError::new(format!("`{env}` entry {index}: `disallow` must be an array"))
            })?;
            rule.disallow = levels.iter().map(parse_level).collect::<LoggerResult<_>>()?;
        }
        if let Some(rewrite) = entry.get("rewrite") {
            let rewrite = rewrite.as_object().ok_or_else(|| {
                AssertionError::new(format!("`{env}` entry {index}: `rewrite` must be an object"))
            })?;
            for (from, to) in rewrite {
                rule.rewrite.insert(parse_level_str(from)?, parse_level(to)?);
            }
        }
        Ok(rule)
    }

    /// Builds the descriptor this rule describes for `name`.
    pub fn into_module<M>(self, name: M) -> AllowedModule<M> {
        let Self {
            disallow_up_to,
            disallow,
            rewrite,
            ..
        } = self;
        let module = AllowedModule::new(name, move |level| {
            disallow_up_to.is_some_and(|threshold| level <= threshold) || disallow.contains(&level)
        });
        if rewrite.is_empty() {
            module
        } else {
            module.with_log_level_handler(move |level| rewrite.get(&level).copied().unwrap_or(level))
        }
    }
}

fn parse_level(value: &Value) -> LoggerResult<Level> {
    let name = value
        .as_str()
        .ok_or_else(|| AssertionError::new(format!("level must be a string, got {value}")))?;
    parse_level_str(name)
}

fn parse_level_str(name: &str) -> LoggerResult<Level> {
    name.parse()
        .map_err(|err: ParseLevelError| LoggerError::config(err.to_string()))
}

/// Per-environment module rules read from a JSON document.
///
/// The document is an object keyed by environment name. `develop` and `test`
/// are required; `production` and `release` may be omitted or `null`. Every
/// present list must be an array of rule objects. Shape violations fail with
/// [`LoggerError::Assertion`].
///
/// # Examples
///
/// ```
/// use logging::{AllowanceDocument, Env};
///
/// let doc = AllowanceDocument::from_json(
///     r#"{ "develop": [{ "module": "Hobbits", "disallow_up_to": "info" }], "test": [] }"#,
/// )
/// .unwrap();
/// assert_eq!(doc.rules(Env::Develop).map(<[_]>::len), Some(1));
/// assert!(doc.rules(Env::Production).is_none());
///
/// let err = AllowanceDocument::from_json(r#"{ "test": {}, "develop": {} }"#).unwrap_err();
/// assert!(err.to_string().contains("AssertionError"));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AllowanceDocument {
    lists: EnvTable<Option<Vec<ModuleRule>>>,
}

impl AllowanceDocument {
    /// Parses and validates JSON text.
    pub fn from_json(text: &str) -> LoggerResult<Self> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_value(&value)
    }

    /// Validates an already parsed JSON value.
    pub fn from_value(value: &Value) -> LoggerResult<Self> {
        let object = value
            .as_object()
            .ok_or_else(|| AssertionError::new("allowance option must be an object"))?;

        for required in [Env::Develop, Env::Test] {
            assert_with(object.contains_key(required.as_str()), || {
                format!("`{required}` is required")
            })?;
        }

        let mut lists = EnvTable::from_fn(|_| None);
        for env in Env::ALL {
            let Some(list) = object.get(env.as_str()) else {
                continue;
            };
            if list.is_null() && !matches!(env, Env::Develop | Env::Test) {
                continue;
            }
            let entries = list.as_array().ok_or_else(|| {
                AssertionError::new(format!("`{env}` must be an array of modules"))
            })?;
            let rules = entries
                .iter()
                .enumerate()
                .map(|(index, entry)| ModuleRule::from_value(env, index, entry))
                .collect::<LoggerResult<Vec<_>>>()?;
            lists[env] = Some(rules);
        }
        Ok(Self { lists })
    }

    /// Rules for `env`, or `None` when the document omits it.
    #[must_use]
    pub fn rules(&self, env: Env) -> Option<&[ModuleRule]> {
        self.lists[env].as_deref()
    }

    /// Resolves every module name through `resolve` and builds the typed
    /// per-environment lists.
    ///
    /// Fails with [`LoggerError::UnknownModule`] for a name `resolve`
    /// rejects.
    pub fn into_allowance_by_env<M, F>(self, mut resolve: F) -> LoggerResult<AllowanceByEnv<M>>
    where
        F: FnMut(&str) -> Option<M>,
    {
        let mut lists = self.lists;
        let mut typed = EnvTable::from_fn(|_| None);
        for env in Env::ALL {
            let Some(rules) = lists.replace(env, None) else {
                continue;
            };
            let modules = rules
                .into_iter()
                .map(|rule| {
                    let name = resolve(&rule.module)
                        .ok_or_else(|| LoggerError::unknown_module(&rule.module))?;
                    Ok::<_, LoggerError>(rule.into_module(name))
                })
                .collect::<LoggerResult<Vec<_>>>()?;
            typed[env] = Some(modules);
        }

        let mut option = AllowanceByEnv::new(
            typed.replace(Env::Develop, None).unwrap_or_default(),
            typed.replace(Env::Test, None).unwrap_or_default(),
        );
        option.production = typed.replace(Env::Production, None);
        option.release = typed.replace(Env::Release, None);
        Ok(option)
    }
}
