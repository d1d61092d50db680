//! crates/logging/src/registry.rs
//! Module allowance registry and per-environment module tables.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fmt;
use std::hash::Hash;

use serde::{Deserialize, Serialize};

use crate::env::{Env, EnvTable};
use crate::error::{LoggerError, LoggerResult};
use crate::level::Level;
use crate::module::AllowedModule;

/// Registered modules keyed by name.
pub type ModuleMap<M> = HashMap<M, AllowedModule<M>>;

/// How one registration call treats a module name that appears twice.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// The later descriptor replaces the earlier one.
    #[default]
    LastWins,
    /// The call fails with [`LoggerError::DuplicateModule`] and the registry
    /// is left untouched.
    Reject,
}

/// Whether the registry contents follow the current environment.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum AllowanceMode {
    /// Contents were installed directly and ignore environment changes.
    #[default]
    IgnoreEnv,
    /// Contents were resolved from a per-environment table and are
    /// re-resolved whenever the environment changes.
    ByEnv,
}

/// Module lists per environment.
///
/// `develop` and `test` are mandatory. A missing `production` or `release`
/// list resolves to an empty registry, silencing every module there.
pub struct AllowanceByEnv<M> {
    /// Modules allowed in production.
    pub production: Option<Vec<AllowedModule<M>>>,
    /// Modules allowed in release builds.
    pub release: Option<Vec<AllowedModule<M>>>,
    /// Modules allowed during development.
    pub develop: Vec<AllowedModule<M>>,
    /// Modules allowed during tests.
    pub test: Vec<AllowedModule<M>>,
}

impl<M> AllowanceByEnv<M> {
    /// Creates a table with the mandatory lists only.
    pub const fn new(develop: Vec<AllowedModule<M>>, test: Vec<AllowedModule<M>>) -> Self {
        Self {
            production: None,
            release: None,
            develop,
            test,
        }
    }

    /// Sets the production list.
    #[must_use]
    pub fn with_production(mut self, modules: Vec<AllowedModule<M>>) -> Self {
        self.production = Some(modules);
        self
    }

    /// Sets the release list.
    #[must_use]
    pub fn with_release(mut self, modules: Vec<AllowedModule<M>>) -> Self {
        self.release = Some(modules);
        self
    }

    fn into_table(self) -> EnvTable<Vec<AllowedModule<M>>> {
        let mut table = EnvTable::from_fn(|_| Vec::new());
        table[Env::Production] = self.production.unwrap_or_default();
        table[Env::Release] = self.release.unwrap_or_default();
        table[Env::Develop] = self.develop;
        table[Env::Test] = self.test;
        table
    }
}

impl<M: fmt::Debug> fmt::Debug for AllowanceByEnv<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AllowanceByEnv")
            .field("production", &self.production)
            .field("release", &self.release)
            .field("develop", &self.develop)
            .field("test", &self.test)
            .finish()
    }
}

/// Keys `modules` by name according to `policy`.
pub fn to_allowed_logger<M>(
    modules: Vec<AllowedModule<M>>,
    policy: DuplicatePolicy,
) -> LoggerResult<ModuleMap<M>>
where
    M: Clone + Eq + Hash + fmt::Display,
{
    let mut mapping = HashMap::with_capacity(modules.len());
    for module in modules {
        match mapping.entry(module.module_name().clone()) {
            Entry::Vacant(slot) => {
                slot.insert(module);
            }
            Entry::Occupied(mut slot) => match policy {
                DuplicatePolicy::LastWins => {
                    slot.insert(module);
                }
                DuplicatePolicy::Reject => {
                    return Err(LoggerError::duplicate(slot.key().to_string()));
                }
            },
        }
    }
    Ok(mapping)
}

/// Mapping from module name to its allowance descriptor.
///
/// Registration calls replace the whole mapping; nothing is merged.
pub struct AllowanceRegistry<M> {
    modules: ModuleMap<M>,
    by_env: Option<EnvTable<ModuleMap<M>>>,
    policy: DuplicatePolicy,
}

impl<M> AllowanceRegistry<M>
where
    M: Clone + Eq + Hash + fmt::Display,
{
    /// Creates an empty registry.
    #[must_use]
    pub fn new(policy: DuplicatePolicy) -> Self {
        Self {
            modules: HashMap::new(),
            by_env: None,
            policy,
        }
    }

    /// Replaces the registry with `modules` and returns the new mapping.
    pub fn set_allowance(&mut self, modules: Vec<AllowedModule<M>>) -> LoggerResult<ModuleMap<M>> {
        let mapping = match to_allowed_logger(modules, self.policy) {
            Ok(mapping) => mapping,
            Err(err) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(target: "allowlog", error = %err, "allowance rejected");
                return Err(err);
            }
        };
        self.by_env = None;
        self.install(mapping.clone());
        Ok(mapping)
    }

    /// Keys every per-environment list, installs the one for `env` and
    /// remembers the rest for later [`apply_env`](Self::apply_env) calls.
    pub fn set_allowance_by_env(
        &mut self,
        option: AllowanceByEnv<M>,
        env: Env,
    ) -> LoggerResult<ModuleMap<M>> {
        let mut lists = option.into_table();
        let mut keyed = EnvTable::from_fn(|_| HashMap::new());
        for slot in Env::ALL {
            keyed[slot] = to_allowed_logger(std::mem::take(&mut lists[slot]), self.policy)?;
        }
        let mapping = keyed[env].clone();
        self.by_env = Some(keyed);
        self.install(mapping.clone());
        Ok(mapping)
    }

    /// Re-resolves the per-environment table for `env`.
    ///
    /// Returns `false` without touching the registry when the contents were
    /// installed directly.
    pub fn apply_env(&mut self, env: Env) -> bool {
        let Some(mapping) = self.by_env.as_ref().map(|table| table[env].clone()) else {
            return false;
        };
        self.install(mapping);
        true
    }

    fn install(&mut self, mapping: ModuleMap<M>) {
        #[cfg(feature = "tracing")]
        tracing::debug!(
            target: "allowlog",
            modules = mapping.len(),
            by_env = self.by_env.is_some(),
            "allowance replaced"
        );
        self.modules = mapping;
    }

    /// Reports whether a module named `name` is registered.
    pub fn has_module(&self, name: &M) -> bool {
        self.modules.contains_key(name)
    }

    /// Returns the registered descriptor for `name`.
    pub fn get(&self, name: &M) -> Option<&AllowedModule<M>> {
        self.modules.get(name)
    }

    /// True iff `name` is given, registered, and its registered handler does
    /// not disallow `level`. Without a level only registration is checked.
    pub fn is_allowed(&self, name: Option<&M>, level: Option<Level>) -> bool {
        let Some(module) = name.and_then(|name| self.modules.get(name)) else {
            return false;
        };
        level.is_none_or(|level| !module.is_disallowed(level))
    }

    /// Negation of [`is_allowed`](Self::is_allowed).
    pub fn is_disallowed(&self, name: Option<&M>, level: Option<Level>) -> bool {
        !self.is_allowed(name, level)
    }

    /// Applies the registered level rewrite for `name`, if any.
    pub fn resolve_level(&self, name: &M, level: Level) -> Level {
        self.modules
            .get(name)
            .map_or(level, |module| module.resolve_level(level))
    }

    /// Empties the registry and forgets any per-environment table.
    pub fn clear(&mut self) {
        self.by_env = None;
        self.modules.clear();
    }

    /// Copy of the current mapping.
    pub fn snapshot(&self) -> ModuleMap<M> {
        self.modules.clone()
    }

    /// Number of registered modules.
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    /// Reports whether no module is registered.
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Whether the contents follow the environment.
    pub const fn mode(&self) -> AllowanceMode {
        if self.by_env.is_some() {
            AllowanceMode::ByEnv
        } else {
            AllowanceMode::IgnoreEnv
        }
    }

    /// Duplicate policy applied by registration calls.
    pub const fn policy(&self) -> DuplicatePolicy {
        self.policy
    }

    /// Changes the duplicate policy for later registration calls.
    pub fn set_policy(&mut self, policy: DuplicatePolicy) {
        self.policy = policy;
    }
}

impl<M> Default for AllowanceRegistry<M>
where
    M: Clone + Eq + Hash + fmt::Display,
{
    fn default() -> Self {
        Self::new(DuplicatePolicy::default())
    }
}

impl<M: fmt::Debug> fmt::Debug for AllowanceRegistry<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AllowanceRegistry")
            .field("modules", &self.modules.keys().collect::<Vec<_>>())
            .field("by_env", &self.by_env.is_some())
            .field("policy", &self.policy)
            .finish()
    }
}
