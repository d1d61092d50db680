//! crates/logging/src/env.rs
//! Runtime environment values and the observable current environment.

use std::cell::RefCell;
use std::fmt;
use std::ops::{Index, IndexMut};
use std::rc::Rc;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable consulted by [`CurrentEnv::from_process_env`].
pub const ENV_VAR: &str = "ALLOWLOG_ENV";

/// Runtime environment of the host application.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Env {
    /// Automated test runs.
    Test,
    /// Local development.
    Develop,
    /// Production deployments.
    Production,
    /// Release candidates.
    Release,
}

impl Env {
    /// Every environment, in table order.
    pub const ALL: [Self; 4] = [Self::Test, Self::Develop, Self::Production, Self::Release];

    const fn index(self) -> usize {
        match self {
            Self::Test => 0,
            Self::Develop => 1,
            Self::Production => 2,
            Self::Release => 3,
        }
    }

    /// Lowercase name used in configuration documents and environment variables.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Test => "test",
            Self::Develop => "develop",
            Self::Production => "production",
            Self::Release => "release",
        }
    }
}

impl fmt::Display for Env {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an [`Env`] from a string fails.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
#[error("unrecognised environment: {input}")]
pub struct ParseEnvError {
    input: String,
}

impl FromStr for Env {
    type Err = ParseEnvError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|env| env.as_str().eq_ignore_ascii_case(input.trim()))
            .ok_or_else(|| ParseEnvError {
                input: input.to_owned(),
            })
    }
}

/// One value per [`Env`], looked up by indexing rather than branching.
///
/// # Examples
///
/// ```
/// use logging::{Env, EnvTable};
///
/// let table = EnvTable::from_fn(|env| env.as_str().len());
/// assert_eq!(table[Env::Develop], 7);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EnvTable<T> {
    slots: [T; 4],
}

impl<T> EnvTable<T> {
    /// Builds a table by evaluating `f` once per environment.
    pub fn from_fn<F>(mut f: F) -> Self
    where
        F: FnMut(Env) -> T,
    {
        Self {
            slots: Env::ALL.map(&mut f),
        }
    }

    /// Returns the value stored for `env`.
    #[must_use]
    pub fn get(&self, env: Env) -> &T {
        &self.slots[env.index()]
    }

    /// Replaces the value stored for `env`, returning the previous one.
    pub fn replace(&mut self, env: Env, value: T) -> T {
        std::mem::replace(&mut self.slots[env.index()], value)
    }

    /// Iterates `(env, value)` pairs in [`Env::ALL`] order.
    pub fn iter(&self) -> impl Iterator<Item = (Env, &T)> {
        Env::ALL.into_iter().zip(self.slots.iter())
    }
}

impl<T> Index<Env> for EnvTable<T> {
    type Output = T;

    fn index(&self, env: Env) -> &T {
        self.get(env)
    }
}

impl<T> IndexMut<Env> for EnvTable<T> {
    fn index_mut(&mut self, env: Env) -> &mut T {
        &mut self.slots[env.index()]
    }
}

/// Handle returned by [`CurrentEnv::subscribe`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Rc<dyn Fn(Env)>;

struct EnvState {
    env: Env,
    next_id: u64,
    listeners: Vec<(SubscriptionId, Listener)>,
}

/// Observable current environment.
///
/// Clones share the same value and listener list. Listeners run
/// synchronously inside [`set`](Self::set), after the new value is stored, and
/// only when the value actually changes.
///
/// # Examples
///
/// ```
/// use std::cell::Cell;
/// use std::rc::Rc;
/// use logging::{CurrentEnv, Env};
///
/// let current = CurrentEnv::new(Env::Develop);
/// let seen = Rc::new(Cell::new(None));
/// let sink = Rc::clone(&seen);
/// current.subscribe(move |env| sink.set(Some(env)));
///
/// current.set(Env::Production);
/// assert_eq!(seen.get(), Some(Env::Production));
/// ```
#[derive(Clone)]
pub struct CurrentEnv {
    state: Rc<RefCell<EnvState>>,
}

impl CurrentEnv {
    /// Creates an observable holding `env`.
    #[must_use]
    pub fn new(env: Env) -> Self {
        Self {
            state: Rc::new(RefCell::new(EnvState {
                env,
                next_id: 0,
                listeners: Vec::new(),
            })),
        }
    }

    /// Reads [`ENV_VAR`] and falls back to [`Env::Develop`] when it is unset
    /// or unrecognised.
    #[must_use]
    pub fn from_process_env() -> Self {
        let env = std::env::var(ENV_VAR)
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or(Env::Develop);
        Self::new(env)
    }

    /// Returns the current environment.
    #[must_use]
    pub fn get(&self) -> Env {
        self.state.borrow().env
    }

    /// Stores `env` and notifies listeners when it differs from the previous
    /// value. Returns whether the value changed.
    pub fn set(&self, env: Env) -> bool {
        let listeners: Vec<Listener> = {
            let mut state = self.state.borrow_mut();
            if state.env == env {
                return false;
            }
            state.env = env;
            state
                .listeners
                .iter()
                .map(|(_, listener)| Rc::clone(listener))
                .collect()
        };

        for listener in listeners {
            listener(env);
        }
        true
    }

    /// Registers a listener invoked on every change.
    pub fn subscribe<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(Env) + 'static,
    {
        let mut state = self.state.borrow_mut();
        let id = SubscriptionId(state.next_id);
        state.next_id += 1;
        state.listeners.push((id, Rc::new(listener)));
        id
    }

    /// Removes a listener. Returns whether it was registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut state = self.state.borrow_mut();
        let before = state.listeners.len();
        state.listeners.retain(|(existing, _)| *existing != id);
        state.listeners.len() != before
    }

    /// Number of registered listeners.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.state.borrow().listeners.len()
    }

    /// Reports whether both handles observe the same value.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.state, &other.state)
    }
}

impl Default for CurrentEnv {
    fn default() -> Self {
        Self::new(Env::Develop)
    }
}

impl fmt::Debug for CurrentEnv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("CurrentEnv")
            .field("env", &state.env)
            .field("listeners", &state.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn parse_round_trips_names() {
        for env in Env::ALL {
            assert_eq!(env.as_str().parse::<Env>(), Ok(env));
        }
        assert_eq!("PRODUCTION".parse::<Env>(), Ok(Env::Production));
        assert!("staging".parse::<Env>().is_err());
    }

    #[test]
    fn table_lookup_is_per_env() {
        let mut table = EnvTable::from_fn(Env::as_str);
        assert_eq!(table[Env::Test], "test");
        assert_eq!(table[Env::Release], "release");

        let previous = table.replace(Env::Release, "rc");
        assert_eq!(previous, "release");
        assert_eq!(table.get(Env::Release), &"rc");

        table[Env::Test] = "ci";
        let names: Vec<_> = table.iter().map(|(_, name)| *name).collect();
        assert_eq!(names, vec!["ci", "develop", "production", "rc"]);
    }

    #[test]
    fn serde_uses_lowercase_names() {
        for env in Env::ALL {
            let json = serde_json::to_string(&env).unwrap();
            assert_eq!(json, format!("\"{}\"", env.as_str()));
            assert_eq!(serde_json::from_str::<Env>(&json).unwrap(), env);
        }
        assert!(serde_json::from_str::<Env>("\"staging\"").is_err());
    }

    #[test]
    fn set_notifies_only_on_change() {
        let current = CurrentEnv::new(Env::Test);
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        current.subscribe(move |_| counter.set(counter.get() + 1));

        assert!(!current.set(Env::Test));
        assert_eq!(calls.get(), 0);

        assert!(current.set(Env::Develop));
        assert_eq!(calls.get(), 1);
        assert_eq!(current.get(), Env::Develop);
    }

    #[test]
    fn listeners_may_read_the_new_value() {
        let current = CurrentEnv::new(Env::Test);
        let observed = Rc::new(Cell::new(None));
        let reader = current.clone();
        let slot = Rc::clone(&observed);
        current.subscribe(move |_| slot.set(Some(reader.get())));

        current.set(Env::Release);
        assert_eq!(observed.get(), Some(Env::Release));
    }

    #[test]
    fn unsubscribe_stops_notifications() {
        let current = CurrentEnv::new(Env::Test);
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        let id = current.subscribe(move |_| counter.set(counter.get() + 1));

        assert_eq!(current.listener_count(), 1);
        assert!(current.unsubscribe(id));
        assert!(!current.unsubscribe(id));
        current.set(Env::Production);
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn clones_share_state() {
        let current = CurrentEnv::default();
        let other = current.clone();
        other.set(Env::Production);
        assert_eq!(current.get(), Env::Production);
        assert!(current.ptr_eq(&other));
        assert!(!current.ptr_eq(&CurrentEnv::default()));
    }
}
