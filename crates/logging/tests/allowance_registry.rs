//! Integration tests for module allowance.
//!
//! These tests verify how registration calls populate the shared registry,
//! how allowance is decided per module and level, and how the duplicate
//! policy behaves.

use std::fmt;
use std::rc::Rc;

use logging::{
    AllowanceControl, AllowedModule, CurrentEnv, DuplicatePolicy, Env, Level, LogOption, Logger,
    LoggerConfig, LoggerContext, LoggerError, LoggerMethods, MemorySink,
};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
enum Modules {
    Test,
    Hobbits,
    Elves,
}

impl fmt::Display for Modules {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

fn context_with(policy: DuplicatePolicy) -> (LoggerContext<Modules>, MemorySink) {
    let sink = MemorySink::new();
    let config = LoggerConfig {
        colorize: false,
        default_stack_number: 0,
        duplicate_policy: policy,
        ..LoggerConfig::default()
    };
    let ctx = LoggerContext::new(config, CurrentEnv::new(Env::Test), sink.clone());
    (ctx, sink)
}

fn context() -> (LoggerContext<Modules>, MemorySink) {
    context_with(DuplicatePolicy::LastWins)
}

fn test_module() -> AllowedModule<Modules> {
    AllowedModule::allow_all(Modules::Test)
}

fn hobbits_module() -> AllowedModule<Modules> {
    AllowedModule::new(Modules::Hobbits, |level| level <= Level::Info)
}

// ============================================================================
// Registration
// ============================================================================

/// Verifies the returned mapping is keyed by module name.
#[test]
fn registration_returns_keyed_mapping() {
    let (ctx, _) = context();
    let mapping = ctx
        .set_logger_allowance(vec![test_module(), hobbits_module()])
        .unwrap();

    assert_eq!(mapping.len(), 2);
    assert_eq!(mapping[&Modules::Hobbits].module_name(), &Modules::Hobbits);
}

/// Verifies a second registration replaces rather than merges.
#[test]
fn registration_replaces_previous_contents() {
    let (ctx, _) = context();
    ctx.set_logger_allowance(vec![test_module(), hobbits_module()])
        .unwrap();
    ctx.set_logger_allowance(vec![test_module()]).unwrap();

    assert!(ctx.has_module(&test_module()));
    assert!(!ctx.has_module(&hobbits_module()));
}

/// Verifies clear_modules empties the registry.
#[test]
fn clear_modules_empties_registry() {
    let (ctx, _) = context();
    ctx.set_logger_allowance(vec![test_module()]).unwrap();
    ctx.clear_modules();

    assert!(!ctx.has_module(&test_module()));
    assert!(ctx.allowance().borrow().is_empty());
}

/// Verifies constructing loggers never changes the registry cell.
#[test]
fn registry_identity_survives_logger_construction() {
    let (ctx, _) = context();
    ctx.set_logger_allowance(vec![test_module()]).unwrap();

    let log = Logger::new(&ctx, test_module());
    let allowance = Rc::clone(log.allowance());
    let log = Logger::for_module(&ctx, Modules::Test);

    assert!(Rc::ptr_eq(&allowance, log.allowance()));
    assert!(log.has_module(&test_module()));
    assert!(log.is_allowed(Some(&test_module()), Some(Level::Trace)));
}

// ============================================================================
// Allowance Decisions
// ============================================================================

/// Verifies allowance follows the handler for every level.
#[test]
fn allowance_matches_handler_for_every_level() {
    let (ctx, _) = context();
    ctx.set_logger_allowance(vec![test_module(), hobbits_module()])
        .unwrap();
    let hobbits = hobbits_module();

    for level in Level::ALL {
        assert_eq!(
            ctx.is_allowed(Some(&hobbits), Some(level)),
            !hobbits.is_disallowed(level),
            "level {level}"
        );
        assert_eq!(
            ctx.is_disallowed(Some(&hobbits), Some(level)),
            hobbits.is_disallowed(level)
        );
    }
}

/// Verifies current sits above info in declaration order.
#[test]
fn current_is_allowed_where_info_is_not() {
    let (ctx, _) = context();
    ctx.set_logger_allowance(vec![hobbits_module()]).unwrap();

    assert!(ctx.is_disallowed(Some(&hobbits_module()), Some(Level::Info)));
    assert!(ctx.is_allowed(Some(&hobbits_module()), Some(Level::Current)));
}

/// Verifies unregistered and missing modules are never allowed.
#[test]
fn unregistered_module_is_not_allowed() {
    let (ctx, _) = context();
    ctx.set_logger_allowance(vec![test_module()]).unwrap();
    let elves = AllowedModule::allow_all(Modules::Elves);

    assert!(!ctx.has_module(&elves));
    assert!(!ctx.is_allowed(Some(&elves), Some(Level::Fatal)));
    assert!(!ctx.is_allowed(Some(&elves), None));
    assert!(!ctx.is_allowed(None, None));
}

/// Verifies a missing level only checks registration.
#[test]
fn missing_level_checks_registration() {
    let (ctx, _) = context();
    ctx.set_logger_allowance(vec![AllowedModule::disallow_all(Modules::Elves)])
        .unwrap();
    let elves = AllowedModule::allow_all(Modules::Elves);

    assert!(ctx.is_allowed(Some(&elves), None));
    assert!(ctx.is_disallowed(Some(&elves), Some(Level::Fatal)));
}

/// Verifies disallowed calls leave no record and write nothing.
#[test]
fn disallowed_calls_have_no_side_effects() {
    let (ctx, sink) = context();
    ctx.set_logger_allowance(vec![hobbits_module()]).unwrap();
    let log = Logger::new(&ctx, hobbits_module());

    log.trace(["t"], LogOption::default());
    log.debug(["d"], LogOption::default());
    log.info(["i"], LogOption::default());
    log.log(["l"], LogOption::default());

    assert!(log.prev_log().is_none());
    assert!(sink.is_empty());
}

/// Verifies allowed calls overwrite the previous record.
#[test]
fn allowed_calls_overwrite_previous_record() {
    let (ctx, sink) = context();
    ctx.set_logger_allowance(vec![hobbits_module()]).unwrap();
    let log = Logger::new(&ctx, hobbits_module());

    log.warn(["first"], LogOption::default());
    log.error(["second"], LogOption::default());

    let record = log.prev_log().unwrap();
    assert_eq!(record.message, vec!["second"]);
    assert_eq!(record.level, Level::Error);
    assert_eq!(sink.len(), 2);
}

/// Verifies the level rewrite is applied before the allowance check.
#[test]
fn rewrite_runs_before_allowance() {
    let (ctx, _) = context();
    ctx.set_logger_allowance(vec![
        AllowedModule::disallow_up_to(Modules::Test, Level::Warn)
            .with_log_level_handler(|_| Level::Trace),
    ])
    .unwrap();
    let log = Logger::for_module(&ctx, Modules::Test);

    log.fatal(["demoted"], LogOption::default());
    assert!(log.prev_log().is_none());
}

// ============================================================================
// Duplicate Policy
// ============================================================================

/// Verifies the later descriptor wins by default.
#[test]
fn duplicate_last_wins() {
    let (ctx, _) = context();
    ctx.set_logger_allowance(vec![
        AllowedModule::allow_all(Modules::Test),
        AllowedModule::disallow_all(Modules::Test),
    ])
    .unwrap();

    assert!(ctx.is_disallowed(Some(&test_module()), Some(Level::Fatal)));
}

/// Verifies rejection leaves the registry untouched.
#[test]
fn duplicate_rejected() {
    let (ctx, _) = context_with(DuplicatePolicy::Reject);
    ctx.set_logger_allowance(vec![hobbits_module()]).unwrap();

    let err = ctx
        .set_logger_allowance(vec![test_module(), test_module()])
        .unwrap_err();

    assert_eq!(err, LoggerError::duplicate("Test"));
    assert!(ctx.has_module(&hobbits_module()));
    assert!(!ctx.has_module(&test_module()));
}
