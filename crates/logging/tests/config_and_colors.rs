//! Integration tests for configuration and color decoration.
//!
//! These tests verify that configuration values reach emitted output and
//! that level color overrides merge into the shared table.

use logging::{
    AllowanceControl, AllowedModule, ColorTable, CurrentEnv, DuplicatePolicy, Env, Level,
    LogOption, Logger, LoggerConfig, LoggerContext, LoggerError, LoggerMethods, MemorySink,
    caller_index, decorator,
};

fn context(config: LoggerConfig) -> (LoggerContext<&'static str>, MemorySink) {
    let sink = MemorySink::new();
    let ctx = LoggerContext::new(config, CurrentEnv::new(Env::Develop), sink.clone());
    ctx.set_logger_allowance(vec![AllowedModule::allow_all("Test")])
        .unwrap();
    (ctx, sink)
}

fn plain() -> LoggerConfig {
    LoggerConfig {
        colorize: false,
        default_stack_number: 0,
        ..LoggerConfig::default()
    }
}

// ============================================================================
// Configuration
// ============================================================================

/// Verifies configured defaults set the displayed window.
#[test]
fn configured_defaults_shape_window() {
    let (ctx, _) = context(LoggerConfig {
        default_trace_at: 2,
        default_stack_number: 1,
        ..plain()
    });
    let log = Logger::for_module(&ctx, "Test");

    log.info(["x"], LogOption::default());

    let record = log.prev_log().unwrap();
    assert_eq!(record.l_bound + 1, caller_index(&record.all_stacks));
    assert_eq!(record.r_bound - record.l_bound, 1);
    assert_eq!(record.stacks_on_display.len(), 1);
}

/// Verifies the duplicate policy comes from configuration.
#[test]
fn configured_duplicate_policy_applies() {
    let (ctx, _) = context(LoggerConfig {
        duplicate_policy: DuplicatePolicy::Reject,
        ..plain()
    });

    let err = ctx
        .set_logger_allowance(vec![
            AllowedModule::allow_all("Test"),
            AllowedModule::allow_all("Test"),
        ])
        .unwrap_err();
    assert!(matches!(err, LoggerError::DuplicateModule(_)));
}

/// Verifies settings parse like process variables.
#[test]
fn lookup_overrides_defaults() {
    let config = LoggerConfig::from_lookup(|key| match key {
        "ALLOWLOG_STACK_NUMBER" => Some("5".to_owned()),
        "ALLOWLOG_COLOR" => Some("never".to_owned()),
        _ => None,
    })
    .unwrap();

    assert_eq!(config.default_stack_number, 5);
    assert!(!config.colorize);
    assert_eq!(config.default_trace_at, 3);
}

/// Verifies invalid settings are configuration errors.
#[test]
fn invalid_setting_is_config_error() {
    let err = LoggerConfig::from_lookup(|key| (key == "ALLOWLOG_TRACE_AT").then(|| "-1".to_owned()))
        .unwrap_err();
    assert!(matches!(err, LoggerError::Config(_)));
}

// ============================================================================
// Colors
// ============================================================================

/// Verifies colorized output carries escape sequences.
#[test]
fn colorized_output_is_decorated() {
    let (ctx, sink) = context(LoggerConfig {
        default_stack_number: 0,
        ..LoggerConfig::default()
    });
    let log = Logger::for_module(&ctx, "Test");

    log.error(["boom"], LogOption::default());

    let line = sink.last().unwrap();
    assert!(line.contains('\u{1b}'));
    assert!(line.contains("boom"));
}

/// Verifies overrides merge and leave other levels alone.
#[test]
fn level_color_overrides_merge() {
    let (ctx, sink) = context(plain());
    let log = Logger::for_module(&ctx, "Test");

    log.set_level_colors([(Level::Warn, decorator(|text| format!("<{text}>")))]);
    log.warn(["careful"], LogOption::default());
    log.info(["fine"], LogOption::default());

    assert_eq!(
        sink.lines(),
        vec!["<[Test]> <warn> <careful>", "[Test] info fine"]
    );
}

/// Verifies overrides are shared by every logger of a context.
#[test]
fn color_table_is_shared() {
    let (ctx, sink) = context(plain());
    let first = Logger::for_module(&ctx, "Test");
    let second = Logger::for_module(&ctx, "Test");

    first.set_level_colors([(Level::Fatal, decorator(str::to_uppercase))]);
    second.fatal(["end"], LogOption::default());

    assert_eq!(sink.last().unwrap(), "[TEST] FATAL END");
}

/// Verifies the plain table is the identity.
#[test]
fn plain_table_is_identity() {
    let table = ColorTable::plain();
    assert!(
        Level::ALL
            .into_iter()
            .all(|level| table.decorate(level, "same") == "same")
    );
}
