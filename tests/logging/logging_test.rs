//! Tests for `src/logging.rs`.

use evergreen_matrix::logging::LoggingGuard;

fn temp_dir() -> tempfile::TempDir {
    match tempfile::tempdir() {
        Ok(tmp) => tmp,
        Err(err) => panic!("should create temp dir: {err}"),
    }
}

#[test]
fn logging_guard_is_send() {
    fn assert_send<T: Send>() {}
    assert_send::<LoggingGuard>();
}

#[test]
fn init_with_file_creates_logs_dir() {
    let tmp = temp_dir();
    let logs_dir = tmp.path().join("logs");
    assert!(!logs_dir.exists());

    // The global subscriber can only be installed once per process; the
    // directory is created regardless of whether installation succeeds.
    let result = evergreen_matrix::logging::init_with_file(&logs_dir, "debug");
    assert!(result.is_ok());
    assert!(logs_dir.exists(), "logs directory should be created");
}

#[test]
fn init_cli_tolerates_repeat_calls() {
    evergreen_matrix::logging::init_cli("info");
    evergreen_matrix::logging::init_cli("not a valid filter [");
}

#[test]
fn with_bootstrap_returns_closure_value() {
    let value = evergreen_matrix::logging::with_bootstrap(|| {
        tracing::warn!("emitted under the bootstrap subscriber");
        42
    });
    assert_eq!(value, 42);
}
