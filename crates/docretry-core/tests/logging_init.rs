//! Integration test: subscriber installation. Lives in its own binary because
//! it installs a process-wide subscriber.

use docretry::logging::init_logging_stderr;

#[test]
fn second_install_is_reported_not_panicking() {
    assert!(init_logging_stderr().is_ok());
    assert!(init_logging_stderr().is_err());
    tracing::debug!("emitted through the installed subscriber");
}
