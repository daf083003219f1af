//! Tests for typed environment access.
//!
//! Responsibilities:
//! - Test `env` fallbacks for unset, empty, and invalid values.
//! - Test `env_opt` and `require` error reporting.
//! - Test the application identity settings.
//!
//! Invariants / Assumptions:
//! - Tests use `env_lock()` and `#[serial]` to prevent cross-test contamination.

use serial_test::serial;
use std::time::Duration;

use super::env_lock;
use crate::loader::app::{api_root_path, app_name, app_version};
use crate::loader::env::{env, env_opt, require};
use crate::loader::error::ConfigError;

#[test]
#[serial]
fn test_env_returns_converted_value() {
    let _lock = env_lock().lock().unwrap();

    temp_env::with_vars(
        [
            ("UTILKIT_TEST_WORKERS", Some("8")),
            ("UTILKIT_TEST_DEBUG", Some("TRUE")),
            ("UTILKIT_TEST_TIMEOUT", Some("1m 30s")),
        ],
        || {
            assert_eq!(env("UTILKIT_TEST_WORKERS", 1u32), 8);
            assert!(env("UTILKIT_TEST_DEBUG", false));
            assert_eq!(
                env("UTILKIT_TEST_TIMEOUT", Duration::from_secs(5)),
                Duration::from_secs(90)
            );
        },
    );
}

#[test]
#[serial]
fn test_env_key_is_uppercased() {
    let _lock = env_lock().lock().unwrap();

    temp_env::with_vars([("UTILKIT_TEST_WORKERS", Some("3"))], || {
        assert_eq!(env("utilkit_test_workers", 1u32), 3);
    });
}

#[test]
#[serial]
fn test_env_falls_back_when_unset_or_invalid() {
    let _lock = env_lock().lock().unwrap();

    temp_env::with_vars([("UTILKIT_TEST_WORKERS", None::<&str>)], || {
        assert_eq!(env("UTILKIT_TEST_WORKERS", 4u32), 4);
    });
    temp_env::with_vars([("UTILKIT_TEST_WORKERS", Some("   "))], || {
        assert_eq!(env("UTILKIT_TEST_WORKERS", 4u32), 4);
    });
    temp_env::with_vars([("UTILKIT_TEST_WORKERS", Some("many"))], || {
        assert_eq!(env("UTILKIT_TEST_WORKERS", 4u32), 4);
    });
    temp_env::with_vars([("UTILKIT_TEST_WORKERS", Some("-1"))], || {
        assert_eq!(env("UTILKIT_TEST_WORKERS", 4u32), 4);
    });
}

#[test]
#[serial]
fn test_env_opt_reports_invalid_values() {
    let _lock = env_lock().lock().unwrap();

    temp_env::with_vars([("UTILKIT_TEST_RATIO", Some("half"))], || {
        let err = env_opt::<f64>("UTILKIT_TEST_RATIO").unwrap_err();
        assert!(
            matches!(err, ConfigError::Convert { ref var, .. } if var == "UTILKIT_TEST_RATIO")
        );
        assert!(
            !err.to_string().contains("half"),
            "Error display must not echo the value"
        );
    });
    temp_env::with_vars([("UTILKIT_TEST_RATIO", None::<&str>)], || {
        assert_eq!(env_opt::<f64>("UTILKIT_TEST_RATIO").unwrap(), None);
    });
}

#[test]
#[serial]
fn test_require_reports_missing_variable() {
    let _lock = env_lock().lock().unwrap();

    temp_env::with_vars([("UTILKIT_TEST_REQUIRED", None::<&str>)], || {
        let err = require::<String>("utilkit_test_required").unwrap_err();
        assert!(
            matches!(err, ConfigError::MissingEnvVar(ref var) if var == "UTILKIT_TEST_REQUIRED")
        );
    });
}

#[test]
#[serial]
fn test_string_lists_split_on_commas() {
    let _lock = env_lock().lock().unwrap();

    temp_env::with_vars([("UTILKIT_TEST_HOSTS", Some("alpha, beta,gamma"))], || {
        let hosts: Vec<String> = require("UTILKIT_TEST_HOSTS").unwrap();
        assert_eq!(hosts, vec!["alpha", "beta", "gamma"]);
    });
}

#[test]
#[serial]
fn test_optional_lists_split_on_commas() {
    let _lock = env_lock().lock().unwrap();

    temp_env::with_vars([("UTILKIT_TEST_HOSTS", Some("a,b"))], || {
        let hosts: Option<Vec<String>> = env_opt("UTILKIT_TEST_HOSTS").unwrap().flatten();
        assert_eq!(hosts, Some(vec!["a".to_string(), "b".to_string()]));

        let ports = env_opt::<Option<Vec<u16>>>("UTILKIT_TEST_HOSTS");
        assert!(
            matches!(ports, Err(ConfigError::Convert { .. })),
            "non-numeric list items must fail"
        );
    });
    temp_env::with_vars([("UTILKIT_TEST_HOSTS", Some("[\"x\"]"))], || {
        let hosts: Option<Vec<String>> = require("UTILKIT_TEST_HOSTS").unwrap();
        assert_eq!(hosts, Some(vec!["x".to_string()]));
    });
    temp_env::with_vars([("UTILKIT_TEST_HOSTS", Some("null"))], || {
        let hosts: Option<Vec<String>> = require("UTILKIT_TEST_HOSTS").unwrap();
        assert_eq!(hosts, None);
    });
}

#[test]
#[serial]
fn test_app_identity_defaults() {
    let _lock = env_lock().lock().unwrap();

    temp_env::with_vars(
        [
            ("APP_NAME", None::<&str>),
            ("APP_VERSION", None),
            ("APP_ROOT_PATH", None),
        ],
        || {
            assert_eq!(app_name(), "app");
            assert_eq!(app_version(), "v0.0.0");
            assert_eq!(api_root_path(), "/v0");
        },
    );
}

#[test]
#[serial]
fn test_app_identity_from_env() {
    let _lock = env_lock().lock().unwrap();

    temp_env::with_vars(
        [
            ("APP_NAME", Some("billing")),
            ("APP_VERSION", Some("v2.3.1")),
            ("APP_ROOT_PATH", None),
        ],
        || {
            assert_eq!(app_name(), "billing");
            assert_eq!(app_version(), "v2.3.1");
            assert_eq!(api_root_path(), "/v2");
        },
    );

    temp_env::with_vars(
        [("APP_VERSION", Some("v2.3.1")), ("APP_ROOT_PATH", Some("/api"))],
        || {
            assert_eq!(api_root_path(), "/api");
        },
    );
}
