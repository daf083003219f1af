//! Application identity settings.

use super::env::env;
use crate::constants::{
    APP_NAME_VAR, APP_ROOT_PATH_VAR, APP_VERSION_VAR, DEFAULT_APP_NAME, DEFAULT_APP_VERSION,
};

/// Application name from `APP_NAME`, default `app`.
pub fn app_name() -> String {
    env(APP_NAME_VAR, DEFAULT_APP_NAME.to_string())
}

/// Application version from `APP_VERSION`, default `v0.0.0`.
pub fn app_version() -> String {
    env(APP_VERSION_VAR, DEFAULT_APP_VERSION.to_string())
}

/// API root path from `APP_ROOT_PATH`.
///
/// Defaults to `/` followed by the first two characters of the version,
/// e.g. `/v1` for `v1.4.2`.
pub fn api_root_path() -> String {
    let major: String = app_version().chars().take(2).collect();
    env(APP_ROOT_PATH_VAR, format!("/{major}"))
}
