//! Centralized environment variable names and defaults.
//!
//! This module contains the variable names read by the loaders in this crate
//! and the defaults applied when they are unset.

// =============================================================================
// Dotenv Cascade
// =============================================================================

/// Set to `1` or `true` to skip `.env` file loading entirely.
pub const DOTENV_DISABLED_VAR: &str = "DOTENV_DISABLED";

/// Selects the dotenv profile (`development`, `test`, `production`, ...).
pub const PROFILE_VAR: &str = "APP_ENV";

/// Profile used when neither the builder nor `APP_ENV` names one.
pub const DEFAULT_PROFILE: &str = "development";

/// The profile that skips `.env.local`, so tests are reproducible.
pub const TEST_PROFILE: &str = "test";

/// Separator for list-valued environment variables.
pub const LIST_SEPARATOR: char = ',';

// =============================================================================
// Application Identity
// =============================================================================

pub const APP_NAME_VAR: &str = "APP_NAME";
pub const DEFAULT_APP_NAME: &str = "app";

pub const APP_VERSION_VAR: &str = "APP_VERSION";
pub const DEFAULT_APP_VERSION: &str = "v0.0.0";

/// API root path; defaults to `/` plus the major part of the version (`/v0`).
pub const APP_ROOT_PATH_VAR: &str = "APP_ROOT_PATH";

// =============================================================================
// Logging
// =============================================================================

pub const LOG_LEVEL_VAR: &str = "LOG_LEVEL";
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Emit JSON lines instead of colored text.
pub const LOG_AS_JSON_VAR: &str = "LOG_AS_JSON";

/// Include the file, line and target of each event.
pub const LOG_METHOD_NAME_VAR: &str = "LOG_METHOD_NAME";

// =============================================================================
// Time
// =============================================================================

pub const TIMEZONE_VAR: &str = "TIMEZONE";
pub const DEFAULT_TIMEZONE: &str = "Asia/Ho_Chi_Minh";

// =============================================================================
// Secrets
// =============================================================================

/// Seed from which the symmetric encryption key is derived.
pub const SECRET_CRYPT_SEED_VAR: &str = "SECRET_CRYPT_SEED";

/// Comma-separated list of API client names.
pub const API_CLIENTS_VAR: &str = "API_CLIENTS";
