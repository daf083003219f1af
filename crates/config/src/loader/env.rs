//! Typed environment variable access.
//!
//! Responsibilities:
//! - Read environment variables with empty/whitespace filtering.
//! - Convert values into typed settings through `utilkit-convert`.
//! - Offer a lenient form (falls back to a default) and strict forms
//!   (return `ConfigError`).
//!
//! Does NOT handle:
//! - .env file loading (see builder.rs).
//!
//! Invariants:
//! - Keys are upper-cased before lookup.
//! - Empty or whitespace-only environment variables are treated as unset.
//! - Returned values are trimmed (leading/trailing whitespace removed).
//! - Sequence types, optional or not, accept either a JSON array or a
//!   comma-separated list.
//! - Values are never logged, only the variable names.

use tracing::warn;
use utilkit_convert::{Convertible, TargetType, convert_list, str_conv};

use super::error::ConfigError;
use crate::constants::LIST_SEPARATOR;

/// Read an environment variable, returning None if unset, empty, or whitespace-only.
/// Returns the trimmed value (leading/trailing whitespace removed) if present.
pub fn env_var_or_none(key: &str) -> Option<String> {
    std::env::var(key).ok().and_then(|s| {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            None
        } else if trimmed.len() == s.len() {
            // No trimming needed, return original to avoid allocation
            Some(s)
        } else {
            // Trimming was needed, allocate new String
            Some(trimmed.to_string())
        }
    })
}

/// Read `key` as a `T`, returning `fallback` when it is unset or invalid.
///
/// Invalid values are reported with a warning naming the variable.
pub fn env<T>(key: &str, fallback: T) -> T
where
    T: Convertible,
{
    match env_opt(key) {
        Ok(Some(value)) => value,
        Ok(None) => fallback,
        Err(e) => {
            warn!(error = %e, "ignoring invalid environment value, using default");
            fallback
        }
    }
}

/// Read `key` as a `T`, returning `None` when it is unset.
///
/// # Errors
///
/// Returns `ConfigError::Convert` if the value cannot be converted.
pub fn env_opt<T>(key: &str) -> Result<Option<T>, ConfigError>
where
    T: Convertible,
{
    let key = key.to_uppercase();
    env_var_or_none(&key)
        .map(|raw| parse_value(&key, &raw))
        .transpose()
}

/// Read `key` as a `T`.
///
/// # Errors
///
/// Returns `ConfigError::MissingEnvVar` if the variable is unset and
/// `ConfigError::Convert` if it cannot be converted.
pub fn require<T>(key: &str) -> Result<T, ConfigError>
where
    T: Convertible,
{
    env_opt(key)?.ok_or_else(|| ConfigError::MissingEnvVar(key.to_uppercase()))
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T, ConfigError>
where
    T: Convertible,
{
    let target = T::target_type();
    let converted = match list_target(&target, raw) {
        Some(list) => convert_list(raw, LIST_SEPARATOR, list).and_then(T::from_converted),
        None => str_conv(raw),
    };
    converted.map_err(|source| ConfigError::Convert {
        var: key.to_string(),
        source,
    })
}

// The sequence a delimited value fills, if any. A literal `null` keeps an
// optional sequence absent.
fn list_target<'a>(target: &'a TargetType, raw: &str) -> Option<&'a TargetType> {
    if raw.starts_with('[') {
        return None;
    }
    match target {
        TargetType::Sequence(_) => Some(target),
        TargetType::Optional(inner)
            if raw != "null" && matches!(inner.as_ref(), TargetType::Sequence(_)) =>
        {
            Some(inner.as_ref())
        }
        _ => None,
    }
}
