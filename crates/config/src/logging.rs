//! Process-wide logging setup.
//!
//! Responsibilities:
//! - Read logging settings from `LOG_LEVEL`, `LOG_AS_JSON` and `LOG_METHOD_NAME`.
//! - Install a `tracing-subscriber` registry with an env filter and a fmt layer.
//!
//! Does NOT handle:
//! - Emitting log records (callers use the `tracing` macros directly).
//!
//! Invariants:
//! - `RUST_LOG` directives, when present, take precedence over `LOG_LEVEL`.
//! - Unknown level names fall back to `warn`.
//! - Installing twice returns an error instead of panicking.

use thiserror::Error;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{
    EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt, util::TryInitError,
};

use crate::constants::{DEFAULT_LOG_LEVEL, LOG_AS_JSON_VAR, LOG_LEVEL_VAR, LOG_METHOD_NAME_VAR};
use crate::loader::env;

/// Errors from installing the global subscriber.
#[derive(Error, Debug)]
pub enum LoggingError {
    #[error("Failed to install log subscriber")]
    Install(#[from] TryInitError),
}

/// Logging settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogSettings {
    /// Maximum level emitted when `RUST_LOG` is unset.
    pub level: LevelFilter,
    /// Emit one JSON object per record instead of human-readable lines.
    pub json: bool,
    /// Include the source location and target of each record.
    pub report_caller: bool,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: parse_level(DEFAULT_LOG_LEVEL),
            json: false,
            report_caller: true,
        }
    }
}

impl LogSettings {
    /// Create settings with defaults (`warn`, plain text, caller included).
    pub fn new() -> Self {
        Self::default()
    }

    /// Read settings from the environment.
    pub fn from_env() -> Self {
        Self {
            level: parse_level(&env(LOG_LEVEL_VAR, DEFAULT_LOG_LEVEL.to_string())),
            json: env(LOG_AS_JSON_VAR, false),
            report_caller: env(LOG_METHOD_NAME_VAR, true),
        }
    }

    /// Builder method to set the level.
    pub fn with_level(mut self, level: LevelFilter) -> Self {
        self.level = level;
        self
    }

    /// Builder method to switch JSON output.
    pub fn with_json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }

    /// Builder method to include the caller location.
    pub fn with_report_caller(mut self, report_caller: bool) -> Self {
        self.report_caller = report_caller;
        self
    }

    /// Build the env filter, defaulting to `self.level` when `RUST_LOG` is unset.
    pub fn filter(&self) -> EnvFilter {
        EnvFilter::builder()
            .with_default_directive(self.level.into())
            .from_env_lossy()
    }

    /// Install the global subscriber.
    ///
    /// # Errors
    /// Returns an error if a global subscriber is already installed.
    pub fn init(&self) -> Result<(), LoggingError> {
        let json_layer = self.json.then(|| {
            fmt::layer()
                .json()
                .with_file(self.report_caller)
                .with_line_number(self.report_caller)
                .with_target(self.report_caller)
        });
        let text_layer = (!self.json).then(|| {
            fmt::layer()
                .with_ansi(true)
                .with_file(self.report_caller)
                .with_line_number(self.report_caller)
                .with_target(self.report_caller)
        });

        tracing_subscriber::registry()
            .with(self.filter())
            .with(json_layer)
            .with(text_layer)
            .try_init()?;
        Ok(())
    }
}

/// Map a level name to a filter.
///
/// Accepts `trace`, `debug`, `info`, `warn`/`warning`, `error`, and the
/// aliases `fatal`/`panic` for `error`. Anything else maps to `warn`.
pub fn parse_level(name: &str) -> LevelFilter {
    match name.trim().to_ascii_lowercase().as_str() {
        "trace" => LevelFilter::TRACE,
        "debug" => LevelFilter::DEBUG,
        "info" => LevelFilter::INFO,
        "warn" | "warning" => LevelFilter::WARN,
        "error" | "fatal" | "panic" => LevelFilter::ERROR,
        "off" => LevelFilter::OFF,
        _ => LevelFilter::WARN,
    }
}

/// Install logging configured from the environment.
///
/// # Errors
/// Returns an error if a global subscriber is already installed.
pub fn enable_log() -> Result<(), LoggingError> {
    LogSettings::from_env().init()
}
