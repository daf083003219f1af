//! Error types for configuration loading.
//!
//! Responsibilities:
//! - Define error variants for all configuration loading failures.
//! - Wrap conversion failures with the name of the offending variable.
//!
//! Does NOT handle:
//! - Encryption failures (see `encryption.rs`).
//! - Subscriber installation failures (see `logging.rs`).
//!
//! Invariants:
//! - All error variants include context for debugging (variable or file names).
//! - Dotenv errors NEVER include raw .env line contents to prevent secret leakage.

use std::io::ErrorKind;
use thiserror::Error;
use utilkit_convert::ConvertError;

/// Errors that can occur during configuration loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid value for {var}")]
    Convert {
        var: String,
        #[source]
        source: ConvertError,
    },

    #[error("Unknown timezone '{0}'. Use an IANA zone name such as Europe/Paris or an offset such as +07:00")]
    UnknownTimezone(String),

    /// Failed to parse a `.env` file due to invalid syntax.
    ///
    /// SAFETY: This error only includes the file name and the byte index of
    /// the parse failure, NOT the offending line content, to prevent leaking secrets.
    #[error(
        "Failed to parse {file} at position {error_index}. Hint: set DOTENV_DISABLED=1 to skip .env loading"
    )]
    DotenvParse { file: String, error_index: usize },

    /// Failed to read a `.env` file due to an I/O error.
    #[error("Failed to read {file}: {kind}")]
    DotenvIo { file: String, kind: ErrorKind },

    /// Unknown dotenv error (future variants from dotenvy crate).
    ///
    /// SAFETY: This error does not include any raw dotenv content.
    #[error("Failed to load {file}. Hint: set DOTENV_DISABLED=1 to skip .env loading")]
    DotenvUnknown { file: String },
}
