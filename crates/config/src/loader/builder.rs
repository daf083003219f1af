//! Dotenv cascade loader.
//!
//! Responsibilities:
//! - Resolve the active profile (builder, then `APP_ENV`, then `development`).
//! - Load the profile's `.env` files in priority order with `dotenvy`.
//!
//! Does NOT handle:
//! - Reading typed values from the environment (see env.rs).
//!
//! Invariants / Assumptions:
//! - Variables that are already set are NEVER overwritten, so earlier files
//!   in the cascade take precedence over later ones and the process
//!   environment takes precedence over all of them.
//! - `.env.local` is skipped for the `test` profile.
//! - Missing files are silently ignored.
//! - The `DOTENV_DISABLED` variable is checked before any file is read.

use std::path::{Path, PathBuf};
use tracing::debug;

use super::env::env_var_or_none;
use super::error::ConfigError;
use crate::constants::{DEFAULT_PROFILE, DOTENV_DISABLED_VAR, PROFILE_VAR, TEST_PROFILE};

/// Loads `.env` files for a profile into the process environment.
#[derive(Debug, Default, Clone)]
pub struct EnvLoader {
    profile: Option<String>,
    dir: Option<PathBuf>,
}

impl EnvLoader {
    /// Create a loader for the profile named by `APP_ENV` in the current directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the profile explicitly, overriding `APP_ENV`.
    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = Some(profile.into());
        self
    }

    /// Read `.env` files from `dir` instead of the current directory.
    pub fn with_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dir = Some(dir.into());
        self
    }

    /// The active profile name.
    pub fn profile(&self) -> String {
        self.profile
            .clone()
            .or_else(|| env_var_or_none(PROFILE_VAR))
            .unwrap_or_else(|| DEFAULT_PROFILE.to_string())
    }

    /// File names of the cascade, highest priority first.
    ///
    /// For profile `production`: `.env.production.local`, `.env.local`,
    /// `.env.production`, `.env`.
    pub fn cascade(&self) -> Vec<String> {
        let profile = self.profile();
        let mut files = vec![format!(".env.{profile}.local")];
        if profile != TEST_PROFILE {
            files.push(".env.local".to_string());
        }
        files.push(format!(".env.{profile}"));
        files.push(".env".to_string());
        files
    }

    /// Check if dotenv loading is disabled via environment variable.
    fn dotenv_disabled() -> bool {
        matches!(
            std::env::var(DOTENV_DISABLED_VAR).ok().as_deref(),
            Some("true") | Some("1")
        )
    }

    fn path_of(&self, file: &str) -> PathBuf {
        match &self.dir {
            Some(dir) => dir.join(file),
            None => Path::new(file).to_path_buf(),
        }
    }

    /// Load every file of the cascade that exists.
    ///
    /// If `DOTENV_DISABLED` is set to "true" or "1", no file is read.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - A file exists but has invalid syntax (`ConfigError::DotenvParse`)
    /// - A file exists but cannot be read due to I/O errors (`ConfigError::DotenvIo`)
    ///
    /// SAFETY: Error messages never include raw .env line contents to prevent secret leakage.
    pub fn load_dotenv(self) -> Result<Self, ConfigError> {
        if Self::dotenv_disabled() {
            debug!("dotenv loading disabled");
            return Ok(self);
        }

        for file in self.cascade() {
            let path = self.path_of(&file);
            match dotenvy::from_path(&path) {
                Ok(()) => debug!(file = %file, "loaded env file"),
                Err(e) if Self::is_not_found(&e) => {}
                Err(dotenvy::Error::LineParse(_, idx)) => {
                    return Err(ConfigError::DotenvParse {
                        file,
                        error_index: idx,
                    });
                }
                Err(dotenvy::Error::Io(io_err)) => {
                    return Err(ConfigError::DotenvIo {
                        file,
                        kind: io_err.kind(),
                    });
                }
                Err(_) => return Err(ConfigError::DotenvUnknown { file }),
            }
        }
        Ok(self)
    }

    /// Check if a dotenv error indicates the file was not found.
    fn is_not_found(err: &dotenvy::Error) -> bool {
        matches!(
            err,
            dotenvy::Error::Io(io_err) if io_err.kind() == std::io::ErrorKind::NotFound
        )
    }
}
