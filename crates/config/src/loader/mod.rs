//! Configuration loader for environment variables and `.env` files.
//!
//! Responsibilities:
//! - Load the profile-specific `.env` cascade into the process environment.
//! - Read typed settings from environment variables.
//! - Expose the application identity settings (name, version, root path).
//!
//! Does NOT handle:
//! - Parsing literals (delegated to `utilkit-convert`).
//! - Logging setup (see `logging.rs`).
//!
//! Invariants / Assumptions:
//! - The process environment takes precedence over every `.env` file.
//! - `load_dotenv()` must be called explicitly to enable `.env` file loading.
//! - The `DOTENV_DISABLED` variable is checked before any file is read.

mod app;
mod builder;
mod env;
mod error;

pub use app::{api_root_path, app_name, app_version};
pub use builder::EnvLoader;
pub use env::{env, env_opt, env_var_or_none, require};
pub use error::ConfigError;

#[cfg(test)]
mod tests;
