//! Tests for the configuration loader.
//!
//! Responsibilities:
//! - Test the dotenv cascade order and precedence.
//! - Test typed environment access and its fallbacks.
//!
//! Does NOT handle:
//! - Literal parsing rules (tested in `utilkit-convert`).
//!
//! Invariants:
//! - Tests use `serial_test` to prevent environment variable pollution.
//! - Tests use `global_test_lock()` for additional synchronization.
//! - Every variable a test touches is listed in `temp_env::with_vars` so it
//!   is restored when the test ends, including values set by `.env` files.
//! - Temporary directories are cleaned up automatically via `tempfile`.

use std::sync::Mutex;

pub mod env_tests;

/// Returns the global test lock for environment variable isolation.
pub fn env_lock() -> &'static Mutex<()> {
    crate::test_util::global_test_lock()
}
