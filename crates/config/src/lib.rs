//! Runtime configuration for services built on `utilkit`.
//!
//! This crate loads `.env` files, reads typed settings from environment
//! variables, installs logging, and provides the secret and clock helpers
//! those settings feed.

pub mod clock;
pub mod constants;
pub mod encryption;
mod loader;
pub mod logging;
pub mod secrets;

pub use clock::{Clock, Zone, count_days, count_days_in_year, parse_timezone};
pub use encryption::{EncryptionError, Encryptor, SecretCipher, base64_decode, base64_encode};
pub use loader::{
    ConfigError, EnvLoader, api_root_path, app_name, app_version, env, env_opt, env_var_or_none,
    require,
};
pub use logging::{LogSettings, LoggingError, enable_log};
pub use secrets::{ClientSecrets, secret_var_name};

#[cfg(test)]
pub(crate) mod test_util {
    use std::sync::{Mutex, OnceLock};

    pub fn global_test_lock() -> &'static Mutex<()> {
        static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
        LOCK.get_or_init(|| Mutex::new(()))
    }
}
