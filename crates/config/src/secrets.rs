//! API client secrets.
//!
//! Responsibilities:
//! - Load the client list from `API_CLIENTS` and each client's secret from
//!   `API_{CLIENT}_SECRET`.
//! - Verify presented secrets without timing leaks.
//!
//! Does NOT handle:
//! - Issuing or rotating secrets.
//!
//! Invariants:
//! - Secrets are held as `SecretString` and never logged or displayed.
//! - Client names are trimmed; lookups are exact on the trimmed name.
//! - A listed client without a secret is skipped with a warning.

use secrecy::{ExposeSecret, SecretString};
use std::collections::BTreeMap;
use tracing::{info, warn};

use crate::constants::API_CLIENTS_VAR;
use crate::loader::{ConfigError, env_opt, env_var_or_none};

/// Name of the variable holding `client`'s secret.
///
/// ```
/// assert_eq!(utilkit_config::secret_var_name(" billing "), "API_BILLING_SECRET");
/// ```
pub fn secret_var_name(client: &str) -> String {
    format!("API_{}_SECRET", client.trim().to_uppercase())
}

/// Shared secrets of the API clients allowed to call this service.
#[derive(Default)]
pub struct ClientSecrets {
    secrets: BTreeMap<String, SecretString>,
}

impl std::fmt::Debug for ClientSecrets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientSecrets")
            .field("clients", &self.clients().collect::<Vec<_>>())
            .finish()
    }
}

impl ClientSecrets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the secrets of every client named in `API_CLIENTS`.
    ///
    /// # Errors
    /// Returns an error if `API_CLIENTS` is set but is not a valid list.
    pub fn from_env() -> Result<Self, ConfigError> {
        let clients: Vec<String> = env_opt(API_CLIENTS_VAR)?.unwrap_or_default();
        let mut secrets = Self::new();

        for client in clients.iter().map(|c| c.trim()).filter(|c| !c.is_empty()) {
            let var = secret_var_name(client);
            match env_var_or_none(&var) {
                Some(secret) => {
                    secrets = secrets.with_secret(client, SecretString::from(secret));
                }
                None => warn!(client = %client, var = %var, "API client has no secret, skipping"),
            }
        }

        if !secrets.is_empty() {
            info!(clients = ?secrets.clients().collect::<Vec<_>>(), "loaded API client secrets");
        }
        Ok(secrets)
    }

    /// Builder method to register a client's secret.
    pub fn with_secret(mut self, client: impl Into<String>, secret: SecretString) -> Self {
        let client: String = client.into();
        self.secrets.insert(client.trim().to_string(), secret);
        self
    }

    pub fn get(&self, client: &str) -> Option<&SecretString> {
        self.secrets.get(client)
    }

    /// Check `presented` against `client`'s secret in constant time.
    ///
    /// Unknown clients never verify.
    pub fn verify(&self, client: &str, presented: &str) -> bool {
        self.get(client).is_some_and(|secret| {
            constant_time_eq(secret.expose_secret().as_bytes(), presented.as_bytes())
        })
    }

    /// Registered client names in sorted order.
    pub fn clients(&self) -> impl Iterator<Item = &str> {
        self.secrets.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.secrets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.secrets.is_empty()
    }
}

/// Compare without short-circuiting on the first differing byte.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_constant_time_eq() {
        assert!(constant_time_eq(b"abc", b"abc"));
        assert!(!constant_time_eq(b"abc", b"abd"));
        assert!(!constant_time_eq(b"abc", b"abcd"));
        assert!(constant_time_eq(b"", b""));
    }

    #[test]
    fn test_verify() {
        let secrets = ClientSecrets::new().with_secret("web", SecretString::from("s3cret"));

        assert!(secrets.verify("web", "s3cret"));
        assert!(!secrets.verify("web", "s3cre"));
        assert!(!secrets.verify("mobile", "s3cret"));
    }

    #[test]
    fn test_debug_hides_secrets() {
        let secrets = ClientSecrets::new().with_secret("web", SecretString::from("s3cret"));
        let debug = format!("{secrets:?}");
        assert!(debug.contains("web"));
        assert!(!debug.contains("s3cret"));
    }

    #[test]
    #[serial]
    fn test_from_env() {
        let _lock = crate::test_util::global_test_lock().lock().unwrap();

        temp_env::with_vars(
            [
                ("API_CLIENTS", Some("web, mobile ,batch")),
                ("API_WEB_SECRET", Some("w-secret")),
                ("API_MOBILE_SECRET", Some("m-secret")),
                ("API_BATCH_SECRET", None),
            ],
            || {
                let secrets = ClientSecrets::from_env().unwrap();
                assert_eq!(secrets.len(), 2);
                assert_eq!(secrets.clients().collect::<Vec<_>>(), vec!["mobile", "web"]);
                assert!(secrets.verify("mobile", "m-secret"));
                assert!(secrets.get("batch").is_none());
            },
        );
    }

    #[test]
    #[serial]
    fn test_from_env_without_clients() {
        let _lock = crate::test_util::global_test_lock().lock().unwrap();

        temp_env::with_var("API_CLIENTS", None::<&str>, || {
            let secrets = ClientSecrets::from_env().unwrap();
            assert!(secrets.is_empty());
        });
    }
}
