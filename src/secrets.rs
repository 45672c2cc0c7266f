//! Module for the retrieval of credentials kept out of the process configuration.

use tracing::debug;

use crate::Error;

/// Source of named secrets, e.g. the password of the reference store.
pub trait SecretStore {
    fn get_secret(&self, name: &str) -> Result<String, Error>;
}

/// Reads secrets from environment variables. The parameter name is upper-cased and every
/// character other than a letter or digit becomes `_`, so `data_migration-db-password`
/// is read from `DATA_MIGRATION_DB_PASSWORD`.
#[derive(Debug, Default, Clone, Copy)]
pub struct EnvSecretStore;

impl SecretStore for EnvSecretStore {
    fn get_secret(&self, name: &str) -> Result<String, Error> {
        let var = env_var_name(name);
        debug!(secret = name, var = %var, "Reading secret from the environment");
        match std::env::var(&var) {
            Ok(value) if !value.is_empty() => Ok(value),
            Ok(_) => Err(Error::Secret(format!("secret {name} ({var}) is empty"))),
            Err(e) => Err(Error::Secret(format!("secret {name} ({var}): {e}"))),
        }
    }
}

pub(crate) fn env_var_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect()
}
