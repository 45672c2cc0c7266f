//! Module for the process configuration, read once from the environment at startup.

use std::time::Duration;

use dotenvy::dotenv;
use serde::Deserialize;

use crate::{Error, dispatch::Endpoint, payload::PayloadStatics, store::StoreTarget};

#[derive(Clone, Deserialize, Debug)]
pub struct Config {
    pub db_host: String,
    #[serde(default = "default_db_port")]
    pub db_port: u16,
    pub db_user: String,
    pub db_name: String,
    #[serde(default = "default_db_password_param")]
    pub db_password_param: String,
    #[serde(default = "default_db_connect_timeout_secs")]
    pub db_connect_timeout_secs: u64,
    #[serde(default = "default_db_statement_timeout_ms")]
    pub db_statement_timeout_ms: u64,
    #[serde(default = "default_client_ids")]
    pub client_ids: Vec<u64>,

    #[serde(default = "default_tenant_id")]
    pub tenant_id: String,
    pub application_id: String,
    pub sender_identity: String,
    pub sender_name: String,
    #[serde(alias = "templatename")]
    pub template_name: String,

    pub api_url: String,
    pub api_key: String,
    #[serde(default = "default_api_timeout_secs")]
    pub api_timeout_secs: u64,

    #[serde(default = "default_object_store_root")]
    pub object_store_root: String,
}

fn default_db_port() -> u16 {
    5432
}

fn default_db_password_param() -> String {
    "data_migration-db-password".to_string()
}

fn default_db_connect_timeout_secs() -> u64 {
    10
}

fn default_db_statement_timeout_ms() -> u64 {
    10_000
}

fn default_client_ids() -> Vec<u64> {
    vec![1016498, 1016568, 1024226]
}

fn default_tenant_id() -> String {
    "1024226".to_string()
}

fn default_api_timeout_secs() -> u64 {
    30
}

fn default_object_store_root() -> String {
    ".".to_string()
}

impl Config {
    /// Loads the configuration from the environment, after reading an optional `.env` file.
    pub fn load() -> Result<Self, Error> {
        dotenv().ok();

        let config = envy::from_env::<Self>().map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Builds the configuration from explicit variables instead of the process environment.
    pub fn from_vars(vars: impl IntoIterator<Item = (String, String)>) -> Result<Self, Error> {
        let config = envy::from_iter::<_, Self>(vars).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), Error> {
        let required = [
            ("db_host", &self.db_host),
            ("db_user", &self.db_user),
            ("db_name", &self.db_name),
            ("tenant_id", &self.tenant_id),
            ("application_id", &self.application_id),
            ("sender_identity", &self.sender_identity),
            ("sender_name", &self.sender_name),
            ("template_name", &self.template_name),
            ("api_url", &self.api_url),
        ];
        if let Some((name, _)) = required.iter().find(|(_, value)| value.is_empty()) {
            return Err(Error::Config(format!("{name} must not be empty")));
        }
        if self.client_ids.is_empty() {
            return Err(Error::Config("client_ids must not be empty".to_string()));
        }
        Ok(())
    }

    pub fn store_target(&self) -> StoreTarget {
        StoreTarget {
            host: self.db_host.clone(),
            port: self.db_port,
            user: self.db_user.clone(),
            database: self.db_name.clone(),
            password_param: self.db_password_param.clone(),
            client_ids: self.client_ids.clone(),
            connect_timeout: Duration::from_secs(self.db_connect_timeout_secs),
            statement_timeout: Duration::from_millis(self.db_statement_timeout_ms),
        }
    }

    pub fn payload_statics(&self) -> PayloadStatics {
        PayloadStatics {
            tenant_id: self.tenant_id.clone(),
            application_id: self.application_id.clone(),
            sender_identity: self.sender_identity.clone(),
            sender_name: self.sender_name.clone(),
            template_name: self.template_name.clone(),
        }
    }

    pub fn endpoint(&self) -> Endpoint {
        Endpoint {
            url: self.api_url.clone(),
            api_key: self.api_key.clone(),
            timeout: Duration::from_secs(self.api_timeout_secs),
        }
    }
}
