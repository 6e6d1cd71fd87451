use std::{env, time::Duration};

use resplend_common::non_blank;

const DEFAULT_PORT: u16 = 8000;
const DEFAULT_SERVICE_NAME: &str = "Resplend";
const DEFAULT_DATABASE_TIMEOUT_SECS: u64 = 5;

#[derive(Clone, Debug)]
pub struct ServiceConfig {
    pub port: u16,
    pub service_name: String,
    pub database: DatabaseConfig,
}

#[derive(Clone, Debug)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    pub name: Option<String>,
    pub server_selection_timeout: Duration,
}

impl DatabaseConfig {
    pub fn url_set(&self) -> bool {
        self.url.is_some()
    }

    pub fn name_set(&self) -> bool {
        self.name.is_some()
    }
}

impl ServiceConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup; missing or unparsable values
    /// fall back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let setting = |key: &str| non_blank(lookup(key));

        let port = setting("PORT")
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);
        let service_name =
            setting("SERVICE_NAME").unwrap_or_else(|| DEFAULT_SERVICE_NAME.to_string());
        let timeout_secs = setting("DATABASE_TIMEOUT_SECS")
            .and_then(|value| value.parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .unwrap_or(DEFAULT_DATABASE_TIMEOUT_SECS);

        Self {
            port,
            service_name,
            database: DatabaseConfig {
                url: setting("DATABASE_URL"),
                name: setting("DATABASE_NAME"),
                server_selection_timeout: Duration::from_secs(timeout_secs),
            },
        }
    }
}
