use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;
use url::Url;

use crate::error::ClientError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub api: ApiConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base address every resource path is appended to
    pub base_url: String,
    pub log_requests: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Prefix joined with the relative path returned by the upload endpoint
    pub public_url: String,
}

impl AppConfig {
    /// Explicit configuration, used by embedders and tests
    pub fn new(api_base_url: impl Into<String>, storage_public_url: impl Into<String>) -> Self {
        Self {
            api: ApiConfig {
                base_url: api_base_url.into(),
                log_requests: false,
            },
            storage: StorageConfig {
                public_url: storage_public_url.into(),
            },
            ..Self::development()
        }
    }

    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        if let Ok(v) = env::var("PARTY_API_BASE_URL") {
            self.api.base_url = v.trim().to_string();
        }
        if let Ok(v) = env::var("PARTY_LOG_REQUESTS") {
            self.api.log_requests = v.parse().unwrap_or(self.api.log_requests);
        }
        if let Ok(v) = env::var("PARTY_STORAGE_PUBLIC_URL") {
            self.storage.public_url = v.trim().to_string();
        }

        self
    }

    /// Both addresses must be absolute http(s) URLs
    pub fn validate(&self) -> Result<(), ClientError> {
        check_http_url("PARTY_API_BASE_URL", &self.api.base_url)?;
        check_http_url("PARTY_STORAGE_PUBLIC_URL", &self.storage.public_url)?;
        Ok(())
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            api: ApiConfig {
                base_url: "http://localhost:8080/api".to_string(),
                log_requests: true,
            },
            storage: StorageConfig {
                public_url: "http://localhost:9000/party-media".to_string(),
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            api: ApiConfig {
                base_url: "https://staging-api.example.org/api".to_string(),
                log_requests: true,
            },
            storage: StorageConfig {
                public_url: "https://staging-media.example.org".to_string(),
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            api: ApiConfig {
                base_url: "https://api.example.org/api".to_string(),
                log_requests: false,
            },
            storage: StorageConfig {
                public_url: "https://media.example.org".to_string(),
            },
        }
    }
}

fn check_http_url(name: &str, value: &str) -> Result<(), ClientError> {
    let parsed = Url::parse(value)
        .map_err(|e| ClientError::Config(format!("{} is not a valid URL ({}): {}", name, e, value)))?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(ClientError::Config(format!(
            "{} must use http or https, got '{}'",
            name, other
        ))),
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}
