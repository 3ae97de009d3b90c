use serde::Deserialize;

use crate::domain::DomainError;
use crate::infrastructure::auth::{
    CookiePolicy, JwtConfig, DEFAULT_ACCESS_COOKIE, DEFAULT_REFRESH_COOKIE,
};

/// Application configuration shared by both services
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub auth: AuthConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    /// Account service port
    pub port: u16,
    /// Catalog service port
    pub products_port: u16,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub access_token_minutes: i64,
    pub refresh_token_days: i64,
    /// Development mode; cookies lose the `Secure` attribute
    pub debug: bool,
    pub access_cookie_name: String,
    pub refresh_cookie_name: String,
}

#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Memory,
    Postgres,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub database_url: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            products_port: 8001,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            access_token_minutes: 15,
            refresh_token_days: 7,
            debug: false,
            access_cookie_name: DEFAULT_ACCESS_COOKIE.to_string(),
            refresh_cookie_name: DEFAULT_REFRESH_COOKIE.to_string(),
        }
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"[hidden]")
            .field("access_token_minutes", &self.access_token_minutes)
            .field("refresh_token_days", &self.refresh_token_days)
            .field("debug", &self.debug)
            .field("access_cookie_name", &self.access_cookie_name)
            .field("refresh_cookie_name", &self.refresh_cookie_name)
            .finish()
    }
}

impl AuthConfig {
    /// Signing configuration for the token issuer
    pub fn jwt_config(&self) -> JwtConfig {
        JwtConfig::new(
            self.jwt_secret.clone(),
            self.access_token_minutes,
            self.refresh_token_days,
        )
    }

    /// Cookie attributes derived from the token lifetimes and debug switch
    pub fn cookie_policy(&self) -> CookiePolicy {
        CookiePolicy::new(self.access_token_minutes, self.refresh_token_days, self.debug)
            .with_cookie_names(&self.access_cookie_name, &self.refresh_cookie_name)
    }
}

impl StorageConfig {
    pub fn database_url(&self) -> Result<&str, DomainError> {
        self.database_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| {
                DomainError::configuration("storage.database_url is required for postgres")
            })
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
