use std::env;

use auth_core::MemoryBudget;
use chrono::Duration;
use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

/// Application configuration for login-service.
///
/// Loaded from configuration files with environment variable overrides.
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub jwt: JwtConfig,
    pub service_token: ServiceTokenConfig,
    pub directory: DirectoryConfig,
    pub cookie: CookieConfig,
    #[serde(default)]
    pub memory: MemoryConfig,
}

/// HTTP server configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
}

/// Token signing configuration shared by user and service tokens.
#[derive(Debug, Deserialize, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub user_token_lifetime_secs: i64,
}

/// Lifetime of the service's own directory token.
#[derive(Debug, Deserialize, Clone)]
pub struct ServiceTokenConfig {
    pub lifetime_secs: i64,
    pub refresh_margin_secs: i64,
}

/// GraphQL user directory endpoint.
#[derive(Debug, Deserialize, Clone)]
pub struct DirectoryConfig {
    pub endpoint: String,
    pub timeout_secs: u64,
}

/// Session cookie carrying the user token.
#[derive(Debug, Deserialize, Clone)]
pub struct CookieConfig {
    pub name: String,
    pub domain: String,
    pub secure: bool,
}

/// Memory guard for password derivation.
///
/// Without `available_kib` the guard is off.
#[derive(Debug, Deserialize, Clone)]
pub struct MemoryConfig {
    pub available_kib: Option<u64>,
    #[serde(default = "default_safety_factor")]
    pub safety_factor: u64,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            available_kib: None,
            safety_factor: default_safety_factor(),
        }
    }
}

fn default_safety_factor() -> u64 {
    2
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (JWT__SECRET, DIRECTORY__ENDPOINT, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let configuration = ConfigBuilder::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Example: JWT__SECRET=... overrides jwt.secret
            .add_source(Environment::default().separator("__"))
            .build()?;

        configuration.try_deserialize()
    }
}

impl JwtConfig {
    pub fn user_token_lifetime(&self) -> Duration {
        Duration::seconds(self.user_token_lifetime_secs)
    }
}

impl ServiceTokenConfig {
    pub fn lifetime(&self) -> Duration {
        Duration::seconds(self.lifetime_secs)
    }

    pub fn refresh_margin(&self) -> Duration {
        Duration::seconds(self.refresh_margin_secs)
    }
}

impl DirectoryConfig {
    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.timeout_secs)
    }
}

impl MemoryConfig {
    pub fn budget(&self) -> Option<MemoryBudget> {
        self.available_kib
            .map(|available_kib| MemoryBudget::new(available_kib, self.safety_factor))
    }
}
