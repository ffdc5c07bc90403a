//! Configuration file parsing for the server.
//!
//! Loads settings from TOML files including bind address, request timeout
//! and the Supabase connection. Supabase credentials may instead come from
//! the environment so they never need to live in the file.

use serde::Deserialize;
use ssb_store::SupabaseConfig;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Environment variable holding the Supabase project URL
pub const ENV_SUPABASE_URL: &str = "SUPABASE_URL";

/// Environment variable holding the service-role key
pub const ENV_SERVICE_ROLE_KEY: &str = "SUPABASE_SERVICE_ROLE_KEY";

/// Fallback environment variable holding the anon key
pub const ENV_ANON_KEY: &str = "SUPABASE_ANON_KEY";

/// Server configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse config TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Missing required field
    #[error("Missing required configuration field: {0}")]
    MissingField(String),
}

/// Server configuration loaded from TOML
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Bind address (e.g., "127.0.0.1")
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// Bind port (e.g., 8888)
    #[serde(default = "default_bind_port")]
    pub bind_port: u16,

    /// Deadline for a whole interaction check, in seconds (default: 15)
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Supabase connection
    #[serde(default = "default_supabase")]
    pub supabase: SupabaseConfig,
}

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

fn default_bind_port() -> u16 {
    8888
}

/// Default check deadline: 15 seconds
fn default_request_timeout() -> u64 {
    15
}

fn default_supabase() -> SupabaseConfig {
    SupabaseConfig::new("", "")
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            bind_port: default_bind_port(),
            request_timeout_secs: default_request_timeout(),
            supabase: default_supabase(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from a TOML file, then apply environment overrides
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let mut config: ServerConfig = toml::from_str(&contents)?;

        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;

        Ok(config)
    }

    /// Build configuration from defaults and the environment only
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = ServerConfig::default();

        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;

        Ok(config)
    }

    /// Override Supabase settings from `lookup` (normally the process environment)
    ///
    /// The service-role key takes precedence over the anon key. Empty values
    /// are ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = non_empty(ENV_SUPABASE_URL) {
            self.supabase.url = url;
        }
        if let Some(key) = non_empty(ENV_SERVICE_ROLE_KEY).or_else(|| non_empty(ENV_ANON_KEY)) {
            self.supabase.api_key = key;
        }
    }

    /// Check that required fields are present
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.supabase.url.trim().is_empty() {
            return Err(ConfigError::MissingField("supabase.url".to_string()));
        }
        if self.supabase.api_key.is_empty() {
            return Err(ConfigError::MissingField("supabase.api_key".to_string()));
        }
        Ok(())
    }

    /// Create a default configuration for testing
    pub fn default_test_config() -> Self {
        ServerConfig {
            bind_address: "127.0.0.1".to_string(),
            bind_port: 8888,
            request_timeout_secs: 15,
            supabase: SupabaseConfig::new("http://localhost:54321", "test-key-do-not-use-in-production"),
        }
    }

    /// Get the full bind address (address:port)
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.bind_port)
    }

    /// Check deadline as a duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
