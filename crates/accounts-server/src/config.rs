//! Configuration management

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

// ============================================================================
// Server Configuration Constants
// ============================================================================

/// Default server host binding.
pub const DEFAULT_SERVER_HOST: &str = "127.0.0.1";

/// Default server port.
pub const DEFAULT_SERVER_PORT: u16 = 8080;

/// Default shutdown timeout in seconds.
pub const DEFAULT_SHUTDOWN_TIMEOUT_SECS: u64 = 30;

/// Default public URL used by the startup self-probe.
pub const DEFAULT_PUBLIC_URL: &str = "http://127.0.0.1:8080";

/// Default number of self-probe attempts.
pub const DEFAULT_MAX_PING_COUNT: u32 = 10;

/// Default database URL for local development.
pub const DEFAULT_DATABASE_URL: &str = "postgresql://localhost/accounts";

/// Default maximum database connections in the pool.
pub const DEFAULT_DATABASE_MAX_CONNECTIONS: u32 = 10;

/// Default minimum database connections in the pool.
pub const DEFAULT_DATABASE_MIN_CONNECTIONS: u32 = 2;

/// Default database connection timeout in seconds.
pub const DEFAULT_DATABASE_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Default database idle timeout in seconds (10 minutes).
pub const DEFAULT_DATABASE_IDLE_TIMEOUT_SECS: u64 = 600;

/// Default CORS allowed origin for local development.
pub const DEFAULT_CORS_ALLOWED_ORIGIN: &str = "http://localhost:3000";

/// Default token lifetime (one day).
pub const DEFAULT_JWT_TTL_SECS: u64 = 86_400;

/// Longest accepted token lifetime (one year).
pub const MAX_JWT_TTL_SECS: u64 = 365 * 86_400;

/// Default deadline for enriching one listing page.
pub const DEFAULT_ENRICH_TIMEOUT_MS: u64 = 5_000;

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub cors: CorsConfig,
    pub auth: AuthConfig,
    pub enrich: EnrichConfig,
}

/// Server-specific configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub shutdown_timeout_secs: u64,
    /// Base URL the self-probe polls after startup
    pub public_url: String,
    pub max_ping_count: u32,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout_secs: u64,
    pub idle_timeout_secs: u64,
}

/// CORS configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
    pub allow_credentials: bool,
}

/// Token signing configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(skip_serializing)]
    pub jwt_secret: String,
    pub jwt_ttl_secs: u64,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"<redacted>")
            .field("jwt_ttl_secs", &self.jwt_ttl_secs)
            .finish()
    }
}

/// Listing enrichment configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrichConfig {
    /// Zero disables the deadline
    pub timeout_ms: u64,
}

impl EnrichConfig {
    pub fn deadline(&self) -> Option<Duration> {
        (self.timeout_ms > 0).then(|| Duration::from_millis(self.timeout_ms))
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

impl Config {
    /// Load configuration from environment and defaults
    ///
    /// Variables are read from `env_file` when given, otherwise from `.env`
    /// if present. Values already in the process environment win.
    pub fn load(env_file: Option<&Path>) -> anyhow::Result<Self> {
        match env_file {
            Some(path) => {
                dotenvy::from_path(path).map_err(|e| {
                    anyhow::anyhow!("Failed to read config file {}: {}", path.display(), e)
                })?;
            },
            None => {
                dotenvy::dotenv().ok();
            },
        }

        let config = Self::from_env();
        config.validate()?;

        Ok(config)
    }

    /// Build configuration from the current process environment
    pub fn from_env() -> Self {
        Config {
            server: ServerConfig {
                host: std::env::var("ACCOUNTS_HOST")
                    .unwrap_or_else(|_| DEFAULT_SERVER_HOST.to_string()),
                port: env_or("ACCOUNTS_PORT", DEFAULT_SERVER_PORT),
                shutdown_timeout_secs: env_or(
                    "ACCOUNTS_SHUTDOWN_TIMEOUT",
                    DEFAULT_SHUTDOWN_TIMEOUT_SECS,
                ),
                public_url: std::env::var("ACCOUNTS_URL")
                    .unwrap_or_else(|_| DEFAULT_PUBLIC_URL.to_string()),
                max_ping_count: env_or("ACCOUNTS_MAX_PING_COUNT", DEFAULT_MAX_PING_COUNT),
            },
            database: DatabaseConfig {
                url: std::env::var("DATABASE_URL")
                    .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),
                max_connections: env_or(
                    "DATABASE_MAX_CONNECTIONS",
                    DEFAULT_DATABASE_MAX_CONNECTIONS,
                ),
                min_connections: env_or(
                    "DATABASE_MIN_CONNECTIONS",
                    DEFAULT_DATABASE_MIN_CONNECTIONS,
                ),
                connect_timeout_secs: env_or(
                    "DATABASE_CONNECT_TIMEOUT",
                    DEFAULT_DATABASE_CONNECT_TIMEOUT_SECS,
                ),
                idle_timeout_secs: env_or(
                    "DATABASE_IDLE_TIMEOUT",
                    DEFAULT_DATABASE_IDLE_TIMEOUT_SECS,
                ),
            },
            cors: CorsConfig {
                allowed_origins: std::env::var("CORS_ALLOWED_ORIGINS")
                    .unwrap_or_else(|_| DEFAULT_CORS_ALLOWED_ORIGIN.to_string())
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect(),
                allow_credentials: env_or("CORS_ALLOW_CREDENTIALS", true),
            },
            auth: AuthConfig {
                jwt_secret: std::env::var("JWT_SECRET").unwrap_or_default(),
                jwt_ttl_secs: env_or("JWT_TTL_SECS", DEFAULT_JWT_TTL_SECS),
            },
            enrich: EnrichConfig {
                timeout_ms: env_or("ENRICH_TIMEOUT_MS", DEFAULT_ENRICH_TIMEOUT_MS),
            },
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.server.port == 0 {
            anyhow::bail!("Server port must be greater than 0");
        }

        if self.database.url.is_empty() {
            anyhow::bail!("Database URL cannot be empty");
        }

        if self.database.max_connections == 0 {
            anyhow::bail!("Database max_connections must be greater than 0");
        }

        if self.database.min_connections > self.database.max_connections {
            anyhow::bail!(
                "Database min_connections ({}) cannot be greater than max_connections ({})",
                self.database.min_connections,
                self.database.max_connections
            );
        }

        if self.auth.jwt_secret.is_empty() {
            anyhow::bail!("JWT_SECRET must be set");
        }

        if self.auth.jwt_ttl_secs == 0 || self.auth.jwt_ttl_secs > MAX_JWT_TTL_SECS {
            anyhow::bail!(
                "JWT_TTL_SECS must be between 1 and {} seconds",
                MAX_JWT_TTL_SECS
            );
        }

        if self.cors.allowed_origins.is_empty() {
            tracing::warn!("No CORS origins configured - all origins will be allowed");
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: DEFAULT_SERVER_HOST.to_string(),
                port: DEFAULT_SERVER_PORT,
                shutdown_timeout_secs: DEFAULT_SHUTDOWN_TIMEOUT_SECS,
                public_url: DEFAULT_PUBLIC_URL.to_string(),
                max_ping_count: DEFAULT_MAX_PING_COUNT,
            },
            database: DatabaseConfig {
                url: DEFAULT_DATABASE_URL.to_string(),
                max_connections: DEFAULT_DATABASE_MAX_CONNECTIONS,
                min_connections: DEFAULT_DATABASE_MIN_CONNECTIONS,
                connect_timeout_secs: DEFAULT_DATABASE_CONNECT_TIMEOUT_SECS,
                idle_timeout_secs: DEFAULT_DATABASE_IDLE_TIMEOUT_SECS,
            },
            cors: CorsConfig {
                allowed_origins: vec![DEFAULT_CORS_ALLOWED_ORIGIN.to_string()],
                allow_credentials: true,
            },
            auth: AuthConfig {
                jwt_secret: String::new(),
                jwt_ttl_secs: DEFAULT_JWT_TTL_SECS,
            },
            enrich: EnrichConfig {
                timeout_ms: DEFAULT_ENRICH_TIMEOUT_MS,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> Config {
        let mut config = Config::default();
        config.auth.jwt_secret = "secret".to_string();
        config
    }

    #[test]
    fn test_default_requires_secret() {
        let err = Config::default().validate().unwrap_err();
        assert!(err.to_string().contains("JWT_SECRET"));
        assert!(valid().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = valid();
        config.server.port = 0;
        assert!(config.validate().is_err());

        let mut config = valid();
        config.database.url.clear();
        assert!(config.validate().is_err());

        let mut config = valid();
        config.database.min_connections = 20;
        assert!(config.validate().is_err());

        let mut config = valid();
        config.auth.jwt_ttl_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_bounds_token_lifetime() {
        let mut config = valid();
        config.auth.jwt_ttl_secs = MAX_JWT_TTL_SECS;
        assert!(config.validate().is_ok());

        config.auth.jwt_ttl_secs = MAX_JWT_TTL_SECS + 1;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("JWT_TTL_SECS"));

        config.auth.jwt_ttl_secs = u64::MAX;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_enrich_deadline() {
        let mut enrich = EnrichConfig { timeout_ms: 250 };
        assert_eq!(enrich.deadline(), Some(Duration::from_millis(250)));
        enrich.timeout_ms = 0;
        assert_eq!(enrich.deadline(), None);
    }

    #[test]
    fn test_debug_redacts_secret() {
        let rendered = format!("{:?}", valid().auth);
        assert!(!rendered.contains("\"secret\""));
        assert!(rendered.contains("<redacted>"));
    }
}
