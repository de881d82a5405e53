//! Configuration management
//!
//! Everything comes from environment variables, with a `.env` file loaded
//! first when present. Unset or unparsable values fall back to defaults.

use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::catalog::cache::{DEFAULT_USER_CACHE_CAPACITY, DEFAULT_USER_CACHE_TTL_SECS};
use crate::catalog::http::DEFAULT_CATALOG_TIMEOUT_SECS;
use crate::features::DATAREQUESTS_PER_PAGE;

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_SERVER_HOST: &str = "127.0.0.1";

pub const DEFAULT_SERVER_PORT: u16 = 8000;

pub const DEFAULT_SHUTDOWN_TIMEOUT_SECS: u64 = 30;

/// Database URL for local development
pub const DEFAULT_DATABASE_URL: &str = "postgresql://localhost/datarequests";

pub const DEFAULT_DATABASE_MAX_CONNECTIONS: u32 = 10;

pub const DEFAULT_DATABASE_MIN_CONNECTIONS: u32 = 2;

pub const DEFAULT_DATABASE_CONNECT_TIMEOUT_SECS: u64 = 10;

/// 10 minutes
pub const DEFAULT_DATABASE_IDLE_TIMEOUT_SECS: u64 = 600;

/// Catalog instance for local development
pub const DEFAULT_CATALOG_URL: &str = "http://localhost:5000";

pub const DEFAULT_CORS_ALLOWED_ORIGIN: &str = "http://localhost:3000";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub cors: CorsConfig,
    pub catalog: CatalogConfig,
    pub cache: CacheConfig,
    pub listing: ListingConfig,
    pub callers: CallerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub shutdown_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout_secs: u64,
    pub idle_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
    pub allow_credentials: bool,
}

impl CorsConfig {
    pub fn allows_any_origin(&self) -> bool {
        self.allowed_origins.is_empty() || self.allowed_origins.iter().any(|o| o == "*")
    }
}

/// Where users, organizations and datasets are looked up
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    pub url: String,
    /// Sent as the `Authorization` header; never serialized
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

impl CatalogConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// User enrichment cache
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    pub capacity: usize,
    pub ttl_secs: u64,
}

impl CacheConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingConfig {
    pub per_page: usize,
}

/// How far the caller identity headers are believed
///
/// With a `proxy_secret`, identity headers count only on requests that carry
/// the same secret in `X-Catalog-Proxy-Secret`; other requests are anonymous.
/// The sysadmin header is ignored unless `trust_sysadmin_header` is set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CallerConfig {
    #[serde(skip_serializing)]
    pub proxy_secret: Option<String>,
    pub trust_sysadmin_header: bool,
}

fn env_string(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    env_string(key)
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}

impl Config {
    /// Load configuration from environment and defaults
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config = Self::from_env();
        config.validate()?;

        Ok(config)
    }

    /// Read the environment without touching `.env`
    pub fn from_env() -> Self {
        Config {
            server: ServerConfig {
                host: env_string("DATAREQ_HOST").unwrap_or_else(|| DEFAULT_SERVER_HOST.to_string()),
                port: env_or("DATAREQ_PORT", DEFAULT_SERVER_PORT),
                shutdown_timeout_secs: env_or("DATAREQ_SHUTDOWN_TIMEOUT", DEFAULT_SHUTDOWN_TIMEOUT_SECS),
            },
            database: DatabaseConfig {
                url: env_string("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
                max_connections: env_or("DATABASE_MAX_CONNECTIONS", DEFAULT_DATABASE_MAX_CONNECTIONS),
                min_connections: env_or("DATABASE_MIN_CONNECTIONS", DEFAULT_DATABASE_MIN_CONNECTIONS),
                connect_timeout_secs: env_or(
                    "DATABASE_CONNECT_TIMEOUT",
                    DEFAULT_DATABASE_CONNECT_TIMEOUT_SECS,
                ),
                idle_timeout_secs: env_or("DATABASE_IDLE_TIMEOUT", DEFAULT_DATABASE_IDLE_TIMEOUT_SECS),
            },
            cors: CorsConfig {
                allowed_origins: env_string("CORS_ALLOWED_ORIGINS")
                    .unwrap_or_else(|| DEFAULT_CORS_ALLOWED_ORIGIN.to_string())
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect(),
                allow_credentials: env_or("CORS_ALLOW_CREDENTIALS", true),
            },
            catalog: CatalogConfig {
                url: env_string("CATALOG_URL").unwrap_or_else(|| DEFAULT_CATALOG_URL.to_string()),
                api_key: env_string("CATALOG_API_KEY"),
                timeout_secs: env_or("CATALOG_TIMEOUT_SECS", DEFAULT_CATALOG_TIMEOUT_SECS),
            },
            cache: CacheConfig {
                capacity: env_or("USER_CACHE_CAPACITY", DEFAULT_USER_CACHE_CAPACITY),
                ttl_secs: env_or("USER_CACHE_TTL_SECS", DEFAULT_USER_CACHE_TTL_SECS),
            },
            listing: ListingConfig {
                per_page: env_or("DATAREQUESTS_PER_PAGE", DATAREQUESTS_PER_PAGE),
            },
            callers: CallerConfig {
                proxy_secret: env_string("CALLER_PROXY_SECRET"),
                trust_sysadmin_header: env_or("TRUST_SYSADMIN_HEADER", false),
            },
        }
    }

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

        if !self.catalog.url.starts_with("http://") && !self.catalog.url.starts_with("https://") {
            anyhow::bail!("Catalog URL must be an http(s) URL, got '{}'", self.catalog.url);
        }

        if self.catalog.timeout_secs == 0 {
            anyhow::bail!("Catalog timeout must be greater than 0");
        }

        if self.cache.capacity == 0 {
            anyhow::bail!("User cache capacity must be greater than 0");
        }

        if self.listing.per_page == 0 {
            anyhow::bail!("Data requests per page must be greater than 0");
        }

        if self.callers.proxy_secret.is_none() {
            tracing::warn!("No CALLER_PROXY_SECRET set - caller headers are accepted from any client");
        }

        if self.cors.allows_any_origin() {
            tracing::warn!("No specific CORS origins configured - all origins will be allowed");
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
            catalog: CatalogConfig {
                url: DEFAULT_CATALOG_URL.to_string(),
                api_key: None,
                timeout_secs: DEFAULT_CATALOG_TIMEOUT_SECS,
            },
            cache: CacheConfig {
                capacity: DEFAULT_USER_CACHE_CAPACITY,
                ttl_secs: DEFAULT_USER_CACHE_TTL_SECS,
            },
            listing: ListingConfig {
                per_page: DATAREQUESTS_PER_PAGE,
            },
            callers: CallerConfig::default(),
        }
    }
}
