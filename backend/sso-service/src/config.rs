//! Configuration management for SSO Service
//!
//! Loads settings from:
//! 1. Environment variables
//! 2. .env file (local development fallback)
//!
//! # Example
//!
//! ```no_run
//! use sso_service::config::Settings;
//!
//! fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     println!("gRPC port: {}", settings.server.port);
//!     Ok(())
//! }
//! ```

use anyhow::{Context, Result};
use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use token_core::{TokenSecrets, TokenTtls};

/// Application settings
#[derive(Debug, Clone)]
pub struct Settings {
    pub database: DatabaseSettings,
    pub server: ServerSettings,
    pub tokens: TokenSettings,
    /// When set, every RPC must carry a matching `x-internal-api-key`
    pub internal_grpc_api_key: Option<String>,
}

impl Settings {
    /// Load settings from the environment, filling gaps from a `.env` file
    pub fn load() -> Result<Self> {
        // Variables already in the environment take precedence over .env
        dotenvy::dotenv().ok();
        Self::from_env()
    }

    pub fn from_env() -> Result<Self> {
        Ok(Settings {
            database: DatabaseSettings::from_env()?,
            server: ServerSettings::from_env()?,
            tokens: TokenSettings::from_env()?,
            internal_grpc_api_key: env::var("INTERNAL_GRPC_API_KEY")
                .ok()
                .filter(|key| !key.is_empty()),
        })
    }
}

/// Database connection settings
#[derive(Debug, Clone)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: u32,
    /// Seconds to wait for a pooled connection
    pub acquire_timeout: u64,
}

impl DatabaseSettings {
    fn from_env() -> Result<Self> {
        Ok(Self {
            url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            max_connections: parse_env("DATABASE_MAX_CONNECTIONS", 10)?,
            acquire_timeout: parse_env("DATABASE_ACQUIRE_TIMEOUT", 5)?,
        })
    }
}

/// Server settings
#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub host: String,
    /// gRPC port
    pub port: u16,
    /// Port of the HTTP side server (`/health`, `/metrics`)
    pub metrics_port: u16,
}

impl ServerSettings {
    fn from_env() -> Result<Self> {
        Ok(Self {
            host: env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: parse_env("SERVER_PORT", 50051)?,
            metrics_port: parse_env("SERVER_METRICS_PORT", 9090)?,
        })
    }
}

/// Token signing secrets and lifetimes
///
/// Secrets and TTLs are validated while loading, so a bad value aborts
/// startup instead of failing the first login.
#[derive(Clone)]
pub struct TokenSettings {
    secrets: TokenSecrets,
    ttls: TokenTtls,
}

impl TokenSettings {
    fn from_env() -> Result<Self> {
        let access_secret =
            env::var("JWT_ACCESS_SECRET").context("JWT_ACCESS_SECRET must be set")?;
        let refresh_secret =
            env::var("JWT_REFRESH_SECRET").context("JWT_REFRESH_SECRET must be set")?;
        let secrets = TokenSecrets::new(access_secret, refresh_secret)
            .context("Invalid JWT secrets")?;

        let access_ttl = parse_env("ACCESS_TOKEN_TTL_SECS", 900)?;
        let refresh_ttl = parse_env("REFRESH_TOKEN_TTL_SECS", 2_592_000)?;
        let ttls = TokenTtls::new(
            Duration::from_secs(access_ttl),
            Duration::from_secs(refresh_ttl),
        )
        .context("Invalid token TTLs")?;

        Ok(Self { secrets, ttls })
    }

    pub fn secrets(&self) -> &TokenSecrets {
        &self.secrets
    }

    pub fn ttls(&self) -> TokenTtls {
        self.ttls
    }
}

impl fmt::Debug for TokenSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenSettings")
            .field("secrets", &self.secrets)
            .field("access_ttl", &self.ttls.access())
            .field("refresh_ttl", &self.ttls.refresh())
            .finish()
    }
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => raw.parse().with_context(|| format!("Invalid {key}")),
        Err(_) => Ok(default),
    }
}
