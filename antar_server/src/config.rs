use std::{env, time::Duration};

use antar_common::Secret;
use log::*;

const DEFAULT_ANTAR_HOST: &str = "127.0.0.1";
const DEFAULT_ANTAR_PORT: u16 = 8390;
const DEFAULT_DATABASE_URL: &str = "sqlite://data/antar.db";
const DEFAULT_REQUEST_DEADLINE_MS: u64 = 5_000;
const DEFAULT_MAX_DB_CONNECTIONS: u32 = 25;

#[derive(Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub max_db_connections: u32,
    /// Per-request deadline. Database calls in flight when it expires are dropped, which rolls back any open
    /// transaction.
    pub request_deadline: Duration,
    pub auth: AuthConfig,
}

/// The per-request deadline, registered as app data so every handler can apply it to its engine call.
#[derive(Debug, Clone, Copy)]
pub struct RequestDeadline(pub Duration);

#[derive(Clone, Default)]
pub struct AuthConfig {
    pub jwt_secret: Secret,
}

impl AuthConfig {
    pub fn try_from_env() -> Result<Self, String> {
        let secret = env::var("ANTAR_JWT_SECRET").map_err(|_| "ANTAR_JWT_SECRET is not set".to_string())?;
        if secret.is_empty() {
            return Err("ANTAR_JWT_SECRET is empty".to_string());
        }
        Ok(Self { jwt_secret: Secret::new(secret) })
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_ANTAR_HOST.to_string(),
            port: DEFAULT_ANTAR_PORT,
            database_url: DEFAULT_DATABASE_URL.to_string(),
            max_db_connections: DEFAULT_MAX_DB_CONNECTIONS,
            request_deadline: Duration::from_millis(DEFAULT_REQUEST_DEADLINE_MS),
            auth: AuthConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn from_env_or_default() -> Self {
        let host = env::var("ANTAR_HOST").ok().unwrap_or_else(|| DEFAULT_ANTAR_HOST.into());
        let port = env_parsed("ANTAR_PORT", DEFAULT_ANTAR_PORT);
        let database_url = env::var("ANTAR_DATABASE_URL").ok().unwrap_or_else(|| {
            info!("ANTAR_DATABASE_URL is not set. Using the default, {DEFAULT_DATABASE_URL}.");
            DEFAULT_DATABASE_URL.into()
        });
        let max_db_connections = env_parsed("ANTAR_MAX_DB_CONNECTIONS", DEFAULT_MAX_DB_CONNECTIONS);
        let request_deadline =
            Duration::from_millis(env_parsed("ANTAR_REQUEST_DEADLINE_MS", DEFAULT_REQUEST_DEADLINE_MS));
        let auth = AuthConfig::try_from_env().unwrap_or_else(|e| {
            error!("{e}. Authenticated requests will be rejected until it is configured.");
            AuthConfig::default()
        });
        Self { host, port, database_url, max_db_connections, request_deadline, auth }
    }
}

fn env_parsed<T: std::str::FromStr + std::fmt::Display + Copy>(var: &str, default: T) -> T {
    match env::var(var) {
        Ok(s) => s.parse::<T>().unwrap_or_else(|_| {
            error!("{s} is not a valid value for {var}. Using the default, {default}, instead.");
            default
        }),
        Err(_) => default,
    }
}
