//! Runtime settings read from the environment (a `.env` file is loaded first by the binary).

use crate::error::ConfigError;
use crate::models::MatchMode;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

#[derive(Clone, Debug)]
pub struct DatabaseSettings {
    pub url: String,
    /// Pool size: connections that may be leased at once.
    pub max_connections: u32,
    /// Store calls allowed to wait for a connection before new ones get 503.
    pub max_waiting: usize,
    pub acquire_timeout: Duration,
}

#[derive(Clone, Debug)]
pub struct Settings {
    pub bind_addr: SocketAddr,
    pub database: DatabaseSettings,
    /// `nome` filter semantics on `/users`. Products always use `Contains`.
    pub users_name_filter: MatchMode,
    pub body_limit: usize,
}

const DEFAULT_DATABASE_URL: &str = "postgres://localhost/crudapi";
const DEFAULT_BIND_ADDR: SocketAddr = SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 3000);

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from any key lookup. Unset and blank values take the default.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let max_connections: u32 = parse_or(get("DB_MAX_CONNECTIONS"), "DB_MAX_CONNECTIONS", 10)?;
        if max_connections == 0 {
            return Err(ConfigError::Invalid {
                key: "DB_MAX_CONNECTIONS",
                value: "0".into(),
            });
        }
        let database = DatabaseSettings {
            url: get("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.into()),
            max_connections,
            max_waiting: parse_or(get("DB_MAX_WAITING"), "DB_MAX_WAITING", 100)?,
            acquire_timeout: Duration::from_secs(parse_or(
                get("DB_ACQUIRE_TIMEOUT_SECS"),
                "DB_ACQUIRE_TIMEOUT_SECS",
                5,
            )?),
        };

        Ok(Settings {
            bind_addr: parse_or(get("BIND_ADDR"), "BIND_ADDR", DEFAULT_BIND_ADDR)?,
            database,
            users_name_filter: match get("USERS_NAME_FILTER") {
                Some(v) => v.parse()?,
                None => MatchMode::Contains,
            },
            body_limit: parse_or(get("BODY_LIMIT_BYTES"), "BODY_LIMIT_BYTES", 64 * 1024)?,
        })
    }
}

fn parse_or<T: FromStr>(raw: Option<String>, key: &'static str, default: T) -> Result<T, ConfigError> {
    match raw {
        None => Ok(default),
        Some(v) => v.trim().parse().map_err(|_| ConfigError::Invalid { key, value: v }),
    }
}
