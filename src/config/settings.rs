//! Runtime settings read from the environment.

use crate::error::ConfigError;
use std::net::SocketAddr;

pub const DB_URI_VAR: &str = "DB_URI";
pub const RUN_MODE_VAR: &str = "BOOKSTORE_ENV";
pub const BIND_ADDR_VAR: &str = "BIND_ADDR";
pub const MAX_CONNECTIONS_VAR: &str = "DB_MAX_CONNECTIONS";
pub const BODY_LIMIT_VAR: &str = "BODY_LIMIT_BYTES";

const DEFAULT_BIND_ADDR: ([u8; 4], u16) = ([0, 0, 0, 0], 3000);
const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_BODY_LIMIT: usize = 64 * 1024;

/// Selects which database the service talks to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunMode {
    Test,
    Normal,
}

impl RunMode {
    /// `test` (case-insensitive) is the only value that selects the test database.
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(v) if v.eq_ignore_ascii_case("test") => RunMode::Test,
            _ => RunMode::Normal,
        }
    }

    pub fn database_name(self) -> &'static str {
        match self {
            RunMode::Test => "books-test",
            RunMode::Normal => "bookstore",
        }
    }
}

#[derive(Clone, Debug)]
pub struct Settings {
    /// Base connection string without a database name, e.g. `postgres://user:pw@localhost:5432`.
    pub db_uri: String,
    pub run_mode: RunMode,
    pub bind_addr: SocketAddr,
    pub max_connections: u32,
    pub body_limit: usize,
}

impl Settings {
    /// Read settings from the process environment. The binary loads `.env` first.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from any key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let db_uri = get(DB_URI_VAR).ok_or(ConfigError::Missing(DB_URI_VAR))?;
        let run_mode = RunMode::parse(get(RUN_MODE_VAR).as_deref());
        let bind_addr = parse_or(get(BIND_ADDR_VAR), BIND_ADDR_VAR, || SocketAddr::from(DEFAULT_BIND_ADDR))?;
        let max_connections = parse_or(get(MAX_CONNECTIONS_VAR), MAX_CONNECTIONS_VAR, || DEFAULT_MAX_CONNECTIONS)?;
        let body_limit = parse_or(get(BODY_LIMIT_VAR), BODY_LIMIT_VAR, || DEFAULT_BODY_LIMIT)?;

        Ok(Settings {
            db_uri,
            run_mode,
            bind_addr,
            max_connections,
            body_limit,
        })
    }

    /// Full connection URL: base URI plus the database name for the run mode.
    pub fn database_url(&self) -> String {
        database_url(&self.db_uri, self.run_mode)
    }
}

pub fn database_url(db_uri: &str, run_mode: RunMode) -> String {
    format!("{}/{}", db_uri.trim_end_matches('/'), run_mode.database_name())
}

fn parse_or<T, D>(raw: Option<String>, key: &'static str, default: D) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    D: FnOnce() -> T,
{
    match raw {
        None => Ok(default()),
        Some(v) => v.trim().parse().map_err(|_| ConfigError::Invalid { key, value: v }),
    }
}
