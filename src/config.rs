use crate::contact::store::SearchCase;
use std::{env, fmt};

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 7777;
pub const DEFAULT_DATABASE_URL: &str = "sqlite://contacts.db";
pub const DEFAULT_POOL_SIZE: u32 = 10;
/// Where the browser UI is served from in development.
pub const DEFAULT_CORS_ORIGINS: &[&str] = &["http://localhost:5173", "http://localhost:3000"];

/// Everything the server needs to know before it can start, read from the environment.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database: DatabaseConfig,
    /// Internal error detail is only ever sent to callers in development.
    pub development: bool,
    pub search_case: SearchCase,
    /// Browser origins allowed to call the API.
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DatabaseConfig {
    pub url: String,
    pub pool_size: u32,
}

#[derive(Debug, PartialEq)]
/// An environment variable was set, but not to anything we can use.
pub struct ConfigError {
    pub var: &'static str,
    pub value: String,
    pub expected: &'static str,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}={:?} is invalid, expected {}",
            self.var, self.value, self.expected
        )
    }
}

impl std::error::Error for ConfigError {}

impl Config {
    /// Reads `HOST`, `PORT`, `DATABASE_URL`, `DB_POOL_SIZE`, `APP_ENV`, `SEARCH_CASE_SENSITIVE`
    /// and `CORS_ORIGINS`, falling back to defaults for anything unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    /// Like [`Config::from_env`], but asks `lookup` for each variable instead of the process
    /// environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |var: &'static str| lookup(var).filter(|v| !v.trim().is_empty());

        let port = match get("PORT") {
            Some(v) => v.trim().parse::<u16>().map_err(|_| ConfigError {
                var: "PORT",
                value: v,
                expected: "a port number",
            })?,
            None => DEFAULT_PORT,
        };

        let pool_size = match get("DB_POOL_SIZE") {
            Some(v) => match v.trim().parse::<u32>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(ConfigError {
                        var: "DB_POOL_SIZE",
                        value: v,
                        expected: "a positive number of connections",
                    })
                }
            },
            None => DEFAULT_POOL_SIZE,
        };

        let search_case = match get("SEARCH_CASE_SENSITIVE") {
            Some(v) => match v.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" => SearchCase::Sensitive,
                "0" | "false" | "no" => SearchCase::Insensitive,
                _ => {
                    return Err(ConfigError {
                        var: "SEARCH_CASE_SENSITIVE",
                        value: v,
                        expected: "true or false",
                    })
                }
            },
            None => SearchCase::Insensitive,
        };

        let cors_origins = match get("CORS_ORIGINS") {
            Some(v) => {
                let origins: Vec<String> = v
                    .split(',')
                    .map(str::trim)
                    .filter(|o| !o.is_empty())
                    .map(str::to_string)
                    .collect();
                if origins.is_empty() {
                    return Err(ConfigError {
                        var: "CORS_ORIGINS",
                        value: v,
                        expected: "a comma-separated list of origins",
                    });
                }
                origins
            }
            None => DEFAULT_CORS_ORIGINS.iter().map(ToString::to_string).collect(),
        };

        Ok(Config {
            host: get("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            database: DatabaseConfig {
                url: get("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
                pool_size,
            },
            development: get("APP_ENV").map_or(false, |v| v.trim() == "development"),
            search_case,
            cors_origins,
        })
    }
}
