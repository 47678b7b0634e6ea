use std::{fmt::Display, str::FromStr};

use serde::Deserialize;

pub const DEFAULT_MAX_BODY_BYTES: usize = 50 * 1024 * 1024;

#[derive(Debug, Clone, Deserialize)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub from: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// `None` runs on the in-memory stores.
    pub database_url: Option<String>,
    pub db_max_connections: u32,
    pub max_body_bytes: usize,
    /// `None` falls back to the logging notifier.
    pub smtp: Option<SmtpConfig>,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = parse_or("APP_PORT", non_empty("APP_PORT"), 8080u16)?;
        let db_max_connections =
            parse_or("DB_MAX_CONNECTIONS", non_empty("DB_MAX_CONNECTIONS"), 10u32)?;
        if db_max_connections == 0 {
            anyhow::bail!("DB_MAX_CONNECTIONS=0: must be at least 1");
        }
        let max_body_bytes = parse_or(
            "MAX_BODY_BYTES",
            non_empty("MAX_BODY_BYTES"),
            DEFAULT_MAX_BODY_BYTES,
        )?;

        let smtp = match (
            non_empty("SMTP_HOST"),
            non_empty("SMTP_USERNAME"),
            non_empty("SMTP_PASSWORD"),
        ) {
            (Some(host), Some(username), Some(password)) => {
                let port = parse_or("SMTP_PORT", non_empty("SMTP_PORT"), 587u16)?;
                let from = non_empty("SMTP_FROM").unwrap_or_else(|| username.clone());
                Some(SmtpConfig {
                    host,
                    port,
                    // app passwords are often pasted with spaces
                    password: password.chars().filter(|c| !c.is_whitespace()).collect(),
                    username,
                    from,
                })
            }
            _ => None,
        };

        Ok(Self {
            host: non_empty("APP_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port,
            database_url: non_empty("DATABASE_URL"),
            db_max_connections,
            max_body_bytes,
            smtp,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Parse a set variable or fall back to `default` when it is unset; a malformed value is an error.
fn parse_or<T>(key: &str, raw: Option<String>, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    match raw {
        Some(v) => v
            .trim()
            .parse::<T>()
            .map_err(|e| anyhow::anyhow!("{key}={v}: {e}")),
        None => Ok(default),
    }
}
