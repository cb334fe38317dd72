use std::path::PathBuf;

use anyhow::{Result, anyhow, bail};

/// Placeholder JWT secrets that MUST NOT be used.
const PLACEHOLDER_SECRETS: &[&str] = &[
    "change-me-to-a-random-string",
    "dev-secret-change-me",
    "secret",
];

#[derive(Debug, Clone)]
pub struct Config {
    pub jwt_secret: String,
    pub db_path: PathBuf,
    pub host: String,
    pub port: u16,
    pub argon2_memory_kib: u32,
    pub argon2_iterations: u32,
    pub argon2_parallelism: u32,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup so parsing can be tested without touching the
    /// process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let jwt_secret = lookup("QUILL_JWT_SECRET").unwrap_or_default();
        if jwt_secret.is_empty() || PLACEHOLDER_SECRETS.contains(&jwt_secret.as_str()) {
            bail!("QUILL_JWT_SECRET is unset or still a placeholder");
        }

        Ok(Self {
            jwt_secret,
            db_path: lookup("QUILL_DB_PATH")
                .unwrap_or_else(|| "quill.db".into())
                .into(),
            host: lookup("QUILL_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port: parse_or(&lookup, "QUILL_PORT", 8080)?,
            argon2_memory_kib: parse_or(&lookup, "QUILL_ARGON2_MEMORY_KIB", 19 * 1024)?,
            argon2_iterations: parse_or(&lookup, "QUILL_ARGON2_ITERATIONS", 2)?,
            argon2_parallelism: parse_or(&lookup, "QUILL_ARGON2_PARALLELISM", 1)?,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .parse()
            .map_err(|e| anyhow!("{} has invalid value '{}': {}", key, raw, e)),
        None => Ok(default),
    }
}
