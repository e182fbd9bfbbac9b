use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub ttl_minutes: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NotesConfig {
    /// Reject get/delete of notes owned by someone else.
    pub enforce_ownership: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub jwt: JwtConfig,
    pub notes: NotesConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL is not set")?;
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET").context("JWT_SECRET is not set")?,
            ttl_minutes: parse_ttl_minutes(std::env::var("JWT_TTL_MINUTES").ok())
                .context("invalid JWT_TTL_MINUTES")?,
        };
        let notes = NotesConfig {
            enforce_ownership: std::env::var("NOTES_ENFORCE_OWNERSHIP")
                .ok()
                .and_then(|v| parse_flag(&v))
                .unwrap_or(true),
        };
        let port = std::env::var("APP_PORT")
            .unwrap_or_else(|_| "5000".into())
            .parse::<u16>()
            .context("APP_PORT must be a port number")?;

        Ok(Self {
            database_url,
            host: std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port,
            jwt,
            notes,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn uses_memory_store(&self) -> bool {
        self.database_url.starts_with("memory:")
    }
}

/// Longest accepted session lifetime: one year.
const MAX_TTL_MINUTES: i64 = 60 * 24 * 365;

fn parse_ttl_minutes(raw: Option<String>) -> anyhow::Result<i64> {
    let Some(raw) = raw else {
        return Ok(60);
    };
    let minutes = raw
        .trim()
        .parse::<i64>()
        .with_context(|| format!("{raw:?} is not a number of minutes"))?;
    anyhow::ensure!(
        (1..=MAX_TTL_MINUTES).contains(&minutes),
        "{minutes} is outside 1..={MAX_TTL_MINUTES}"
    );
    Ok(minutes)
}

fn parse_flag(v: &str) -> Option<bool> {
    match v.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
