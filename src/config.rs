use serde::Deserialize;

/// Upper bound for `SESSION_TTL_MINUTES`: one year.
pub const MAX_SESSION_TTL_MINUTES: i64 = 60 * 24 * 365;
const DEFAULT_SESSION_TTL_MINUTES: i64 = 60 * 12;

#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    pub secret: String,
    pub issuer: String,
    pub ttl_minutes: i64,
    pub cookie_secure: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub db_connect_retries: u32,
    pub db_connect_delay_secs: u64,
    pub session: SessionConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let session = SessionConfig {
            secret: std::env::var("SESSION_SECRET")?,
            issuer: std::env::var("SESSION_ISSUER").unwrap_or_else(|_| "accounts".into()),
            ttl_minutes: session_ttl_minutes(env_parse("SESSION_TTL_MINUTES")),
            cookie_secure: env_parse("COOKIE_SECURE").unwrap_or(false),
        };
        Ok(Self {
            database_url,
            db_connect_retries: env_parse("DB_CONNECT_RETRIES").unwrap_or(10),
            db_connect_delay_secs: env_parse("DB_CONNECT_DELAY_SECS").unwrap_or(2),
            session,
        })
    }
}

fn session_ttl_minutes(raw: Option<i64>) -> i64 {
    raw.unwrap_or(DEFAULT_SESSION_TTL_MINUTES)
        .clamp(1, MAX_SESSION_TTL_MINUTES)
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.trim().parse::<T>().ok())
}
