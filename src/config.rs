use std::net::SocketAddr;

use anyhow::Context;
use serde::Deserialize;

const TTL_DEFAULT_MINUTES: i64 = 60;
const TTL_MAX_MINUTES: i64 = 7 * 24 * 60;

#[derive(Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub ttl_minutes: i64,
}

// The signing secret must never end up in logs.
impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("issuer", &self.issuer)
            .field("ttl_minutes", &self.ttl_minutes)
            .finish()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub db_max_connections: u32,
    pub jwt: JwtConfig,
    pub bind_addr: SocketAddr,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL is not set")?;
        let secret = std::env::var("JWT_SECRET").context("JWT_SECRET is not set")?;
        anyhow::ensure!(!secret.is_empty(), "JWT_SECRET must not be empty");

        let jwt = JwtConfig {
            secret,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "leukovision".into()),
            ttl_minutes: token_ttl(std::env::var("JWT_TTL_MINUTES").ok().as_deref())?,
        };

        let host = std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let port = std::env::var("APP_PORT")
            .or_else(|_| std::env::var("PORT"))
            .unwrap_or_else(|_| "3000".into());
        let bind_addr = format!("{}:{}", host, port)
            .parse()
            .with_context(|| format!("invalid listen address {}:{}", host, port))?;

        Ok(Self {
            database_url,
            db_max_connections: env_parse("DB_MAX_CONNECTIONS").unwrap_or(10),
            jwt,
            bind_addr,
        })
    }
}

fn token_ttl(raw: Option<&str>) -> anyhow::Result<i64> {
    let Some(raw) = raw else {
        return Ok(TTL_DEFAULT_MINUTES);
    };
    let minutes: i64 = raw
        .trim()
        .parse()
        .with_context(|| format!("JWT_TTL_MINUTES is not a number: {}", raw))?;
    anyhow::ensure!(
        (1..=TTL_MAX_MINUTES).contains(&minutes),
        "JWT_TTL_MINUTES must be between 1 and {}, got {}",
        TTL_MAX_MINUTES,
        minutes
    );
    Ok(minutes)
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse::<T>().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_ttl_defaults_to_one_hour() {
        assert_eq!(token_ttl(None).unwrap(), 60);
        assert_eq!(token_ttl(Some(" 15 ")).unwrap(), 15);
        assert_eq!(token_ttl(Some("10080")).unwrap(), TTL_MAX_MINUTES);
    }

    #[test]
    fn token_ttl_out_of_range_is_rejected() {
        assert!(token_ttl(Some("0")).is_err());
        assert!(token_ttl(Some("-5")).is_err());
        assert!(token_ttl(Some("10081")).is_err());
        assert!(token_ttl(Some("9223372036854775807")).is_err());
        assert!(token_ttl(Some("an hour")).is_err());
    }
}
