use std::env;
use std::time::Duration;

use crate::domain::{AckMode, EXPORT_PLAYLIST_QUEUE};

/// Which cache backend the process talks to
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CacheBackend {
    Redis,
    Memory,
}

#[derive(Clone, Debug)]
pub struct MailConfig {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    pub from: String,
    /// STARTTLS when true, plain SMTP otherwise
    pub tls: bool,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
    pub access_token_secret: String,
    pub refresh_token_secret: String,
    pub access_token_age: Duration,
    pub cache_backend: CacheBackend,
    pub redis_url: String,
    pub cache_ttl: Duration,
    pub export_queue: String,
    pub queue_poll_interval: Duration,
    pub queue_ack_mode: AckMode,
    pub queue_visibility_timeout: Duration,
    pub mail: MailConfig,
}

fn parse_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Config {
    pub fn from_env() -> Self {
        let cache_backend = match env::var("CACHE_BACKEND").as_deref() {
            Ok("redis") => CacheBackend::Redis,
            _ => CacheBackend::Memory,
        };

        let queue_ack_mode = env::var("QUEUE_ACK_MODE")
            .ok()
            .and_then(|v| AckMode::parse(&v))
            .unwrap_or_default();

        let mail = MailConfig {
            host: env::var("MAIL_HOST").unwrap_or_else(|_| "localhost".to_string()),
            port: parse_or("MAIL_PORT", 587),
            username: env::var("MAIL_ADDRESS").ok(),
            password: env::var("MAIL_PASSWORD").ok(),
            from: env::var("MAIL_FROM")
                .or_else(|_| env::var("MAIL_ADDRESS"))
                .unwrap_or_else(|_| "Open Music <noreply@openmusic.local>".to_string()),
            tls: env::var("MAIL_TLS")
                .map(|v| v != "false" && v != "0")
                .unwrap_or(true),
        };

        Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://openmusic.db?mode=rwc".to_string()),
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: parse_or("PORT", 5000),
            cors_allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                .ok()
                .map(|s| s.split(',').map(|s| s.trim().to_string()).collect())
                .unwrap_or_else(Vec::new),
            access_token_secret: env::var("ACCESS_TOKEN_KEY")
                .or_else(|_| env::var("JWT_SECRET"))
                .unwrap_or_else(|_| "secret".to_string()),
            refresh_token_secret: env::var("REFRESH_TOKEN_KEY")
                .or_else(|_| env::var("REFRESH_TOKEN_SECRET"))
                .unwrap_or_else(|_| "refresh-secret".to_string()),
            access_token_age: Duration::from_secs(parse_or("ACCESS_TOKEN_AGE", 1800)),
            cache_backend,
            redis_url: env::var("REDIS_URL")
                .or_else(|_| env::var("REDIS_SERVER").map(|host| format!("redis://{}", host)))
                .unwrap_or_else(|_| "redis://127.0.0.1:6379".to_string()),
            cache_ttl: Duration::from_secs(parse_or("CACHE_TTL_SECONDS", 1800)),
            export_queue: env::var("EXPORT_QUEUE")
                .unwrap_or_else(|_| EXPORT_PLAYLIST_QUEUE.to_string()),
            queue_poll_interval: Duration::from_millis(parse_or("QUEUE_POLL_INTERVAL_MS", 500)),
            queue_ack_mode,
            queue_visibility_timeout: Duration::from_secs(parse_or(
                "QUEUE_VISIBILITY_TIMEOUT_SECONDS",
                300,
            )),
            mail,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_defaults_when_env_is_empty() {
        for key in [
            "CACHE_BACKEND",
            "QUEUE_ACK_MODE",
            "PORT",
            "CACHE_TTL_SECONDS",
            "EXPORT_QUEUE",
        ] {
            unsafe { env::remove_var(key) };
        }

        let config = Config::from_env();
        assert_eq!(config.port, 5000);
        assert_eq!(config.cache_backend, CacheBackend::Memory);
        assert_eq!(config.cache_ttl, Duration::from_secs(1800));
        assert_eq!(config.export_queue, "export:playlist");
        assert_eq!(config.queue_ack_mode, AckMode::AfterHandle);
    }

    #[test]
    #[serial]
    fn test_overrides_from_env() {
        unsafe {
            env::set_var("CACHE_BACKEND", "redis");
            env::set_var("QUEUE_ACK_MODE", "on_receive");
            env::set_var("PORT", "8080");
        }

        let config = Config::from_env();
        assert_eq!(config.cache_backend, CacheBackend::Redis);
        assert_eq!(config.queue_ack_mode, AckMode::OnReceive);
        assert_eq!(config.port, 8080);

        unsafe {
            env::remove_var("CACHE_BACKEND");
            env::remove_var("QUEUE_ACK_MODE");
            env::remove_var("PORT");
        }
    }
}
