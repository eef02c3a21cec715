//! Configuration for the Auth API service.

use std::time::Duration;
use warden_auth_core::AuthConfig;

/// Auth API configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub http_port: u16,

    /// Database URL
    pub database_url: String,

    /// Redis address (`host:port`)
    pub redis_uri: String,

    /// Redis password, if the server requires one
    pub redis_password: Option<String>,

    /// Auth core configuration (key material and token lifetimes)
    pub auth: AuthConfig,

    /// Request timeout
    pub request_timeout: Duration,

    /// Metrics enabled
    pub metrics_enabled: bool,

    /// Apply pending schema migrations at startup
    pub run_migrations: bool,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or(ConfigError::Missing(key))
        };

        // Storage
        let database_url = required("DATABASE_URL")?;
        let redis_uri = required("REDIS_URI")?;
        let redis_password = lookup("REDIS_PASSWORD").filter(|v| !v.is_empty());

        // Server
        let http_port = parse_or(&lookup, "HTTP_PORT", 8080u16)?;

        // Token key material (base64-wrapped PEM)
        let access_private = required("ACCESS_TOKEN_PRIVATE_KEY")?;
        let access_public = required("ACCESS_TOKEN_PUBLIC_KEY")?;
        let refresh_private = required("REFRESH_TOKEN_PRIVATE_KEY")?;
        let refresh_public = required("REFRESH_TOKEN_PUBLIC_KEY")?;

        // Token lifetimes
        let access_minutes: u64 = parse_or(&lookup, "ACCESS_TOKEN_EXPIRES_IN_MINUTES", 15)?;
        let refresh_minutes: u64 = parse_or(&lookup, "REFRESH_TOKEN_EXPIRES_IN_MINUTES", 10080)?;

        let access_ttl = minutes_to_duration(access_minutes, "ACCESS_TOKEN_EXPIRES_IN_MINUTES")?;
        let refresh_ttl = minutes_to_duration(refresh_minutes, "REFRESH_TOKEN_EXPIRES_IN_MINUTES")?;

        // Request timeout (default 30 seconds)
        let request_timeout_secs: u64 = parse_or(&lookup, "REQUEST_TIMEOUT_SECS", 30)?;

        let metrics_enabled = parse_or(&lookup, "METRICS_ENABLED", true)?;
        let run_migrations = parse_or(&lookup, "RUN_MIGRATIONS", true)?;

        let auth = AuthConfig::new(access_private, access_public, refresh_private, refresh_public)
            .with_access_ttl(access_ttl)
            .with_refresh_ttl(refresh_ttl);

        Ok(Self {
            http_port,
            database_url,
            redis_uri,
            redis_password,
            auth,
            request_timeout: Duration::from_secs(request_timeout_secs),
            metrics_enabled,
            run_migrations,
        })
    }
}

/// Non-zero minutes to a `Duration`, rejecting values that overflow seconds
fn minutes_to_duration(minutes: u64, key: &'static str) -> Result<Duration, ConfigError> {
    match minutes.checked_mul(60) {
        Some(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(ConfigError::Invalid(key)),
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => {
            raw.trim().parse().map_err(|_| ConfigError::Invalid(key))
        }
        _ => Ok(default),
    }
}

/// Configuration error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for environment variable: {0}")]
    Invalid(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn base_env() -> HashMap<&'static str, String> {
        HashMap::from([
            ("DATABASE_URL", "postgres://localhost/warden".to_string()),
            ("REDIS_URI", "localhost:6379".to_string()),
            ("ACCESS_TOKEN_PRIVATE_KEY", "YQ==".to_string()),
            ("ACCESS_TOKEN_PUBLIC_KEY", "Yg==".to_string()),
            ("REFRESH_TOKEN_PRIVATE_KEY", "Yw==".to_string()),
            ("REFRESH_TOKEN_PUBLIC_KEY", "ZA==".to_string()),
        ])
    }

    fn load(env: &HashMap<&'static str, String>) -> Result<Config, ConfigError> {
        Config::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&base_env()).unwrap();
        assert_eq!(config.http_port, 8080);
        assert_eq!(config.redis_password, None);
        assert_eq!(config.auth.access_ttl, Duration::from_secs(15 * 60));
        assert_eq!(config.auth.refresh_ttl, Duration::from_secs(10080 * 60));
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert!(config.metrics_enabled);
        assert!(config.run_migrations);
    }

    #[test]
    fn test_overrides() {
        let mut env = base_env();
        env.insert("HTTP_PORT", "9000".to_string());
        env.insert("REDIS_PASSWORD", "hunter2".to_string());
        env.insert("ACCESS_TOKEN_EXPIRES_IN_MINUTES", "5".to_string());
        env.insert("REFRESH_TOKEN_EXPIRES_IN_MINUTES", "60".to_string());
        env.insert("METRICS_ENABLED", "false".to_string());
        env.insert("RUN_MIGRATIONS", "false".to_string());

        let config = load(&env).unwrap();
        assert_eq!(config.http_port, 9000);
        assert_eq!(config.redis_password.as_deref(), Some("hunter2"));
        assert_eq!(config.auth.access_ttl, Duration::from_secs(300));
        assert_eq!(config.auth.refresh_ttl, Duration::from_secs(3600));
        assert!(!config.metrics_enabled);
        assert!(!config.run_migrations);
    }

    #[test]
    fn test_missing_required() {
        for key in [
            "DATABASE_URL",
            "REDIS_URI",
            "ACCESS_TOKEN_PRIVATE_KEY",
            "REFRESH_TOKEN_PUBLIC_KEY",
        ] {
            let mut env = base_env();
            env.remove(key);
            match load(&env) {
                Err(ConfigError::Missing(missing)) => assert_eq!(missing, key),
                other => panic!("expected Missing({key}), got {other:?}"),
            }
        }
    }

    #[test]
    fn test_invalid_values() {
        let mut env = base_env();
        env.insert("HTTP_PORT", "not-a-port".to_string());
        assert!(matches!(load(&env), Err(ConfigError::Invalid("HTTP_PORT"))));

        let mut env = base_env();
        env.insert("ACCESS_TOKEN_EXPIRES_IN_MINUTES", "0".to_string());
        assert!(matches!(
            load(&env),
            Err(ConfigError::Invalid("ACCESS_TOKEN_EXPIRES_IN_MINUTES"))
        ));
    }

    #[test]
    fn test_lifetime_overflow_rejected() {
        let mut env = base_env();
        env.insert("REFRESH_TOKEN_EXPIRES_IN_MINUTES", u64::MAX.to_string());
        assert!(matches!(
            load(&env),
            Err(ConfigError::Invalid("REFRESH_TOKEN_EXPIRES_IN_MINUTES"))
        ));

        let mut env = base_env();
        env.insert("ACCESS_TOKEN_EXPIRES_IN_MINUTES", (u64::MAX / 60 + 1).to_string());
        assert!(matches!(
            load(&env),
            Err(ConfigError::Invalid("ACCESS_TOKEN_EXPIRES_IN_MINUTES"))
        ));
    }
}
