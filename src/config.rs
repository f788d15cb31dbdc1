use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use rand::Rng;

/// Settings resolved once at startup and handed to the components that need them.
#[derive(Clone)]
pub struct AppConfig {
    pub bind_address: String,
    pub port: u16,
    pub database_path: PathBuf,
    /// Public origin used when composing tracking URLs. Falls back to the request host.
    pub base_url: Option<String>,
    pub admin_username: String,
    pub admin_password_hash: String,
    pub session_secret: Vec<u8>,
    pub session_ttl_hours: i64,
    pub secure_cookies: bool,
    pub cors_allowed_origins: Vec<String>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup so tests don't touch the process env.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = match var("PORT") {
            Some(p) => p.parse::<u16>().context("PORT must be a valid port number")?,
            None => 5000,
        };

        let admin_password_hash = match (var("ADMIN_PASSWORD_HASH"), var("ADMIN_PASSWORD")) {
            (Some(hash), _) => hash,
            (None, Some(password)) => {
                let cost = match var("BCRYPT_COST") {
                    Some(c) => c.parse::<u32>().context("BCRYPT_COST must be an integer")?,
                    None => bcrypt::DEFAULT_COST,
                };
                bcrypt::hash(password, cost).context("Failed to hash ADMIN_PASSWORD")?
            }
            (None, None) => bail!("either ADMIN_PASSWORD_HASH or ADMIN_PASSWORD must be set"),
        };

        let session_secret = match var("SESSION_SECRET") {
            Some(secret) => secret.into_bytes(),
            None => {
                log::warn!("SESSION_SECRET not set, sessions will not survive a restart");
                let mut secret = vec![0u8; 32];
                rand::rng().fill(&mut secret[..]);
                secret
            }
        };

        let session_ttl_hours = match var("SESSION_TTL_HOURS") {
            Some(h) => h
                .parse::<i64>()
                .context("SESSION_TTL_HOURS must be an integer")?,
            None => 12,
        };
        if session_ttl_hours <= 0 {
            bail!("SESSION_TTL_HOURS must be positive");
        }

        let secure_cookies = match var("SESSION_COOKIE_SECURE") {
            Some(v) => v
                .parse::<bool>()
                .context("SESSION_COOKIE_SECURE must be true or false")?,
            None => false,
        };

        let cors_allowed_origins = var("CORS_ALLOWED_ORIGINS")
            .map(|origins| {
                origins
                    .split(',')
                    .map(|o| o.trim().to_string())
                    .filter(|o| !o.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            bind_address: var("BIND_ADDRESS").unwrap_or_else(|| "127.0.0.1".to_string()),
            port,
            database_path: PathBuf::from(
                var("DATABASE_PATH").unwrap_or_else(|| "tracking.db".to_string()),
            ),
            base_url: var("BASE_URL").map(|u| u.trim_end_matches('/').to_string()),
            admin_username: var("ADMIN_USERNAME").unwrap_or_else(|| "admin".to_string()),
            admin_password_hash,
            session_secret,
            session_ttl_hours,
            secure_cookies,
            cors_allowed_origins,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_only_password_hash_is_set() {
        let config = AppConfig::from_lookup(lookup(&[("ADMIN_PASSWORD_HASH", "$2b$04$abc")]))
            .unwrap();

        assert_eq!(config.bind_address, "127.0.0.1");
        assert_eq!(config.port, 5000);
        assert_eq!(config.database_path, PathBuf::from("tracking.db"));
        assert_eq!(config.admin_username, "admin");
        assert_eq!(config.admin_password_hash, "$2b$04$abc");
        assert_eq!(config.session_secret.len(), 32);
        assert_eq!(config.session_ttl_hours, 12);
        assert!(config.base_url.is_none());
        assert!(config.cors_allowed_origins.is_empty());
    }

    #[test]
    fn plaintext_password_is_hashed_with_bcrypt() {
        let config = AppConfig::from_lookup(lookup(&[
            ("ADMIN_PASSWORD", "hunter2"),
            ("BCRYPT_COST", "4"),
        ]))
        .unwrap();

        assert!(bcrypt::verify("hunter2", &config.admin_password_hash).unwrap());
    }

    #[test]
    fn missing_password_is_rejected() {
        assert!(AppConfig::from_lookup(lookup(&[])).is_err());
    }

    #[test]
    fn overrides_are_parsed() {
        let config = AppConfig::from_lookup(lookup(&[
            ("ADMIN_PASSWORD_HASH", "h"),
            ("PORT", "8081"),
            ("BASE_URL", "https://t.example.com/"),
            ("SESSION_SECRET", "s3cret"),
            ("CORS_ALLOWED_ORIGINS", "http://a.test, http://b.test"),
            ("SESSION_COOKIE_SECURE", "true"),
        ]))
        .unwrap();

        assert_eq!(config.port, 8081);
        assert_eq!(config.base_url.as_deref(), Some("https://t.example.com"));
        assert_eq!(config.session_secret, b"s3cret".to_vec());
        assert_eq!(config.cors_allowed_origins, vec!["http://a.test", "http://b.test"]);
        assert!(config.secure_cookies);
    }

    #[test]
    fn bad_port_is_rejected() {
        let result = AppConfig::from_lookup(lookup(&[
            ("ADMIN_PASSWORD_HASH", "h"),
            ("PORT", "not-a-port"),
        ]));
        assert!(result.is_err());
    }
}
