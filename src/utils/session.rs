use anyhow::{Context, Result};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

pub const SESSION_COOKIE: &str = "linktrace_session";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionClaims {
    pub sub: String, // Username
    pub logged_in: bool,
    pub exp: usize, // Expiration time (as UTC timestamp)
    pub iat: usize, // Issued at (as UTC timestamp)
}

/// Signs and verifies the session cookie with a key fixed at startup.
#[derive(Clone)]
pub struct SessionSigner {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: chrono::Duration,
}

impl SessionSigner {
    pub fn new(secret: &[u8], ttl_hours: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            ttl: chrono::Duration::hours(ttl_hours),
        }
    }

    pub fn ttl(&self) -> chrono::Duration {
        self.ttl
    }

    pub fn issue(&self, username: &str) -> Result<String> {
        let now = chrono::Utc::now();
        let expiry = now + self.ttl;

        let claims = SessionClaims {
            sub: username.to_string(),
            logged_in: true,
            exp: expiry.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        encode(&Header::default(), &claims, &self.encoding).context("Failed to encode session")
    }

    /// Returns the claims of a well-signed, unexpired session that is marked logged in.
    pub fn verify(&self, token: &str) -> Result<SessionClaims> {
        let token_data = decode::<SessionClaims>(token, &self.decoding, &Validation::default())
            .context("Failed to decode session")?;

        anyhow::ensure!(token_data.claims.logged_in, "Session is not logged in");
        Ok(token_data.claims)
    }
}
