//! Single-account credential check and session issuing.

use actix_web::web;

use crate::config::AppConfig;
use crate::errors::{AppError, Result};
use crate::utils::session::{SessionClaims, SessionSigner};

#[derive(Clone)]
pub struct AuthGate {
    username: String,
    password_hash: String,
    signer: SessionSigner,
}

impl AuthGate {
    pub fn new(username: String, password_hash: String, signer: SessionSigner) -> Self {
        Self {
            username,
            password_hash,
            signer,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            config.admin_username.clone(),
            config.admin_password_hash.clone(),
            SessionSigner::new(&config.session_secret, config.session_ttl_hours),
        )
    }

    pub fn signer(&self) -> &SessionSigner {
        &self.signer
    }

    /// Checks the credentials and returns a signed session token.
    ///
    /// bcrypt is CPU-heavy, so the check runs on the blocking pool.
    pub async fn login(&self, username: String, password: String) -> Result<String> {
        let gate = self.clone();
        web::block(move || gate.check_credentials(&username, &password)).await?
    }

    fn check_credentials(&self, username: &str, password: &str) -> Result<String> {
        // Hash is checked even when the username is wrong
        let password_ok = bcrypt::verify(password, &self.password_hash).unwrap_or_else(|e| {
            log::error!("Stored password hash is unusable: {}", e);
            false
        });

        if username != self.username || !password_ok {
            log::warn!("Failed login attempt for user {:?}", username);
            return Err(AppError::Authentication);
        }

        log::info!("User {} logged in", username);
        self.signer
            .issue(username)
            .map_err(|e| AppError::internal(format!("Session generation failed: {}", e)))
    }

    pub fn session(&self, token: &str) -> Option<SessionClaims> {
        self.signer.verify(token).ok()
    }
}
