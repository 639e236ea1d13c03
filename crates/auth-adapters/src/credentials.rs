//! # Credential Verifier
//!
//! The authoritative half of authentication: validates a submitted
//! email/password pair against the stored Argon2 hash. Every failure
//! path collapses to the same `None` so callers can only ever surface a
//! single generic unauthorized outcome: "wrong password" and "unknown
//! user" are indistinguishable by contract and by timing.

use argon2::password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, SaltString};
use argon2::{Argon2, PasswordVerifier};
use domains::error::{AppError, Result};
use domains::models::SessionPrincipal;
use domains::traits::UserRepo;
use std::sync::Arc;
use tracing::debug;

/// Minimum accepted password length, enforced on login and on change.
pub const MIN_PASSWORD_LEN: usize = 8;

/// Structurally valid Argon2 hash that matches no real password. Verified
/// on the unknown-email path so both failure paths pay the same hashing
/// cost.
const DUMMY_HASH: &str =
    "$argon2id$v=19$m=19456,t=2,p=1$c2FsdHNhbHRzYWx0c2FsdA$AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA";

pub struct CredentialVerifier {
    users: Arc<dyn UserRepo>,
}

impl CredentialVerifier {
    pub fn new(users: Arc<dyn UserRepo>) -> Self {
        Self { users }
    }

    /// Verifies credentials and returns the principal a session token is
    /// derived from. Each step is a hard gate; no partial success.
    pub async fn authorize(&self, email: &str, password: &str) -> Result<Option<SessionPrincipal>> {
        // 1. Structural validation before any lookup.
        if !is_plausible_email(email) || password.len() < MIN_PASSWORD_LEN {
            return Ok(None);
        }

        // 2. Lookup by email.
        let user = self.users.find_user_by_email(email).await?;

        // 3. Slow, salted comparison. The dummy verification on the
        //    unknown-email branch keeps the two failures aligned.
        match user {
            Some(user) => {
                if verify_password(password, &user.password_hash) {
                    Ok(Some(SessionPrincipal {
                        id: user.id,
                        email: user.email,
                    }))
                } else {
                    debug!("credential check failed");
                    Ok(None)
                }
            }
            None => {
                let _ = verify_password(password, DUMMY_HASH);
                debug!("credential check failed");
                Ok(None)
            }
        }
    }

    /// Rotates the password after re-verifying the current one. The old
    /// hash is overwritten, never retained.
    pub async fn change_password(
        &self,
        email: &str,
        current_password: &str,
        new_password: &str,
    ) -> Result<()> {
        let principal = self
            .authorize(email, current_password)
            .await?
            .ok_or_else(|| AppError::Unauthorized("invalid credentials".into()))?;

        if new_password.len() < MIN_PASSWORD_LEN {
            return Err(AppError::Validation(format!(
                "password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }

        let new_hash = hash_password(new_password)?;
        self.users
            .update_password_hash(principal.id, &new_hash)
            .await
    }
}

/// Argon2 (default params) hash of a new password, in PHC string form.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| AppError::Internal(format!("password hashing failed: {err}")))
}

/// Verifies a password against a stored Argon2 PHC hash.
fn verify_password(password: &str, hash: &str) -> bool {
    let parsed_hash = match PasswordHash::new(hash) {
        Ok(p) => p,
        Err(_) => return false,
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

/// Minimal structural check: one '@' with non-empty local part and a
/// domain containing a dot.
fn is_plausible_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
}
