//! # Session Tokens
//!
//! Issues and verifies the HMAC-signed session token carried by the
//! admin cookie. Tokens are stateless: no server-side revocation list,
//! invalidated only by expiry or re-issuance. Verification is cheap
//! enough for the edge gate: signature, expiry, and claims version,
//! never a repository lookup or a password hash.

use chrono::{DateTime, Duration, Utc};
use domains::error::{AppError, Result};
use domains::models::{SessionClaims, SessionPrincipal, CLAIMS_VERSION};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

/// Session lifetime: 24 hours.
const SESSION_TTL_HOURS: i64 = 24;

pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl TokenIssuer {
    pub fn new(secret: &SecretString) -> Self {
        let key = secret.expose_secret().as_bytes();
        Self {
            encoding: EncodingKey::from_secret(key),
            decoding: DecodingKey::from_secret(key),
            validation: Validation::new(Algorithm::HS256),
        }
    }

    /// Issues a signed token for the authenticated principal.
    pub fn issue(&self, principal: &SessionPrincipal, now: DateTime<Utc>) -> Result<String> {
        let claims = SessionClaims {
            ver: CLAIMS_VERSION,
            sub: principal.id,
            email: principal.email.clone(),
            iat: now.timestamp(),
            exp: (now + Duration::hours(SESSION_TTL_HOURS)).timestamp(),
        };
        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|err| AppError::Internal(format!("token issuance failed: {err}")))
    }

    /// Checks presence and structural validity: signature, expiry, and
    /// claims version. Any failure means "no session".
    pub fn verify(&self, token: &str) -> Option<SessionClaims> {
        let data = match decode::<SessionClaims>(token, &self.decoding, &self.validation) {
            Ok(data) => data,
            Err(err) => {
                debug!(error = %err, "session token rejected");
                return None;
            }
        };
        if data.claims.ver != CLAIMS_VERSION {
            debug!(ver = data.claims.ver, "session token has unknown claims version");
            return None;
        }
        Some(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn issuer() -> TokenIssuer {
        TokenIssuer::new(&SecretString::from("a-test-secret-of-reasonable-size"))
    }

    fn principal() -> SessionPrincipal {
        SessionPrincipal {
            id: Uuid::new_v4(),
            email: "admin@example.com".to_string(),
        }
    }

    #[test]
    fn round_trip_preserves_the_principal() {
        let issuer = issuer();
        let principal = principal();
        let token = issuer.issue(&principal, Utc::now()).unwrap();

        let claims = issuer.verify(&token).unwrap();
        assert_eq!(claims.sub, principal.id);
        assert_eq!(claims.email, principal.email);
        assert_eq!(claims.ver, CLAIMS_VERSION);
    }

    #[test]
    fn expired_token_is_rejected() {
        let issuer = issuer();
        let token = issuer
            .issue(&principal(), Utc::now() - Duration::hours(SESSION_TTL_HOURS + 1))
            .unwrap();
        assert!(issuer.verify(&token).is_none());
    }

    #[test]
    fn tampered_token_is_rejected() {
        let issuer = issuer();
        let mut token = issuer.issue(&principal(), Utc::now()).unwrap();
        token.pop();
        token.push('x');
        assert!(issuer.verify(&token).is_none());
    }

    #[test]
    fn token_from_a_different_secret_is_rejected() {
        let token = issuer().issue(&principal(), Utc::now()).unwrap();
        let other = TokenIssuer::new(&SecretString::from("an-entirely-different-secret"));
        assert!(other.verify(&token).is_none());
    }

    #[test]
    fn unknown_claims_version_is_rejected() {
        let secret = SecretString::from("a-test-secret-of-reasonable-size");
        let issuer = TokenIssuer::new(&secret);

        let now = Utc::now();
        let claims = SessionClaims {
            ver: CLAIMS_VERSION + 1,
            sub: Uuid::new_v4(),
            email: "admin@example.com".to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::hours(1)).timestamp(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.expose_secret().as_bytes()),
        )
        .unwrap();

        assert!(issuer.verify(&token).is_none());
    }

    #[test]
    fn garbage_is_not_a_session() {
        assert!(issuer().verify("not-a-jwt").is_none());
    }
}
