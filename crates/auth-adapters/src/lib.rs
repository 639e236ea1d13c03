//! atelier/crates/auth-adapters/src/lib.rs
//!
//! Argon2-backed credential verification and JWT session tokens.
//! The verifier is the authoritative, store-touching half; the token
//! issuer's `verify` is the edge-safe half consumed by the gate.

pub mod credentials;
pub mod token;

pub use credentials::{hash_password, CredentialVerifier, MIN_PASSWORD_LEN};
pub use token::TokenIssuer;
