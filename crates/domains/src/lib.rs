//! atelier/crates/domains/src/lib.rs
//!
//! The central domain logic and interface definitions for Atelier.

pub mod error;
pub mod models;
pub mod traits;

// Re-exporting for easier access in other crates
pub use error::*;
pub use models::*;
pub use traits::*;

#[cfg(test)]
mod tests {
    use super::models::*;
    use uuid::Uuid;

    #[test]
    fn comment_serialization_hides_author_key() {
        let comment = Comment {
            id: Uuid::new_v4(),
            post_id: Uuid::new_v4(),
            body: "Nice write-up!".to_string(),
            author_key: "86ff02d6a1ae04bc".to_string(),
            created_at: chrono::Utc::now(),
        };
        let json = serde_json::to_value(&comment).unwrap();
        assert!(json.get("author_key").is_none());
        assert_eq!(json["body"], "Nice write-up!");
    }

    #[test]
    fn claims_round_trip_keeps_principal() {
        let sub = Uuid::new_v4();
        let claims = SessionClaims {
            ver: CLAIMS_VERSION,
            sub,
            email: "admin@example.com".to_string(),
            iat: 1_700_000_000,
            exp: 1_700_086_400,
        };
        let principal = claims.principal();
        assert_eq!(principal.id, sub);
        assert_eq!(principal.email, "admin@example.com");
    }
}
