/// Validation of externally-issued session tokens
///
/// The identity provider signs session tokens with HS256 and a shared
/// secret; this module validates signature, expiration, and issuer, and
/// exposes the identity claims. Token issuance, login, and refresh all live
/// with the provider and never enter this codebase.
///
/// # Example
///
/// ```no_run
/// use taskdeck_shared::auth::jwt::validate_token;
///
/// # fn example(token: &str) -> Result<(), Box<dyn std::error::Error>> {
/// let claims = validate_token(token, "shared-secret-at-least-32-bytes!!", "taskdeck-idp")?;
/// println!("authenticated {}", claims.sub);
/// # Ok(())
/// # }
/// ```

use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Error type for token validation
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    /// Token has expired
    #[error("Token has expired")]
    Expired,

    /// Token issuer doesn't match the configured identity provider
    #[error("Invalid token issuer")]
    InvalidIssuer,

    /// Signature, structure, or claim validation failed
    #[error("Invalid token: {0}")]
    Invalid(String),
}

/// Identity claims carried by a session token
///
/// # Standard claims
///
/// - `sub`: the identity's ID
/// - `iss`: the identity provider
/// - `iat` / `exp`: issue and expiry timestamps
///
/// # Profile claims
///
/// - `email`: the identity's email
/// - `name`: optional display name
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - the identity's ID
    pub sub: Uuid,

    /// Issuer - the identity provider
    pub iss: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Email address
    pub email: String,

    /// Optional display name
    #[serde(default)]
    pub name: Option<String>,
}

/// Validates a session token and returns its claims
///
/// Checks signature (HS256), expiration, and issuer.
///
/// # Errors
///
/// - [`JwtError::Expired`] if the token is past its `exp`
/// - [`JwtError::InvalidIssuer`] if `iss` doesn't match `expected_issuer`
/// - [`JwtError::Invalid`] for any other validation failure
pub fn validate_token(token: &str, secret: &str, expected_issuer: &str) -> Result<Claims, JwtError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[expected_issuer]);
    validation.set_required_spec_claims(&["exp", "iss"]);

    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
        jsonwebtoken::errors::ErrorKind::InvalidIssuer => JwtError::InvalidIssuer,
        _ => JwtError::Invalid(e.to_string()),
    })?;

    Ok(data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use jsonwebtoken::{encode, EncodingKey, Header};

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";
    const ISSUER: &str = "taskdeck-idp";

    fn mint(sub: Uuid, issuer: &str, ttl: Duration) -> String {
        let now = Utc::now();
        let claims = Claims {
            sub,
            iss: issuer.to_string(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
            email: "user@example.com".to_string(),
            name: Some("Test User".to_string()),
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn test_validate_roundtrip() {
        let sub = Uuid::new_v4();
        let token = mint(sub, ISSUER, Duration::hours(1));

        let claims = validate_token(&token, SECRET, ISSUER).unwrap();
        assert_eq!(claims.sub, sub);
        assert_eq!(claims.email, "user@example.com");
        assert_eq!(claims.name.as_deref(), Some("Test User"));
    }

    #[test]
    fn test_validate_rejects_expired() {
        let token = mint(Uuid::new_v4(), ISSUER, Duration::hours(-1));

        let err = validate_token(&token, SECRET, ISSUER).unwrap_err();
        assert!(matches!(err, JwtError::Expired));
    }

    #[test]
    fn test_validate_rejects_wrong_issuer() {
        let token = mint(Uuid::new_v4(), "somebody-else", Duration::hours(1));

        let err = validate_token(&token, SECRET, ISSUER).unwrap_err();
        assert!(matches!(err, JwtError::InvalidIssuer));
    }

    #[test]
    fn test_validate_rejects_wrong_secret() {
        let token = mint(Uuid::new_v4(), ISSUER, Duration::hours(1));

        let err = validate_token(&token, "another-secret-also-32-bytes-long!", ISSUER).unwrap_err();
        assert!(matches!(err, JwtError::Invalid(_)));
    }

    #[test]
    fn test_validate_rejects_garbage() {
        let err = validate_token("not-a-token", SECRET, ISSUER).unwrap_err();
        assert!(matches!(err, JwtError::Invalid(_)));
    }
}
