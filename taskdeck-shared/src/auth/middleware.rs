/// Request authentication context for axum
///
/// The API server's auth layer validates the bearer token and inserts an
/// [`AuthContext`] into request extensions; handlers extract it with axum's
/// `Extension` extractor. The context is the only carrier of the current
/// identity: there is no ambient "current user" global anywhere.
///
/// # Example
///
/// ```no_run
/// use axum::Extension;
/// use taskdeck_shared::auth::middleware::AuthContext;
///
/// async fn handler(Extension(auth): Extension<AuthContext>) -> String {
///     format!("Hello, {}!", auth.user_id)
/// }
/// ```

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::jwt::Claims;

/// Authenticated identity attached to a request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthContext {
    /// Authenticated identity ID
    pub user_id: Uuid,

    /// Email from token claims
    pub email: String,

    /// Optional display name from token claims
    pub display_name: Option<String>,
}

impl AuthContext {
    /// Creates an auth context from validated token claims
    pub fn from_claims(claims: &Claims) -> Self {
        Self {
            user_id: claims.sub,
            email: claims.email.clone(),
            display_name: claims.name.clone(),
        }
    }
}

/// Error type for the authentication layer
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Missing authorization header
    #[error("Missing credentials")]
    MissingCredentials,

    /// Authorization header is not a Bearer token
    #[error("Invalid authorization header: {0}")]
    InvalidFormat(String),

    /// Token validation failed
    #[error("Invalid token: {0}")]
    InvalidToken(String),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AuthError::MissingCredentials => {
                (StatusCode::UNAUTHORIZED, "Missing credentials".to_string())
            }
            AuthError::InvalidFormat(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AuthError::InvalidToken(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
        };

        let body = Json(serde_json::json!({
            "error": "unauthorized",
            "message": message,
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_claims() {
        let sub = Uuid::new_v4();
        let claims = Claims {
            sub,
            iss: "taskdeck-idp".to_string(),
            iat: 0,
            exp: i64::MAX,
            email: "user@example.com".to_string(),
            name: None,
        };

        let ctx = AuthContext::from_claims(&claims);
        assert_eq!(ctx.user_id, sub);
        assert_eq!(ctx.email, "user@example.com");
        assert!(ctx.display_name.is_none());
    }
}
