//! Session authentication port.
//!
//! Sessions are issued by the external identity provider; this system only
//! verifies them and reads the user id out of the claims.

/// Claims carried by a verified session token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionClaims {
    /// Identity provider user id (`sub`).
    pub user_id: String,
    pub email: Option<String>,
    pub exp: i64,
}

/// Session token service.
pub trait TokenService: Send + Sync {
    /// Issue a session token for `user_id`. Used by local tooling and tests;
    /// production sessions come from the identity provider.
    fn generate_token(&self, user_id: &str, email: Option<&str>) -> Result<String, AuthError>;

    /// Validate and decode a session token.
    fn validate_token(&self, token: &str) -> Result<SessionClaims, AuthError>;
}

/// Authentication errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Missing session")]
    MissingAuth,
}
