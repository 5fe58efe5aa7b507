//! Error types for authorization

/// Authorization error types
///
/// None of these escape [`Authorizer::authorize`](crate::Authorizer::authorize),
/// which turns every failure into a deny decision.
#[derive(thiserror::Error, Debug)]
pub enum AuthError {
    #[error("Missing authorization token")]
    MissingToken,

    #[error("Invalid token")]
    InvalidToken,

    #[error("No signing key found for kid {0}")]
    KeyNotFound(String),

    #[error("Failed to fetch signing keys: {0}")]
    KeyFetch(String),

    #[error("Token verification failed: {0}")]
    Verification(#[from] jsonwebtoken::errors::Error),

    #[error("Invalid tenant_id")]
    InvalidTenant,

    #[error("Tenant store error: {0}")]
    TenantStore(String),
}

/// Result type for authorization operations
pub type AuthResult<T> = Result<T, AuthError>;
