//! Authentication error types
//!
//! Credential checks, token decoding and account activation all fail with
//! [`AuthError`]. Services convert it into a [`CoreError`] at the boundary so
//! the GraphQL layer sees a single error shape.

use thiserror::Error;

use super::CoreError;

/// Authentication and token errors
#[derive(Error, Debug)]
pub enum AuthError {
    /// Email/password pair did not match
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// Account has not been activated through email verification
    #[error("Account is not active")]
    AccountInactive,

    /// Token could not be decoded or its signature is wrong
    #[error("Invalid authentication token")]
    InvalidToken,

    /// Token decoded but is past its expiry
    #[error("Authentication token has expired")]
    TokenExpired,

    /// Token was issued for a different purpose (e.g. verify vs access)
    #[error("Token type mismatch: expected {expected}")]
    WrongTokenType { expected: &'static str },

    /// Refresh token was revoked
    #[error("Refresh token has been revoked")]
    TokenRevoked,

    /// Caller is anonymous
    #[error("You do not have permission to perform this action")]
    LoginRequired,

    /// Password hashing failed
    #[error("Password hashing failed: {0}")]
    Hashing(#[from] bcrypt::BcryptError),

    /// Token encoding failed
    #[error("Token encoding failed: {0}")]
    Encoding(String),
}

impl From<jsonwebtoken::errors::Error> for AuthError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
            _ => AuthError::InvalidToken,
        }
    }
}

impl From<AuthError> for CoreError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::AccountInactive => CoreError::forbidden(err.to_string()),
            AuthError::Hashing(_) | AuthError::Encoding(_) => {
                CoreError::internal(err.to_string()).with_source(err)
            }
            _ => CoreError::unauthorized(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::CoreErrorKind;

    #[test]
    fn inactive_accounts_map_to_forbidden() {
        let err: CoreError = AuthError::AccountInactive.into();
        assert_eq!(err.kind(), CoreErrorKind::Forbidden);
    }

    #[test]
    fn token_failures_map_to_unauthorized() {
        for err in [
            AuthError::InvalidToken,
            AuthError::TokenExpired,
            AuthError::TokenRevoked,
            AuthError::LoginRequired,
        ] {
            let core: CoreError = err.into();
            assert_eq!(core.kind(), CoreErrorKind::Unauthorized);
        }
    }
}
