use async_graphql::*;

use crate::auth::Claims;
use crate::services::TokenPair;

/// Decoded access-token claims echoed back to the client.
#[derive(SimpleObject)]
pub struct TokenPayloadClaims {
    pub email: String,
    pub exp: i64,
    pub orig_iat: i64,
}

impl From<&Claims> for TokenPayloadClaims {
    fn from(claims: &Claims) -> Self {
        Self {
            email: claims.email.clone(),
            exp: claims.exp,
            orig_iat: claims.iat,
        }
    }
}

/// Result of `tokenAuth` and `refreshToken`.
#[derive(SimpleObject)]
pub struct TokenPairPayload {
    pub token: String,
    pub refresh_token: String,
    pub payload: TokenPayloadClaims,
    /// Seconds until the refresh token expires
    pub refresh_expires_in: i64,
}

impl TokenPairPayload {
    pub fn new(pair: TokenPair, refresh_expires_in: i64) -> Self {
        Self {
            payload: TokenPayloadClaims::from(&pair.access.claims),
            token: pair.access.token,
            refresh_token: pair.refresh.token,
            refresh_expires_in,
        }
    }
}

#[derive(SimpleObject)]
pub struct RevokePayload {
    /// Unix timestamp of the revocation
    pub revoked: i64,
}
