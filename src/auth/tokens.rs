use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config::AuthConfig;
use crate::errors::AuthError;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Verify,
}

impl TokenType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenType::Access => "access",
            TokenType::Verify => "verify",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i32,
    pub email: String,
    pub iat: i64,
    pub exp: i64,
    pub token_type: TokenType,
}

#[derive(Clone, Debug)]
pub struct IssuedToken {
    pub token: String,
    pub claims: Claims,
}

/// Signs and verifies HS256 tokens for access and email verification.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    access_ttl: Duration,
    verification_ttl: Duration,
}

impl TokenService {
    pub fn new(secret: &str, access_ttl: Duration, verification_ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            access_ttl,
            verification_ttl,
        }
    }

    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(
            config.secret(),
            Duration::minutes(config.access_token_minutes),
            Duration::minutes(config.verification_minutes),
        )
    }

    pub fn verification_minutes(&self) -> i64 {
        self.verification_ttl.num_minutes()
    }

    pub fn issue_access(&self, user_id: i32, email: &str) -> Result<IssuedToken, AuthError> {
        self.issue(user_id, email, TokenType::Access, self.access_ttl)
    }

    pub fn issue_verification(&self, user_id: i32, email: &str) -> Result<IssuedToken, AuthError> {
        self.issue(user_id, email, TokenType::Verify, self.verification_ttl)
    }

    fn issue(
        &self,
        user_id: i32,
        email: &str,
        token_type: TokenType,
        ttl: Duration,
    ) -> Result<IssuedToken, AuthError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id,
            email: email.to_string(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
            token_type,
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AuthError::Encoding(e.to_string()))?;

        Ok(IssuedToken { token, claims })
    }

    /// Decodes a token and checks that it was issued for `expected`.
    pub fn decode(&self, token: &str, expected: TokenType) -> Result<Claims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        let claims = decode::<Claims>(token, &self.decoding, &validation)?.claims;
        if claims.token_type != expected {
            return Err(AuthError::WrongTokenType {
                expected: expected.as_str(),
            });
        }
        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> TokenService {
        TokenService::new("unit-test-secret", Duration::minutes(60), Duration::minutes(30))
    }

    #[test]
    fn access_token_decodes_with_claims() {
        let tokens = service();
        let issued = tokens.issue_access(7, "taro@example.com").unwrap();

        let claims = tokens.decode(&issued.token, TokenType::Access).unwrap();
        assert_eq!(claims.sub, 7);
        assert_eq!(claims.email, "taro@example.com");
        assert_eq!(claims.exp - claims.iat, 60 * 60);
    }

    #[test]
    fn token_type_is_enforced() {
        let tokens = service();
        let verify = tokens.issue_verification(7, "taro@example.com").unwrap();

        let err = tokens.decode(&verify.token, TokenType::Access).unwrap_err();
        assert!(matches!(err, AuthError::WrongTokenType { expected: "access" }));
        assert!(tokens.decode(&verify.token, TokenType::Verify).is_ok());
    }

    #[test]
    fn expired_token_is_rejected() {
        let tokens = TokenService::new("unit-test-secret", Duration::minutes(-5), Duration::minutes(30));
        let issued = tokens.issue_access(1, "a@example.com").unwrap();

        let err = tokens.decode(&issued.token, TokenType::Access).unwrap_err();
        assert!(matches!(err, AuthError::TokenExpired));
    }

    #[test]
    fn foreign_signature_is_rejected() {
        let issued = service().issue_access(1, "a@example.com").unwrap();
        let other = TokenService::new("another-secret", Duration::minutes(60), Duration::minutes(30));

        let err = other.decode(&issued.token, TokenType::Access).unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken));
    }
}
