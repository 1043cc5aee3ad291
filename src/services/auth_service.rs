use bcrypt::{hash, verify};
use chrono::{Duration, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, IntoActiveModel,
    QueryFilter, TransactionTrait,
};
use tracing::{debug, info, warn};

use crate::auth::{Actor, IssuedToken, TokenService, TokenType};
use crate::config::AuthConfig;
use crate::database::entities::{refresh_tokens, users};
use crate::errors::{AuthError, CoreError, CoreResult};

pub const MIN_PASSWORD_LEN: usize = 8;
pub const MAX_EMAIL_LEN: usize = 50;

/// Access token plus the refresh token stored alongside it.
#[derive(Clone, Debug)]
pub struct TokenPair {
    pub access: IssuedToken,
    pub refresh: refresh_tokens::Model,
}

/// Credential checks and token lifecycle
#[derive(Clone)]
pub struct AuthService {
    db: DatabaseConnection,
    tokens: TokenService,
    refresh_ttl: Duration,
    hash_cost: u32,
}

impl AuthService {
    pub fn new(db: DatabaseConnection, config: &AuthConfig) -> Self {
        Self {
            db,
            tokens: TokenService::from_config(config),
            refresh_ttl: Duration::days(config.refresh_token_days),
            hash_cost: config.password_hash_cost,
        }
    }

    pub fn tokens(&self) -> &TokenService {
        &self.tokens
    }

    pub fn refresh_expires_in(&self) -> i64 {
        self.refresh_ttl.num_seconds()
    }

    /// Hash a password using bcrypt
    pub fn hash_password(password: &str, cost: u32) -> CoreResult<String> {
        Self::validate_password(password)?;
        hash(password, cost).map_err(|e| AuthError::Hashing(e).into())
    }

    /// Verify a password against a hash
    pub fn verify_password(password: &str, hash: &str) -> CoreResult<bool> {
        verify(password, hash).map_err(|e| AuthError::Hashing(e).into())
    }

    pub fn hash(&self, password: &str) -> CoreResult<String> {
        Self::hash_password(password, self.hash_cost)
    }

    pub fn validate_password(password: &str) -> CoreResult<()> {
        if password.is_empty() {
            return Err(CoreError::invalid_field("password", "Password cannot be empty"));
        }

        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(CoreError::invalid_field(
                "password",
                format!("Password must be at least {} characters long", MIN_PASSWORD_LEN),
            ));
        }

        Ok(())
    }

    /// Validate email format
    pub fn validate_email(email: &str) -> CoreResult<()> {
        if email.is_empty() {
            return invalid_email("Email cannot be empty");
        }

        if email.chars().count() > MAX_EMAIL_LEN {
            return invalid_email("Email is too long (max 50 characters)");
        }

        let Some((local_part, domain_part)) = email.split_once('@') else {
            return invalid_email("Invalid email format: must contain exactly one @");
        };

        if domain_part.contains('@') {
            return invalid_email("Invalid email format: must contain exactly one @");
        }

        if local_part.is_empty() {
            return invalid_email("Invalid email format: local part cannot be empty");
        }

        if !domain_part.contains('.') {
            return invalid_email("Invalid email format: domain must contain a dot");
        }

        if domain_part.starts_with('.') || domain_part.ends_with('.') {
            return invalid_email("Invalid email format: domain cannot start or end with a dot");
        }

        if email.chars().any(char::is_whitespace) {
            return invalid_email("Invalid email format: whitespace is not allowed");
        }

        Ok(())
    }

    /// Exchanges an email/password pair for a token pair.
    pub async fn token_auth(&self, email: &str, password: &str) -> CoreResult<TokenPair> {
        let user = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await?;

        let Some(user) = user else {
            warn!("Login attempt for unknown email {}", email);
            return Err(AuthError::InvalidCredentials.into());
        };

        if !Self::verify_password(password, &user.password_hash)? {
            warn!("Login attempt with wrong password for user {}", user.id);
            return Err(AuthError::InvalidCredentials.into());
        }

        if !user.is_active {
            warn!("Login attempt for inactive user {}", user.id);
            return Err(AuthError::AccountInactive.into());
        }

        let access = self.tokens.issue_access(user.id, &user.email)?;
        let refresh = refresh_tokens::ActiveModel::new(user.id, self.refresh_ttl)
            .insert(&self.db)
            .await?;

        user.into_active_model().set_last_login().update(&self.db).await?;

        info!("Issued tokens for user {}", refresh.user_id);
        Ok(TokenPair { access, refresh })
    }

    /// Rotates a refresh token: the presented one is revoked and a new pair issued.
    pub async fn refresh(&self, token: &str) -> CoreResult<TokenPair> {
        let token = token.to_string();
        let refresh_ttl = self.refresh_ttl;

        let (user, refresh) = self
            .db
            .transaction::<_, (users::Model, refresh_tokens::Model), CoreError>(|txn| {
                Box::pin(async move {
                    let existing = refresh_tokens::Entity::find()
                        .filter(refresh_tokens::Column::Token.eq(token.as_str()))
                        .one(txn)
                        .await?
                        .ok_or(AuthError::InvalidToken)?;

                    if existing.is_revoked() {
                        return Err(AuthError::TokenRevoked.into());
                    }
                    if existing.is_expired() {
                        return Err(AuthError::TokenExpired.into());
                    }

                    let user = users::Entity::find_by_id(existing.user_id)
                        .one(txn)
                        .await?
                        .ok_or(AuthError::InvalidToken)?;
                    if !user.is_active {
                        return Err(AuthError::AccountInactive.into());
                    }

                    existing.into_active_model().revoke().update(txn).await?;
                    let refresh = refresh_tokens::ActiveModel::new(user.id, refresh_ttl)
                        .insert(txn)
                        .await?;

                    Ok((user, refresh))
                })
            })
            .await?;

        let access = self.tokens.issue_access(user.id, &user.email)?;
        info!("Rotated refresh token for user {}", user.id);
        Ok(TokenPair { access, refresh })
    }

    /// Marks a refresh token revoked. Revoking twice keeps the first timestamp.
    pub async fn revoke(&self, token: &str) -> CoreResult<refresh_tokens::Model> {
        let existing = refresh_tokens::Entity::find()
            .filter(refresh_tokens::Column::Token.eq(token))
            .one(&self.db)
            .await?
            .ok_or(AuthError::InvalidToken)?;

        if existing.is_revoked() {
            return Ok(existing);
        }

        let revoked = existing.into_active_model().revoke().update(&self.db).await?;
        info!("Revoked refresh token {} for user {}", revoked.id, revoked.user_id);
        Ok(revoked)
    }

    /// Deletes refresh tokens that are expired or revoked.
    pub async fn clear_stale_tokens(&self) -> CoreResult<u64> {
        let result = refresh_tokens::Entity::delete_many()
            .filter(
                Condition::any()
                    .add(refresh_tokens::Column::ExpiresAt.lt(Utc::now()))
                    .add(refresh_tokens::Column::RevokedAt.is_not_null()),
            )
            .exec(&self.db)
            .await?;

        info!("Cleared {} stale refresh tokens", result.rows_affected);
        Ok(result.rows_affected)
    }

    /// Resolves an access token to the calling actor.
    ///
    /// Any failure yields an anonymous actor; guarded operations reject it later.
    pub async fn actor_for_token(&self, token: &str) -> Actor {
        let claims = match self.tokens.decode(token, TokenType::Access) {
            Ok(claims) => claims,
            Err(e) => {
                debug!("Ignoring access token: {}", e);
                return Actor::anonymous();
            }
        };

        match users::Entity::find_by_id(claims.sub).one(&self.db).await {
            Ok(Some(user)) if user.is_active => Actor::user(user.id).with_staff(user.is_staff),
            Ok(_) => {
                debug!("Access token refers to missing or inactive user {}", claims.sub);
                Actor::anonymous()
            }
            Err(e) => {
                warn!("Failed to load user for access token: {}", e);
                Actor::anonymous()
            }
        }
    }

    /// Creates an active staff superuser, as used by the CLI.
    pub async fn create_superuser(&self, email: &str, password: &str) -> CoreResult<users::Model> {
        Self::validate_email(email)?;
        let password_hash = self.hash(password)?;

        let existing = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await?;
        if existing.is_some() {
            return Err(CoreError::conflict(format!("User with email {} already exists", email)));
        }

        let user = users::ActiveModel::new(email.to_string(), password_hash)
            .promote_to_superuser()
            .insert(&self.db)
            .await?;

        info!("Created superuser {} ({})", user.id, user.email);
        Ok(user)
    }
}

fn invalid_email(message: &str) -> CoreResult<()> {
    Err(CoreError::invalid_field("email", message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::CoreErrorKind;

    #[test]
    fn test_password_hashing() {
        let hash = AuthService::hash_password("test_password_123", 4).unwrap();

        assert_ne!(hash, "test_password_123");
        assert!(AuthService::verify_password("test_password_123", &hash).unwrap());
        assert!(!AuthService::verify_password("wrong_password", &hash).unwrap());
    }

    #[test]
    fn test_short_password_rejected() {
        let err = AuthService::hash_password("short", 4).unwrap_err();
        assert_eq!(err.kind(), CoreErrorKind::Validation);
    }

    #[test]
    fn test_email_validation() {
        assert!(AuthService::validate_email("hanako@example.com").is_ok());

        for bad in [
            "",
            "no-at-sign",
            "@example.com",
            "a@b@example.com",
            "hanako@localhost",
            "hanako@.example.com",
            "hanako @example.com",
        ] {
            let err = AuthService::validate_email(bad).unwrap_err();
            assert_eq!(err.kind(), CoreErrorKind::Validation, "{bad}");
        }

        let long = format!("{}@example.com", "a".repeat(45));
        assert!(AuthService::validate_email(&long).is_err());
    }
}
