use std::sync::Arc;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
    QueryOrder, Select,
};
use tracing::{debug, info, warn};

use crate::auth::{TokenService, TokenType};
use crate::config::AppConfig;
use crate::database::entities::users;
use crate::errors::{CoreError, CoreResult};
use crate::services::auth_service::AuthService;
use crate::services::listing::{filter_text, paginate, Page, PageWindow};
use crate::services::mailer::{Mailer, OutgoingMail};

#[derive(Clone, Debug, Default)]
pub struct UserFilter {
    pub email: Option<String>,
    pub email_icontains: Option<String>,
}

impl UserFilter {
    fn apply(self, select: Select<users::Entity>) -> Select<users::Entity> {
        filter_text(select, users::Column::Email, self.email, self.email_icontains)
    }
}

/// Registration, email verification and user lookups
#[derive(Clone)]
pub struct AccountService {
    db: DatabaseConnection,
    auth: AuthService,
    mailer: Arc<dyn Mailer>,
    frontend_url: String,
    mail_from: String,
}

impl AccountService {
    pub fn new(db: DatabaseConnection, config: &AppConfig, mailer: Arc<dyn Mailer>) -> Self {
        Self {
            auth: AuthService::new(db.clone(), &config.auth),
            db,
            mailer,
            frontend_url: config.frontend_url.clone(),
            mail_from: config.mail_from.clone(),
        }
    }

    fn tokens(&self) -> &TokenService {
        self.auth.tokens()
    }

    /// Creates an inactive account and mails the verification link.
    ///
    /// The user row is kept when mail delivery fails.
    pub async fn register(&self, email: &str, password: &str) -> CoreResult<users::Model> {
        AuthService::validate_email(email)?;
        let password_hash = self.auth.hash(password)?;

        let existing = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await?;
        if existing.is_some() {
            return Err(CoreError::conflict("User with this email already exists"));
        }

        let user = users::ActiveModel::new(email.to_string(), password_hash)
            .insert(&self.db)
            .await?;
        info!("Registered user {} ({})", user.id, user.email);

        let verification = self.tokens().issue_verification(user.id, &user.email)?;
        let mail = OutgoingMail::verification(
            &self.mail_from,
            &user.email,
            &self.frontend_url,
            &verification.token,
            self.tokens().verification_minutes(),
        );

        self.mailer.send(&mail).await.map_err(|e| {
            warn!("Verification mail to {} failed: {}", user.email, e);
            CoreError::unavailable(format!("Failed to send verification mail: {}", e))
        })?;

        Ok(user)
    }

    /// Activates the account named by a verification token.
    pub async fn verify(&self, token: &str) -> CoreResult<users::Model> {
        let claims = self
            .tokens()
            .decode(token, TokenType::Verify)
            .map_err(|e| CoreError::bad_request(format!("Invalid verification token: {}", e)))?;

        let user = users::Entity::find_by_id(claims.sub)
            .one(&self.db)
            .await?
            .ok_or_else(|| CoreError::bad_request("Invalid verification token: unknown user"))?;

        if user.is_active {
            return Err(CoreError::bad_request("User is already active"));
        }

        let user = user.into_active_model().activate().update(&self.db).await?;
        info!("Activated user {}", user.id);
        Ok(user)
    }

    pub async fn get(&self, id: i32) -> CoreResult<users::Model> {
        debug!("Loading user {}", id);
        users::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| CoreError::not_found("User", id.to_string()))
    }

    pub async fn find(&self, id: i32) -> CoreResult<Option<users::Model>> {
        Ok(users::Entity::find_by_id(id).one(&self.db).await?)
    }

    pub async fn list(&self, filter: UserFilter, window: PageWindow) -> CoreResult<Page<users::Model>> {
        let select = filter.apply(users::Entity::find().order_by_asc(users::Column::Id));
        paginate(&self.db, select, &window).await
    }
}
