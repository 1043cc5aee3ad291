use std::sync::Arc;

use async_graphql::Result;
use sea_orm::DatabaseConnection;

use crate::auth::Actor;
use crate::config::AppConfig;
use crate::graphql::errors::StructuredError;
use crate::services::{
    AccountService, AuthService, LookupService, Mailer, MediaStorage, NotificationService,
    PlanService, ProfileService, ReviewService, TalkRoomService,
};

#[derive(Clone)]
pub struct GraphQLContext {
    pub db: DatabaseConnection,
    pub config: Arc<AppConfig>,
    pub auth_service: Arc<AuthService>,
    pub account_service: Arc<AccountService>,
    pub profile_service: Arc<ProfileService>,
    pub plan_service: Arc<PlanService>,
    pub review_service: Arc<ReviewService>,
    pub talk_room_service: Arc<TalkRoomService>,
    pub notification_service: Arc<NotificationService>,
    pub lookup_service: Arc<LookupService>,
}

impl GraphQLContext {
    pub fn new(db: DatabaseConnection, config: AppConfig, mailer: Arc<dyn Mailer>) -> Self {
        let media = MediaStorage::new(config.media_root.clone());

        Self {
            auth_service: Arc::new(AuthService::new(db.clone(), &config.auth)),
            account_service: Arc::new(AccountService::new(db.clone(), &config, mailer)),
            profile_service: Arc::new(ProfileService::new(db.clone(), media.clone())),
            plan_service: Arc::new(PlanService::new(db.clone(), media)),
            review_service: Arc::new(ReviewService::new(db.clone())),
            talk_room_service: Arc::new(TalkRoomService::new(db.clone())),
            notification_service: Arc::new(NotificationService::new(db.clone())),
            lookup_service: Arc::new(LookupService::new(db.clone())),
            config: Arc::new(config),
            db,
        }
    }

    /// The caller attached to the request by the HTTP layer, anonymous if none.
    pub fn actor_for_request(&self, ctx: &async_graphql::Context<'_>) -> Actor {
        ctx.data_opt::<Actor>().cloned().unwrap_or_default()
    }

    /// Primary key of the logged-in caller, or `UNAUTHORIZED`.
    pub fn require_user(&self, ctx: &async_graphql::Context<'_>) -> Result<i32> {
        self.actor_for_request(ctx)
            .require_user()
            .map_err(StructuredError::from_core_error)
    }

    pub fn require_staff(&self, ctx: &async_graphql::Context<'_>) -> Result<i32> {
        self.actor_for_request(ctx)
            .require_staff()
            .map_err(StructuredError::from_core_error)
    }
}
