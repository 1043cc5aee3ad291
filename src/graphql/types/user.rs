use async_graphql::*;
use chrono::{DateTime, Utc};

use crate::database::entities::users;
use crate::graphql::context::GraphQLContext;
use crate::graphql::errors::StructuredError;
use crate::graphql::global_id::to_global_id;
use crate::graphql::types::ProfileNode;
use crate::services::UserFilter;

/// A registered account. The password hash is never exposed.
pub struct UserNode(pub users::Model);

impl UserNode {
    pub const TYPE_NAME: &'static str = "UserNode";
}

impl From<users::Model> for UserNode {
    fn from(model: users::Model) -> Self {
        Self(model)
    }
}

#[Object]
impl UserNode {
    pub async fn id(&self) -> ID {
        to_global_id(Self::TYPE_NAME, self.0.id)
    }

    async fn email(&self) -> &str {
        &self.0.email
    }

    async fn is_active(&self) -> bool {
        self.0.is_active
    }

    async fn is_staff(&self) -> bool {
        self.0.is_staff
    }

    async fn first_name(&self) -> Option<&str> {
        self.0.first_name.as_deref()
    }

    async fn last_name(&self) -> Option<&str> {
        self.0.last_name.as_deref()
    }

    async fn date_joined(&self) -> DateTime<Utc> {
        self.0.created_at
    }

    async fn last_login(&self) -> Option<DateTime<Utc>> {
        self.0.last_login_at
    }

    async fn profile(&self, ctx: &Context<'_>) -> Result<Option<ProfileNode>> {
        let context = ctx.data::<GraphQLContext>()?;
        let profile = context
            .profile_service
            .find_by_user(self.0.id)
            .await
            .map_err(StructuredError::from_core_error)?;

        Ok(profile.map(ProfileNode::from))
    }
}

#[derive(InputObject, Default)]
pub struct UserFilterInput {
    pub email: Option<String>,
    pub email_icontains: Option<String>,
}

impl From<UserFilterInput> for UserFilter {
    fn from(input: UserFilterInput) -> Self {
        Self {
            email: input.email,
            email_icontains: input.email_icontains,
        }
    }
}

#[derive(InputObject)]
pub struct CreateUserInput {
    pub email: String,
    pub password: String,
    pub client_mutation_id: Option<String>,
}

#[derive(SimpleObject)]
pub struct CreateUserPayload {
    pub user: Option<UserNode>,
    pub client_mutation_id: Option<String>,
}

#[derive(InputObject)]
pub struct UpdateUserInput {
    /// Verification token from the registration mail
    pub token: String,
    pub client_mutation_id: Option<String>,
}

#[derive(SimpleObject)]
pub struct UpdateUserPayload {
    pub ok: Option<bool>,
    pub client_mutation_id: Option<String>,
}
