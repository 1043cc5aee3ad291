use async_graphql::*;
use chrono::{DateTime, Utc};

use crate::database::entities::notifications;
use crate::graphql::context::GraphQLContext;
use crate::graphql::errors::StructuredError;
use crate::graphql::global_id::{decode_optional_id, to_global_id};
use crate::graphql::types::UserNode;
use crate::services::NotificationFilter;

pub struct NotificationNode(pub notifications::Model);

impl NotificationNode {
    pub const TYPE_NAME: &'static str = "NotificationNode";
}

impl From<notifications::Model> for NotificationNode {
    fn from(model: notifications::Model) -> Self {
        Self(model)
    }
}

#[Object]
impl NotificationNode {
    pub async fn id(&self) -> ID {
        to_global_id(Self::TYPE_NAME, self.0.id)
    }

    async fn is_checked(&self) -> bool {
        self.0.is_checked
    }

    async fn notificator(&self, ctx: &Context<'_>) -> Result<UserNode> {
        let context = ctx.data::<GraphQLContext>()?;
        let user = context
            .account_service
            .get(self.0.notificator_id)
            .await
            .map_err(StructuredError::from_core_error)?;

        Ok(UserNode::from(user))
    }

    async fn receiver(&self, ctx: &Context<'_>) -> Result<UserNode> {
        let context = ctx.data::<GraphQLContext>()?;
        let user = context
            .account_service
            .get(self.0.receiver_id)
            .await
            .map_err(StructuredError::from_core_error)?;

        Ok(UserNode::from(user))
    }

    async fn notification_type(&self) -> &str {
        &self.0.notification_type
    }

    async fn created_at(&self) -> DateTime<Utc> {
        self.0.created_at
    }
}

#[derive(InputObject, Default)]
pub struct NotificationFilterInput {
    pub is_checked: Option<bool>,
    pub receiver: Option<ID>,
}

impl NotificationFilterInput {
    pub fn into_filter(self) -> Result<NotificationFilter> {
        Ok(NotificationFilter {
            is_checked: self.is_checked,
            receiver_id: decode_optional_id(self.receiver.as_ref(), UserNode::TYPE_NAME, "receiver")?,
        })
    }
}

#[derive(InputObject)]
pub struct CreateNotificationInput {
    pub receiver: ID,
    pub notification_type: String,
    pub client_mutation_id: Option<String>,
}

#[derive(SimpleObject)]
pub struct CreateNotificationPayload {
    pub notification: Option<NotificationNode>,
    pub client_mutation_id: Option<String>,
}

#[derive(InputObject)]
pub struct UpdateNotificationsInput {
    pub notification_ids: Vec<ID>,
    pub client_mutation_id: Option<String>,
}

#[derive(SimpleObject)]
pub struct UpdateNotificationsPayload {
    /// Every notification that was marked checked
    pub notifications: Vec<NotificationNode>,
    /// The last updated notification
    pub notification: Option<NotificationNode>,
    pub client_mutation_id: Option<String>,
}
