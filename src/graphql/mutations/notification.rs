use async_graphql::*;

use crate::graphql::context::GraphQLContext;
use crate::graphql::errors::StructuredError;
use crate::graphql::global_id::{decode_id, decode_ids};
use crate::graphql::types::{
    CreateNotificationInput, CreateNotificationPayload, NotificationNode, UpdateNotificationsInput,
    UpdateNotificationsPayload, UserNode,
};

#[derive(Default)]
pub struct NotificationMutation;

#[Object]
impl NotificationMutation {
    async fn create_notification(
        &self,
        ctx: &Context<'_>,
        input: CreateNotificationInput,
    ) -> Result<CreateNotificationPayload> {
        let context = ctx.data::<GraphQLContext>()?;
        let user_id = context.require_user(ctx)?;
        let receiver_id = decode_id(&input.receiver, UserNode::TYPE_NAME, "receiver")?;

        let notification = context
            .notification_service
            .create(user_id, receiver_id, input.notification_type)
            .await
            .map_err(StructuredError::from_core_error)?;

        Ok(CreateNotificationPayload {
            notification: Some(NotificationNode::from(notification)),
            client_mutation_id: input.client_mutation_id,
        })
    }

    /// Mark the caller's notifications checked
    async fn update_notifications(
        &self,
        ctx: &Context<'_>,
        input: UpdateNotificationsInput,
    ) -> Result<UpdateNotificationsPayload> {
        let context = ctx.data::<GraphQLContext>()?;
        let user_id = context.require_user(ctx)?;
        let notification_ids = decode_ids(
            &input.notification_ids,
            NotificationNode::TYPE_NAME,
            "notificationIds",
        )?;

        let updated = context
            .notification_service
            .mark_checked(user_id, notification_ids)
            .await
            .map_err(StructuredError::from_core_error)?;

        let last = updated.last().cloned().map(NotificationNode::from);
        let notifications = updated.into_iter().map(NotificationNode::from).collect();

        Ok(UpdateNotificationsPayload {
            notifications,
            notification: last,
            client_mutation_id: input.client_mutation_id,
        })
    }
}
