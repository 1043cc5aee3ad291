use async_graphql::*;

use crate::graphql::context::GraphQLContext;
use crate::graphql::errors::StructuredError;
use crate::graphql::global_id::decode_id;
use crate::graphql::pagination::{load_connection, NodeConnection};
use crate::graphql::types::{NotificationFilterInput, NotificationNode};

#[derive(Default)]
pub struct NotificationQuery;

#[Object]
impl NotificationQuery {
    async fn notification(&self, ctx: &Context<'_>, id: ID) -> Result<NotificationNode> {
        let context = ctx.data::<GraphQLContext>()?;
        context.require_user(ctx)?;
        let notification_id = decode_id(&id, NotificationNode::TYPE_NAME, "id")?;
        let notification = context
            .notification_service
            .get(notification_id)
            .await
            .map_err(StructuredError::from_core_error)?;

        Ok(NotificationNode::from(notification))
    }

    /// Notifications addressed to the caller
    async fn login_user_notifications(
        &self,
        ctx: &Context<'_>,
        filter: Option<NotificationFilterInput>,
        after: Option<String>,
        before: Option<String>,
        first: Option<i32>,
        last: Option<i32>,
    ) -> Result<NodeConnection<NotificationNode>> {
        let context = ctx.data::<GraphQLContext>()?;
        let user_id = context.require_user(ctx)?;
        let filter = filter.unwrap_or_default().into_filter()?;

        load_connection(after, before, first, last, |window| {
            context.notification_service.list(filter, Some(user_id), window)
        })
        .await
    }
}
