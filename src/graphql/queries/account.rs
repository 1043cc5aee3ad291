use async_graphql::*;

use crate::graphql::context::GraphQLContext;
use crate::graphql::errors::StructuredError;
use crate::graphql::global_id::decode_id;
use crate::graphql::pagination::{load_connection, NodeConnection};
use crate::graphql::types::{UserFilterInput, UserNode};

#[derive(Default)]
pub struct AccountQuery;

#[Object]
impl AccountQuery {
    /// The calling user
    async fn login_user(&self, ctx: &Context<'_>) -> Result<UserNode> {
        let context = ctx.data::<GraphQLContext>()?;
        let user_id = context.require_user(ctx)?;
        let user = context
            .account_service
            .get(user_id)
            .await
            .map_err(StructuredError::from_core_error)?;

        Ok(UserNode::from(user))
    }

    async fn user(&self, ctx: &Context<'_>, id: ID) -> Result<UserNode> {
        let context = ctx.data::<GraphQLContext>()?;
        context.require_user(ctx)?;
        let user_id = decode_id(&id, UserNode::TYPE_NAME, "id")?;
        let user = context
            .account_service
            .get(user_id)
            .await
            .map_err(StructuredError::from_core_error)?;

        Ok(UserNode::from(user))
    }

    async fn all_users(
        &self,
        ctx: &Context<'_>,
        filter: Option<UserFilterInput>,
        after: Option<String>,
        before: Option<String>,
        first: Option<i32>,
        last: Option<i32>,
    ) -> Result<NodeConnection<UserNode>> {
        let context = ctx.data::<GraphQLContext>()?;
        context.require_user(ctx)?;
        let filter = filter.unwrap_or_default().into();

        load_connection(after, before, first, last, |window| {
            context.account_service.list(filter, window)
        })
        .await
    }
}
