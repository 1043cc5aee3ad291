use async_graphql::*;

use crate::graphql::context::GraphQLContext;
use crate::graphql::errors::StructuredError;
use crate::graphql::global_id::decode_id;
use crate::graphql::pagination::{load_connection, NodeConnection};
use crate::graphql::types::{ReviewFilterInput, ReviewNode};
use crate::services::ReviewScope;

#[derive(Default)]
pub struct ReviewQuery;

impl ReviewQuery {
    async fn reviews(
        ctx: &Context<'_>,
        scope: ReviewScope,
        filter: Option<ReviewFilterInput>,
        after: Option<String>,
        before: Option<String>,
        first: Option<i32>,
        last: Option<i32>,
    ) -> Result<NodeConnection<ReviewNode>> {
        let context = ctx.data::<GraphQLContext>()?;
        let filter = filter.unwrap_or_default().into_filter()?;

        load_connection(after, before, first, last, |window| {
            context.review_service.list(filter, scope, window)
        })
        .await
    }
}

#[Object]
impl ReviewQuery {
    async fn review(&self, ctx: &Context<'_>, id: ID) -> Result<ReviewNode> {
        let context = ctx.data::<GraphQLContext>()?;
        let review_id = decode_id(&id, ReviewNode::TYPE_NAME, "id")?;
        let review = context
            .review_service
            .get(review_id)
            .await
            .map_err(StructuredError::from_core_error)?;

        Ok(ReviewNode::from(review))
    }

    async fn all_reviews(
        &self,
        ctx: &Context<'_>,
        filter: Option<ReviewFilterInput>,
        after: Option<String>,
        before: Option<String>,
        first: Option<i32>,
        last: Option<i32>,
    ) -> Result<NodeConnection<ReviewNode>> {
        Self::reviews(ctx, ReviewScope::All, filter, after, before, first, last).await
    }

    /// Reviews the caller has received as a provider
    async fn login_user_reviews(
        &self,
        ctx: &Context<'_>,
        filter: Option<ReviewFilterInput>,
        after: Option<String>,
        before: Option<String>,
        first: Option<i32>,
        last: Option<i32>,
    ) -> Result<NodeConnection<ReviewNode>> {
        let user_id = ctx.data::<GraphQLContext>()?.require_user(ctx)?;
        Self::reviews(ctx, ReviewScope::ReceivedBy(user_id), filter, after, before, first, last).await
    }

    /// Reviews the caller has written
    async fn login_user_send_reviews(
        &self,
        ctx: &Context<'_>,
        filter: Option<ReviewFilterInput>,
        after: Option<String>,
        before: Option<String>,
        first: Option<i32>,
        last: Option<i32>,
    ) -> Result<NodeConnection<ReviewNode>> {
        let user_id = ctx.data::<GraphQLContext>()?.require_user(ctx)?;
        Self::reviews(ctx, ReviewScope::SentBy(user_id), filter, after, before, first, last).await
    }
}
