use async_graphql::*;

use crate::graphql::context::GraphQLContext;
use crate::graphql::errors::StructuredError;
use crate::graphql::global_id::decode_id;
use crate::graphql::pagination::{load_connection, NodeConnection};
use crate::graphql::types::{PlanFilterInput, PlanNode};

#[derive(Default)]
pub struct PlanQuery;

#[Object]
impl PlanQuery {
    async fn plan(&self, ctx: &Context<'_>, id: ID) -> Result<PlanNode> {
        let context = ctx.data::<GraphQLContext>()?;
        let plan_id = decode_id(&id, PlanNode::TYPE_NAME, "id")?;
        let plan = context
            .plan_service
            .get(plan_id)
            .await
            .map_err(StructuredError::from_core_error)?;

        Ok(PlanNode::from(plan))
    }

    async fn all_plans(
        &self,
        ctx: &Context<'_>,
        filter: Option<PlanFilterInput>,
        after: Option<String>,
        before: Option<String>,
        first: Option<i32>,
        last: Option<i32>,
    ) -> Result<NodeConnection<PlanNode>> {
        let context = ctx.data::<GraphQLContext>()?;
        let filter = filter.unwrap_or_default().into();

        load_connection(after, before, first, last, |window| {
            context.plan_service.list(filter, None, window)
        })
        .await
    }

    /// Plans authored by the caller
    async fn login_user_plans(
        &self,
        ctx: &Context<'_>,
        filter: Option<PlanFilterInput>,
        after: Option<String>,
        before: Option<String>,
        first: Option<i32>,
        last: Option<i32>,
    ) -> Result<NodeConnection<PlanNode>> {
        let context = ctx.data::<GraphQLContext>()?;
        let user_id = context.require_user(ctx)?;
        let filter = filter.unwrap_or_default().into();

        load_connection(after, before, first, last, |window| {
            context.plan_service.list(filter, Some(user_id), window)
        })
        .await
    }
}
