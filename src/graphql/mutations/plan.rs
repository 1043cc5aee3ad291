use async_graphql::*;

use crate::graphql::context::GraphQLContext;
use crate::graphql::errors::StructuredError;
use crate::graphql::global_id::decode_id;
use crate::graphql::mutations::helpers::read_upload;
use crate::graphql::types::{CreatePlanInput, DeletePlanInput, PlanNode, PlanPayload, UpdatePlanInput};

#[derive(Default)]
pub struct PlanMutation;

#[Object]
impl PlanMutation {
    async fn create_plan(&self, ctx: &Context<'_>, input: CreatePlanInput) -> Result<PlanPayload> {
        let context = ctx.data::<GraphQLContext>()?;
        let user_id = context.require_user(ctx)?;
        let client_mutation_id = input.client_mutation_id.clone();
        let (plan, upload) = input.into_parts();
        let image = read_upload(ctx, upload)?;

        let plan = context
            .plan_service
            .create(user_id, plan, image)
            .await
            .map_err(StructuredError::from_core_error)?;

        Ok(PlanPayload {
            plan: Some(PlanNode::from(plan)),
            client_mutation_id,
        })
    }

    async fn update_plan(&self, ctx: &Context<'_>, input: UpdatePlanInput) -> Result<PlanPayload> {
        let context = ctx.data::<GraphQLContext>()?;
        let user_id = context.require_user(ctx)?;
        let client_mutation_id = input.client_mutation_id.clone();
        let (id, plan, upload) = input.into_parts();
        let plan_id = decode_id(&id, PlanNode::TYPE_NAME, "id")?;
        let image = read_upload(ctx, upload)?;

        let plan = context
            .plan_service
            .update(user_id, plan_id, plan, image)
            .await
            .map_err(StructuredError::from_core_error)?;

        Ok(PlanPayload {
            plan: Some(PlanNode::from(plan)),
            client_mutation_id,
        })
    }

    /// Delete one of the caller's plans, returning the removed row
    async fn delete_plan(&self, ctx: &Context<'_>, input: DeletePlanInput) -> Result<PlanPayload> {
        let context = ctx.data::<GraphQLContext>()?;
        let user_id = context.require_user(ctx)?;
        let plan_id = decode_id(&input.id, PlanNode::TYPE_NAME, "id")?;

        let plan = context
            .plan_service
            .delete(user_id, plan_id)
            .await
            .map_err(StructuredError::from_core_error)?;

        Ok(PlanPayload {
            plan: Some(PlanNode::from(plan)),
            client_mutation_id: input.client_mutation_id,
        })
    }
}
