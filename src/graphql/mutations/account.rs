use async_graphql::*;

use crate::graphql::context::GraphQLContext;
use crate::graphql::errors::StructuredError;
use crate::graphql::types::{
    CreateUserInput, CreateUserPayload, UpdateUserInput, UpdateUserPayload, UserNode,
};

#[derive(Default)]
pub struct AccountMutation;

#[Object]
impl AccountMutation {
    /// Register an inactive account and mail its verification link
    async fn create_user(&self, ctx: &Context<'_>, input: CreateUserInput) -> Result<CreateUserPayload> {
        let context = ctx.data::<GraphQLContext>()?;
        let user = context
            .account_service
            .register(&input.email, &input.password)
            .await
            .map_err(StructuredError::from_core_error)?;

        Ok(CreateUserPayload {
            user: Some(UserNode::from(user)),
            client_mutation_id: input.client_mutation_id,
        })
    }

    /// Activate the account named by a verification token
    async fn update_user(&self, ctx: &Context<'_>, input: UpdateUserInput) -> Result<UpdateUserPayload> {
        let context = ctx.data::<GraphQLContext>()?;
        context
            .account_service
            .verify(&input.token)
            .await
            .map_err(StructuredError::from_core_error)?;

        Ok(UpdateUserPayload {
            ok: Some(true),
            client_mutation_id: input.client_mutation_id,
        })
    }
}
