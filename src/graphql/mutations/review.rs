use async_graphql::*;

use crate::graphql::context::GraphQLContext;
use crate::graphql::errors::StructuredError;
use crate::graphql::global_id::decode_id;
use crate::graphql::types::{CreateReviewInput, CreateReviewPayload, ReviewNode, UserNode};

#[derive(Default)]
pub struct ReviewMutation;

#[Object]
impl ReviewMutation {
    /// Review a provider as the calling customer
    async fn create_review(&self, ctx: &Context<'_>, input: CreateReviewInput) -> Result<CreateReviewPayload> {
        let context = ctx.data::<GraphQLContext>()?;
        let user_id = context.require_user(ctx)?;
        let provider_id = decode_id(&input.provider, UserNode::TYPE_NAME, "provider")?;

        let review = context
            .review_service
            .create(user_id, provider_id, input.review_text, input.stars)
            .await
            .map_err(StructuredError::from_core_error)?;

        Ok(CreateReviewPayload {
            review: Some(ReviewNode::from(review)),
            client_mutation_id: input.client_mutation_id,
        })
    }
}
