use async_graphql::*;

use crate::graphql::context::GraphQLContext;
use crate::graphql::errors::StructuredError;
use crate::graphql::types::{
    AddressNode, CreateAddressPayload, CreateGenderPayload, CreateLookupInput, CreateTagPayload,
    GenderNode, TagNode,
};

/// Staff-only management of classification values.
#[derive(Default)]
pub struct LookupMutation;

#[Object]
impl LookupMutation {
    async fn create_tag(&self, ctx: &Context<'_>, input: CreateLookupInput) -> Result<CreateTagPayload> {
        let context = ctx.data::<GraphQLContext>()?;
        context.require_staff(ctx)?;

        let tag = context
            .lookup_service
            .create_tag(&input.name)
            .await
            .map_err(StructuredError::from_core_error)?;

        Ok(CreateTagPayload {
            tag: Some(TagNode::from(tag)),
            client_mutation_id: input.client_mutation_id,
        })
    }

    async fn create_gender(&self, ctx: &Context<'_>, input: CreateLookupInput) -> Result<CreateGenderPayload> {
        let context = ctx.data::<GraphQLContext>()?;
        context.require_staff(ctx)?;

        let gender = context
            .lookup_service
            .create_gender(&input.name)
            .await
            .map_err(StructuredError::from_core_error)?;

        Ok(CreateGenderPayload {
            gender: Some(GenderNode::from(gender)),
            client_mutation_id: input.client_mutation_id,
        })
    }

    async fn create_address(&self, ctx: &Context<'_>, input: CreateLookupInput) -> Result<CreateAddressPayload> {
        let context = ctx.data::<GraphQLContext>()?;
        context.require_staff(ctx)?;

        let address = context
            .lookup_service
            .create_address(&input.name)
            .await
            .map_err(StructuredError::from_core_error)?;

        Ok(CreateAddressPayload {
            address: Some(AddressNode::from(address)),
            client_mutation_id: input.client_mutation_id,
        })
    }
}
