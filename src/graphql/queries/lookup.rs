use async_graphql::*;

use crate::graphql::context::GraphQLContext;
use crate::graphql::errors::StructuredError;
use crate::graphql::global_id::decode_id;
use crate::graphql::pagination::{load_connection, NodeConnection};
use crate::graphql::types::{
    AddressFilterInput, AddressNode, GenderFilterInput, GenderNode, TagFilterInput, TagNode,
};

#[derive(Default)]
pub struct LookupQuery;

#[Object]
impl LookupQuery {
    async fn tag(&self, ctx: &Context<'_>, id: ID) -> Result<TagNode> {
        let context = ctx.data::<GraphQLContext>()?;
        context.require_user(ctx)?;
        let tag_id = decode_id(&id, TagNode::TYPE_NAME, "id")?;
        let tag = context
            .lookup_service
            .tag(tag_id)
            .await
            .map_err(StructuredError::from_core_error)?;

        Ok(TagNode::from(tag))
    }

    async fn all_tags(
        &self,
        ctx: &Context<'_>,
        filter: Option<TagFilterInput>,
        after: Option<String>,
        before: Option<String>,
        first: Option<i32>,
        last: Option<i32>,
    ) -> Result<NodeConnection<TagNode>> {
        let context = ctx.data::<GraphQLContext>()?;
        context.require_user(ctx)?;
        let filter = filter.unwrap_or_default().into();

        load_connection(after, before, first, last, |window| {
            context.lookup_service.list_tags(filter, window)
        })
        .await
    }

    async fn gender(&self, ctx: &Context<'_>, id: ID) -> Result<GenderNode> {
        let context = ctx.data::<GraphQLContext>()?;
        let gender_id = decode_id(&id, GenderNode::TYPE_NAME, "id")?;
        let gender = context
            .lookup_service
            .gender(gender_id)
            .await
            .map_err(StructuredError::from_core_error)?;

        Ok(GenderNode::from(gender))
    }

    async fn all_genders(
        &self,
        ctx: &Context<'_>,
        filter: Option<GenderFilterInput>,
        after: Option<String>,
        before: Option<String>,
        first: Option<i32>,
        last: Option<i32>,
    ) -> Result<NodeConnection<GenderNode>> {
        let context = ctx.data::<GraphQLContext>()?;
        let filter = filter.unwrap_or_default().into();

        load_connection(after, before, first, last, |window| {
            context.lookup_service.list_genders(filter, window)
        })
        .await
    }

    async fn address(&self, ctx: &Context<'_>, id: ID) -> Result<AddressNode> {
        let context = ctx.data::<GraphQLContext>()?;
        let address_id = decode_id(&id, AddressNode::TYPE_NAME, "id")?;
        let address = context
            .lookup_service
            .address(address_id)
            .await
            .map_err(StructuredError::from_core_error)?;

        Ok(AddressNode::from(address))
    }

    async fn all_addresses(
        &self,
        ctx: &Context<'_>,
        filter: Option<AddressFilterInput>,
        after: Option<String>,
        before: Option<String>,
        first: Option<i32>,
        last: Option<i32>,
    ) -> Result<NodeConnection<AddressNode>> {
        let context = ctx.data::<GraphQLContext>()?;
        let filter = filter.unwrap_or_default().into();

        load_connection(after, before, first, last, |window| {
            context.lookup_service.list_addresses(filter, window)
        })
        .await
    }
}
