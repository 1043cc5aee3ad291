use async_graphql::*;

use crate::graphql::context::GraphQLContext;
use crate::graphql::errors::StructuredError;
use crate::graphql::global_id::decode_id;
use crate::graphql::pagination::{load_connection, NodeConnection};
use crate::graphql::types::{MessageFilterInput, MessageNode, TalkRoomFilterInput, TalkRoomNode};

#[derive(Default)]
pub struct TalkRoomQuery;

impl TalkRoomQuery {
    async fn rooms(
        ctx: &Context<'_>,
        participant: Option<i32>,
        filter: Option<TalkRoomFilterInput>,
        after: Option<String>,
        before: Option<String>,
        first: Option<i32>,
        last: Option<i32>,
    ) -> Result<NodeConnection<TalkRoomNode>> {
        let context = ctx.data::<GraphQLContext>()?;
        let filter = filter.unwrap_or_default().into_filter()?;

        load_connection(after, before, first, last, |window| {
            context.talk_room_service.list_rooms(filter, participant, window)
        })
        .await
    }

    async fn messages(
        ctx: &Context<'_>,
        sender_id: Option<i32>,
        filter: Option<MessageFilterInput>,
        after: Option<String>,
        before: Option<String>,
        first: Option<i32>,
        last: Option<i32>,
    ) -> Result<NodeConnection<MessageNode>> {
        let context = ctx.data::<GraphQLContext>()?;
        let filter = filter.unwrap_or_default().into();

        load_connection(after, before, first, last, |window| {
            context.talk_room_service.list_messages(filter, sender_id, window)
        })
        .await
    }
}

#[Object]
impl TalkRoomQuery {
    async fn talk_room(&self, ctx: &Context<'_>, id: ID) -> Result<TalkRoomNode> {
        let context = ctx.data::<GraphQLContext>()?;
        context.require_user(ctx)?;
        let room_id = decode_id(&id, TalkRoomNode::TYPE_NAME, "id")?;
        let room = context
            .talk_room_service
            .get_room(room_id)
            .await
            .map_err(StructuredError::from_core_error)?;

        Ok(TalkRoomNode::from(room))
    }

    async fn all_talk_rooms(
        &self,
        ctx: &Context<'_>,
        filter: Option<TalkRoomFilterInput>,
        after: Option<String>,
        before: Option<String>,
        first: Option<i32>,
        last: Option<i32>,
    ) -> Result<NodeConnection<TalkRoomNode>> {
        ctx.data::<GraphQLContext>()?.require_user(ctx)?;
        Self::rooms(ctx, None, filter, after, before, first, last).await
    }

    /// Rooms where the caller is the plan author or the opponent
    async fn login_user_talk_rooms(
        &self,
        ctx: &Context<'_>,
        filter: Option<TalkRoomFilterInput>,
        after: Option<String>,
        before: Option<String>,
        first: Option<i32>,
        last: Option<i32>,
    ) -> Result<NodeConnection<TalkRoomNode>> {
        let user_id = ctx.data::<GraphQLContext>()?.require_user(ctx)?;
        Self::rooms(ctx, Some(user_id), filter, after, before, first, last).await
    }

    async fn message(&self, ctx: &Context<'_>, id: ID) -> Result<MessageNode> {
        let context = ctx.data::<GraphQLContext>()?;
        context.require_user(ctx)?;
        let message_id = decode_id(&id, MessageNode::TYPE_NAME, "id")?;
        let message = context
            .talk_room_service
            .get_message(message_id)
            .await
            .map_err(StructuredError::from_core_error)?;

        Ok(MessageNode::from(message))
    }

    async fn all_messages(
        &self,
        ctx: &Context<'_>,
        filter: Option<MessageFilterInput>,
        after: Option<String>,
        before: Option<String>,
        first: Option<i32>,
        last: Option<i32>,
    ) -> Result<NodeConnection<MessageNode>> {
        ctx.data::<GraphQLContext>()?.require_user(ctx)?;
        Self::messages(ctx, None, filter, after, before, first, last).await
    }

    /// Messages sent by the caller
    async fn login_user_messages(
        &self,
        ctx: &Context<'_>,
        filter: Option<MessageFilterInput>,
        after: Option<String>,
        before: Option<String>,
        first: Option<i32>,
        last: Option<i32>,
    ) -> Result<NodeConnection<MessageNode>> {
        let user_id = ctx.data::<GraphQLContext>()?.require_user(ctx)?;
        Self::messages(ctx, Some(user_id), filter, after, before, first, last).await
    }
}
