use async_graphql::*;

use crate::graphql::context::GraphQLContext;
use crate::graphql::errors::StructuredError;
use crate::graphql::global_id::{decode_id, decode_ids};
use crate::graphql::types::{
    CreateMessageInput, CreateMessagePayload, CreateTalkRoomInput, MessageNode, PlanNode,
    TalkRoomNode, TalkRoomPayload, UpdateMessagesInput, UpdateMessagesPayload, UpdateTalkRoomInput,
    UserNode,
};

#[derive(Default)]
pub struct TalkRoomMutation;

#[Object]
impl TalkRoomMutation {
    /// Open an unapproved talk room about a plan
    async fn create_talk_room(&self, ctx: &Context<'_>, input: CreateTalkRoomInput) -> Result<TalkRoomPayload> {
        let context = ctx.data::<GraphQLContext>()?;
        let user_id = context.require_user(ctx)?;
        let plan_id = decode_id(&input.selected_plan, PlanNode::TYPE_NAME, "selectedPlan")?;
        let opponent_id = decode_id(&input.opponent_user, UserNode::TYPE_NAME, "opponentUser")?;

        let room = context
            .talk_room_service
            .create_room(user_id, plan_id, opponent_id, input.talk_room_description)
            .await
            .map_err(StructuredError::from_core_error)?;

        Ok(TalkRoomPayload {
            talk_room: Some(TalkRoomNode::from(room)),
            client_mutation_id: input.client_mutation_id,
        })
    }

    /// Approve a talk room; only the plan author may do this
    async fn update_talk_room(&self, ctx: &Context<'_>, input: UpdateTalkRoomInput) -> Result<TalkRoomPayload> {
        let context = ctx.data::<GraphQLContext>()?;
        let user_id = context.require_user(ctx)?;
        let room_id = decode_id(&input.talk_room_id, TalkRoomNode::TYPE_NAME, "talkRoomId")?;

        let room = context
            .talk_room_service
            .set_approval(user_id, room_id, input.is_approve)
            .await
            .map_err(StructuredError::from_core_error)?;

        Ok(TalkRoomPayload {
            talk_room: Some(TalkRoomNode::from(room)),
            client_mutation_id: input.client_mutation_id,
        })
    }

    async fn create_message(&self, ctx: &Context<'_>, input: CreateMessageInput) -> Result<CreateMessagePayload> {
        let context = ctx.data::<GraphQLContext>()?;
        let user_id = context.require_user(ctx)?;
        let room_id = decode_id(&input.talking_room_id, TalkRoomNode::TYPE_NAME, "talkingRoomId")?;

        let message = context
            .talk_room_service
            .create_message(user_id, room_id, input.text)
            .await
            .map_err(StructuredError::from_core_error)?;

        Ok(CreateMessagePayload {
            message: Some(MessageNode::from(message)),
            client_mutation_id: input.client_mutation_id,
        })
    }

    /// Mark messages received by the caller as viewed
    async fn update_messages(&self, ctx: &Context<'_>, input: UpdateMessagesInput) -> Result<UpdateMessagesPayload> {
        let context = ctx.data::<GraphQLContext>()?;
        let user_id = context.require_user(ctx)?;
        let message_ids = decode_ids(&input.message_ids, MessageNode::TYPE_NAME, "messageIds")?;

        let messages = context
            .talk_room_service
            .mark_viewed(user_id, message_ids)
            .await
            .map_err(StructuredError::from_core_error)?;

        Ok(UpdateMessagesPayload {
            messages: messages.into_iter().map(MessageNode::from).collect(),
            client_mutation_id: input.client_mutation_id,
        })
    }
}
