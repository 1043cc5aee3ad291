use async_graphql::*;
use chrono::{DateTime, Utc};

use crate::database::entities::{messages, talk_rooms};
use crate::graphql::context::GraphQLContext;
use crate::graphql::errors::StructuredError;
use crate::graphql::global_id::{decode_optional_id, to_global_id};
use crate::graphql::types::{PlanNode, UserNode};
use crate::services::{MessageFilter, TalkRoomFilter};

/// Conversation between a plan author and a prospective customer.
pub struct TalkRoomNode(pub talk_rooms::Model);

impl TalkRoomNode {
    pub const TYPE_NAME: &'static str = "TalkRoomNode";
}

impl From<talk_rooms::Model> for TalkRoomNode {
    fn from(model: talk_rooms::Model) -> Self {
        Self(model)
    }
}

#[Object]
impl TalkRoomNode {
    pub async fn id(&self) -> ID {
        to_global_id(Self::TYPE_NAME, self.0.id)
    }

    async fn talk_room_description(&self) -> Option<&str> {
        self.0.talk_room_description.as_deref()
    }

    async fn selected_plan(&self, ctx: &Context<'_>) -> Result<Option<PlanNode>> {
        let Some(plan_id) = self.0.selected_plan_id else {
            return Ok(None);
        };
        let context = ctx.data::<GraphQLContext>()?;
        let plan = context
            .plan_service
            .find(plan_id)
            .await
            .map_err(StructuredError::from_core_error)?;

        Ok(plan.map(PlanNode::from))
    }

    async fn opponent_user(&self, ctx: &Context<'_>) -> Result<Option<UserNode>> {
        let Some(user_id) = self.0.opponent_user_id else {
            return Ok(None);
        };
        let context = ctx.data::<GraphQLContext>()?;
        let user = context
            .account_service
            .find(user_id)
            .await
            .map_err(StructuredError::from_core_error)?;

        Ok(user.map(UserNode::from))
    }

    async fn is_approved(&self) -> bool {
        self.0.is_approved
    }

    async fn created_at(&self) -> DateTime<Utc> {
        self.0.created_at
    }

    async fn messages(&self, ctx: &Context<'_>) -> Result<Vec<MessageNode>> {
        let context = ctx.data::<GraphQLContext>()?;
        context.require_user(ctx)?;
        let messages = context
            .talk_room_service
            .messages_in_room(self.0.id)
            .await
            .map_err(StructuredError::from_core_error)?;

        Ok(messages.into_iter().map(MessageNode::from).collect())
    }
}

pub struct MessageNode(pub messages::Model);

impl MessageNode {
    pub const TYPE_NAME: &'static str = "MessageNode";
}

impl From<messages::Model> for MessageNode {
    fn from(model: messages::Model) -> Self {
        Self(model)
    }
}

#[Object]
impl MessageNode {
    pub async fn id(&self) -> ID {
        to_global_id(Self::TYPE_NAME, self.0.id)
    }

    async fn talking_room(&self, ctx: &Context<'_>) -> Result<TalkRoomNode> {
        let context = ctx.data::<GraphQLContext>()?;
        let room = context
            .talk_room_service
            .get_room(self.0.talking_room_id)
            .await
            .map_err(StructuredError::from_core_error)?;

        Ok(TalkRoomNode::from(room))
    }

    async fn sender(&self, ctx: &Context<'_>) -> Result<UserNode> {
        let context = ctx.data::<GraphQLContext>()?;
        let sender = context
            .account_service
            .get(self.0.sender_id)
            .await
            .map_err(StructuredError::from_core_error)?;

        Ok(UserNode::from(sender))
    }

    async fn text(&self) -> &str {
        &self.0.text
    }

    async fn is_viewed(&self) -> bool {
        self.0.is_viewed
    }

    async fn created_at(&self) -> DateTime<Utc> {
        self.0.created_at
    }
}

#[derive(InputObject, Default)]
pub struct TalkRoomFilterInput {
    pub selected_plan: Option<ID>,
}

impl TalkRoomFilterInput {
    pub fn into_filter(self) -> Result<TalkRoomFilter> {
        Ok(TalkRoomFilter {
            selected_plan_id: decode_optional_id(
                self.selected_plan.as_ref(),
                PlanNode::TYPE_NAME,
                "selectedPlan",
            )?,
        })
    }
}

#[derive(InputObject, Default)]
pub struct MessageFilterInput {
    pub text: Option<String>,
    pub text_icontains: Option<String>,
}

impl From<MessageFilterInput> for MessageFilter {
    fn from(input: MessageFilterInput) -> Self {
        Self {
            text: input.text,
            text_icontains: input.text_icontains,
        }
    }
}

#[derive(InputObject)]
pub struct CreateTalkRoomInput {
    pub selected_plan: ID,
    pub opponent_user: ID,
    pub talk_room_description: Option<String>,
    pub client_mutation_id: Option<String>,
}

#[derive(InputObject)]
pub struct UpdateTalkRoomInput {
    pub talk_room_id: ID,
    /// `true` approves the room; `false` never revokes an approval
    pub is_approve: bool,
    pub client_mutation_id: Option<String>,
}

#[derive(SimpleObject)]
pub struct TalkRoomPayload {
    pub talk_room: Option<TalkRoomNode>,
    pub client_mutation_id: Option<String>,
}

#[derive(InputObject)]
pub struct CreateMessageInput {
    pub talking_room_id: ID,
    pub text: String,
    pub client_mutation_id: Option<String>,
}

#[derive(SimpleObject)]
pub struct CreateMessagePayload {
    pub message: Option<MessageNode>,
    pub client_mutation_id: Option<String>,
}

#[derive(InputObject)]
pub struct UpdateMessagesInput {
    pub message_ids: Vec<ID>,
    pub client_mutation_id: Option<String>,
}

#[derive(SimpleObject)]
pub struct UpdateMessagesPayload {
    pub messages: Vec<MessageNode>,
    pub client_mutation_id: Option<String>,
}
