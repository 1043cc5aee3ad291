use async_graphql::*;
use chrono::{DateTime, Utc};

use crate::database::entities::plans;
use crate::graphql::context::GraphQLContext;
use crate::graphql::errors::StructuredError;
use crate::graphql::global_id::to_global_id;
use crate::graphql::types::{TalkRoomNode, UserNode};
use crate::services::{PlanFilter, PlanInput};

/// A service offered by a provider.
pub struct PlanNode(pub plans::Model);

impl PlanNode {
    pub const TYPE_NAME: &'static str = "PlanNode";
}

impl From<plans::Model> for PlanNode {
    fn from(model: plans::Model) -> Self {
        Self(model)
    }
}

#[Object]
impl PlanNode {
    pub async fn id(&self) -> ID {
        to_global_id(Self::TYPE_NAME, self.0.id)
    }

    async fn plan_author(&self, ctx: &Context<'_>) -> Result<UserNode> {
        let context = ctx.data::<GraphQLContext>()?;
        let author = context
            .account_service
            .get(self.0.plan_author_id)
            .await
            .map_err(StructuredError::from_core_error)?;

        Ok(UserNode::from(author))
    }

    async fn title(&self) -> &str {
        &self.0.title
    }

    async fn content(&self) -> &str {
        &self.0.content
    }

    async fn plan_image(&self) -> Option<&str> {
        self.0.plan_image.as_deref()
    }

    async fn is_published(&self) -> bool {
        self.0.is_published
    }

    async fn price(&self) -> i32 {
        self.0.price
    }

    async fn published_at(&self) -> DateTime<Utc> {
        self.0.published_at
    }

    async fn created_at(&self) -> DateTime<Utc> {
        self.0.created_at
    }

    /// Rooms are private to logged-in callers, like `allTalkRooms`
    async fn talk_rooms(&self, ctx: &Context<'_>) -> Result<Vec<TalkRoomNode>> {
        let context = ctx.data::<GraphQLContext>()?;
        context.require_user(ctx)?;
        let rooms = context
            .talk_room_service
            .rooms_for_plan(self.0.id)
            .await
            .map_err(StructuredError::from_core_error)?;

        Ok(rooms.into_iter().map(TalkRoomNode::from).collect())
    }
}

#[derive(InputObject, Default)]
pub struct PlanFilterInput {
    pub title: Option<String>,
    pub title_icontains: Option<String>,
    pub content: Option<String>,
    pub content_icontains: Option<String>,
    pub is_published: Option<bool>,
    pub price: Option<i32>,
}

impl From<PlanFilterInput> for PlanFilter {
    fn from(input: PlanFilterInput) -> Self {
        Self {
            title: input.title,
            title_icontains: input.title_icontains,
            content: input.content,
            content_icontains: input.content_icontains,
            is_published: input.is_published,
            price: input.price,
        }
    }
}

#[derive(InputObject)]
pub struct CreatePlanInput {
    pub title: String,
    pub content: String,
    pub is_published: bool,
    pub price: i32,
    pub plan_image: Option<Upload>,
    pub client_mutation_id: Option<String>,
}

impl CreatePlanInput {
    pub fn into_parts(self) -> (PlanInput, Option<Upload>) {
        let plan = PlanInput {
            title: self.title,
            content: self.content,
            is_published: self.is_published,
            price: self.price,
        };
        (plan, self.plan_image)
    }
}

#[derive(InputObject)]
pub struct UpdatePlanInput {
    pub id: ID,
    pub title: String,
    pub content: String,
    pub price: i32,
    pub is_published: bool,
    pub plan_image: Option<Upload>,
    pub client_mutation_id: Option<String>,
}

impl UpdatePlanInput {
    pub fn into_parts(self) -> (ID, PlanInput, Option<Upload>) {
        let plan = PlanInput {
            title: self.title,
            content: self.content,
            is_published: self.is_published,
            price: self.price,
        };
        (self.id, plan, self.plan_image)
    }
}

#[derive(InputObject)]
pub struct DeletePlanInput {
    pub id: ID,
    pub client_mutation_id: Option<String>,
}

#[derive(SimpleObject)]
pub struct PlanPayload {
    pub plan: Option<PlanNode>,
    pub client_mutation_id: Option<String>,
}
