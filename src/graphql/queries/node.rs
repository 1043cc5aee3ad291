use async_graphql::*;

use crate::graphql::context::GraphQLContext;
use crate::graphql::errors::StructuredError;
use crate::graphql::global_id::from_global_id;
use crate::graphql::types::{
    AddressNode, GenderNode, MessageNode, Node, NotificationNode, PlanNode, ProfileNode,
    ReviewNode, TagNode, TalkRoomNode, UserNode,
};

#[derive(Default)]
pub struct NodeQuery;

#[Object]
impl NodeQuery {
    /// Resolve any object by its global ID.
    ///
    /// Node types whose own query requires a login require it here too.
    async fn node(&self, ctx: &Context<'_>, id: ID) -> Result<Option<Node>> {
        let context = ctx.data::<GraphQLContext>()?;
        let Some((type_name, pk)) = from_global_id(id.as_str()) else {
            return Err(StructuredError::validation(
                "id",
                format!("'{}' is not a valid global id", id.as_str()),
            ));
        };

        let node = match type_name.as_str() {
            UserNode::TYPE_NAME => {
                context.require_user(ctx)?;
                context
                    .account_service
                    .find(pk)
                    .await
                    .map(|found| found.map(|m| Node::UserNode(m.into())))
            }
            ProfileNode::TYPE_NAME => context
                .profile_service
                .find(pk)
                .await
                .map(|found| found.map(|m| Node::ProfileNode(m.into()))),
            TagNode::TYPE_NAME => {
                context.require_user(ctx)?;
                context
                    .lookup_service
                    .find_tag(pk)
                    .await
                    .map(|found| found.map(|m| Node::TagNode(m.into())))
            }
            GenderNode::TYPE_NAME => context
                .lookup_service
                .find_gender(pk)
                .await
                .map(|found| found.map(|m| Node::GenderNode(m.into()))),
            AddressNode::TYPE_NAME => context
                .lookup_service
                .find_address(pk)
                .await
                .map(|found| found.map(|m| Node::AddressNode(m.into()))),
            PlanNode::TYPE_NAME => context
                .plan_service
                .find(pk)
                .await
                .map(|found| found.map(|m| Node::PlanNode(m.into()))),
            ReviewNode::TYPE_NAME => context
                .review_service
                .find(pk)
                .await
                .map(|found| found.map(|m| Node::ReviewNode(m.into()))),
            TalkRoomNode::TYPE_NAME => {
                context.require_user(ctx)?;
                context
                    .talk_room_service
                    .find_room(pk)
                    .await
                    .map(|found| found.map(|m| Node::TalkRoomNode(m.into())))
            }
            MessageNode::TYPE_NAME => {
                context.require_user(ctx)?;
                context
                    .talk_room_service
                    .find_message(pk)
                    .await
                    .map(|found| found.map(|m| Node::MessageNode(m.into())))
            }
            NotificationNode::TYPE_NAME => {
                context.require_user(ctx)?;
                context
                    .notification_service
                    .find(pk)
                    .await
                    .map(|found| found.map(|m| Node::NotificationNode(m.into())))
            }
            other => {
                return Err(StructuredError::validation(
                    "id",
                    format!("unknown node type '{}'", other),
                ))
            }
        };

        node.map_err(StructuredError::from_core_error)
    }
}
