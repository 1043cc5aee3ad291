use async_graphql::*;

use crate::graphql::types::{
    AddressNode, GenderNode, MessageNode, NotificationNode, PlanNode, ProfileNode, ReviewNode,
    TagNode, TalkRoomNode, UserNode,
};

/// Relay node interface implemented by every object type.
#[derive(Interface)]
#[graphql(field(name = "id", ty = "ID"))]
pub enum Node {
    UserNode(UserNode),
    ProfileNode(ProfileNode),
    TagNode(TagNode),
    GenderNode(GenderNode),
    AddressNode(AddressNode),
    PlanNode(PlanNode),
    ReviewNode(ReviewNode),
    TalkRoomNode(TalkRoomNode),
    MessageNode(MessageNode),
    NotificationNode(NotificationNode),
}
