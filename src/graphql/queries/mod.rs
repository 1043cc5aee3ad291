// Query root, split by aggregate like the mutations.

mod account;
mod lookup;
mod node;
mod notification;
mod plan;
mod profile;
mod review;
mod talk_room;

use async_graphql::*;

#[derive(Default, MergedObject)]
pub struct Query(
    pub account::AccountQuery,
    pub profile::ProfileQuery,
    pub plan::PlanQuery,
    pub lookup::LookupQuery,
    pub review::ReviewQuery,
    pub talk_room::TalkRoomQuery,
    pub notification::NotificationQuery,
    pub node::NodeQuery,
);
