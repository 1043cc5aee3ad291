// Mutation root, split by aggregate.

pub mod helpers;

mod account;
mod auth;
mod lookup;
mod notification;
mod plan;
mod profile;
mod review;
mod talk_room;

use async_graphql::*;

/// Main mutation root that combines all mutation submodules
#[derive(Default, MergedObject)]
pub struct Mutation(
    pub account::AccountMutation,
    pub auth::AuthMutation,
    pub profile::ProfileMutation,
    pub plan::PlanMutation,
    pub talk_room::TalkRoomMutation,
    pub review::ReviewMutation,
    pub notification::NotificationMutation,
    pub lookup::LookupMutation,
);
