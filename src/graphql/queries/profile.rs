use async_graphql::*;

use crate::graphql::context::GraphQLContext;
use crate::graphql::errors::StructuredError;
use crate::graphql::global_id::decode_id;
use crate::graphql::pagination::{load_connection, NodeConnection};
use crate::graphql::types::{ProfileFilterInput, ProfileNode};

#[derive(Default)]
pub struct ProfileQuery;

impl ProfileQuery {
    async fn profiles(
        ctx: &Context<'_>,
        college_students: Option<bool>,
        filter: Option<ProfileFilterInput>,
        after: Option<String>,
        before: Option<String>,
        first: Option<i32>,
        last: Option<i32>,
    ) -> Result<NodeConnection<ProfileNode>> {
        let context = ctx.data::<GraphQLContext>()?;
        let filter = filter.unwrap_or_default().into_filter()?;

        load_connection(after, before, first, last, |window| {
            context.profile_service.list(filter, college_students, window)
        })
        .await
    }
}

#[Object]
impl ProfileQuery {
    async fn profile(&self, ctx: &Context<'_>, id: ID) -> Result<ProfileNode> {
        let context = ctx.data::<GraphQLContext>()?;
        let profile_id = decode_id(&id, ProfileNode::TYPE_NAME, "id")?;
        let profile = context
            .profile_service
            .get(profile_id)
            .await
            .map_err(StructuredError::from_core_error)?;

        Ok(ProfileNode::from(profile))
    }

    async fn all_profiles(
        &self,
        ctx: &Context<'_>,
        filter: Option<ProfileFilterInput>,
        after: Option<String>,
        before: Option<String>,
        first: Option<i32>,
        last: Option<i32>,
    ) -> Result<NodeConnection<ProfileNode>> {
        Self::profiles(ctx, None, filter, after, before, first, last).await
    }

    /// Profiles of customers, who are not yet at college
    async fn high_school_profiles(
        &self,
        ctx: &Context<'_>,
        filter: Option<ProfileFilterInput>,
        after: Option<String>,
        before: Option<String>,
        first: Option<i32>,
        last: Option<i32>,
    ) -> Result<NodeConnection<ProfileNode>> {
        Self::profiles(ctx, Some(false), filter, after, before, first, last).await
    }

    /// Profiles of college-student providers
    async fn college_profiles(
        &self,
        ctx: &Context<'_>,
        filter: Option<ProfileFilterInput>,
        after: Option<String>,
        before: Option<String>,
        first: Option<i32>,
        last: Option<i32>,
    ) -> Result<NodeConnection<ProfileNode>> {
        Self::profiles(ctx, Some(true), filter, after, before, first, last).await
    }

    /// The caller's profile, if one has been created
    async fn login_user_profile(&self, ctx: &Context<'_>) -> Result<Option<ProfileNode>> {
        let context = ctx.data::<GraphQLContext>()?;
        let user_id = context.require_user(ctx)?;
        let profile = context
            .profile_service
            .find_by_user(user_id)
            .await
            .map_err(StructuredError::from_core_error)?;

        Ok(profile.map(ProfileNode::from))
    }
}
