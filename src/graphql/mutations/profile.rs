use async_graphql::*;

use crate::graphql::context::GraphQLContext;
use crate::graphql::errors::StructuredError;
use crate::graphql::mutations::helpers::read_upload;
use crate::graphql::types::{CreateProfileInput, ProfileNode, ProfilePayload, UpdateProfileInput};

#[derive(Default)]
pub struct ProfileMutation;

#[Object]
impl ProfileMutation {
    /// Create the profile of a freshly registered user
    async fn create_profile(&self, ctx: &Context<'_>, input: CreateProfileInput) -> Result<ProfilePayload> {
        let context = ctx.data::<GraphQLContext>()?;
        let client_mutation_id = input.client_mutation_id.clone();
        let (profile, upload) = input.into_parts()?;
        let image = read_upload(ctx, upload)?;

        let profile = context
            .profile_service
            .create(profile, image)
            .await
            .map_err(StructuredError::from_core_error)?;

        Ok(ProfilePayload {
            profile: Some(ProfileNode::from(profile)),
            client_mutation_id,
        })
    }

    /// Update the caller's own profile, replacing tags and followed users when given
    async fn update_profile(&self, ctx: &Context<'_>, input: UpdateProfileInput) -> Result<ProfilePayload> {
        let context = ctx.data::<GraphQLContext>()?;
        let user_id = context.require_user(ctx)?;
        let client_mutation_id = input.client_mutation_id.clone();
        let (profile_id, changes, upload) = input.into_parts()?;
        let image = read_upload(ctx, upload)?;

        let profile = context
            .profile_service
            .update(user_id, profile_id, changes, image)
            .await
            .map_err(StructuredError::from_core_error)?;

        Ok(ProfilePayload {
            profile: Some(ProfileNode::from(profile)),
            client_mutation_id,
        })
    }
}
