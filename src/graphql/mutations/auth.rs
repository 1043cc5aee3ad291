use async_graphql::*;

use crate::graphql::context::GraphQLContext;
use crate::graphql::errors::StructuredError;
use crate::graphql::types::{RevokePayload, TokenPairPayload};

#[derive(Default)]
pub struct AuthMutation;

#[Object]
impl AuthMutation {
    /// Exchange credentials for an access token and a refresh token
    async fn token_auth(
        &self,
        ctx: &Context<'_>,
        email: String,
        password: String,
    ) -> Result<TokenPairPayload> {
        let context = ctx.data::<GraphQLContext>()?;
        let pair = context
            .auth_service
            .token_auth(&email, &password)
            .await
            .map_err(StructuredError::from_core_error)?;

        Ok(TokenPairPayload::new(
            pair,
            context.auth_service.refresh_expires_in(),
        ))
    }

    /// Rotate a refresh token and issue a fresh access token
    async fn refresh_token(&self, ctx: &Context<'_>, refresh_token: String) -> Result<TokenPairPayload> {
        let context = ctx.data::<GraphQLContext>()?;
        let pair = context
            .auth_service
            .refresh(&refresh_token)
            .await
            .map_err(StructuredError::from_core_error)?;

        Ok(TokenPairPayload::new(
            pair,
            context.auth_service.refresh_expires_in(),
        ))
    }

    async fn revoke_token(&self, ctx: &Context<'_>, refresh_token: String) -> Result<RevokePayload> {
        let context = ctx.data::<GraphQLContext>()?;
        let token = context
            .auth_service
            .revoke(&refresh_token)
            .await
            .map_err(StructuredError::from_core_error)?;

        let revoked = token
            .revoked_at
            .map(|at| at.timestamp())
            .unwrap_or_default();
        Ok(RevokePayload { revoked })
    }
}
