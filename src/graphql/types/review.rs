use async_graphql::*;
use chrono::{DateTime, Utc};

use crate::database::entities::reviews;
use crate::graphql::context::GraphQLContext;
use crate::graphql::errors::StructuredError;
use crate::graphql::global_id::{decode_optional_id, to_global_id};
use crate::graphql::types::UserNode;
use crate::services::ReviewFilter;

pub struct ReviewNode(pub reviews::Model);

impl ReviewNode {
    pub const TYPE_NAME: &'static str = "ReviewNode";
}

impl From<reviews::Model> for ReviewNode {
    fn from(model: reviews::Model) -> Self {
        Self(model)
    }
}

#[Object]
impl ReviewNode {
    pub async fn id(&self) -> ID {
        to_global_id(Self::TYPE_NAME, self.0.id)
    }

    /// The user being reviewed
    async fn provider(&self, ctx: &Context<'_>) -> Result<UserNode> {
        let context = ctx.data::<GraphQLContext>()?;
        let provider = context
            .account_service
            .get(self.0.provider_id)
            .await
            .map_err(StructuredError::from_core_error)?;

        Ok(UserNode::from(provider))
    }

    /// The user who wrote the review
    async fn customer(&self, ctx: &Context<'_>) -> Result<UserNode> {
        let context = ctx.data::<GraphQLContext>()?;
        let customer = context
            .account_service
            .get(self.0.customer_id)
            .await
            .map_err(StructuredError::from_core_error)?;

        Ok(UserNode::from(customer))
    }

    async fn review_text(&self) -> &str {
        &self.0.review_text
    }

    async fn stars(&self) -> i32 {
        self.0.stars
    }

    async fn created_at(&self) -> DateTime<Utc> {
        self.0.created_at
    }
}

#[derive(InputObject, Default)]
pub struct ReviewFilterInput {
    pub stars: Option<i32>,
    pub review_text: Option<String>,
    pub review_text_icontains: Option<String>,
    pub customer: Option<ID>,
}

impl ReviewFilterInput {
    pub fn into_filter(self) -> Result<ReviewFilter> {
        Ok(ReviewFilter {
            customer_id: decode_optional_id(self.customer.as_ref(), UserNode::TYPE_NAME, "customer")?,
            stars: self.stars,
            review_text: self.review_text,
            review_text_icontains: self.review_text_icontains,
        })
    }
}

#[derive(InputObject)]
pub struct CreateReviewInput {
    pub provider: ID,
    pub review_text: String,
    pub stars: i32,
    pub client_mutation_id: Option<String>,
}

#[derive(SimpleObject)]
pub struct CreateReviewPayload {
    pub review: Option<ReviewNode>,
    pub client_mutation_id: Option<String>,
}
