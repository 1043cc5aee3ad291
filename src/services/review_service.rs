use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Select, Set,
};
use tracing::info;

use crate::database::entities::{reviews, users};
use crate::errors::{CoreError, CoreResult};
use crate::services::listing::{filter_text, paginate, Page, PageWindow};
use crate::services::validation::{max_chars, not_blank};

const MAX_REVIEW_LEN: usize = 1000;

#[derive(Clone, Debug, Default)]
pub struct ReviewFilter {
    pub stars: Option<i32>,
    pub review_text: Option<String>,
    pub review_text_icontains: Option<String>,
    pub customer_id: Option<i32>,
}

impl ReviewFilter {
    fn apply(self, mut select: Select<reviews::Entity>) -> Select<reviews::Entity> {
        if let Some(stars) = self.stars {
            select = select.filter(reviews::Column::Stars.eq(stars));
        }
        if let Some(customer_id) = self.customer_id {
            select = select.filter(reviews::Column::CustomerId.eq(customer_id));
        }
        filter_text(
            select,
            reviews::Column::ReviewText,
            self.review_text,
            self.review_text_icontains,
        )
    }
}

/// Which side of a review the listing is anchored on.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ReviewScope {
    All,
    ReceivedBy(i32),
    SentBy(i32),
}

pub fn validate_stars(stars: i32) -> CoreResult<()> {
    if !(reviews::MIN_STARS..=reviews::MAX_STARS).contains(&stars) {
        return Err(CoreError::invalid_field(
            "stars",
            format!(
                "must be between {} and {}",
                reviews::MIN_STARS,
                reviews::MAX_STARS
            ),
        ));
    }
    Ok(())
}

#[derive(Clone)]
pub struct ReviewService {
    db: DatabaseConnection,
}

impl ReviewService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Records a review written by `customer_id` about `provider_id`.
    pub async fn create(
        &self,
        customer_id: i32,
        provider_id: i32,
        review_text: String,
        stars: i32,
    ) -> CoreResult<reviews::Model> {
        validate_stars(stars)?;
        not_blank("reviewText", &review_text)?;
        max_chars("reviewText", &review_text, MAX_REVIEW_LEN)?;

        if customer_id == provider_id {
            return Err(CoreError::invalid_field("provider", "You cannot review yourself"));
        }

        users::Entity::find_by_id(provider_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| CoreError::not_found("User", provider_id.to_string()))?;

        let review = reviews::ActiveModel {
            id: ActiveValue::NotSet,
            provider_id: Set(provider_id),
            customer_id: Set(customer_id),
            review_text: Set(review_text),
            stars: Set(stars),
            created_at: Set(chrono::Utc::now()),
        }
        .insert(&self.db)
        .await?;

        info!(
            "User {} reviewed user {} with {} stars",
            customer_id, provider_id, review.stars
        );
        Ok(review)
    }

    pub async fn get(&self, id: i32) -> CoreResult<reviews::Model> {
        reviews::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| CoreError::not_found("Review", id.to_string()))
    }

    pub async fn find(&self, id: i32) -> CoreResult<Option<reviews::Model>> {
        Ok(reviews::Entity::find_by_id(id).one(&self.db).await?)
    }

    pub async fn list(
        &self,
        filter: ReviewFilter,
        scope: ReviewScope,
        window: PageWindow,
    ) -> CoreResult<Page<reviews::Model>> {
        let mut select = reviews::Entity::find().order_by_asc(reviews::Column::Id);
        select = match scope {
            ReviewScope::All => select,
            ReviewScope::ReceivedBy(user_id) => select.filter(reviews::Column::ProviderId.eq(user_id)),
            ReviewScope::SentBy(user_id) => select.filter(reviews::Column::CustomerId.eq(user_id)),
        };
        paginate(&self.db, filter.apply(select), &window).await
    }
}
