use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel,
    ModelTrait, PaginatorTrait, QueryFilter, QueryOrder, Select, Set,
};
use tracing::{debug, info};

use crate::database::entities::{messages, plans, talk_rooms};
use crate::errors::{CoreError, CoreResult};
use crate::services::listing::{filter_text, paginate, Page, PageWindow};
use crate::services::media_storage::{settle, MediaStorage, StagedUpload, UploadedFile};
use crate::services::validation::{max_chars, not_blank};

const MAX_TITLE_LEN: usize = 100;
const MAX_CONTENT_LEN: usize = 1000;

#[derive(Clone, Debug)]
pub struct PlanInput {
    pub title: String,
    pub content: String,
    pub is_published: bool,
    pub price: i32,
}

impl PlanInput {
    pub fn validate(&self) -> CoreResult<()> {
        not_blank("title", &self.title)?;
        max_chars("title", &self.title, MAX_TITLE_LEN)?;
        max_chars("content", &self.content, MAX_CONTENT_LEN)?;
        if !(0..=plans::MAX_PRICE).contains(&self.price) {
            return Err(CoreError::invalid_field(
                "price",
                format!("must be between 0 and {}", plans::MAX_PRICE),
            ));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, Default)]
pub struct PlanFilter {
    pub title: Option<String>,
    pub title_icontains: Option<String>,
    pub content: Option<String>,
    pub content_icontains: Option<String>,
    pub is_published: Option<bool>,
    pub price: Option<i32>,
}

impl PlanFilter {
    fn apply(self, mut select: Select<plans::Entity>) -> Select<plans::Entity> {
        if let Some(published) = self.is_published {
            select = select.filter(plans::Column::IsPublished.eq(published));
        }
        if let Some(price) = self.price {
            select = select.filter(plans::Column::Price.eq(price));
        }
        select = filter_text(select, plans::Column::Title, self.title, self.title_icontains);
        filter_text(select, plans::Column::Content, self.content, self.content_icontains)
    }
}

#[derive(Clone)]
pub struct PlanService {
    db: DatabaseConnection,
    media: MediaStorage,
}

impl PlanService {
    pub fn new(db: DatabaseConnection, media: MediaStorage) -> Self {
        Self { db, media }
    }

    pub async fn create(
        &self,
        author_id: i32,
        input: PlanInput,
        image: Option<UploadedFile>,
    ) -> CoreResult<plans::Model> {
        input.validate()?;
        let staged = self.stage_image(author_id, &input.title, image).await?;
        let plan_image = staged.as_ref().map(|upload| upload.path().to_string());

        let now = chrono::Utc::now();
        let inserted = plans::ActiveModel {
            id: ActiveValue::NotSet,
            plan_author_id: Set(author_id),
            title: Set(input.title),
            content: Set(input.content),
            plan_image: Set(plan_image),
            is_published: Set(input.is_published),
            price: Set(input.price),
            published_at: Set(now),
            created_at: Set(now),
        }
        .insert(&self.db)
        .await
        .map_err(CoreError::from);
        let plan = settle(staged, inserted).await?;

        info!("Created plan {} by user {}", plan.id, author_id);
        Ok(plan)
    }

    /// Rewrites a plan owned by `author_id`. The stored image is kept unless a new one is uploaded.
    pub async fn update(
        &self,
        author_id: i32,
        plan_id: i32,
        input: PlanInput,
        image: Option<UploadedFile>,
    ) -> CoreResult<plans::Model> {
        input.validate()?;
        let plan = self.owned(author_id, plan_id).await?;
        let staged = self.stage_image(author_id, &input.title, image).await?;

        let mut active = plan.into_active_model();
        active.title = Set(input.title);
        active.content = Set(input.content);
        active.is_published = Set(input.is_published);
        active.price = Set(input.price);
        active.published_at = Set(chrono::Utc::now());
        if let Some(upload) = &staged {
            active.plan_image = Set(Some(upload.path().to_string()));
        }

        let updated = active.update(&self.db).await.map_err(CoreError::from);
        let plan = settle(staged, updated).await?;
        info!("Updated plan {}", plan.id);
        Ok(plan)
    }

    /// Deletes a plan owned by `author_id` and returns the removed row.
    pub async fn delete(&self, author_id: i32, plan_id: i32) -> CoreResult<plans::Model> {
        let plan = self.owned(author_id, plan_id).await?;

        // Messages restrict deletion of their rooms, which would block the cascade
        let room_ids: Vec<i32> = talk_rooms::Entity::find()
            .filter(talk_rooms::Column::SelectedPlanId.eq(plan.id))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|room| room.id)
            .collect();
        if !room_ids.is_empty() {
            let message_count = messages::Entity::find()
                .filter(messages::Column::TalkingRoomId.is_in(room_ids))
                .count(&self.db)
                .await?;
            if message_count > 0 {
                return Err(CoreError::conflict(
                    "Plan has talk rooms with messages and cannot be deleted",
                ));
            }
        }

        plan.clone().delete(&self.db).await?;
        info!("Deleted plan {}", plan.id);
        Ok(plan)
    }

    pub async fn get(&self, id: i32) -> CoreResult<plans::Model> {
        debug!("Loading plan {}", id);
        plans::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| CoreError::not_found("Plan", id.to_string()))
    }

    pub async fn find(&self, id: i32) -> CoreResult<Option<plans::Model>> {
        Ok(plans::Entity::find_by_id(id).one(&self.db).await?)
    }

    pub async fn list(
        &self,
        filter: PlanFilter,
        author_id: Option<i32>,
        window: PageWindow,
    ) -> CoreResult<Page<plans::Model>> {
        let mut select = plans::Entity::find().order_by_asc(plans::Column::Id);
        if let Some(author_id) = author_id {
            select = select.filter(plans::Column::PlanAuthorId.eq(author_id));
        }
        paginate(&self.db, filter.apply(select), &window).await
    }

    async fn owned(&self, author_id: i32, plan_id: i32) -> CoreResult<plans::Model> {
        let plan = self.get(plan_id).await?;
        if !plan.is_authored_by(author_id) {
            return Err(CoreError::forbidden("Only the plan author can modify this plan"));
        }
        Ok(plan)
    }

    async fn stage_image(
        &self,
        author_id: i32,
        title: &str,
        image: Option<UploadedFile>,
    ) -> CoreResult<Option<StagedUpload>> {
        let path = match &image {
            Some(file) => MediaStorage::plan_image_path(author_id, title, &file.filename),
            None => return Ok(None),
        };
        self.media.stage(path, image).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::CoreErrorKind;

    fn input(price: i32) -> PlanInput {
        PlanInput {
            title: "英語の勉強法".to_string(),
            content: "受験英語の進め方を相談できます".to_string(),
            is_published: true,
            price,
        }
    }

    #[test]
    fn price_range_is_enforced() {
        assert!(input(0).validate().is_ok());
        assert!(input(plans::MAX_PRICE).validate().is_ok());

        for price in [-1, plans::MAX_PRICE + 1] {
            let err = input(price).validate().unwrap_err();
            assert_eq!(err.kind(), CoreErrorKind::Validation);
        }
    }

    #[test]
    fn title_length_is_enforced() {
        let mut plan = input(100);
        plan.title = "x".repeat(MAX_TITLE_LEN + 1);
        assert!(plan.validate().is_err());
    }
}
