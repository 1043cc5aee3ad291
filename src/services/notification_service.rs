use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel,
    QueryFilter, QueryOrder, Select, Set, TransactionTrait,
};
use tracing::info;

use crate::database::entities::{notifications, users};
use crate::errors::{CoreError, CoreResult};
use crate::services::listing::{paginate, Page, PageWindow};
use crate::services::validation::{dedup_ids, max_chars, not_blank};

#[derive(Clone, Debug, Default)]
pub struct NotificationFilter {
    pub is_checked: Option<bool>,
    pub receiver_id: Option<i32>,
}

impl NotificationFilter {
    fn apply(self, mut select: Select<notifications::Entity>) -> Select<notifications::Entity> {
        if let Some(checked) = self.is_checked {
            select = select.filter(notifications::Column::IsChecked.eq(checked));
        }
        if let Some(receiver_id) = self.receiver_id {
            select = select.filter(notifications::Column::ReceiverId.eq(receiver_id));
        }
        select
    }
}

#[derive(Clone)]
pub struct NotificationService {
    db: DatabaseConnection,
}

impl NotificationService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn create(
        &self,
        notificator_id: i32,
        receiver_id: i32,
        notification_type: String,
    ) -> CoreResult<notifications::Model> {
        not_blank("notificationType", &notification_type)?;
        max_chars("notificationType", &notification_type, notifications::MAX_TYPE_LEN)?;

        users::Entity::find_by_id(receiver_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| CoreError::not_found("User", receiver_id.to_string()))?;

        let notification = notifications::ActiveModel {
            id: ActiveValue::NotSet,
            is_checked: Set(false),
            notificator_id: Set(notificator_id),
            receiver_id: Set(receiver_id),
            notification_type: Set(notification_type),
            created_at: Set(chrono::Utc::now()),
        }
        .insert(&self.db)
        .await?;

        info!(
            "Notification {} ({}) from user {} to user {}",
            notification.id, notification.notification_type, notificator_id, receiver_id
        );
        Ok(notification)
    }

    /// Marks the receiver's notifications checked, all or nothing.
    pub async fn mark_checked(
        &self,
        receiver_id: i32,
        notification_ids: Vec<i32>,
    ) -> CoreResult<Vec<notifications::Model>> {
        let notification_ids = dedup_ids(notification_ids);

        let updated = self
            .db
            .transaction::<_, Vec<notifications::Model>, CoreError>(|txn| {
                Box::pin(async move {
                    let mut updated = Vec::with_capacity(notification_ids.len());
                    for id in notification_ids {
                        let notification = notifications::Entity::find_by_id(id)
                            .one(txn)
                            .await?
                            .ok_or_else(|| CoreError::not_found("Notification", id.to_string()))?;

                        if notification.receiver_id != receiver_id {
                            return Err(CoreError::forbidden(
                                "Only the receiver can check this notification",
                            ));
                        }

                        if notification.is_checked {
                            updated.push(notification);
                            continue;
                        }

                        let mut active = notification.into_active_model();
                        active.is_checked = Set(true);
                        updated.push(active.update(txn).await?);
                    }
                    Ok(updated)
                })
            })
            .await?;

        info!("User {} checked {} notifications", receiver_id, updated.len());
        Ok(updated)
    }

    pub async fn get(&self, id: i32) -> CoreResult<notifications::Model> {
        notifications::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| CoreError::not_found("Notification", id.to_string()))
    }

    pub async fn find(&self, id: i32) -> CoreResult<Option<notifications::Model>> {
        Ok(notifications::Entity::find_by_id(id).one(&self.db).await?)
    }

    pub async fn list(
        &self,
        filter: NotificationFilter,
        receiver_id: Option<i32>,
        window: PageWindow,
    ) -> CoreResult<Page<notifications::Model>> {
        let mut select = notifications::Entity::find().order_by_asc(notifications::Column::Id);
        if let Some(receiver_id) = receiver_id {
            select = select.filter(notifications::Column::ReceiverId.eq(receiver_id));
        }
        paginate(&self.db, filter.apply(select), &window).await
    }
}
