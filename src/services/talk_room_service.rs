use sea_orm::sea_query::Query;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection,
    EntityTrait, IntoActiveModel, QueryFilter, QueryOrder, Select, Set, TransactionTrait,
};
use tracing::{debug, info};

use crate::database::entities::{messages, plans, talk_rooms, users};
use crate::errors::{CoreError, CoreResult};
use crate::services::listing::{filter_text, paginate, Page, PageWindow};
use crate::services::validation::{dedup_ids, max_chars, not_blank, optional_max_chars};

const MAX_TEXT_LEN: usize = 1000;

#[derive(Clone, Debug, Default)]
pub struct TalkRoomFilter {
    pub selected_plan_id: Option<i32>,
}

#[derive(Clone, Debug, Default)]
pub struct MessageFilter {
    pub text: Option<String>,
    pub text_icontains: Option<String>,
}

impl MessageFilter {
    fn apply(self, select: Select<messages::Entity>) -> Select<messages::Entity> {
        filter_text(select, messages::Column::Text, self.text, self.text_icontains)
    }
}

/// Talk rooms opened on a plan, and the messages exchanged in them.
///
/// A room has two participants: the author of its plan and the opponent user.
/// Rooms start unapproved; only the plan author can approve, and approval is final.
#[derive(Clone)]
pub struct TalkRoomService {
    db: DatabaseConnection,
}

impl TalkRoomService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn create_room(
        &self,
        actor_id: i32,
        plan_id: i32,
        opponent_user_id: i32,
        description: Option<String>,
    ) -> CoreResult<talk_rooms::Model> {
        optional_max_chars("talkRoomDescription", description.as_deref(), MAX_TEXT_LEN)?;

        plans::Entity::find_by_id(plan_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| CoreError::not_found("Plan", plan_id.to_string()))?;
        users::Entity::find_by_id(opponent_user_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| CoreError::not_found("User", opponent_user_id.to_string()))?;

        let room = talk_rooms::ActiveModel {
            id: ActiveValue::NotSet,
            talk_room_description: Set(description),
            selected_plan_id: Set(Some(plan_id)),
            opponent_user_id: Set(Some(opponent_user_id)),
            is_approved: Set(false),
            created_at: Set(chrono::Utc::now()),
        }
        .insert(&self.db)
        .await?;

        info!(
            "User {} opened talk room {} on plan {}",
            actor_id, room.id, plan_id
        );
        Ok(room)
    }

    /// Applies the plan author's decision on a room.
    ///
    /// Approving twice is a no-op; declining a pending room leaves it pending;
    /// declining an approved room is rejected.
    pub async fn set_approval(
        &self,
        actor_id: i32,
        room_id: i32,
        approve: bool,
    ) -> CoreResult<talk_rooms::Model> {
        let room = self.get_room(room_id).await?;
        let plan_author = plan_author_of(&self.db, &room).await?;
        if plan_author != Some(actor_id) {
            return Err(CoreError::forbidden(
                "Only the plan author can approve this talk room",
            ));
        }

        match (room.is_approved, approve) {
            (true, false) => Err(CoreError::invalid_field(
                "isApprove",
                "An approved talk room cannot be unapproved",
            )),
            (true, true) | (false, false) => Ok(room),
            (false, true) => {
                let mut active = room.into_active_model();
                active.is_approved = Set(true);
                let room = active.update(&self.db).await?;
                info!("Talk room {} approved by user {}", room.id, actor_id);
                Ok(room)
            }
        }
    }

    pub async fn get_room(&self, id: i32) -> CoreResult<talk_rooms::Model> {
        debug!("Loading talk room {}", id);
        talk_rooms::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| CoreError::not_found("TalkRoom", id.to_string()))
    }

    pub async fn find_room(&self, id: i32) -> CoreResult<Option<talk_rooms::Model>> {
        Ok(talk_rooms::Entity::find_by_id(id).one(&self.db).await?)
    }

    /// Lists rooms; with `participant` set, only rooms where that user is
    /// the plan author or the opponent.
    pub async fn list_rooms(
        &self,
        filter: TalkRoomFilter,
        participant: Option<i32>,
        window: PageWindow,
    ) -> CoreResult<Page<talk_rooms::Model>> {
        let mut select = talk_rooms::Entity::find().order_by_asc(talk_rooms::Column::Id);
        if let Some(plan_id) = filter.selected_plan_id {
            select = select.filter(talk_rooms::Column::SelectedPlanId.eq(plan_id));
        }
        if let Some(user_id) = participant {
            let authored_plans = Query::select()
                .column(plans::Column::Id)
                .from(plans::Entity)
                .and_where(plans::Column::PlanAuthorId.eq(user_id))
                .to_owned();
            select = select.filter(
                Condition::any()
                    .add(talk_rooms::Column::OpponentUserId.eq(user_id))
                    .add(talk_rooms::Column::SelectedPlanId.in_subquery(authored_plans)),
            );
        }
        paginate(&self.db, select, &window).await
    }

    pub async fn rooms_for_plan(&self, plan_id: i32) -> CoreResult<Vec<talk_rooms::Model>> {
        Ok(talk_rooms::Entity::find()
            .filter(talk_rooms::Column::SelectedPlanId.eq(plan_id))
            .order_by_asc(talk_rooms::Column::Id)
            .all(&self.db)
            .await?)
    }

    pub async fn create_message(
        &self,
        actor_id: i32,
        room_id: i32,
        text: String,
    ) -> CoreResult<messages::Model> {
        not_blank("text", &text)?;
        max_chars("text", &text, MAX_TEXT_LEN)?;

        let room = self.get_room(room_id).await?;
        if !is_participant(&self.db, &room, actor_id).await? {
            return Err(CoreError::forbidden(
                "Only talk room participants can send messages",
            ));
        }

        let message = messages::ActiveModel {
            id: ActiveValue::NotSet,
            talking_room_id: Set(room.id),
            sender_id: Set(actor_id),
            text: Set(text),
            is_viewed: Set(false),
            created_at: Set(chrono::Utc::now()),
        }
        .insert(&self.db)
        .await?;

        info!("User {} posted message {} in room {}", actor_id, message.id, room.id);
        Ok(message)
    }

    /// Marks messages as viewed by the other participant.
    ///
    /// Every id is checked before anything is written; one bad id fails the batch.
    pub async fn mark_viewed(&self, actor_id: i32, message_ids: Vec<i32>) -> CoreResult<Vec<messages::Model>> {
        let message_ids = dedup_ids(message_ids);

        let updated = self
            .db
            .transaction::<_, Vec<messages::Model>, CoreError>(|txn| {
                Box::pin(async move {
                    let mut updated = Vec::with_capacity(message_ids.len());
                    for id in message_ids {
                        let message = messages::Entity::find_by_id(id)
                            .one(txn)
                            .await?
                            .ok_or_else(|| CoreError::not_found("Message", id.to_string()))?;

                        if message.sender_id == actor_id {
                            return Err(CoreError::forbidden(
                                "Senders cannot mark their own messages as viewed",
                            ));
                        }

                        let room = talk_rooms::Entity::find_by_id(message.talking_room_id)
                            .one(txn)
                            .await?
                            .ok_or_else(|| {
                                CoreError::not_found("TalkRoom", message.talking_room_id.to_string())
                            })?;
                        if !is_participant(txn, &room, actor_id).await? {
                            return Err(CoreError::forbidden(
                                "Only talk room participants can view messages",
                            ));
                        }

                        if message.is_viewed {
                            updated.push(message);
                            continue;
                        }

                        let mut active = message.into_active_model();
                        active.is_viewed = Set(true);
                        updated.push(active.update(txn).await?);
                    }
                    Ok(updated)
                })
            })
            .await?;

        info!("User {} viewed {} messages", actor_id, updated.len());
        Ok(updated)
    }

    pub async fn get_message(&self, id: i32) -> CoreResult<messages::Model> {
        messages::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| CoreError::not_found("Message", id.to_string()))
    }

    pub async fn find_message(&self, id: i32) -> CoreResult<Option<messages::Model>> {
        Ok(messages::Entity::find_by_id(id).one(&self.db).await?)
    }

    pub async fn messages_in_room(&self, room_id: i32) -> CoreResult<Vec<messages::Model>> {
        Ok(messages::Entity::find()
            .filter(messages::Column::TalkingRoomId.eq(room_id))
            .order_by_asc(messages::Column::Id)
            .all(&self.db)
            .await?)
    }

    pub async fn list_messages(
        &self,
        filter: MessageFilter,
        sender_id: Option<i32>,
        window: PageWindow,
    ) -> CoreResult<Page<messages::Model>> {
        let mut select = messages::Entity::find().order_by_asc(messages::Column::Id);
        if let Some(sender_id) = sender_id {
            select = select.filter(messages::Column::SenderId.eq(sender_id));
        }
        paginate(&self.db, filter.apply(select), &window).await
    }
}

async fn plan_author_of<C: ConnectionTrait>(db: &C, room: &talk_rooms::Model) -> CoreResult<Option<i32>> {
    let Some(plan_id) = room.selected_plan_id else {
        return Ok(None);
    };
    Ok(plans::Entity::find_by_id(plan_id)
        .one(db)
        .await?
        .map(|plan| plan.plan_author_id))
}

async fn is_participant<C: ConnectionTrait>(db: &C, room: &talk_rooms::Model, user_id: i32) -> CoreResult<bool> {
    if room.opponent_user_id == Some(user_id) {
        return Ok(true);
    }
    Ok(plan_author_of(db, room).await? == Some(user_id))
}
