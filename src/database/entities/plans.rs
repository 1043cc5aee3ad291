use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Prices are stored in a small unsigned range.
pub const MAX_PRICE: i32 = 32_767;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "plans")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub plan_author_id: i32,
    pub title: String,
    pub content: String,
    pub plan_image: Option<String>,
    pub is_published: bool,
    pub price: i32,
    pub published_at: ChronoDateTimeUtc,
    pub created_at: ChronoDateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::PlanAuthorId",
        to = "super::users::Column::Id",
        on_delete = "Cascade"
    )]
    PlanAuthor,
    #[sea_orm(has_many = "super::talk_rooms::Entity")]
    TalkRooms,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PlanAuthor.def()
    }
}

impl Related<super::talk_rooms::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TalkRooms.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn is_authored_by(&self, user_id: i32) -> bool {
        self.plan_author_id == user_id
    }
}
