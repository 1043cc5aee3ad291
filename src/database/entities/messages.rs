use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "messages")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub talking_room_id: i32,
    pub sender_id: i32,
    pub text: String,
    pub is_viewed: bool,
    pub created_at: ChronoDateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::talk_rooms::Entity",
        from = "Column::TalkingRoomId",
        to = "super::talk_rooms::Column::Id",
        on_delete = "Restrict"
    )]
    TalkingRoom,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::SenderId",
        to = "super::users::Column::Id",
        on_delete = "Restrict"
    )]
    Sender,
}

impl Related<super::talk_rooms::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TalkingRoom.def()
    }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Sender.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
