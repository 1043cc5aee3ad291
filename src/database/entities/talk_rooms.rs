use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "talk_rooms")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub talk_room_description: Option<String>,
    pub selected_plan_id: Option<i32>,
    pub opponent_user_id: Option<i32>,
    pub is_approved: bool,
    pub created_at: ChronoDateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::plans::Entity",
        from = "Column::SelectedPlanId",
        to = "super::plans::Column::Id",
        on_delete = "Cascade"
    )]
    SelectedPlan,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::OpponentUserId",
        to = "super::users::Column::Id",
        on_delete = "Cascade"
    )]
    OpponentUser,
    #[sea_orm(has_many = "super::messages::Entity")]
    Messages,
}

impl Related<super::plans::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SelectedPlan.def()
    }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OpponentUser.def()
    }
}

impl Related<super::messages::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Messages.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
