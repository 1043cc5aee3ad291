use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "profiles")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub target_user_id: i32,
    pub telephone_number: String,
    pub profile_name: String,
    pub profile_text: String,
    pub is_college_student: bool,
    pub school_name: String,
    pub age: Option<i32>,
    pub profile_image: Option<String>,

    // College-student details
    pub undergraduate: Option<String>,
    pub department: Option<String>,
    pub club_activities: Option<String>,
    pub admission_format: Option<String>,
    pub favorite_subject: Option<String>,

    // What the customer hopes to hear about, and what they struggle with
    pub want_hear: Option<String>,
    pub problem: Option<String>,

    pub selected_address_id: Option<i32>,
    pub selected_gender_id: Option<i32>,
    pub created_at: ChronoDateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::TargetUserId",
        to = "super::users::Column::Id",
        on_delete = "Cascade"
    )]
    TargetUser,
    #[sea_orm(
        belongs_to = "super::addresses::Entity",
        from = "Column::SelectedAddressId",
        to = "super::addresses::Column::Id",
        on_delete = "Restrict"
    )]
    SelectedAddress,
    #[sea_orm(
        belongs_to = "super::genders::Entity",
        from = "Column::SelectedGenderId",
        to = "super::genders::Column::Id",
        on_delete = "Restrict"
    )]
    SelectedGender,
    #[sea_orm(has_many = "super::profile_tags::Entity")]
    ProfileTags,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TargetUser.def()
    }
}

impl Related<super::addresses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SelectedAddress.def()
    }
}

impl Related<super::genders::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SelectedGender.def()
    }
}

impl Related<super::profile_tags::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProfileTags.def()
    }
}

impl Related<super::tags::Entity> for Entity {
    fn to() -> RelationDef {
        super::profile_tags::Relation::Tag.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::profile_tags::Relation::Profile.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
