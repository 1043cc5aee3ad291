use sea_orm_migration::prelude::*;

use super::m001_create_accounts::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Classification tables
        manager
            .create_table(
                Table::create()
                    .table(Tags::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Tags::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Tags::TagName).string_len(100).not_null().unique_key())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Genders::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Genders::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Genders::GenderName).string_len(100).not_null().unique_key())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Addresses::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Addresses::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Addresses::AddressName).string_len(200).not_null().unique_key())
                    .to_owned(),
            )
            .await?;

        // Create profiles table
        manager
            .create_table(
                Table::create()
                    .table(Profiles::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Profiles::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Profiles::TargetUserId).integer().not_null().unique_key())
                    .col(ColumnDef::new(Profiles::TelephoneNumber).string_len(11).not_null().default(""))
                    .col(ColumnDef::new(Profiles::ProfileName).string_len(100).not_null().default(""))
                    .col(ColumnDef::new(Profiles::ProfileText).string_len(1000).not_null().default(""))
                    .col(ColumnDef::new(Profiles::IsCollegeStudent).boolean().not_null().default(false))
                    .col(ColumnDef::new(Profiles::SchoolName).string_len(100).not_null().default(""))
                    .col(ColumnDef::new(Profiles::Age).integer().null())
                    .col(ColumnDef::new(Profiles::ProfileImage).string().null())
                    .col(ColumnDef::new(Profiles::Undergraduate).string_len(100).null())
                    .col(ColumnDef::new(Profiles::Department).string_len(100).null())
                    .col(ColumnDef::new(Profiles::ClubActivities).string_len(100).null())
                    .col(ColumnDef::new(Profiles::AdmissionFormat).string_len(100).null())
                    .col(ColumnDef::new(Profiles::FavoriteSubject).string_len(100).null())
                    .col(ColumnDef::new(Profiles::WantHear).string_len(100).null())
                    .col(ColumnDef::new(Profiles::Problem).string_len(100).null())
                    .col(ColumnDef::new(Profiles::SelectedAddressId).integer().null())
                    .col(ColumnDef::new(Profiles::SelectedGenderId).integer().null())
                    .col(ColumnDef::new(Profiles::CreatedAt).timestamp_with_time_zone().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_profiles_target_user_id")
                            .from(Profiles::Table, Profiles::TargetUserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_profiles_selected_address_id")
                            .from(Profiles::Table, Profiles::SelectedAddressId)
                            .to(Addresses::Table, Addresses::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_profiles_selected_gender_id")
                            .from(Profiles::Table, Profiles::SelectedGenderId)
                            .to(Genders::Table, Genders::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        // Telephone numbers are optional, so uniqueness only applies to filled-in values
        manager
            .get_connection()
            .execute_unprepared(
                "CREATE UNIQUE INDEX IF NOT EXISTS idx_profiles_telephone_number \
                 ON profiles (telephone_number) WHERE telephone_number <> ''",
            )
            .await?;

        // Join tables
        manager
            .create_table(
                Table::create()
                    .table(ProfileTags::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(ProfileTags::ProfileId).integer().not_null())
                    .col(ColumnDef::new(ProfileTags::TagId).integer().not_null())
                    .primary_key(
                        Index::create()
                            .col(ProfileTags::ProfileId)
                            .col(ProfileTags::TagId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_profile_tags_profile_id")
                            .from(ProfileTags::Table, ProfileTags::ProfileId)
                            .to(Profiles::Table, Profiles::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_profile_tags_tag_id")
                            .from(ProfileTags::Table, ProfileTags::TagId)
                            .to(Tags::Table, Tags::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ProfileFollowingUsers::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(ProfileFollowingUsers::ProfileId).integer().not_null())
                    .col(ColumnDef::new(ProfileFollowingUsers::UserId).integer().not_null())
                    .primary_key(
                        Index::create()
                            .col(ProfileFollowingUsers::ProfileId)
                            .col(ProfileFollowingUsers::UserId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_profile_following_users_profile_id")
                            .from(ProfileFollowingUsers::Table, ProfileFollowingUsers::ProfileId)
                            .to(Profiles::Table, Profiles::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_profile_following_users_user_id")
                            .from(ProfileFollowingUsers::Table, ProfileFollowingUsers::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ProfileFollowingUsers::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(ProfileTags::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Profiles::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Addresses::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Genders::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Tags::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Tags {
    Table,
    Id,
    TagName,
}

#[derive(DeriveIden)]
enum Genders {
    Table,
    Id,
    GenderName,
}

#[derive(DeriveIden)]
enum Addresses {
    Table,
    Id,
    AddressName,
}

#[derive(DeriveIden)]
enum Profiles {
    Table,
    Id,
    TargetUserId,
    TelephoneNumber,
    ProfileName,
    ProfileText,
    IsCollegeStudent,
    SchoolName,
    Age,
    ProfileImage,
    Undergraduate,
    Department,
    ClubActivities,
    AdmissionFormat,
    FavoriteSubject,
    WantHear,
    Problem,
    SelectedAddressId,
    SelectedGenderId,
    CreatedAt,
}

#[derive(DeriveIden)]
enum ProfileTags {
    Table,
    ProfileId,
    TagId,
}

#[derive(DeriveIden)]
enum ProfileFollowingUsers {
    Table,
    ProfileId,
    UserId,
}
