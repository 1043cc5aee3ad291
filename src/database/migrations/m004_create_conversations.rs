use sea_orm_migration::prelude::*;

use super::m001_create_accounts::Users;
use super::m003_create_marketplace::Plans;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create talk_rooms table
        manager
            .create_table(
                Table::create()
                    .table(TalkRooms::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TalkRooms::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(TalkRooms::TalkRoomDescription).string_len(1000).null())
                    .col(ColumnDef::new(TalkRooms::SelectedPlanId).integer().null())
                    .col(ColumnDef::new(TalkRooms::OpponentUserId).integer().null())
                    .col(ColumnDef::new(TalkRooms::CreatedAt).timestamp_with_time_zone().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_talk_rooms_selected_plan_id")
                            .from(TalkRooms::Table, TalkRooms::SelectedPlanId)
                            .to(Plans::Table, Plans::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_talk_rooms_opponent_user_id")
                            .from(TalkRooms::Table, TalkRooms::OpponentUserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create messages table
        manager
            .create_table(
                Table::create()
                    .table(Messages::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Messages::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Messages::TalkingRoomId).integer().not_null())
                    .col(ColumnDef::new(Messages::SenderId).integer().not_null())
                    .col(ColumnDef::new(Messages::Text).string_len(1000).not_null())
                    .col(ColumnDef::new(Messages::CreatedAt).timestamp_with_time_zone().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_messages_talking_room_id")
                            .from(Messages::Table, Messages::TalkingRoomId)
                            .to(TalkRooms::Table, TalkRooms::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_messages_sender_id")
                            .from(Messages::Table, Messages::SenderId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_messages_talking_room_id")
                    .table(Messages::Table)
                    .col(Messages::TalkingRoomId)
                    .to_owned(),
            )
            .await?;

        // Create notifications table
        manager
            .create_table(
                Table::create()
                    .table(Notifications::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Notifications::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Notifications::IsChecked).boolean().not_null().default(false))
                    .col(ColumnDef::new(Notifications::NotificatorId).integer().not_null())
                    .col(ColumnDef::new(Notifications::ReceiverId).integer().not_null())
                    .col(ColumnDef::new(Notifications::NotificationType).string_len(20).not_null())
                    .col(ColumnDef::new(Notifications::CreatedAt).timestamp_with_time_zone().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_notifications_notificator_id")
                            .from(Notifications::Table, Notifications::NotificatorId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_notifications_receiver_id")
                            .from(Notifications::Table, Notifications::ReceiverId)
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
            .drop_table(Table::drop().table(Notifications::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Messages::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(TalkRooms::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub(super) enum TalkRooms {
    Table,
    Id,
    TalkRoomDescription,
    SelectedPlanId,
    OpponentUserId,
    CreatedAt,
}

#[derive(DeriveIden)]
pub(super) enum Messages {
    Table,
    Id,
    TalkingRoomId,
    SenderId,
    Text,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Notifications {
    Table,
    Id,
    IsChecked,
    NotificatorId,
    ReceiverId,
    NotificationType,
    CreatedAt,
}
