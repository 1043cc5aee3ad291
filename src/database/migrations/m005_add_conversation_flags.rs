use sea_orm_migration::prelude::*;

use super::m004_create_conversations::{Messages, TalkRooms};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // A room stays pending until the plan author approves it
        manager
            .alter_table(
                Table::alter()
                    .table(TalkRooms::Table)
                    .add_column(
                        ColumnDef::new(Alias::new("is_approved"))
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .alter_table(
                Table::alter()
                    .table(Messages::Table)
                    .add_column(
                        ColumnDef::new(Alias::new("is_viewed"))
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .alter_table(
                Table::alter()
                    .table(Messages::Table)
                    .drop_column(Alias::new("is_viewed"))
                    .to_owned(),
            )
            .await?;

        manager
            .alter_table(
                Table::alter()
                    .table(TalkRooms::Table)
                    .drop_column(Alias::new("is_approved"))
                    .to_owned(),
            )
            .await?;

        Ok(())
    }
}
