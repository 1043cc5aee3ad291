use sea_orm_migration::prelude::*;

use super::m001_create_accounts::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create plans table
        manager
            .create_table(
                Table::create()
                    .table(Plans::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Plans::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Plans::PlanAuthorId).integer().not_null())
                    .col(ColumnDef::new(Plans::Title).string_len(100).not_null())
                    .col(ColumnDef::new(Plans::Content).string_len(1000).not_null())
                    .col(ColumnDef::new(Plans::PlanImage).string().null())
                    .col(ColumnDef::new(Plans::IsPublished).boolean().not_null().default(false))
                    .col(ColumnDef::new(Plans::Price).integer().not_null().default(0))
                    .col(ColumnDef::new(Plans::PublishedAt).timestamp_with_time_zone().not_null())
                    .col(ColumnDef::new(Plans::CreatedAt).timestamp_with_time_zone().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_plans_plan_author_id")
                            .from(Plans::Table, Plans::PlanAuthorId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_plans_plan_author_id")
                    .table(Plans::Table)
                    .col(Plans::PlanAuthorId)
                    .to_owned(),
            )
            .await?;

        // Create reviews table
        manager
            .create_table(
                Table::create()
                    .table(Reviews::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Reviews::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Reviews::ProviderId).integer().not_null())
                    .col(ColumnDef::new(Reviews::CustomerId).integer().not_null())
                    .col(ColumnDef::new(Reviews::ReviewText).string_len(1000).not_null())
                    .col(ColumnDef::new(Reviews::Stars).integer().not_null())
                    .col(ColumnDef::new(Reviews::CreatedAt).timestamp_with_time_zone().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_reviews_provider_id")
                            .from(Reviews::Table, Reviews::ProviderId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_reviews_customer_id")
                            .from(Reviews::Table, Reviews::CustomerId)
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
            .drop_table(Table::drop().table(Reviews::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Plans::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub(super) enum Plans {
    Table,
    Id,
    PlanAuthorId,
    Title,
    Content,
    PlanImage,
    IsPublished,
    Price,
    PublishedAt,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Reviews {
    Table,
    Id,
    ProviderId,
    CustomerId,
    ReviewText,
    Stars,
    CreatedAt,
}
