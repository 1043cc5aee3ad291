use anyhow::Result;
use sea_orm::*;
use tracing::info;

use crate::database::entities::{addresses, genders, tags};

pub const DEFAULT_GENDERS: &[&str] = &["Male", "Female", "Others"];
pub const DEFAULT_ADDRESSES: &[&str] = &["Hokkaido", "Tokyo", "Chiba"];
pub const DEFAULT_TAGS: &[&str] = &["英語", "数学", "国語", "理科", "社会", "推薦入試", "一般入試"];

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
    pub genders: usize,
    pub addresses: usize,
    pub tags: usize,
}

/// Inserts the default lookup values that are not present yet.
pub async fn seed_lookup_values(db: &DatabaseConnection) -> Result<SeedSummary> {
    let mut summary = SeedSummary::default();

    for name in DEFAULT_GENDERS {
        let exists = genders::Entity::find()
            .filter(genders::Column::GenderName.eq(*name))
            .one(db)
            .await?
            .is_some();
        if exists {
            continue;
        }
        genders::ActiveModel {
            gender_name: Set(name.to_string()),
            ..Default::default()
        }
        .insert(db)
        .await?;
        summary.genders += 1;
    }

    for name in DEFAULT_ADDRESSES {
        let exists = addresses::Entity::find()
            .filter(addresses::Column::AddressName.eq(*name))
            .one(db)
            .await?
            .is_some();
        if exists {
            continue;
        }
        addresses::ActiveModel {
            address_name: Set(name.to_string()),
            ..Default::default()
        }
        .insert(db)
        .await?;
        summary.addresses += 1;
    }

    for name in DEFAULT_TAGS {
        let exists = tags::Entity::find()
            .filter(tags::Column::TagName.eq(*name))
            .one(db)
            .await?
            .is_some();
        if exists {
            continue;
        }
        tags::ActiveModel {
            tag_name: Set(name.to_string()),
            ..Default::default()
        }
        .insert(db)
        .await?;
        summary.tags += 1;
    }

    if summary == SeedSummary::default() {
        info!("Lookup values already present, skipping seed data creation");
    } else {
        info!(
            "Seeded {} genders, {} addresses and {} tags",
            summary.genders, summary.addresses, summary.tags
        );
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::migrations::Migrator;
    use sea_orm_migration::MigratorTrait;

    #[tokio::test]
    async fn seeding_twice_is_idempotent() {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        Migrator::up(&db, None).await.unwrap();

        let first = seed_lookup_values(&db).await.unwrap();
        assert_eq!(first.genders, DEFAULT_GENDERS.len());
        assert_eq!(first.addresses, DEFAULT_ADDRESSES.len());

        let second = seed_lookup_values(&db).await.unwrap();
        assert_eq!(second, SeedSummary::default());
        assert_eq!(
            genders::Entity::find().count(&db).await.unwrap(),
            DEFAULT_GENDERS.len() as u64
        );
    }
}
