use sea_orm_migration::prelude::*;

mod m001_create_accounts;
mod m002_create_profiles;
mod m003_create_marketplace;
mod m004_create_conversations;
mod m005_add_conversation_flags;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m001_create_accounts::Migration),
            Box::new(m002_create_profiles::Migration),
            Box::new(m003_create_marketplace::Migration),
            Box::new(m004_create_conversations::Migration),
            Box::new(m005_add_conversation_flags::Migration),
        ]
    }
}
