//! Database migrations for the Quill content store.

pub use sea_orm_migration::prelude::*;

mod m20241001_000001_create_users_and_posts;

/// Migrator for running database migrations.
pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(m20241001_000001_create_users_and_posts::Migration)]
    }
}
