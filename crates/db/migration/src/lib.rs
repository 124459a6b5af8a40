use sea_orm_migration::prelude::*;

mod columns;
mod m20191208_000001_create_repositories;
mod m20191215_000001_create_branches;
mod version;

pub use version::{InvalidSchemaVersion, SchemaVersion};

pub struct Migrator;

/// Every migration in apply order, tagged with the schema version that
/// introduced it. Versions must never decrease along the list.
fn versioned_migrations() -> Vec<(SchemaVersion, Box<dyn MigrationTrait>)> {
    vec![
        (
            SchemaVersion::new(0, 0, 0),
            Box::new(m20191208_000001_create_repositories::Migration),
        ),
        (
            SchemaVersion::new(0, 0, 0),
            Box::new(m20191215_000001_create_branches::Migration),
        ),
    ]
}

/// Number of migrations (counted from the first) that make up `target`.
pub fn migration_count_for(target: &SchemaVersion) -> usize {
    versioned_migrations()
        .iter()
        .take_while(|(version, _)| version <= target)
        .count()
}

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        versioned_migrations()
            .into_iter()
            .map(|(_, migration)| migration)
            .collect()
    }
}
