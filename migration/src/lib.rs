pub use sea_orm_migration::prelude::*;

pub mod entities;
mod m20260215_000001_initial_tables;
mod m20260216_000001_metrics_table;
mod m20260301_000001_metrics_dedup_index;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260215_000001_initial_tables::Migration),
            Box::new(m20260216_000001_metrics_table::Migration),
            Box::new(m20260301_000001_metrics_dedup_index::Migration),
        ]
    }
}
