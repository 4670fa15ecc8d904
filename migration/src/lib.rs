pub use sea_orm_migration::prelude::*;

mod m20250301_000001_create_events_table;
mod m20250301_000002_create_songs_table;
mod m20250301_000003_create_devices_table;
mod m20250301_000004_create_signups_table;
mod m20250301_000005_add_queue_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_events_table::Migration),
            Box::new(m20250301_000002_create_songs_table::Migration),
            Box::new(m20250301_000003_create_devices_table::Migration),
            Box::new(m20250301_000004_create_signups_table::Migration),
            Box::new(m20250301_000005_add_queue_indexes::Migration),
        ]
    }
}
