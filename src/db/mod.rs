pub mod devices;
pub mod events;
pub mod signups;
pub mod songs;

use sea_orm::{Database, DatabaseConnection};

/// Create a SeaORM database connection pool for the given URL.
pub async fn create_pool(database_url: &str) -> DatabaseConnection {
    Database::connect(database_url)
        .await
        .expect("Failed to connect to database")
}
