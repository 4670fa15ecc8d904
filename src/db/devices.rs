use sea_orm::*;

use crate::models::devices;

/// Register a device the first time it is seen. Safe to call repeatedly.
pub async fn ensure_device<C: ConnectionTrait>(db: &C, id: &str) -> Result<(), DbErr> {
    if devices::Entity::find_by_id(id.to_string())
        .one(db)
        .await?
        .is_some()
    {
        return Ok(());
    }

    let new_device = devices::ActiveModel {
        id: Set(id.to_string()),
        created_at: Set(chrono::Utc::now()),
    };

    match new_device.insert(db).await {
        Ok(_) => Ok(()),
        // Another request registered it in between.
        Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => Ok(()),
        Err(e) => Err(e),
    }
}
