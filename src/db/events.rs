use sea_orm::prelude::Expr;
use sea_orm::*;

use crate::models::events::{self, EventStatus};

/// Fields of a new event after validation.
#[derive(Debug, Clone)]
pub struct NewEvent {
    pub name: String,
    pub date: chrono::NaiveDate,
    pub venue: Option<String>,
    pub code: String,
    pub allow_multiple_signups: bool,
}

/// Insert a new event (always starts as a draft with an empty queue).
pub async fn insert_event<C: ConnectionTrait>(
    db: &C,
    input: NewEvent,
) -> Result<events::Model, DbErr> {
    let new_event = events::ActiveModel {
        id: NotSet,
        name: Set(input.name),
        date: Set(input.date),
        venue: Set(input.venue),
        code: Set(input.code),
        status: Set(EventStatus::Draft),
        allow_multiple_signups: Set(input.allow_multiple_signups),
        last_position: Set(0),
        queue_version: Set(0),
        created_at: Set(chrono::Utc::now()),
    };

    new_event.insert(db).await
}

/// Fetch all events, newest date first.
pub async fn get_all_events<C: ConnectionTrait>(db: &C) -> Result<Vec<events::Model>, DbErr> {
    events::Entity::find()
        .order_by_desc(events::Column::Date)
        .order_by_desc(events::Column::Id)
        .all(db)
        .await
}

/// Fetch a single event by ID.
pub async fn get_event_by_id<C: ConnectionTrait>(
    db: &C,
    id: i32,
) -> Result<Option<events::Model>, DbErr> {
    events::Entity::find_by_id(id).one(db).await
}

/// Fetch a single event by its join code.
pub async fn get_event_by_code<C: ConnectionTrait>(
    db: &C,
    code: &str,
) -> Result<Option<events::Model>, DbErr> {
    events::Entity::find()
        .filter(events::Column::Code.eq(code))
        .one(db)
        .await
}

/// Lock an event's queue for the rest of the transaction and bump its version.
///
/// The row-level write lock serialises every queue mutation of the event.
/// Returns `None` when the event does not exist.
pub async fn lock_queue<C: ConnectionTrait>(
    db: &C,
    id: i32,
) -> Result<Option<events::Model>, DbErr> {
    let result = events::Entity::update_many()
        .col_expr(
            events::Column::QueueVersion,
            Expr::cust("queue_version + 1"),
        )
        .filter(events::Column::Id.eq(id))
        .exec(db)
        .await?;

    if result.rows_affected == 0 {
        return Ok(None);
    }

    events::Entity::find_by_id(id).one(db).await
}

/// Store the highest position handed out so far.
pub async fn set_last_position<C: ConnectionTrait>(
    db: &C,
    id: i32,
    position: i32,
) -> Result<(), DbErr> {
    events::Entity::update_many()
        .col_expr(events::Column::LastPosition, Expr::value(position))
        .filter(events::Column::Id.eq(id))
        .exec(db)
        .await?;

    Ok(())
}

/// Persist changes to an already-loaded event.
pub async fn save_event<C: ConnectionTrait>(
    db: &C,
    active: events::ActiveModel,
) -> Result<events::Model, DbErr> {
    active.update(db).await
}

/// Delete an event by ID (its signups go with it).
pub async fn delete_event<C: ConnectionTrait>(db: &C, id: i32) -> Result<DeleteResult, DbErr> {
    events::Entity::delete_by_id(id).exec(db).await
}
