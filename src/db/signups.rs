use sea_orm::prelude::Expr;
use sea_orm::*;

use crate::models::signups::{self, Performance, SignupStatus};
use crate::models::songs;

/// Fields of a new signup after admission checks.
#[derive(Debug, Clone)]
pub struct NewSignup {
    pub event_id: i32,
    pub device_id: String,
    pub performer_name: String,
    pub performance: Performance,
    pub position: i32,
    pub notes: Option<String>,
}

/// Insert a new signup (always enters the queue as `waiting`).
pub async fn insert_signup<C: ConnectionTrait>(
    db: &C,
    input: NewSignup,
) -> Result<signups::Model, DbErr> {
    let now = chrono::Utc::now();
    let mut new_signup = signups::ActiveModel {
        id: NotSet,
        event_id: Set(input.event_id),
        device_id: Set(input.device_id),
        performer_name: Set(input.performer_name),
        position: Set(input.position),
        status: Set(SignupStatus::Waiting),
        notes: Set(input.notes),
        host_notes: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    input.performance.write_to(&mut new_signup);

    new_signup.insert(db).await
}

/// Fetch a single signup by ID.
pub async fn get_signup_by_id<C: ConnectionTrait>(
    db: &C,
    id: i32,
) -> Result<Option<signups::Model>, DbErr> {
    signups::Entity::find_by_id(id).one(db).await
}

/// Fetch a single signup together with its library song.
pub async fn get_signup_with_song<C: ConnectionTrait>(
    db: &C,
    id: i32,
) -> Result<Option<(signups::Model, Option<songs::Model>)>, DbErr> {
    signups::Entity::find_by_id(id)
        .find_also_related(songs::Entity)
        .one(db)
        .await
}

/// Find the device's signup in an active status for an event, if any.
pub async fn find_active_for_device<C: ConnectionTrait>(
    db: &C,
    event_id: i32,
    device_id: &str,
) -> Result<Option<signups::Model>, DbErr> {
    signups::Entity::find()
        .filter(signups::Column::EventId.eq(event_id))
        .filter(signups::Column::DeviceId.eq(device_id))
        .filter(signups::Column::Status.is_in(SignupStatus::ACTIVE))
        .one(db)
        .await
}

/// Find the signup (other than `exclude`) currently holding a status in an event.
pub async fn find_holder<C: ConnectionTrait>(
    db: &C,
    event_id: i32,
    status: SignupStatus,
    exclude: i32,
) -> Result<Option<signups::Model>, DbErr> {
    signups::Entity::find()
        .filter(signups::Column::EventId.eq(event_id))
        .filter(signups::Column::Status.eq(status))
        .filter(signups::Column::Id.ne(exclude))
        .one(db)
        .await
}

/// Highest position used by any signup of the event, regardless of status.
pub async fn max_position<C: ConnectionTrait>(db: &C, event_id: i32) -> Result<Option<i32>, DbErr> {
    let last = signups::Entity::find()
        .filter(signups::Column::EventId.eq(event_id))
        .order_by_desc(signups::Column::Position)
        .one(db)
        .await?;

    Ok(last.map(|s| s.position))
}

/// Fetch an event's signups in the given statuses, in queue order.
pub async fn get_signups_by_status<C: ConnectionTrait>(
    db: &C,
    event_id: i32,
    statuses: &[SignupStatus],
) -> Result<Vec<signups::Model>, DbErr> {
    signups::Entity::find()
        .filter(signups::Column::EventId.eq(event_id))
        .filter(signups::Column::Status.is_in(statuses.iter().copied()))
        .order_by_asc(signups::Column::Position)
        .order_by_asc(signups::Column::Id)
        .all(db)
        .await
}

/// Fetch an event's signups in the given statuses with their songs, in queue order.
/// An empty status list means every status.
pub async fn get_signups_with_songs<C: ConnectionTrait>(
    db: &C,
    event_id: i32,
    statuses: &[SignupStatus],
) -> Result<Vec<(signups::Model, Option<songs::Model>)>, DbErr> {
    let mut query = signups::Entity::find().filter(signups::Column::EventId.eq(event_id));

    if !statuses.is_empty() {
        query = query.filter(signups::Column::Status.is_in(statuses.iter().copied()));
    }

    query
        .order_by_asc(signups::Column::Position)
        .order_by_asc(signups::Column::Id)
        .find_also_related(songs::Entity)
        .all(db)
        .await
}

/// Fetch every signup a device made for an event, newest first.
pub async fn get_signups_for_device<C: ConnectionTrait>(
    db: &C,
    event_id: i32,
    device_id: &str,
) -> Result<Vec<(signups::Model, Option<songs::Model>)>, DbErr> {
    signups::Entity::find()
        .filter(signups::Column::EventId.eq(event_id))
        .filter(signups::Column::DeviceId.eq(device_id))
        .order_by_desc(signups::Column::CreatedAt)
        .order_by_desc(signups::Column::Id)
        .find_also_related(songs::Entity)
        .all(db)
        .await
}

/// Compare-and-swap a signup's status. Returns the number of rows changed,
/// which is zero when the signup is no longer in `from`.
pub async fn set_status_if<C: ConnectionTrait>(
    db: &C,
    id: i32,
    from: SignupStatus,
    to: SignupStatus,
) -> Result<u64, DbErr> {
    let result = signups::Entity::update_many()
        .col_expr(signups::Column::Status, Expr::value(to))
        .col_expr(signups::Column::UpdatedAt, Expr::value(chrono::Utc::now()))
        .filter(signups::Column::Id.eq(id))
        .filter(signups::Column::Status.eq(from))
        .exec(db)
        .await?;

    Ok(result.rows_affected)
}

/// Write new positions for the given signups of an event, in order.
pub async fn set_positions<C: ConnectionTrait>(
    db: &C,
    event_id: i32,
    positions: &[(i32, i32)],
) -> Result<(), DbErr> {
    let now = chrono::Utc::now();

    for &(id, position) in positions {
        signups::Entity::update_many()
            .col_expr(signups::Column::Position, Expr::value(position))
            .col_expr(signups::Column::UpdatedAt, Expr::value(now))
            .filter(signups::Column::Id.eq(id))
            .filter(signups::Column::EventId.eq(event_id))
            .exec(db)
            .await?;
    }

    Ok(())
}

/// Persist changes to an already-loaded signup, stamping `updated_at`.
pub async fn save_signup<C: ConnectionTrait>(
    db: &C,
    mut active: signups::ActiveModel,
) -> Result<signups::Model, DbErr> {
    active.updated_at = Set(chrono::Utc::now());
    active.update(db).await
}
