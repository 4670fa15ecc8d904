use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::QueueError;

/// Queue status of a signup. `waiting` is the only entry state;
/// `completed`, `no_show` and `cancelled` are terminal.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter, DeriveActiveEnum,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "snake_case")]
pub enum SignupStatus {
    #[sea_orm(string_value = "waiting")]
    Waiting,
    #[sea_orm(string_value = "on_deck")]
    OnDeck,
    #[sea_orm(string_value = "performing")]
    Performing,
    #[sea_orm(string_value = "completed")]
    Completed,
    #[sea_orm(string_value = "no_show")]
    NoShow,
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

impl SignupStatus {
    pub const ACTIVE: [Self; 3] = [Self::Waiting, Self::OnDeck, Self::Performing];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Waiting => "waiting",
            Self::OnDeck => "on_deck",
            Self::Performing => "performing",
            Self::Completed => "completed",
            Self::NoShow => "no_show",
            Self::Cancelled => "cancelled",
        }
    }

    /// Counts toward queue ordering and the per-device limit.
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Waiting | Self::OnDeck | Self::Performing)
    }

    pub const fn is_terminal(self) -> bool {
        !self.is_active()
    }

    /// Statuses that at most one signup per event may hold.
    pub const fn is_single_occupant(self) -> bool {
        matches!(self, Self::OnDeck | Self::Performing)
    }
}

impl std::fmt::Display for SignupStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "snake_case")]
pub enum PerformanceType {
    #[sea_orm(string_value = "solo")]
    Solo,
    #[sea_orm(string_value = "with_band")]
    WithBand,
}

/// Review state of a custom song request.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "approved")]
    Approved,
    #[sea_orm(string_value = "declined")]
    Declined,
}

/// SeaORM entity for the `signups` table (the queue entries).
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "signups")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub event_id: i32,
    pub device_id: String,
    pub performer_name: String,
    #[sea_orm(column_name = "type")]
    #[serde(rename = "type")]
    pub kind: PerformanceType,
    pub song_id: Option<i32>,
    #[sea_orm(column_type = "Text", nullable)]
    pub request_text: Option<String>,
    pub request_status: Option<RequestStatus>,
    #[sea_orm(column_type = "Text", nullable)]
    pub decline_reason: Option<String>,
    pub position: i32,
    pub status: SignupStatus,
    #[sea_orm(column_type = "Text", nullable)]
    pub notes: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub host_notes: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::events::Entity",
        from = "Column::EventId",
        to = "super::events::Column::Id"
    )]
    Event,
    #[sea_orm(
        belongs_to = "super::songs::Entity",
        from = "Column::SongId",
        to = "super::songs::Column::Id"
    )]
    Song,
}

impl Related<super::events::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Event.def()
    }
}

impl Related<super::songs::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Song.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Rebuild the typed performance from the storage columns.
    pub fn performance(&self) -> Performance {
        match (self.kind, self.song_id, &self.request_text) {
            (PerformanceType::WithBand, Some(song_id), _) => Performance::Library { song_id },
            (PerformanceType::WithBand, None, Some(text)) => Performance::Request { text: text.clone() },
            _ => Performance::Solo,
        }
    }
}

/// What a performer intends to do on stage. Exactly one variant holds, which
/// keeps `song_id` and `request_text` mutually exclusive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Performance {
    Solo,
    Library { song_id: i32 },
    Request { text: String },
}

impl Performance {
    /// Build a performance from the loose wire fields.
    pub fn from_parts(
        kind: PerformanceType,
        song_id: Option<i32>,
        request_text: Option<String>,
    ) -> Result<Self, QueueError> {
        let request_text = normalize(request_text);

        match (kind, song_id, request_text) {
            (PerformanceType::Solo, None, None) => Ok(Self::Solo),
            (PerformanceType::Solo, _, _) => Err(QueueError::Validation(
                "A solo performance cannot carry a song or a request".to_string(),
            )),
            (PerformanceType::WithBand, Some(_), Some(_)) => Err(QueueError::Validation(
                "Pick a library song or submit a request, not both".to_string(),
            )),
            (PerformanceType::WithBand, Some(song_id), None) => Ok(Self::Library { song_id }),
            (PerformanceType::WithBand, None, Some(text)) => Ok(Self::Request { text }),
            (PerformanceType::WithBand, None, None) => Err(QueueError::Validation(
                "Must select a song or submit a request".to_string(),
            )),
        }
    }

    pub const fn kind(&self) -> PerformanceType {
        match self {
            Self::Solo => PerformanceType::Solo,
            Self::Library { .. } | Self::Request { .. } => PerformanceType::WithBand,
        }
    }

    pub const fn song_id(&self) -> Option<i32> {
        match self {
            Self::Library { song_id } => Some(*song_id),
            _ => None,
        }
    }

    /// Write all four performance columns at once. Setting a request always
    /// restarts its review.
    pub fn write_to(&self, active: &mut ActiveModel) {
        use sea_orm::ActiveValue::Set;

        active.kind = Set(self.kind());
        active.song_id = Set(self.song_id());
        match self {
            Self::Request { text } => {
                active.request_text = Set(Some(text.clone()));
                active.request_status = Set(Some(RequestStatus::Pending));
            }
            Self::Solo | Self::Library { .. } => {
                active.request_text = Set(None);
                active.request_status = Set(None);
            }
        }
        active.decline_reason = Set(None);
    }
}

/// Trim a free-text field; blank becomes `None`.
pub fn normalize(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

// ── DTOs ──

/// Request body for `POST /api/signups`. The device comes from the request.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSignup {
    pub event_id: i32,
    pub performer_name: String,
    #[serde(rename = "type")]
    pub kind: PerformanceType,
    pub song_id: Option<i32>,
    pub request_text: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignupCreated {
    pub id: i32,
    pub position: i32,
    pub request_status: Option<RequestStatus>,
}

/// Request body for `PATCH /api/signups/{id}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EditSignup {
    pub performer_name: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<PerformanceType>,
    pub song_id: Option<i32>,
    pub request_text: Option<String>,
    /// An empty string clears the notes.
    pub notes: Option<String>,
}

/// Change to the performance group of a signup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PerformanceChange {
    /// Switch to solo; clears song and request.
    Solo,
    /// Switch to playing with the band, keeping the current song or request.
    WithBand,
    /// Pick a library song; clears the request.
    Song(i32),
    /// Submit a custom request; clears the song and restarts review.
    Request(String),
}

impl PerformanceChange {
    pub fn resolve(self, current: Performance) -> Result<Performance, QueueError> {
        match self {
            Self::Solo => Ok(Performance::Solo),
            Self::Song(song_id) => Ok(Performance::Library { song_id }),
            Self::Request(text) => Ok(Performance::Request { text }),
            Self::WithBand => match current {
                Performance::Solo => Err(QueueError::Validation(
                    "Must select a song or submit a request".to_string(),
                )),
                kept => Ok(kept),
            },
        }
    }
}

/// Typed edit of a signup, grouped so the clearing rules live in the types.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignupPatch {
    pub performer_name: Option<String>,
    /// `Some(None)` clears the notes.
    pub notes: Option<Option<String>>,
    pub performance: Option<PerformanceChange>,
}

impl TryFrom<EditSignup> for SignupPatch {
    type Error = QueueError;

    fn try_from(edit: EditSignup) -> Result<Self, Self::Error> {
        let performer_name = match edit.performer_name {
            Some(name) => Some(
                normalize(Some(name))
                    .ok_or_else(|| QueueError::Validation("Performer name cannot be empty".to_string()))?,
            ),
            None => None,
        };

        let notes = edit.notes.map(|n| normalize(Some(n)));

        let request_text = match edit.request_text {
            Some(text) => Some(normalize(Some(text)).ok_or_else(|| {
                QueueError::Validation("Song request cannot be empty".to_string())
            })?),
            None => None,
        };

        let performance = match (edit.kind, edit.song_id, request_text) {
            (_, Some(_), Some(_)) => {
                return Err(QueueError::Validation(
                    "Pick a library song or submit a request, not both".to_string(),
                ));
            }
            (Some(PerformanceType::Solo), None, None) => Some(PerformanceChange::Solo),
            (Some(PerformanceType::Solo), _, _) => {
                return Err(QueueError::Validation(
                    "A solo performance cannot carry a song or a request".to_string(),
                ));
            }
            (_, Some(song_id), None) => Some(PerformanceChange::Song(song_id)),
            (_, None, Some(text)) => Some(PerformanceChange::Request(text)),
            (Some(PerformanceType::WithBand), None, None) => Some(PerformanceChange::WithBand),
            (None, None, None) => None,
        };

        Ok(Self {
            performer_name,
            notes,
            performance,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateSignupStatus {
    pub status: SignupStatus,
}

/// Host decision on a custom song request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewDecision {
    Approved,
    Declined,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReviewRequest {
    pub decision: ReviewDecision,
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateHostNotes {
    pub host_notes: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReorderQueue {
    pub signup_ids: Vec<i32>,
}

/// A signup together with the library song it references, if any.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignupWithSong {
    #[serde(flatten)]
    pub signup: Model,
    pub song: Option<super::songs::Model>,
}

impl From<(Model, Option<super::songs::Model>)> for SignupWithSong {
    fn from((signup, song): (Model, Option<super::songs::Model>)) -> Self {
        Self { signup, song }
    }
}

/// What anyone may see of a signup. The owning device id doubles as proof of
/// ownership and host notes are private, so neither is included.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PublicSignup {
    pub id: i32,
    pub event_id: i32,
    pub performer_name: String,
    #[serde(rename = "type")]
    pub kind: PerformanceType,
    pub song_id: Option<i32>,
    pub request_text: Option<String>,
    pub request_status: Option<RequestStatus>,
    pub decline_reason: Option<String>,
    pub position: i32,
    pub status: SignupStatus,
    pub notes: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
    pub song: Option<super::songs::Model>,
}

impl PublicSignup {
    pub fn new(signup: Model, song: Option<super::songs::Model>) -> Self {
        Self {
            id: signup.id,
            event_id: signup.event_id,
            performer_name: signup.performer_name,
            kind: signup.kind,
            song_id: signup.song_id,
            request_text: signup.request_text,
            request_status: signup.request_status,
            decline_reason: signup.decline_reason,
            position: signup.position,
            status: signup.status,
            notes: signup.notes,
            created_at: signup.created_at,
            updated_at: signup.updated_at,
            song,
        }
    }
}

impl From<Model> for PublicSignup {
    fn from(signup: Model) -> Self {
        Self::new(signup, None)
    }
}

impl From<(Model, Option<super::songs::Model>)> for PublicSignup {
    fn from((signup, song): (Model, Option<super::songs::Model>)) -> Self {
        Self::new(signup, song)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solo_with_song_is_rejected() {
        let result = Performance::from_parts(PerformanceType::Solo, Some(3), None);
        assert!(matches!(result, Err(QueueError::Validation(_))));
    }

    #[test]
    fn band_needs_a_song_or_request() {
        let result = Performance::from_parts(PerformanceType::WithBand, None, Some("   ".into()));
        assert!(matches!(result, Err(QueueError::Validation(_))));

        let song = Performance::from_parts(PerformanceType::WithBand, Some(5), None).unwrap();
        assert_eq!(song, Performance::Library { song_id: 5 });

        let request =
            Performance::from_parts(PerformanceType::WithBand, None, Some(" Wonderwall ".into()))
                .unwrap();
        assert_eq!(
            request,
            Performance::Request {
                text: "Wonderwall".into()
            }
        );
    }

    #[test]
    fn song_and_request_together_are_rejected() {
        let result =
            Performance::from_parts(PerformanceType::WithBand, Some(1), Some("Creep".into()));
        assert!(matches!(result, Err(QueueError::Validation(_))));

        let edit = EditSignup {
            song_id: Some(1),
            request_text: Some("Creep".into()),
            ..Default::default()
        };
        assert!(SignupPatch::try_from(edit).is_err());
    }

    #[test]
    fn edit_maps_to_performance_groups() {
        let to_solo = SignupPatch::try_from(EditSignup {
            kind: Some(PerformanceType::Solo),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(to_solo.performance, Some(PerformanceChange::Solo));

        let to_song = SignupPatch::try_from(EditSignup {
            song_id: Some(9),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(to_song.performance, Some(PerformanceChange::Song(9)));

        let notes_only = SignupPatch::try_from(EditSignup {
            notes: Some("  ".into()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(notes_only.notes, Some(None));
        assert_eq!(notes_only.performance, None);
    }

    #[test]
    fn with_band_keeps_current_selection() {
        let kept = PerformanceChange::WithBand
            .resolve(Performance::Library { song_id: 2 })
            .unwrap();
        assert_eq!(kept, Performance::Library { song_id: 2 });

        assert!(PerformanceChange::WithBand.resolve(Performance::Solo).is_err());
    }

    #[test]
    fn public_view_hides_owner_and_host_notes() {
        let now = chrono::Utc::now();
        let signup = Model {
            id: 3,
            event_id: 1,
            device_id: "device-secret".into(),
            performer_name: "Alice".into(),
            kind: PerformanceType::Solo,
            song_id: None,
            request_text: None,
            request_status: None,
            decline_reason: None,
            position: 1,
            status: SignupStatus::Waiting,
            notes: None,
            host_notes: Some("nervous".into()),
            created_at: now,
            updated_at: now,
        };

        let json = serde_json::to_value(PublicSignup::from(signup)).unwrap();
        assert!(json.get("device_id").is_none());
        assert!(json.get("host_notes").is_none());
        assert_eq!(json["type"], "solo");
        assert_eq!(json["performer_name"], "Alice");
    }

    #[test]
    fn active_and_terminal_statuses_partition() {
        for status in SignupStatus::ACTIVE {
            assert!(status.is_active());
        }
        for status in [
            SignupStatus::Completed,
            SignupStatus::NoShow,
            SignupStatus::Cancelled,
        ] {
            assert!(status.is_terminal());
        }
    }
}
