use serde::{Deserialize, Serialize};

use crate::domain::{MediaKind, SerieStatus};
use crate::entities::media;

/// A catalog entry as returned to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Media {
    pub id: i32,
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    pub genre: Option<String>,
    pub year: Option<i32>,
    pub rating: Option<f64>,
    pub platform: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<media::Model> for Media {
    fn from(model: media::Model) -> Self {
        Self {
            id: model.id,
            kind: model.kind,
            title: model.title,
            genre: model.genre,
            year: model.year,
            rating: model.rating,
            platform: model.platform,
            duration: model.duration,
            status: model.status,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl Media {
    #[must_use]
    pub fn is(&self, kind: MediaKind) -> bool {
        self.kind == kind.as_str()
    }
}

/// Fields of a media record about to be inserted, already validated.
#[derive(Debug, Clone, PartialEq)]
pub struct NewMedia {
    pub kind: MediaKind,
    pub title: String,
    pub genre: Option<String>,
    pub year: Option<i32>,
    pub rating: Option<f64>,
    pub platform: String,
    pub duration: Option<i32>,
    pub status: Option<SerieStatus>,
}

/// Partial update; `None` leaves the column untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MediaUpdate {
    pub title: Option<String>,
    pub genre: Option<String>,
    pub year: Option<i32>,
    pub rating: Option<f64>,
    pub platform: Option<String>,
    pub duration: Option<i32>,
    pub status: Option<SerieStatus>,
}

impl MediaUpdate {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Debug, Clone, Default)]
pub struct MediaFilter {
    pub kind: Option<MediaKind>,
    /// Case-insensitive substring match
    pub title: Option<String>,
    pub genre: Option<String>,
    pub year: Option<i32>,
    pub min_year: Option<i32>,
    pub max_year: Option<i32>,
    pub min_duration: Option<i32>,
    pub max_duration: Option<i32>,
    pub status: Option<SerieStatus>,
}
