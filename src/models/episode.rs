use serde::{Deserialize, Serialize};

use crate::entities::{episodes, seasons};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Season {
    pub id: i32,
    pub serie_id: i32,
    pub season_number: i32,
    pub release_date: String,
    pub created_at: String,
}

impl From<seasons::Model> for Season {
    fn from(model: seasons::Model) -> Self {
        Self {
            id: model.id,
            serie_id: model.serie_id,
            season_number: model.season_number,
            release_date: model.release_date,
            created_at: model.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Episode {
    pub id: i32,
    pub season_id: i32,
    pub serie_id: i32,
    pub title: String,
    pub episode_number: i32,
    pub duration: i32,
    pub watched: bool,
    pub created_at: String,
}

impl From<episodes::Model> for Episode {
    fn from(model: episodes::Model) -> Self {
        Self {
            id: model.id,
            season_id: model.season_id,
            serie_id: model.serie_id,
            title: model.title,
            episode_number: model.episode_number,
            duration: model.duration,
            watched: model.watched,
            created_at: model.created_at,
        }
    }
}

/// A season together with its episodes, as listed under a serie.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeasonWithEpisodes {
    #[serde(flatten)]
    pub season: Season,
    pub episodes: Vec<Episode>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEpisode {
    pub serie_id: i32,
    pub season_id: i32,
    pub title: String,
    pub episode_number: i32,
    pub duration: i32,
}
