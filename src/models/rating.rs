use serde::Serialize;

use crate::domain::RatingTarget;
use crate::entities::ratings;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Rating {
    pub id: i32,
    pub user_id: i32,
    pub target: String,
    pub target_id: i32,
    pub score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review: Option<String>,
    pub created_at: String,
}

impl From<ratings::Model> for Rating {
    fn from(model: ratings::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            target: model.target,
            target_id: model.target_id,
            score: model.score,
            review: model.review,
            created_at: model.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewRating {
    pub target: RatingTarget,
    pub target_id: i32,
    pub score: f64,
    pub review: Option<String>,
}

/// Aggregate over every score recorded for one or more targets.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingSummary {
    pub average_score: f64,
    pub total_ratings: usize,
    pub scores: Vec<f64>,
}

impl RatingSummary {
    /// Averages `scores`, rounded to two decimals. An empty list averages to zero.
    #[must_use]
    pub fn from_scores(scores: Vec<f64>) -> Self {
        let total_ratings = scores.len();
        let average_score = if scores.is_empty() {
            0.0
        } else {
            let mean = scores.iter().sum::<f64>() / total_ratings as f64;
            (mean * 100.0).round() / 100.0
        };

        Self {
            average_score,
            total_ratings,
            scores,
        }
    }
}
