//! Deprecated v1 surface.
//!
//! Unauthenticated catalog endpoints kept for existing clients. Mounted at
//! `/api/v1` and, when legacy routes are enabled, at `/api`. Deprecation
//! headers are added by the layer in [`super::deprecation`].

use axum::{
    Router,
    routing::{get, patch, post},
};
use std::sync::Arc;

use super::AppState;

pub mod media;
pub mod seasons;
pub mod users;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/medias", get(media::list_media).post(media::create_media))
        .route(
            "/medias/{id}",
            get(media::get_media)
                .put(media::update_media)
                .delete(media::delete_media),
        )
        .route("/films", post(media::create_film))
        .route("/series", post(media::create_serie))
        .route("/series/{id}/episodes", get(seasons::serie_episodes))
        .route("/seasons", post(seasons::create_season))
        .route("/episodes", post(seasons::create_episode))
        .route("/episodes/{id}", patch(seasons::set_watched))
        .route("/users/{id}/medias", get(users::favorites))
        .route("/logs", get(users::last_log))
}
