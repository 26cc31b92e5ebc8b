//! Authenticated v2 surface.
//!
//! Reads are public unless noted. Catalog writes need an admin token, account
//! and rating routes need any valid token.

use axum::{
    Router, middleware,
    routing::{get, patch, post},
};
use std::sync::Arc;

use super::{AppState, auth as guard};

pub mod auth;
pub mod movies;
pub mod ratings;
pub mod series;

pub fn router(state: &Arc<AppState>) -> Router<Arc<AppState>> {
    let user = middleware::from_fn_with_state(state.clone(), guard::require_user);
    let admin = middleware::from_fn_with_state(state.clone(), guard::require_admin);

    Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route(
            "/auth/users/me",
            get(auth::me)
                .patch(auth::update_me)
                .route_layer(user.clone()),
        )
        .route(
            "/auth/users/me/favorites/{media_id}",
            post(auth::add_favorite)
                .delete(auth::remove_favorite)
                .route_layer(user.clone()),
        )
        .route(
            "/auth/users/{id}",
            get(auth::get_user).route_layer(admin.clone()),
        )
        .route(
            "/movies",
            get(movies::list_movies).merge(post(movies::create_movie).route_layer(admin.clone())),
        )
        .route(
            "/movies/{id}",
            get(movies::get_movie).merge(
                patch(movies::update_movie)
                    .delete(movies::delete_movie)
                    .route_layer(admin.clone()),
            ),
        )
        .route(
            "/series",
            get(series::list_series).merge(post(series::create_serie).route_layer(admin.clone())),
        )
        .route(
            "/series/{id}/seasons",
            get(series::list_seasons)
                .merge(post(series::create_season).route_layer(admin.clone())),
        )
        .route(
            "/series/{id}/seasons/{season_id}/episodes",
            get(series::list_episodes)
                .merge(post(series::create_episode).route_layer(admin)),
        )
        .route(
            "/series/{id}/seasons/{season_id}/episodes/{episode_id}",
            get(series::get_episode),
        )
        .route(
            "/series/{id}/seasons/{season_id}/episodes/{episode_id}/watched",
            patch(series::set_watched).route_layer(user.clone()),
        )
        .route(
            "/ratings",
            post(ratings::create_rating).route_layer(user),
        )
        .route("/ratings/avg/movie/{id}", get(ratings::movie_average))
        .route("/ratings/avg/series/{id}", get(ratings::series_average))
}
