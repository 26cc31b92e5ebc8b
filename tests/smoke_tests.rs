//! Smoke tests for the deprecated v1 surface and the shared HTTP plumbing.

use axum::{
    Router,
    body::Body,
    http::{HeaderMap, Request, StatusCode},
};
use http_body_util::BodyExt;
use mediatrack::config::Config;
use mediatrack::db::DEFAULT_API_KEY;
use serde_json::{Value, json};
use tower::ServiceExt;

async fn spawn_app() -> Router {
    let db_path =
        std::env::temp_dir().join(format!("mediatrack-smoke-test-{}.db", uuid::Uuid::new_v4()));

    let mut config = Config::default();
    config.general.database_path = format!("sqlite:{}", db_path.display());
    config.api.v1_sunset = "2025-06-30".to_string();

    let state = mediatrack::api::create_app_state_from_config(config, None)
        .await
        .expect("failed to create app state");
    mediatrack::api::router(state).await
}

struct Reply {
    status: StatusCode,
    headers: HeaderMap,
    body: Value,
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> Reply {
    send_with(app, Request::builder().method(method).uri(uri), body).await
}

async fn send_with(
    app: &Router,
    builder: axum::http::request::Builder,
    body: Option<Value>,
) -> Reply {
    let request = match body {
        Some(body) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };

    Reply {
        status,
        headers,
        body,
    }
}

async fn add_serie(app: &Router) -> i64 {
    let reply = send(
        app,
        "POST",
        "/api/v1/series",
        Some(json!({ "title": "Dark", "platform": "Netflix", "status": "Finished" })),
    )
    .await;
    assert_eq!(reply.status, StatusCode::CREATED, "{}", reply.body);
    reply.body["data"]["id"].as_i64().unwrap()
}

#[tokio::test]
async fn test_health_and_unknown_routes() {
    let app = spawn_app().await;

    let reply = send(&app, "GET", "/health", None).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body["status"], "ok");
    assert_eq!(reply.body["database"], true);

    let reply = send(&app, "GET", "/api/v3/nothing", None).await;
    assert_eq!(reply.status, StatusCode::NOT_FOUND);
    assert_eq!(reply.body["code"], "ROUTE_NOT_FOUND");
    assert_eq!(reply.body["error"], "Route not found");

    let reply = send(&app, "GET", "/metrics", None).await;
    assert_eq!(reply.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_correlation_id_is_echoed_or_generated() {
    let app = spawn_app().await;

    let reply = send_with(
        &app,
        Request::builder()
            .uri("/health")
            .header("x-correlation-id", "trace-me-42"),
        None,
    )
    .await;
    assert_eq!(reply.headers["x-correlation-id"], "trace-me-42");

    let reply = send(&app, "GET", "/health", None).await;
    let generated = reply.headers["x-correlation-id"].to_str().unwrap();
    assert!(uuid::Uuid::parse_str(generated).is_ok());
}

#[tokio::test]
async fn test_v1_responses_carry_deprecation_notice() {
    let app = spawn_app().await;

    let reply = send(&app, "GET", "/api/v1/medias", None).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.headers["deprecation"], "true");
    assert_eq!(reply.headers["sunset"], "2025-06-30");
    assert_eq!(
        reply.headers["link"],
        "</api/v2/movies>; rel=\"successor-version\""
    );
    assert!(reply.headers["warning"].to_str().unwrap().starts_with("299"));
    assert!(reply.headers.get("x-deprecated").is_none());
    assert_eq!(reply.body["deprecation"]["warning"], "API v1 is deprecated");
    assert_eq!(reply.body["deprecation"]["successor"], "/api/v2/movies");

    let reply = send(&app, "GET", "/api/medias", None).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.headers["x-deprecated"], "true");
    assert_eq!(reply.body["deprecation"]["sunset"], "2025-06-30");

    let reply = send(&app, "GET", "/api/v1/medias/9999", None).await;
    assert_eq!(reply.status, StatusCode::NOT_FOUND);
    assert_eq!(reply.body["error"], "Media not found");
    assert_eq!(reply.headers["deprecation"], "true");
    assert!(reply.body["deprecation"].is_object());

    let reply = send(&app, "GET", "/api/v2/movies", None).await;
    assert!(reply.headers.get("deprecation").is_none());
    assert!(reply.body.get("deprecation").is_none());
}

#[tokio::test]
async fn test_v1_media_lifecycle() {
    let app = spawn_app().await;

    let reply = send(
        &app,
        "POST",
        "/api/v1/medias",
        Some(json!({ "type": "Book", "title": "Bad!", "platform": 4 })),
    )
    .await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        reply.body["errors"],
        json!([
            "Invalid type",
            "Title must contain only letters, numbers, and spaces",
            "Invalid platform"
        ])
    );

    let reply = send(
        &app,
        "POST",
        "/api/v1/films",
        Some(json!({ "type": "Serie", "title": "Heat", "platform": "Netflix", "duration": 170 })),
    )
    .await;
    assert_eq!(reply.status, StatusCode::CREATED);
    assert_eq!(reply.body["data"]["type"], "Film");
    assert_eq!(reply.body["data"]["duration"], 170);
    let film = reply.body["data"]["id"].as_i64().unwrap();

    add_serie(&app).await;

    let reply = send(&app, "GET", "/api/v1/medias?type=Film", None).await;
    assert_eq!(reply.body["data"].as_array().unwrap().len(), 1);
    let reply = send(&app, "GET", "/api/v1/medias?status=Finished", None).await;
    assert_eq!(reply.body["data"][0]["title"], "Dark");

    let uri = format!("/api/v1/medias/{film}");
    let reply = send(&app, "PUT", &uri, Some(json!({ "year": 1995, "genre": "Crime" }))).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body["data"]["year"], 1995);

    let reply = send(&app, "PUT", &uri, Some(json!({ "year": 0 }))).await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(reply.body["errors"], json!(["Invalid year"]));

    let reply = send(&app, "DELETE", &uri, None).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body["data"]["message"], "Media deleted successfully");

    let reply = send(&app, "DELETE", &uri, None).await;
    assert_eq!(reply.status, StatusCode::NOT_FOUND);
    assert_eq!(reply.body["error"], "Media not found");

    let reply = send(&app, "GET", "/api/v1/logs", None).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body["data"]["eventType"], "media_deleted");
    assert!(reply.body["data"]["correlationId"].is_string());
}

#[tokio::test]
async fn test_v1_seasons_and_episodes() {
    let app = spawn_app().await;
    let serie = add_serie(&app).await;

    let reply = send(
        &app,
        "POST",
        "/api/v1/seasons",
        Some(json!({ "serieId": serie, "seasonNumber": 1 })),
    )
    .await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        reply.body["error"],
        "serieId, seasonNumber, and releaseDate are required"
    );

    let reply = send(
        &app,
        "POST",
        "/api/v1/seasons",
        Some(json!({ "serieId": 9999, "seasonNumber": 1, "releaseDate": "2017-12-01" })),
    )
    .await;
    assert_eq!(reply.status, StatusCode::NOT_FOUND);
    assert_eq!(reply.body["error"], "Series not found");

    let reply = send(
        &app,
        "POST",
        "/api/v1/seasons",
        Some(json!({ "serieId": serie, "seasonNumber": 1, "releaseDate": "2017/12/01" })),
    )
    .await;
    assert_eq!(reply.status, StatusCode::CREATED, "{}", reply.body);

    let reply = send(
        &app,
        "POST",
        "/api/v1/seasons",
        Some(json!({ "serieId": serie, "seasonNumber": 1, "releaseDate": "2018-01-01" })),
    )
    .await;
    assert_eq!(reply.status, StatusCode::CONFLICT);
    assert_eq!(reply.body["error"], "Season already exists");

    let reply = send(
        &app,
        "POST",
        "/api/v1/episodes",
        Some(json!({ "serieId": serie, "seasonNumber": 1, "title": "Secrets" })),
    )
    .await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);

    let reply = send(
        &app,
        "POST",
        "/api/v1/episodes",
        Some(json!({
            "serieId": serie,
            "seasonNumber": 3,
            "title": "Secrets",
            "episodeNumber": 1,
            "duration": 51,
        })),
    )
    .await;
    assert_eq!(reply.status, StatusCode::NOT_FOUND);
    assert_eq!(reply.body["error"], "Series or season not found");

    let reply = send(
        &app,
        "POST",
        "/api/v1/episodes",
        Some(json!({
            "serieId": serie,
            "seasonNumber": 1,
            "title": "Secrets",
            "episodeNumber": 1,
            "duration": 51,
        })),
    )
    .await;
    assert_eq!(reply.status, StatusCode::CREATED, "{}", reply.body);
    assert_eq!(reply.body["data"]["watched"], false);
    let episode = reply.body["data"]["id"].as_i64().unwrap();

    let uri = format!("/api/v1/episodes/{episode}");
    let reply = send(&app, "PATCH", &uri, Some(json!({ "watched": "yes" }))).await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(reply.body["error"], "watched field must be a boolean");

    let reply = send(&app, "PATCH", &uri, Some(json!({ "watched": true }))).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body["data"]["watched"], true);

    let reply = send(
        &app,
        "PATCH",
        "/api/v1/episodes/9999",
        Some(json!({ "watched": true })),
    )
    .await;
    assert_eq!(reply.status, StatusCode::NOT_FOUND);
    assert_eq!(reply.body["error"], "Episode not found");

    let reply = send(&app, "GET", &format!("/api/v1/series/{serie}/episodes"), None).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body["data"][0]["seasonNumber"], 1);
    assert_eq!(reply.body["data"][0]["episodes"][0]["title"], "Secrets");
}

#[tokio::test]
async fn test_deleting_a_serie_cascades() {
    let app = spawn_app().await;
    let serie = add_serie(&app).await;

    send(
        &app,
        "POST",
        "/api/v1/seasons",
        Some(json!({ "serieId": serie, "seasonNumber": 1, "releaseDate": "2017-12-01" })),
    )
    .await;
    let reply = send(
        &app,
        "POST",
        "/api/v1/episodes",
        Some(json!({
            "serieId": serie,
            "seasonNumber": 1,
            "title": "Secrets",
            "episodeNumber": 1,
            "duration": 51,
        })),
    )
    .await;
    let episode = reply.body["data"]["id"].as_i64().unwrap();

    let auth = format!("Bearer {DEFAULT_API_KEY}");
    let reply = send_with(
        &app,
        Request::builder()
            .method("POST")
            .uri("/api/v2/ratings")
            .header("Authorization", auth.as_str()),
        Some(json!({ "target": "episode", "targetId": episode, "score": 9 })),
    )
    .await;
    assert_eq!(reply.status, StatusCode::CREATED, "{}", reply.body);

    let reply = send_with(
        &app,
        Request::builder()
            .method("POST")
            .uri(format!("/api/v2/auth/users/me/favorites/{serie}"))
            .header("Authorization", auth.as_str()),
        None,
    )
    .await;
    assert_eq!(reply.status, StatusCode::OK);

    let reply = send(&app, "GET", "/api/v1/users/1/medias", None).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body["data"][0]["id"], serie);

    let reply = send(&app, "GET", &format!("/api/v2/ratings/avg/series/{serie}"), None).await;
    assert_eq!(reply.body["data"]["totalRatings"], 1);

    let reply = send(&app, "DELETE", &format!("/api/v1/medias/{serie}"), None).await;
    assert_eq!(reply.status, StatusCode::OK);

    let reply = send(&app, "GET", &format!("/api/v1/series/{serie}/episodes"), None).await;
    assert_eq!(reply.status, StatusCode::NOT_FOUND);
    assert_eq!(reply.body["error"], "Series not found");

    let reply = send(&app, "GET", &format!("/api/v2/ratings/avg/series/{serie}"), None).await;
    assert_eq!(reply.body["data"]["totalRatings"], 0);

    let reply = send(&app, "PATCH", &format!("/api/v1/episodes/{episode}"), Some(json!({ "watched": true }))).await;
    assert_eq!(reply.status, StatusCode::NOT_FOUND);

    let reply = send(&app, "GET", "/api/v1/users/1/medias", None).await;
    assert_eq!(reply.status, StatusCode::NOT_FOUND);
    assert_eq!(reply.body["error"], "No favorites found");
}

#[tokio::test]
async fn test_malformed_json_is_a_bad_request() {
    let app = spawn_app().await;

    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/medias")
        .header("Content-Type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
