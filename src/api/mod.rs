// HTTP layer - routing, caller identity extraction, response envelope.
// Handlers parse and validate raw request input, then call one service
// operation; the services never see HTTP.

pub mod comments;
pub mod dashboard;
pub mod likes;
pub mod playlists;
pub mod subscriptions;
pub mod tweets;
pub mod videos;
pub mod viewer;

pub use viewer::Viewer;

use crate::app_state::AppState;
use crate::error::AppResult;
use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, patch, post},
    Json, Router,
};
use serde::Serialize;
use serde_json::{json, Value};

/// Uniform success envelope.
pub(crate) fn envelope(
    status: StatusCode,
    message: &str,
    data: impl Serialize,
) -> (StatusCode, Json<Value>) {
    (
        status,
        Json(json!({
            "status": status.as_u16(),
            "message": message,
            "data": data
        })),
    )
}

pub(crate) type ApiResponse = AppResult<(StatusCode, Json<Value>)>;

async fn healthcheck(State(state): State<AppState>) -> ApiResponse {
    state.store.ping().await?;
    Ok(envelope(
        StatusCode::OK,
        "OK",
        json!({ "message": "service is running" }),
    ))
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthcheck))
        .nest("/api/v1", api_routes())
        .with_state(state)
}

fn api_routes() -> Router<AppState> {
    Router::new()
        // Videos
        .route("/videos", get(videos::list).post(videos::publish))
        .route(
            "/videos/{id}",
            get(videos::get_by_id)
                .patch(videos::update)
                .delete(videos::remove),
        )
        .route("/videos/{id}/toggle-publish", post(videos::toggle_publish))
        // Comments
        .route(
            "/videos/{id}/comments",
            get(comments::list_for_video).post(comments::add),
        )
        .route(
            "/comments/{id}",
            patch(comments::update).delete(comments::remove),
        )
        // Likes
        .route("/likes/{target}/{id}/toggle", post(likes::toggle))
        .route("/likes/videos", get(likes::liked_videos))
        // Subscriptions
        .route(
            "/subscriptions/{channel_id}/toggle",
            post(subscriptions::toggle),
        )
        .route(
            "/subscriptions/{channel_id}/subscribers",
            get(subscriptions::subscribers),
        )
        .route(
            "/users/{user_id}/subscriptions",
            get(subscriptions::subscribed_channels),
        )
        // Playlists
        .route("/playlists", post(playlists::create))
        .route(
            "/playlists/{id}",
            get(playlists::get_by_id)
                .patch(playlists::update)
                .delete(playlists::remove),
        )
        .route(
            "/playlists/{id}/videos/{video_id}",
            post(playlists::add_video).delete(playlists::remove_video),
        )
        .route("/users/{user_id}/playlists", get(playlists::list_by_user))
        // Tweets
        .route("/tweets", post(tweets::create))
        .route("/tweets/{id}", patch(tweets::update).delete(tweets::remove))
        .route("/users/{user_id}/tweets", get(tweets::list_by_user))
        // Dashboard
        .route("/channels/{channel_id}/stats", get(dashboard::stats))
        .route("/channels/{channel_id}/videos", get(dashboard::videos))
}
