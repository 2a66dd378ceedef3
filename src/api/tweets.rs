use crate::api::{envelope, ApiResponse, Viewer};
use crate::app_state::AppState;
use crate::core::ObjectId;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
pub struct TweetBody {
    pub content: String,
}

pub async fn create(
    State(state): State<AppState>,
    viewer: Viewer,
    Json(body): Json<TweetBody>,
) -> ApiResponse {
    let tweet = state.tweets.create(viewer.user_id, &body.content).await?;
    Ok(envelope(
        StatusCode::CREATED,
        "tweet created successfully",
        tweet,
    ))
}

pub async fn list_by_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> ApiResponse {
    let user_id = ObjectId::parse(&user_id)?;
    let tweets = state.tweets.list_by_user(user_id).await?;
    Ok(envelope(
        StatusCode::OK,
        "user tweets fetched successfully",
        tweets,
    ))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<TweetBody>,
) -> ApiResponse {
    let tweet_id = ObjectId::parse(&id)?;
    let tweet = state.tweets.update(tweet_id, &body.content).await?;
    Ok(envelope(
        StatusCode::OK,
        "tweet updated successfully",
        tweet,
    ))
}

pub async fn remove(State(state): State<AppState>, Path(id): Path<String>) -> ApiResponse {
    let tweet_id = ObjectId::parse(&id)?;
    state.tweets.delete(tweet_id).await?;
    Ok(envelope(
        StatusCode::OK,
        "tweet deleted successfully",
        Value::Null,
    ))
}
