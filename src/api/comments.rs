use crate::api::{envelope, ApiResponse, Viewer};
use crate::app_state::AppState;
use crate::core::ObjectId;
use crate::models::PageRequest;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct CommentBody {
    pub content: String,
}

pub async fn list_for_video(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<PageQuery>,
) -> ApiResponse {
    let video_id = ObjectId::parse(&id)?;
    let page = PageRequest::new(params.page, params.limit, &state.config.pagination)?;
    let comments = state.comments.list_for_video(video_id, page).await?;
    Ok(envelope(
        StatusCode::OK,
        "comments fetched successfully",
        comments,
    ))
}

pub async fn add(
    State(state): State<AppState>,
    Path(id): Path<String>,
    viewer: Viewer,
    Json(body): Json<CommentBody>,
) -> ApiResponse {
    let video_id = ObjectId::parse(&id)?;
    let comment = state
        .comments
        .add(viewer.user_id, video_id, &body.content)
        .await?;
    Ok(envelope(
        StatusCode::CREATED,
        "comment added successfully",
        comment,
    ))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<CommentBody>,
) -> ApiResponse {
    let comment_id = ObjectId::parse(&id)?;
    let comment = state.comments.update(comment_id, &body.content).await?;
    Ok(envelope(
        StatusCode::OK,
        "comment updated successfully",
        comment,
    ))
}

pub async fn remove(State(state): State<AppState>, Path(id): Path<String>) -> ApiResponse {
    let comment_id = ObjectId::parse(&id)?;
    state.comments.delete(comment_id).await?;
    Ok(envelope(
        StatusCode::OK,
        "comment deleted successfully",
        Value::Null,
    ))
}
