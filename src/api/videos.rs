use crate::api::{envelope, ApiResponse, Viewer};
use crate::app_state::AppState;
use crate::core::ObjectId;
use crate::models::{PageRequest, SortDirection, VideoChanges, VideoFilter, VideoSort, VideoSortField};
use crate::services::NewVideo;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

#[derive(Debug, Deserialize)]
pub struct ListVideosQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    /// Case-insensitive substring match on the title.
    pub query: Option<String>,
    pub sort_by: Option<String>,
    pub sort_type: Option<String>,
    pub user_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateVideoRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub thumbnail_url: Option<String>,
}

pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListVideosQuery>,
) -> ApiResponse {
    let page = PageRequest::new(params.page, params.limit, &state.config.pagination)?;

    let filter = VideoFilter {
        // A malformed owner filter is a client error, not a silent no-op
        owner_id: params
            .user_id
            .as_deref()
            .map(ObjectId::parse)
            .transpose()?,
        title_query: params.query.filter(|q| !q.trim().is_empty()),
    };

    let sort = VideoSort {
        field: params
            .sort_by
            .as_deref()
            .map(VideoSortField::parse)
            .transpose()?
            .unwrap_or(VideoSortField::CreatedAt),
        direction: params
            .sort_type
            .as_deref()
            .map(SortDirection::parse)
            .transpose()?
            .unwrap_or(SortDirection::Desc),
    };

    let videos = state.videos.list(filter, sort, page).await?;
    Ok(envelope(
        StatusCode::OK,
        "videos fetched successfully",
        videos,
    ))
}

pub async fn publish(
    State(state): State<AppState>,
    viewer: Viewer,
    Json(req): Json<NewVideo>,
) -> ApiResponse {
    let video = state.videos.publish(viewer.user_id, req).await?;
    Ok(envelope(
        StatusCode::CREATED,
        "video published successfully",
        video,
    ))
}

pub async fn get_by_id(State(state): State<AppState>, Path(id): Path<String>) -> ApiResponse {
    let video_id = ObjectId::parse(&id)?;
    let video = state.videos.get(video_id).await?;
    Ok(envelope(
        StatusCode::OK,
        "video retrieved successfully",
        video,
    ))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateVideoRequest>,
) -> ApiResponse {
    let video_id = ObjectId::parse(&id)?;
    let changes = VideoChanges {
        title: req.title,
        description: req.description,
        thumbnail_url: req.thumbnail_url,
    };
    let video = state.videos.update(video_id, changes).await?;
    Ok(envelope(
        StatusCode::OK,
        "video updated successfully",
        video,
    ))
}

pub async fn remove(State(state): State<AppState>, Path(id): Path<String>) -> ApiResponse {
    let video_id = ObjectId::parse(&id)?;
    state.videos.delete(video_id).await?;
    Ok(envelope(
        StatusCode::OK,
        "video deleted successfully",
        Value::Null,
    ))
}

pub async fn toggle_publish(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResponse {
    let video_id = ObjectId::parse(&id)?;
    let video = state.videos.toggle_publish(video_id).await?;
    Ok(envelope(
        StatusCode::OK,
        "video publish status updated successfully",
        json!(video),
    ))
}
