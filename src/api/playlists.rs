use crate::api::comments::PageQuery;
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
pub struct PlaylistBody {
    pub name: String,
    pub description: Option<String>,
}

pub async fn create(
    State(state): State<AppState>,
    viewer: Viewer,
    Json(body): Json<PlaylistBody>,
) -> ApiResponse {
    let playlist = state
        .playlists
        .create(viewer.user_id, &body.name, body.description.as_deref())
        .await?;
    Ok(envelope(
        StatusCode::CREATED,
        "playlist created successfully",
        playlist,
    ))
}

pub async fn get_by_id(State(state): State<AppState>, Path(id): Path<String>) -> ApiResponse {
    let playlist_id = ObjectId::parse(&id)?;
    let playlist = state.playlists.get(playlist_id).await?;
    Ok(envelope(
        StatusCode::OK,
        "playlist retrieved successfully",
        playlist,
    ))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<PlaylistBody>,
) -> ApiResponse {
    let playlist_id = ObjectId::parse(&id)?;
    let playlist = state
        .playlists
        .update(playlist_id, &body.name, body.description.as_deref())
        .await?;
    Ok(envelope(
        StatusCode::OK,
        "playlist updated successfully",
        playlist,
    ))
}

pub async fn remove(State(state): State<AppState>, Path(id): Path<String>) -> ApiResponse {
    let playlist_id = ObjectId::parse(&id)?;
    state.playlists.delete(playlist_id).await?;
    Ok(envelope(
        StatusCode::OK,
        "playlist deleted successfully",
        Value::Null,
    ))
}

pub async fn list_by_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Query(params): Query<PageQuery>,
) -> ApiResponse {
    let owner_id = ObjectId::parse(&user_id)?;
    let page = PageRequest::new(params.page, params.limit, &state.config.pagination)?;
    let playlists = state.playlists.list_by_owner(owner_id, page).await?;
    Ok(envelope(
        StatusCode::OK,
        "user playlists retrieved successfully",
        playlists,
    ))
}

pub async fn add_video(
    State(state): State<AppState>,
    Path((id, video_id)): Path<(String, String)>,
) -> ApiResponse {
    let playlist_id = ObjectId::parse(&id)?;
    let video_id = ObjectId::parse(&video_id)?;
    let playlist = state.playlists.add_video(playlist_id, video_id).await?;
    Ok(envelope(
        StatusCode::OK,
        "video added to playlist successfully",
        playlist,
    ))
}

pub async fn remove_video(
    State(state): State<AppState>,
    Path((id, video_id)): Path<(String, String)>,
) -> ApiResponse {
    let playlist_id = ObjectId::parse(&id)?;
    let video_id = ObjectId::parse(&video_id)?;
    let playlist = state.playlists.remove_video(playlist_id, video_id).await?;
    Ok(envelope(
        StatusCode::OK,
        "video removed from playlist successfully",
        playlist,
    ))
}
