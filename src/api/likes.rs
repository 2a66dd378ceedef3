use crate::api::{envelope, ApiResponse, Viewer};
use crate::app_state::AppState;
use crate::core::ObjectId;
use crate::models::LikeTarget;
use axum::{
    extract::{Path, State},
    http::StatusCode,
};

pub async fn toggle(
    State(state): State<AppState>,
    Path((target, id)): Path<(String, String)>,
    viewer: Viewer,
) -> ApiResponse {
    // The target set is closed; anything else is rejected before storage
    let target = LikeTarget::parse(&target)?;
    let target_id = ObjectId::parse(&id)?;

    let outcome = state.likes.toggle(viewer.user_id, target, target_id).await?;
    let message = if outcome.active {
        "like added"
    } else {
        "like removed"
    };
    Ok(envelope(StatusCode::OK, message, outcome))
}

pub async fn liked_videos(State(state): State<AppState>, viewer: Viewer) -> ApiResponse {
    let videos = state.likes.liked_videos(viewer.user_id).await?;
    Ok(envelope(
        StatusCode::OK,
        "liked videos retrieved successfully",
        videos,
    ))
}
