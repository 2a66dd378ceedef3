use crate::api::comments::PageQuery;
use crate::api::{envelope, ApiResponse};
use crate::app_state::AppState;
use crate::core::ObjectId;
use crate::models::PageRequest;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
};

pub async fn stats(
    State(state): State<AppState>,
    Path(channel_id): Path<String>,
) -> ApiResponse {
    let channel_id = ObjectId::parse(&channel_id)?;
    let stats = state.dashboard.stats(channel_id).await?;
    Ok(envelope(
        StatusCode::OK,
        "channel stats fetched successfully",
        stats,
    ))
}

pub async fn videos(
    State(state): State<AppState>,
    Path(channel_id): Path<String>,
    Query(params): Query<PageQuery>,
) -> ApiResponse {
    let channel_id = ObjectId::parse(&channel_id)?;
    let page = PageRequest::new(params.page, params.limit, &state.config.pagination)?;
    let videos = state.dashboard.channel_videos(channel_id, page).await?;
    Ok(envelope(
        StatusCode::OK,
        "channel videos fetched successfully",
        videos,
    ))
}
