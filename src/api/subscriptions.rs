use crate::api::{envelope, ApiResponse, Viewer};
use crate::app_state::AppState;
use crate::core::ObjectId;
use axum::{
    extract::{Path, State},
    http::StatusCode,
};

pub async fn toggle(
    State(state): State<AppState>,
    Path(channel_id): Path<String>,
    viewer: Viewer,
) -> ApiResponse {
    let channel_id = ObjectId::parse(&channel_id)?;
    let outcome = state
        .subscriptions
        .toggle(viewer.user_id, channel_id)
        .await?;
    let message = if outcome.active {
        "subscribed successfully"
    } else {
        "unsubscribed successfully"
    };
    Ok(envelope(StatusCode::OK, message, outcome))
}

pub async fn subscribers(
    State(state): State<AppState>,
    Path(channel_id): Path<String>,
) -> ApiResponse {
    let channel_id = ObjectId::parse(&channel_id)?;
    let subscribers = state.subscriptions.subscribers(channel_id).await?;
    Ok(envelope(
        StatusCode::OK,
        "subscriber list fetched successfully",
        subscribers,
    ))
}

pub async fn subscribed_channels(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> ApiResponse {
    let subscriber_id = ObjectId::parse(&user_id)?;
    let channels = state
        .subscriptions
        .subscribed_channels(subscriber_id)
        .await?;
    Ok(envelope(
        StatusCode::OK,
        "subscribed channels fetched successfully",
        channels,
    ))
}
