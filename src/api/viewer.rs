// Caller identity extraction. The deployment's auth proxy authenticates the
// request and sets x-user-id; this extractor turns it into a typed id that
// handlers pass explicitly into the services.

use crate::core::ObjectId;
use crate::error::AppError;
use axum::{extract::FromRequestParts, http::request::Parts};

#[derive(Debug, Clone, Copy)]
pub struct Viewer {
    pub user_id: ObjectId,
}

impl<S> FromRequestParts<S> for Viewer
where
    S: Send + Sync,
{
    type Rejection = AppError;

    fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let viewer = parts
            .headers
            .get("x-user-id")
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::Unauthorized("missing x-user-id header".to_string()))
            .and_then(|raw| {
                ObjectId::parse(raw).map_err(|_| {
                    AppError::Unauthorized("malformed x-user-id header".to_string())
                })
            })
            .map(|user_id| Viewer { user_id });

        async move { viewer }
    }
}
