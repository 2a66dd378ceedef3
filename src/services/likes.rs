use crate::core::ObjectId;
use crate::error::AppResult;
use crate::infrastructure::Store;
use crate::models::{AssocKind, LikeTarget, Video};
use crate::services::toggle::{toggle_association, ToggleOutcome};
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Clone)]
pub struct LikeService {
    store: Arc<dyn Store>,
}

impl LikeService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Toggle the caller's like on one target. One designated identifier and
    /// one kind per call.
    pub async fn toggle(
        &self,
        user_id: ObjectId,
        target: LikeTarget,
        target_id: ObjectId,
    ) -> AppResult<ToggleOutcome> {
        toggle_association(self.store.as_ref(), user_id, target.kind(), target_id).await
    }

    /// The caller's liked videos, most recently liked first. Likes whose
    /// video has since been deleted are skipped.
    pub async fn liked_videos(&self, user_id: ObjectId) -> AppResult<Vec<Video>> {
        let likes = self
            .store
            .list_associations_by_subject(user_id, AssocKind::VideoLike)
            .await?;
        let ids: Vec<ObjectId> = likes.iter().map(|like| like.object_id).collect();

        let videos = self.store.get_videos_by_ids(&ids).await?;
        let mut by_id: HashMap<ObjectId, Video> =
            videos.into_iter().map(|v| (v.id, v)).collect();

        // Preserve like order, not storage order
        Ok(ids.iter().filter_map(|id| by_id.remove(id)).collect())
    }
}
