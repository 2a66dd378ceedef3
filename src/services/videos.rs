use crate::core::{current_time_millis, IdGenerator, ObjectId};
use crate::error::{AppError, AppResult};
use crate::infrastructure::Store;
use crate::models::{Page, PageRequest, Video, VideoChanges, VideoFilter, VideoSort};
use crate::services::non_blank;
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Clone, Deserialize)]
pub struct NewVideo {
    pub title: String,
    pub description: String,
    pub video_url: String,
    pub thumbnail_url: String,
}

#[derive(Clone)]
pub struct VideoService {
    store: Arc<dyn Store>,
    ids: Arc<IdGenerator>,
}

impl VideoService {
    pub fn new(store: Arc<dyn Store>, ids: Arc<IdGenerator>) -> Self {
        Self { store, ids }
    }

    /// Publish a video. Upload handling happens upstream; the media URLs
    /// arrive already resolved.
    pub async fn publish(&self, owner_id: ObjectId, new: NewVideo) -> AppResult<Video> {
        let title = non_blank(&new.title, "title")?;
        let description = non_blank(&new.description, "description")?;
        let video_url = non_blank(&new.video_url, "video_url")?;
        let thumbnail_url = non_blank(&new.thumbnail_url, "thumbnail_url")?;

        let now = current_time_millis();
        let video = Video {
            id: self.ids.next_id(),
            owner_id,
            title,
            description,
            video_url,
            thumbnail_url,
            views: 0,
            is_published: true,
            created_at: now,
            updated_at: now,
        };
        self.store.insert_video(&video).await?;
        tracing::info!("video {} published by {}", video.id, owner_id);
        Ok(video)
    }

    pub async fn get(&self, id: ObjectId) -> AppResult<Video> {
        self.store
            .get_video(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("video {} not found", id)))
    }

    pub async fn update(&self, id: ObjectId, changes: VideoChanges) -> AppResult<Video> {
        if changes.is_empty() {
            return Err(AppError::InvalidArgument(
                "no fields to update".to_string(),
            ));
        }
        let changes = VideoChanges {
            title: changes
                .title
                .map(|t| non_blank(&t, "title"))
                .transpose()?,
            description: changes
                .description
                .map(|d| non_blank(&d, "description"))
                .transpose()?,
            thumbnail_url: changes
                .thumbnail_url
                .map(|t| non_blank(&t, "thumbnail_url"))
                .transpose()?,
        };

        self.store
            .update_video(id, &changes)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("video {} not found", id)))
    }

    pub async fn delete(&self, id: ObjectId) -> AppResult<()> {
        if !self.store.delete_video(id).await? {
            return Err(AppError::NotFound(format!("video {} not found", id)));
        }
        tracing::info!("video {} deleted", id);
        Ok(())
    }

    /// Atomically flip the publish state and return the post-condition row.
    pub async fn toggle_publish(&self, id: ObjectId) -> AppResult<Video> {
        self.store
            .toggle_video_publish(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("video {} not found", id)))
    }

    /// Paginated listing. The total count is computed over the same filter
    /// before pagination; a page past the end is empty, not an error.
    pub async fn list(
        &self,
        filter: VideoFilter,
        sort: VideoSort,
        page: PageRequest,
    ) -> AppResult<Page<Video>> {
        let (items, total_count) = futures::try_join!(
            self.store
                .list_videos(&filter, sort, page.offset(), page.limit()),
            self.store.count_videos(&filter),
        )?;
        Ok(Page::assemble(items, total_count, page))
    }
}
