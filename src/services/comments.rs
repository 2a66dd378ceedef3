use crate::core::{current_time_millis, IdGenerator, ObjectId};
use crate::error::{AppError, AppResult};
use crate::infrastructure::Store;
use crate::models::{Comment, Page, PageRequest};
use crate::services::non_blank;
use std::sync::Arc;

#[derive(Clone)]
pub struct CommentService {
    store: Arc<dyn Store>,
    ids: Arc<IdGenerator>,
}

impl CommentService {
    pub fn new(store: Arc<dyn Store>, ids: Arc<IdGenerator>) -> Self {
        Self { store, ids }
    }

    pub async fn add(
        &self,
        owner_id: ObjectId,
        video_id: ObjectId,
        content: &str,
    ) -> AppResult<Comment> {
        let content = non_blank(content, "content")?;

        let now = current_time_millis();
        let comment = Comment {
            id: self.ids.next_id(),
            video_id,
            owner_id,
            content,
            created_at: now,
            updated_at: now,
        };
        self.store.insert_comment(&comment).await?;
        Ok(comment)
    }

    pub async fn update(&self, id: ObjectId, content: &str) -> AppResult<Comment> {
        let content = non_blank(content, "content")?;
        self.store
            .update_comment_content(id, &content)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("comment {} not found", id)))
    }

    pub async fn delete(&self, id: ObjectId) -> AppResult<()> {
        if !self.store.delete_comment(id).await? {
            return Err(AppError::NotFound(format!("comment {} not found", id)));
        }
        Ok(())
    }

    /// Comments on a video, newest first.
    pub async fn list_for_video(
        &self,
        video_id: ObjectId,
        page: PageRequest,
    ) -> AppResult<Page<Comment>> {
        let (items, total_count) = futures::try_join!(
            self.store
                .list_comments_by_video(video_id, page.offset(), page.limit()),
            self.store.count_comments_by_video(video_id),
        )?;
        Ok(Page::assemble(items, total_count, page))
    }
}
