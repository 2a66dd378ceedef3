use crate::core::ObjectId;
use crate::error::AppResult;
use crate::infrastructure::Store;
use crate::models::{
    AssocKind, Page, PageRequest, Video, VideoFilter, VideoSort, LIKE_KINDS,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelStats {
    pub total_videos: u64,
    pub total_views: i64,
    pub total_subscribers: u64,
    pub total_likes: u64,
}

#[derive(Clone)]
pub struct DashboardService {
    store: Arc<dyn Store>,
}

impl DashboardService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Channel stats. The four sub-queries are independent and run
    /// concurrently; each reflects storage state at the moment it was read.
    /// A channel with no data yields zeros, never an error.
    pub async fn stats(&self, channel_id: ObjectId) -> AppResult<ChannelStats> {
        let filter = VideoFilter {
            owner_id: Some(channel_id),
            title_query: None,
        };

        let (total_videos, total_views, total_subscribers, total_likes) = futures::try_join!(
            self.store.count_videos(&filter),
            self.store.sum_video_views(channel_id),
            self.store
                .count_associations_by_object(channel_id, &[AssocKind::Subscription]),
            self.store
                .count_associations_by_object(channel_id, &LIKE_KINDS),
        )?;

        Ok(ChannelStats {
            total_videos,
            total_views,
            total_subscribers,
            total_likes,
        })
    }

    /// The channel's videos, newest first.
    pub async fn channel_videos(
        &self,
        channel_id: ObjectId,
        page: PageRequest,
    ) -> AppResult<Page<Video>> {
        let filter = VideoFilter {
            owner_id: Some(channel_id),
            title_query: None,
        };
        let sort = VideoSort::default();

        let (items, total_count) = futures::try_join!(
            self.store
                .list_videos(&filter, sort, page.offset(), page.limit()),
            self.store.count_videos(&filter),
        )?;
        Ok(Page::assemble(items, total_count, page))
    }
}
