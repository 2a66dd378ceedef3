use crate::config::Config;
use crate::core::IdGenerator;
use crate::infrastructure::{MemoryStore, PostgresStore, Store};
use crate::services::{
    CommentService, DashboardService, LikeService, PlaylistService, SubscriptionService,
    TweetService, VideoService,
};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub store: Arc<dyn Store>,
    pub videos: VideoService,
    pub comments: CommentService,
    pub playlists: PlaylistService,
    pub tweets: TweetService,
    pub likes: LikeService,
    pub subscriptions: SubscriptionService,
    pub dashboard: DashboardService,
}

impl AppState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        // "memory:" selects the in-memory backend for local runs and tests
        let store: Arc<dyn Store> = if config.database.url.starts_with("memory:") {
            Arc::new(MemoryStore::new())
        } else {
            let store = PostgresStore::connect(&config.database).await?;
            store.init().await?;
            Arc::new(store)
        };
        let ids = Arc::new(IdGenerator::new(config.server.shard_id));

        Ok(Self::with_store(config, store, ids))
    }

    pub fn with_store(config: Config, store: Arc<dyn Store>, ids: Arc<IdGenerator>) -> Self {
        Self {
            config,
            videos: VideoService::new(store.clone(), ids.clone()),
            comments: CommentService::new(store.clone(), ids.clone()),
            playlists: PlaylistService::new(store.clone(), ids.clone()),
            tweets: TweetService::new(store.clone(), ids),
            likes: LikeService::new(store.clone()),
            subscriptions: SubscriptionService::new(store.clone()),
            dashboard: DashboardService::new(store.clone()),
            store,
        }
    }
}
