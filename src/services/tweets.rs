use crate::core::{current_time_millis, IdGenerator, ObjectId};
use crate::error::{AppError, AppResult};
use crate::infrastructure::Store;
use crate::models::Tweet;
use crate::services::non_blank;
use std::sync::Arc;

#[derive(Clone)]
pub struct TweetService {
    store: Arc<dyn Store>,
    ids: Arc<IdGenerator>,
}

impl TweetService {
    pub fn new(store: Arc<dyn Store>, ids: Arc<IdGenerator>) -> Self {
        Self { store, ids }
    }

    pub async fn create(&self, owner_id: ObjectId, content: &str) -> AppResult<Tweet> {
        let content = non_blank(content, "content")?;

        let now = current_time_millis();
        let tweet = Tweet {
            id: self.ids.next_id(),
            owner_id,
            content,
            created_at: now,
            updated_at: now,
        };
        self.store.insert_tweet(&tweet).await?;
        Ok(tweet)
    }

    /// A user's tweets, newest first.
    pub async fn list_by_user(&self, user_id: ObjectId) -> AppResult<Vec<Tweet>> {
        self.store.list_tweets_by_owner(user_id).await
    }

    pub async fn update(&self, id: ObjectId, content: &str) -> AppResult<Tweet> {
        let content = non_blank(content, "content")?;
        self.store
            .update_tweet_content(id, &content)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("tweet {} not found", id)))
    }

    pub async fn delete(&self, id: ObjectId) -> AppResult<()> {
        if !self.store.delete_tweet(id).await? {
            return Err(AppError::NotFound(format!("tweet {} not found", id)));
        }
        Ok(())
    }
}
