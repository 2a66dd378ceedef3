// In-memory Store backend, used by the test suites and selectable with
// DATABASE_URL=memory: for local development. Conditional operations run
// under a single write lock, which gives them the same atomicity the
// association primary key gives the Postgres backend.

use crate::core::{current_time_millis, ObjectId};
use crate::error::AppResult;
use crate::models::{
    AssocKind, Association, Comment, Playlist, SortDirection, Tweet, Video, VideoChanges,
    VideoFilter, VideoSort, VideoSortField,
};
use async_trait::async_trait;
use std::cmp::Ordering;
use std::collections::HashMap;
use tokio::sync::RwLock;

#[derive(Default)]
struct Inner {
    videos: HashMap<i64, Video>,
    comments: HashMap<i64, Comment>,
    playlists: HashMap<i64, Playlist>,
    tweets: HashMap<i64, Tweet>,
    /// (subject_id, kind, object_id) -> created_at
    associations: HashMap<(i64, AssocKind, i64), i64>,
}

#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn matches_filter(video: &Video, filter: &VideoFilter) -> bool {
    if let Some(owner_id) = filter.owner_id {
        if video.owner_id != owner_id {
            return false;
        }
    }
    if let Some(ref query) = filter.title_query {
        if !video
            .title
            .to_lowercase()
            .contains(&query.to_lowercase())
        {
            return false;
        }
    }
    true
}

fn compare_videos(a: &Video, b: &Video, sort: VideoSort) -> Ordering {
    let primary = match sort.field {
        VideoSortField::CreatedAt => a.created_at.cmp(&b.created_at),
        VideoSortField::Views => a.views.cmp(&b.views),
        VideoSortField::Title => a.title.cmp(&b.title),
    };
    let primary = match sort.direction {
        SortDirection::Asc => primary,
        SortDirection::Desc => primary.reverse(),
    };
    // Stable tiebreak, matching the SQL backend's "id DESC"
    primary.then(b.id.cmp(&a.id))
}

fn newest_first<T, K: Fn(&T) -> (i64, i64)>(items: &mut [T], key: K) {
    items.sort_by(|a, b| {
        let (at, aid) = key(a);
        let (bt, bid) = key(b);
        bt.cmp(&at).then(bid.cmp(&aid))
    });
}

fn page<T>(items: Vec<T>, offset: u64, limit: u32) -> Vec<T> {
    items
        .into_iter()
        .skip(offset as usize)
        .take(limit as usize)
        .collect()
}

#[async_trait]
impl super::Store for MemoryStore {
    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }

    async fn insert_video(&self, video: &Video) -> AppResult<()> {
        let mut inner = self.inner.write().await;
        inner.videos.insert(video.id.as_i64(), video.clone());
        Ok(())
    }

    async fn get_video(&self, id: ObjectId) -> AppResult<Option<Video>> {
        let inner = self.inner.read().await;
        Ok(inner.videos.get(&id.as_i64()).cloned())
    }

    async fn get_videos_by_ids(&self, ids: &[ObjectId]) -> AppResult<Vec<Video>> {
        let inner = self.inner.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| inner.videos.get(&id.as_i64()).cloned())
            .collect())
    }

    async fn update_video(
        &self,
        id: ObjectId,
        changes: &VideoChanges,
    ) -> AppResult<Option<Video>> {
        let mut inner = self.inner.write().await;
        let Some(video) = inner.videos.get_mut(&id.as_i64()) else {
            return Ok(None);
        };
        if let Some(ref title) = changes.title {
            video.title = title.clone();
        }
        if let Some(ref description) = changes.description {
            video.description = description.clone();
        }
        if let Some(ref thumbnail_url) = changes.thumbnail_url {
            video.thumbnail_url = thumbnail_url.clone();
        }
        video.updated_at = current_time_millis();
        Ok(Some(video.clone()))
    }

    async fn delete_video(&self, id: ObjectId) -> AppResult<bool> {
        let mut inner = self.inner.write().await;
        Ok(inner.videos.remove(&id.as_i64()).is_some())
    }

    async fn toggle_video_publish(&self, id: ObjectId) -> AppResult<Option<Video>> {
        let mut inner = self.inner.write().await;
        let Some(video) = inner.videos.get_mut(&id.as_i64()) else {
            return Ok(None);
        };
        video.is_published = !video.is_published;
        video.updated_at = current_time_millis();
        Ok(Some(video.clone()))
    }

    async fn list_videos(
        &self,
        filter: &VideoFilter,
        sort: VideoSort,
        offset: u64,
        limit: u32,
    ) -> AppResult<Vec<Video>> {
        let inner = self.inner.read().await;
        let mut matching: Vec<Video> = inner
            .videos
            .values()
            .filter(|v| matches_filter(v, filter))
            .cloned()
            .collect();
        matching.sort_by(|a, b| compare_videos(a, b, sort));
        Ok(page(matching, offset, limit))
    }

    async fn count_videos(&self, filter: &VideoFilter) -> AppResult<u64> {
        let inner = self.inner.read().await;
        Ok(inner
            .videos
            .values()
            .filter(|v| matches_filter(v, filter))
            .count() as u64)
    }

    async fn sum_video_views(&self, owner_id: ObjectId) -> AppResult<i64> {
        let inner = self.inner.read().await;
        Ok(inner
            .videos
            .values()
            .filter(|v| v.owner_id == owner_id)
            .map(|v| v.views)
            .sum())
    }

    async fn insert_comment(&self, comment: &Comment) -> AppResult<()> {
        let mut inner = self.inner.write().await;
        inner.comments.insert(comment.id.as_i64(), comment.clone());
        Ok(())
    }

    async fn update_comment_content(
        &self,
        id: ObjectId,
        content: &str,
    ) -> AppResult<Option<Comment>> {
        let mut inner = self.inner.write().await;
        let Some(comment) = inner.comments.get_mut(&id.as_i64()) else {
            return Ok(None);
        };
        comment.content = content.to_string();
        comment.updated_at = current_time_millis();
        Ok(Some(comment.clone()))
    }

    async fn delete_comment(&self, id: ObjectId) -> AppResult<bool> {
        let mut inner = self.inner.write().await;
        Ok(inner.comments.remove(&id.as_i64()).is_some())
    }

    async fn list_comments_by_video(
        &self,
        video_id: ObjectId,
        offset: u64,
        limit: u32,
    ) -> AppResult<Vec<Comment>> {
        let inner = self.inner.read().await;
        let mut matching: Vec<Comment> = inner
            .comments
            .values()
            .filter(|c| c.video_id == video_id)
            .cloned()
            .collect();
        newest_first(&mut matching, |c| (c.created_at, c.id.as_i64()));
        Ok(page(matching, offset, limit))
    }

    async fn count_comments_by_video(&self, video_id: ObjectId) -> AppResult<u64> {
        let inner = self.inner.read().await;
        Ok(inner
            .comments
            .values()
            .filter(|c| c.video_id == video_id)
            .count() as u64)
    }

    async fn insert_playlist(&self, playlist: &Playlist) -> AppResult<()> {
        let mut inner = self.inner.write().await;
        inner
            .playlists
            .insert(playlist.id.as_i64(), playlist.clone());
        Ok(())
    }

    async fn get_playlist(&self, id: ObjectId) -> AppResult<Option<Playlist>> {
        let inner = self.inner.read().await;
        Ok(inner.playlists.get(&id.as_i64()).cloned())
    }

    async fn update_playlist(
        &self,
        id: ObjectId,
        name: &str,
        description: &str,
    ) -> AppResult<Option<Playlist>> {
        let mut inner = self.inner.write().await;
        let Some(playlist) = inner.playlists.get_mut(&id.as_i64()) else {
            return Ok(None);
        };
        playlist.name = name.to_string();
        playlist.description = description.to_string();
        playlist.updated_at = current_time_millis();
        Ok(Some(playlist.clone()))
    }

    async fn delete_playlist(&self, id: ObjectId) -> AppResult<bool> {
        let mut inner = self.inner.write().await;
        Ok(inner.playlists.remove(&id.as_i64()).is_some())
    }

    async fn list_playlists_by_owner(
        &self,
        owner_id: ObjectId,
        offset: u64,
        limit: u32,
    ) -> AppResult<Vec<Playlist>> {
        let inner = self.inner.read().await;
        let mut matching: Vec<Playlist> = inner
            .playlists
            .values()
            .filter(|p| p.owner_id == owner_id)
            .cloned()
            .collect();
        newest_first(&mut matching, |p| (p.created_at, p.id.as_i64()));
        Ok(page(matching, offset, limit))
    }

    async fn count_playlists_by_owner(&self, owner_id: ObjectId) -> AppResult<u64> {
        let inner = self.inner.read().await;
        Ok(inner
            .playlists
            .values()
            .filter(|p| p.owner_id == owner_id)
            .count() as u64)
    }

    async fn insert_tweet(&self, tweet: &Tweet) -> AppResult<()> {
        let mut inner = self.inner.write().await;
        inner.tweets.insert(tweet.id.as_i64(), tweet.clone());
        Ok(())
    }

    async fn update_tweet_content(
        &self,
        id: ObjectId,
        content: &str,
    ) -> AppResult<Option<Tweet>> {
        let mut inner = self.inner.write().await;
        let Some(tweet) = inner.tweets.get_mut(&id.as_i64()) else {
            return Ok(None);
        };
        tweet.content = content.to_string();
        tweet.updated_at = current_time_millis();
        Ok(Some(tweet.clone()))
    }

    async fn delete_tweet(&self, id: ObjectId) -> AppResult<bool> {
        let mut inner = self.inner.write().await;
        Ok(inner.tweets.remove(&id.as_i64()).is_some())
    }

    async fn list_tweets_by_owner(&self, owner_id: ObjectId) -> AppResult<Vec<Tweet>> {
        let inner = self.inner.read().await;
        let mut matching: Vec<Tweet> = inner
            .tweets
            .values()
            .filter(|t| t.owner_id == owner_id)
            .cloned()
            .collect();
        newest_first(&mut matching, |t| (t.created_at, t.id.as_i64()));
        Ok(matching)
    }

    async fn insert_association_if_absent(&self, assoc: &Association) -> AppResult<bool> {
        let mut inner = self.inner.write().await;
        let key = (
            assoc.subject_id.as_i64(),
            assoc.kind,
            assoc.object_id.as_i64(),
        );
        if inner.associations.contains_key(&key) {
            return Ok(false);
        }
        inner.associations.insert(key, assoc.created_at);
        Ok(true)
    }

    async fn delete_association(
        &self,
        subject_id: ObjectId,
        kind: AssocKind,
        object_id: ObjectId,
    ) -> AppResult<bool> {
        let mut inner = self.inner.write().await;
        let key = (subject_id.as_i64(), kind, object_id.as_i64());
        Ok(inner.associations.remove(&key).is_some())
    }

    async fn association_exists(
        &self,
        subject_id: ObjectId,
        kind: AssocKind,
        object_id: ObjectId,
    ) -> AppResult<bool> {
        let inner = self.inner.read().await;
        let key = (subject_id.as_i64(), kind, object_id.as_i64());
        Ok(inner.associations.contains_key(&key))
    }

    async fn list_associations_by_subject(
        &self,
        subject_id: ObjectId,
        kind: AssocKind,
    ) -> AppResult<Vec<Association>> {
        let inner = self.inner.read().await;
        let mut matching: Vec<Association> = inner
            .associations
            .iter()
            .filter(|((subject, k, _), _)| *subject == subject_id.as_i64() && *k == kind)
            .map(|((subject, k, object), created_at)| Association {
                subject_id: ObjectId::from(*subject),
                kind: *k,
                object_id: ObjectId::from(*object),
                created_at: *created_at,
            })
            .collect();
        newest_first(&mut matching, |a| (a.created_at, a.object_id.as_i64()));
        Ok(matching)
    }

    async fn list_associations_by_object(
        &self,
        object_id: ObjectId,
        kind: AssocKind,
    ) -> AppResult<Vec<Association>> {
        let inner = self.inner.read().await;
        let mut matching: Vec<Association> = inner
            .associations
            .iter()
            .filter(|((_, k, object), _)| *object == object_id.as_i64() && *k == kind)
            .map(|((subject, k, object), created_at)| Association {
                subject_id: ObjectId::from(*subject),
                kind: *k,
                object_id: ObjectId::from(*object),
                created_at: *created_at,
            })
            .collect();
        newest_first(&mut matching, |a| (a.created_at, a.subject_id.as_i64()));
        Ok(matching)
    }

    async fn count_associations_by_object(
        &self,
        object_id: ObjectId,
        kinds: &[AssocKind],
    ) -> AppResult<u64> {
        let inner = self.inner.read().await;
        Ok(inner
            .associations
            .keys()
            .filter(|(_, k, object)| *object == object_id.as_i64() && kinds.contains(k))
            .count() as u64)
    }

    async fn delete_associations_by_subject(
        &self,
        subject_id: ObjectId,
        kind: AssocKind,
    ) -> AppResult<u64> {
        let mut inner = self.inner.write().await;
        let before = inner.associations.len();
        inner
            .associations
            .retain(|(subject, k, _), _| !(*subject == subject_id.as_i64() && *k == kind));
        Ok((before - inner.associations.len()) as u64)
    }
}
