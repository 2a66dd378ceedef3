// Store - low-level storage operations behind a backend-neutral trait
// This layer turns entity and association operations into SQL queries

use crate::config::DatabaseConfig;
use crate::core::{current_time_millis, ObjectId};
use crate::error::{AppError, AppResult};
use crate::models::{
    AssocKind, Association, Comment, Playlist, Tweet, Video, VideoChanges, VideoFilter, VideoSort,
};
use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::Row;

/// Storage interface consumed by the services. The operation shapes are the
/// ones a document store offers - equality/substring filters, sort,
/// skip/limit, count, conditional insert, conditional delete, update-by-id,
/// and group+sum - so nothing above this trait depends on a particular
/// backend.
///
/// Conditional operations report whether they changed anything; the
/// association tuple `(subject_id, kind, object_id)` is unique at the storage
/// layer, which is what makes the toggle operation race-free.
#[async_trait]
pub trait Store: Send + Sync {
    /// Connectivity check for the health endpoint.
    async fn ping(&self) -> AppResult<()>;

    // Video operations
    async fn insert_video(&self, video: &Video) -> AppResult<()>;
    async fn get_video(&self, id: ObjectId) -> AppResult<Option<Video>>;
    async fn get_videos_by_ids(&self, ids: &[ObjectId]) -> AppResult<Vec<Video>>;
    async fn update_video(&self, id: ObjectId, changes: &VideoChanges)
        -> AppResult<Option<Video>>;
    async fn delete_video(&self, id: ObjectId) -> AppResult<bool>;
    /// Atomic publish-state flip; returns the post-condition row.
    async fn toggle_video_publish(&self, id: ObjectId) -> AppResult<Option<Video>>;
    async fn list_videos(
        &self,
        filter: &VideoFilter,
        sort: VideoSort,
        offset: u64,
        limit: u32,
    ) -> AppResult<Vec<Video>>;
    async fn count_videos(&self, filter: &VideoFilter) -> AppResult<u64>;
    /// Sum of the views column over one owner's videos; 0 when there are none.
    async fn sum_video_views(&self, owner_id: ObjectId) -> AppResult<i64>;

    // Comment operations
    async fn insert_comment(&self, comment: &Comment) -> AppResult<()>;
    async fn update_comment_content(
        &self,
        id: ObjectId,
        content: &str,
    ) -> AppResult<Option<Comment>>;
    async fn delete_comment(&self, id: ObjectId) -> AppResult<bool>;
    async fn list_comments_by_video(
        &self,
        video_id: ObjectId,
        offset: u64,
        limit: u32,
    ) -> AppResult<Vec<Comment>>;
    async fn count_comments_by_video(&self, video_id: ObjectId) -> AppResult<u64>;

    // Playlist operations
    async fn insert_playlist(&self, playlist: &Playlist) -> AppResult<()>;
    async fn get_playlist(&self, id: ObjectId) -> AppResult<Option<Playlist>>;
    async fn update_playlist(
        &self,
        id: ObjectId,
        name: &str,
        description: &str,
    ) -> AppResult<Option<Playlist>>;
    async fn delete_playlist(&self, id: ObjectId) -> AppResult<bool>;
    async fn list_playlists_by_owner(
        &self,
        owner_id: ObjectId,
        offset: u64,
        limit: u32,
    ) -> AppResult<Vec<Playlist>>;
    async fn count_playlists_by_owner(&self, owner_id: ObjectId) -> AppResult<u64>;

    // Tweet operations
    async fn insert_tweet(&self, tweet: &Tweet) -> AppResult<()>;
    async fn update_tweet_content(&self, id: ObjectId, content: &str)
        -> AppResult<Option<Tweet>>;
    async fn delete_tweet(&self, id: ObjectId) -> AppResult<bool>;
    async fn list_tweets_by_owner(&self, owner_id: ObjectId) -> AppResult<Vec<Tweet>>;

    // Association operations
    /// Conditional insert: true if the record was created, false if the
    /// tuple already existed.
    async fn insert_association_if_absent(&self, assoc: &Association) -> AppResult<bool>;
    /// Conditional delete: true if a record was removed.
    async fn delete_association(
        &self,
        subject_id: ObjectId,
        kind: AssocKind,
        object_id: ObjectId,
    ) -> AppResult<bool>;
    async fn association_exists(
        &self,
        subject_id: ObjectId,
        kind: AssocKind,
        object_id: ObjectId,
    ) -> AppResult<bool>;
    /// Records with the given subject and kind, newest first.
    async fn list_associations_by_subject(
        &self,
        subject_id: ObjectId,
        kind: AssocKind,
    ) -> AppResult<Vec<Association>>;
    /// Records with the given object and kind, newest first.
    async fn list_associations_by_object(
        &self,
        object_id: ObjectId,
        kind: AssocKind,
    ) -> AppResult<Vec<Association>>;
    async fn count_associations_by_object(
        &self,
        object_id: ObjectId,
        kinds: &[AssocKind],
    ) -> AppResult<u64>;
    /// Bulk cleanup used when a subject entity is deleted.
    async fn delete_associations_by_subject(
        &self,
        subject_id: ObjectId,
        kind: AssocKind,
    ) -> AppResult<u64>;
}

/// Classify storage failures: connectivity and timeout problems are
/// retryable/reportable `StorageUnavailable`, everything else is `Database`.
fn storage_err(context: &str, err: sqlx::Error) -> AppError {
    match &err {
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
            AppError::StorageUnavailable(format!("{}: {}", context, err))
        }
        _ => AppError::Database(format!("{}: {}", context, err)),
    }
}

/// Escape LIKE metacharacters so a caller-supplied search string is always a
/// literal substring match.
fn escape_like(s: &str) -> String {
    s.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_")
}

const VIDEO_COLUMNS: &str = "id, owner_id, title, description, video_url, thumbnail_url, views, \
                             is_published, created_at, updated_at";
const COMMENT_COLUMNS: &str = "id, video_id, owner_id, content, created_at, updated_at";
const PLAYLIST_COLUMNS: &str = "id, owner_id, name, description, created_at, updated_at";
const TWEET_COLUMNS: &str = "id, owner_id, content, created_at, updated_at";

fn video_from_row(row: &PgRow) -> Video {
    Video {
        id: ObjectId::from(row.get::<i64, _>("id")),
        owner_id: ObjectId::from(row.get::<i64, _>("owner_id")),
        title: row.get("title"),
        description: row.get("description"),
        video_url: row.get("video_url"),
        thumbnail_url: row.get("thumbnail_url"),
        views: row.get("views"),
        is_published: row.get("is_published"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

fn comment_from_row(row: &PgRow) -> Comment {
    Comment {
        id: ObjectId::from(row.get::<i64, _>("id")),
        video_id: ObjectId::from(row.get::<i64, _>("video_id")),
        owner_id: ObjectId::from(row.get::<i64, _>("owner_id")),
        content: row.get("content"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

fn playlist_from_row(row: &PgRow) -> Playlist {
    Playlist {
        id: ObjectId::from(row.get::<i64, _>("id")),
        owner_id: ObjectId::from(row.get::<i64, _>("owner_id")),
        name: row.get("name"),
        description: row.get("description"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

fn tweet_from_row(row: &PgRow) -> Tweet {
    Tweet {
        id: ObjectId::from(row.get::<i64, _>("id")),
        owner_id: ObjectId::from(row.get::<i64, _>("owner_id")),
        content: row.get("content"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

fn assoc_from_row(row: &PgRow) -> AppResult<Association> {
    Ok(Association {
        subject_id: ObjectId::from(row.get::<i64, _>("subject_id")),
        kind: AssocKind::parse(row.get::<String, _>("kind").as_str())
            .map_err(|e| AppError::Database(format!("unexpected kind in storage: {}", e)))?,
        object_id: ObjectId::from(row.get::<i64, _>("object_id")),
        created_at: row.get("created_at"),
    })
}

/// PostgreSQL implementation of the storage interface.
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect with a configured pool.
    pub async fn connect(config: &DatabaseConfig) -> AppResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(std::time::Duration::from_secs(config.acquire_timeout_secs))
            .connect(&config.url)
            .await
            .map_err(|e| {
                AppError::StorageUnavailable(format!(
                    "Failed to connect to database at {}: {}",
                    config.url, e
                ))
            })?;

        Ok(Self::new(pool))
    }

    /// Create tables and indexes. The association primary key is the
    /// uniqueness invariant the toggle operation relies on.
    pub async fn init(&self) -> AppResult<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS videos (
                id BIGINT PRIMARY KEY,
                owner_id BIGINT NOT NULL,
                title TEXT NOT NULL,
                description TEXT NOT NULL,
                video_url TEXT NOT NULL,
                thumbnail_url TEXT NOT NULL,
                views BIGINT NOT NULL DEFAULT 0,
                is_published BOOLEAN NOT NULL DEFAULT TRUE,
                created_at BIGINT NOT NULL,
                updated_at BIGINT NOT NULL
            )
        "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| storage_err("Failed to create videos table", e))?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS comments (
                id BIGINT PRIMARY KEY,
                video_id BIGINT NOT NULL,
                owner_id BIGINT NOT NULL,
                content TEXT NOT NULL,
                created_at BIGINT NOT NULL,
                updated_at BIGINT NOT NULL
            )
        "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| storage_err("Failed to create comments table", e))?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS playlists (
                id BIGINT PRIMARY KEY,
                owner_id BIGINT NOT NULL,
                name TEXT NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                created_at BIGINT NOT NULL,
                updated_at BIGINT NOT NULL
            )
        "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| storage_err("Failed to create playlists table", e))?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS tweets (
                id BIGINT PRIMARY KEY,
                owner_id BIGINT NOT NULL,
                content TEXT NOT NULL,
                created_at BIGINT NOT NULL,
                updated_at BIGINT NOT NULL
            )
        "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| storage_err("Failed to create tweets table", e))?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS associations (
                subject_id BIGINT NOT NULL,
                kind VARCHAR(32) NOT NULL,
                object_id BIGINT NOT NULL,
                created_at BIGINT NOT NULL,
                PRIMARY KEY (subject_id, kind, object_id)
            )
        "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| storage_err("Failed to create associations table", e))?;

        for index in [
            "CREATE INDEX IF NOT EXISTS idx_videos_owner ON videos(owner_id, created_at)",
            "CREATE INDEX IF NOT EXISTS idx_videos_created ON videos(created_at)",
            "CREATE INDEX IF NOT EXISTS idx_comments_video ON comments(video_id, created_at)",
            "CREATE INDEX IF NOT EXISTS idx_playlists_owner ON playlists(owner_id, created_at)",
            "CREATE INDEX IF NOT EXISTS idx_tweets_owner ON tweets(owner_id, created_at)",
            "CREATE INDEX IF NOT EXISTS idx_assoc_object ON associations(object_id, kind)",
        ] {
            sqlx::query(index)
                .execute(&self.pool)
                .await
                .map_err(|e| storage_err("Failed to create index", e))?;
        }

        tracing::info!("storage tables initialized");
        Ok(())
    }
}

#[async_trait]
impl Store for PostgresStore {
    async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| storage_err("Database health check failed", e))?;
        Ok(())
    }

    async fn insert_video(&self, video: &Video) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO videos (id, owner_id, title, description, video_url, thumbnail_url, \
             views, is_published, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
        )
        .bind(video.id.as_i64())
        .bind(video.owner_id.as_i64())
        .bind(&video.title)
        .bind(&video.description)
        .bind(&video.video_url)
        .bind(&video.thumbnail_url)
        .bind(video.views)
        .bind(video.is_published)
        .bind(video.created_at)
        .bind(video.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| storage_err("Failed to insert video", e))?;

        Ok(())
    }

    async fn get_video(&self, id: ObjectId) -> AppResult<Option<Video>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM videos WHERE id = $1",
            VIDEO_COLUMNS
        ))
        .bind(id.as_i64())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| storage_err("Failed to get video", e))?;

        Ok(row.map(|row| video_from_row(&row)))
    }

    async fn get_videos_by_ids(&self, ids: &[ObjectId]) -> AppResult<Vec<Video>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let raw_ids: Vec<i64> = ids.iter().map(|id| id.as_i64()).collect();

        let rows = sqlx::query(&format!(
            "SELECT {} FROM videos WHERE id = ANY($1)",
            VIDEO_COLUMNS
        ))
        .bind(&raw_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| storage_err("Failed to get videos", e))?;

        Ok(rows.iter().map(video_from_row).collect())
    }

    async fn update_video(
        &self,
        id: ObjectId,
        changes: &VideoChanges,
    ) -> AppResult<Option<Video>> {
        let now = current_time_millis();
        let row = sqlx::query(&format!(
            "UPDATE videos SET title = COALESCE($2, title), \
             description = COALESCE($3, description), \
             thumbnail_url = COALESCE($4, thumbnail_url), \
             updated_at = $5 WHERE id = $1 RETURNING {}",
            VIDEO_COLUMNS
        ))
        .bind(id.as_i64())
        .bind(changes.title.as_deref())
        .bind(changes.description.as_deref())
        .bind(changes.thumbnail_url.as_deref())
        .bind(now)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| storage_err("Failed to update video", e))?;

        Ok(row.map(|row| video_from_row(&row)))
    }

    async fn delete_video(&self, id: ObjectId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM videos WHERE id = $1")
            .bind(id.as_i64())
            .execute(&self.pool)
            .await
            .map_err(|e| storage_err("Failed to delete video", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn toggle_video_publish(&self, id: ObjectId) -> AppResult<Option<Video>> {
        let now = current_time_millis();
        let row = sqlx::query(&format!(
            "UPDATE videos SET is_published = NOT is_published, updated_at = $2 \
             WHERE id = $1 RETURNING {}",
            VIDEO_COLUMNS
        ))
        .bind(id.as_i64())
        .bind(now)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| storage_err("Failed to toggle video publish state", e))?;

        Ok(row.map(|row| video_from_row(&row)))
    }

    async fn list_videos(
        &self,
        filter: &VideoFilter,
        sort: VideoSort,
        offset: u64,
        limit: u32,
    ) -> AppResult<Vec<Video>> {
        let mut sql = format!("SELECT {} FROM videos WHERE TRUE", VIDEO_COLUMNS);
        let mut param_index = 0;

        if filter.owner_id.is_some() {
            param_index += 1;
            sql.push_str(&format!(" AND owner_id = ${}", param_index));
        }
        if filter.title_query.is_some() {
            param_index += 1;
            sql.push_str(&format!(" AND title ILIKE ${}", param_index));
        }

        // Sort column and direction come from closed enums, never from the
        // caller's raw input. The id tiebreak keeps pages stable.
        sql.push_str(&format!(
            " ORDER BY {} {}, id DESC",
            sort.field.column(),
            sort.direction.as_sql()
        ));
        sql.push_str(&format!(
            " LIMIT ${} OFFSET ${}",
            param_index + 1,
            param_index + 2
        ));

        let mut query = sqlx::query(&sql);
        if let Some(owner_id) = filter.owner_id {
            query = query.bind(owner_id.as_i64());
        }
        if let Some(ref title_query) = filter.title_query {
            query = query.bind(format!("%{}%", escape_like(title_query)));
        }
        query = query.bind(limit as i64).bind(offset as i64);

        let rows = query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| storage_err("Failed to list videos", e))?;

        Ok(rows.iter().map(video_from_row).collect())
    }

    async fn count_videos(&self, filter: &VideoFilter) -> AppResult<u64> {
        let mut sql = String::from("SELECT COUNT(*) AS total FROM videos WHERE TRUE");
        let mut param_index = 0;

        if filter.owner_id.is_some() {
            param_index += 1;
            sql.push_str(&format!(" AND owner_id = ${}", param_index));
        }
        if filter.title_query.is_some() {
            param_index += 1;
            sql.push_str(&format!(" AND title ILIKE ${}", param_index));
        }

        let mut query = sqlx::query(&sql);
        if let Some(owner_id) = filter.owner_id {
            query = query.bind(owner_id.as_i64());
        }
        if let Some(ref title_query) = filter.title_query {
            query = query.bind(format!("%{}%", escape_like(title_query)));
        }

        let row = query
            .fetch_one(&self.pool)
            .await
            .map_err(|e| storage_err("Failed to count videos", e))?;

        Ok(row.get::<i64, _>("total") as u64)
    }

    async fn sum_video_views(&self, owner_id: ObjectId) -> AppResult<i64> {
        let row = sqlx::query(
            "SELECT COALESCE(SUM(views), 0)::BIGINT AS total_views \
             FROM videos WHERE owner_id = $1",
        )
        .bind(owner_id.as_i64())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| storage_err("Failed to sum video views", e))?;

        Ok(row.get("total_views"))
    }

    async fn insert_comment(&self, comment: &Comment) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO comments (id, video_id, owner_id, content, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(comment.id.as_i64())
        .bind(comment.video_id.as_i64())
        .bind(comment.owner_id.as_i64())
        .bind(&comment.content)
        .bind(comment.created_at)
        .bind(comment.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| storage_err("Failed to insert comment", e))?;

        Ok(())
    }

    async fn update_comment_content(
        &self,
        id: ObjectId,
        content: &str,
    ) -> AppResult<Option<Comment>> {
        let now = current_time_millis();
        let row = sqlx::query(&format!(
            "UPDATE comments SET content = $2, updated_at = $3 WHERE id = $1 RETURNING {}",
            COMMENT_COLUMNS
        ))
        .bind(id.as_i64())
        .bind(content)
        .bind(now)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| storage_err("Failed to update comment", e))?;

        Ok(row.map(|row| comment_from_row(&row)))
    }

    async fn delete_comment(&self, id: ObjectId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id.as_i64())
            .execute(&self.pool)
            .await
            .map_err(|e| storage_err("Failed to delete comment", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_comments_by_video(
        &self,
        video_id: ObjectId,
        offset: u64,
        limit: u32,
    ) -> AppResult<Vec<Comment>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM comments WHERE video_id = $1 \
             ORDER BY created_at DESC, id DESC LIMIT $2 OFFSET $3",
            COMMENT_COLUMNS
        ))
        .bind(video_id.as_i64())
        .bind(limit as i64)
        .bind(offset as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| storage_err("Failed to list comments", e))?;

        Ok(rows.iter().map(comment_from_row).collect())
    }

    async fn count_comments_by_video(&self, video_id: ObjectId) -> AppResult<u64> {
        let row = sqlx::query("SELECT COUNT(*) AS total FROM comments WHERE video_id = $1")
            .bind(video_id.as_i64())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| storage_err("Failed to count comments", e))?;

        Ok(row.get::<i64, _>("total") as u64)
    }

    async fn insert_playlist(&self, playlist: &Playlist) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO playlists (id, owner_id, name, description, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(playlist.id.as_i64())
        .bind(playlist.owner_id.as_i64())
        .bind(&playlist.name)
        .bind(&playlist.description)
        .bind(playlist.created_at)
        .bind(playlist.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| storage_err("Failed to insert playlist", e))?;

        Ok(())
    }

    async fn get_playlist(&self, id: ObjectId) -> AppResult<Option<Playlist>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM playlists WHERE id = $1",
            PLAYLIST_COLUMNS
        ))
        .bind(id.as_i64())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| storage_err("Failed to get playlist", e))?;

        Ok(row.map(|row| playlist_from_row(&row)))
    }

    async fn update_playlist(
        &self,
        id: ObjectId,
        name: &str,
        description: &str,
    ) -> AppResult<Option<Playlist>> {
        let now = current_time_millis();
        let row = sqlx::query(&format!(
            "UPDATE playlists SET name = $2, description = $3, updated_at = $4 \
             WHERE id = $1 RETURNING {}",
            PLAYLIST_COLUMNS
        ))
        .bind(id.as_i64())
        .bind(name)
        .bind(description)
        .bind(now)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| storage_err("Failed to update playlist", e))?;

        Ok(row.map(|row| playlist_from_row(&row)))
    }

    async fn delete_playlist(&self, id: ObjectId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM playlists WHERE id = $1")
            .bind(id.as_i64())
            .execute(&self.pool)
            .await
            .map_err(|e| storage_err("Failed to delete playlist", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_playlists_by_owner(
        &self,
        owner_id: ObjectId,
        offset: u64,
        limit: u32,
    ) -> AppResult<Vec<Playlist>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM playlists WHERE owner_id = $1 \
             ORDER BY created_at DESC, id DESC LIMIT $2 OFFSET $3",
            PLAYLIST_COLUMNS
        ))
        .bind(owner_id.as_i64())
        .bind(limit as i64)
        .bind(offset as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| storage_err("Failed to list playlists", e))?;

        Ok(rows.iter().map(playlist_from_row).collect())
    }

    async fn count_playlists_by_owner(&self, owner_id: ObjectId) -> AppResult<u64> {
        let row = sqlx::query("SELECT COUNT(*) AS total FROM playlists WHERE owner_id = $1")
            .bind(owner_id.as_i64())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| storage_err("Failed to count playlists", e))?;

        Ok(row.get::<i64, _>("total") as u64)
    }

    async fn insert_tweet(&self, tweet: &Tweet) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO tweets (id, owner_id, content, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(tweet.id.as_i64())
        .bind(tweet.owner_id.as_i64())
        .bind(&tweet.content)
        .bind(tweet.created_at)
        .bind(tweet.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| storage_err("Failed to insert tweet", e))?;

        Ok(())
    }

    async fn update_tweet_content(
        &self,
        id: ObjectId,
        content: &str,
    ) -> AppResult<Option<Tweet>> {
        let now = current_time_millis();
        let row = sqlx::query(&format!(
            "UPDATE tweets SET content = $2, updated_at = $3 WHERE id = $1 RETURNING {}",
            TWEET_COLUMNS
        ))
        .bind(id.as_i64())
        .bind(content)
        .bind(now)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| storage_err("Failed to update tweet", e))?;

        Ok(row.map(|row| tweet_from_row(&row)))
    }

    async fn delete_tweet(&self, id: ObjectId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM tweets WHERE id = $1")
            .bind(id.as_i64())
            .execute(&self.pool)
            .await
            .map_err(|e| storage_err("Failed to delete tweet", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_tweets_by_owner(&self, owner_id: ObjectId) -> AppResult<Vec<Tweet>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM tweets WHERE owner_id = $1 ORDER BY created_at DESC, id DESC",
            TWEET_COLUMNS
        ))
        .bind(owner_id.as_i64())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| storage_err("Failed to list tweets", e))?;

        Ok(rows.iter().map(tweet_from_row).collect())
    }

    async fn insert_association_if_absent(&self, assoc: &Association) -> AppResult<bool> {
        // The primary key on (subject_id, kind, object_id) makes this a
        // single conditional operation; a conflicting concurrent insert
        // simply reports "not inserted".
        let result = sqlx::query(
            "INSERT INTO associations (subject_id, kind, object_id, created_at) \
             VALUES ($1, $2, $3, $4) ON CONFLICT DO NOTHING",
        )
        .bind(assoc.subject_id.as_i64())
        .bind(assoc.kind.as_str())
        .bind(assoc.object_id.as_i64())
        .bind(assoc.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| storage_err("Failed to insert association", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_association(
        &self,
        subject_id: ObjectId,
        kind: AssocKind,
        object_id: ObjectId,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            "DELETE FROM associations WHERE subject_id = $1 AND kind = $2 AND object_id = $3",
        )
        .bind(subject_id.as_i64())
        .bind(kind.as_str())
        .bind(object_id.as_i64())
        .execute(&self.pool)
        .await
        .map_err(|e| storage_err("Failed to delete association", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn association_exists(
        &self,
        subject_id: ObjectId,
        kind: AssocKind,
        object_id: ObjectId,
    ) -> AppResult<bool> {
        let row = sqlx::query(
            "SELECT 1 FROM associations WHERE subject_id = $1 AND kind = $2 AND object_id = $3",
        )
        .bind(subject_id.as_i64())
        .bind(kind.as_str())
        .bind(object_id.as_i64())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| storage_err("Failed to check association existence", e))?;

        Ok(row.is_some())
    }

    async fn list_associations_by_subject(
        &self,
        subject_id: ObjectId,
        kind: AssocKind,
    ) -> AppResult<Vec<Association>> {
        let rows = sqlx::query(
            "SELECT subject_id, kind, object_id, created_at FROM associations \
             WHERE subject_id = $1 AND kind = $2 ORDER BY created_at DESC, object_id DESC",
        )
        .bind(subject_id.as_i64())
        .bind(kind.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| storage_err("Failed to list associations", e))?;

        rows.iter().map(assoc_from_row).collect()
    }

    async fn list_associations_by_object(
        &self,
        object_id: ObjectId,
        kind: AssocKind,
    ) -> AppResult<Vec<Association>> {
        let rows = sqlx::query(
            "SELECT subject_id, kind, object_id, created_at FROM associations \
             WHERE object_id = $1 AND kind = $2 ORDER BY created_at DESC, subject_id DESC",
        )
        .bind(object_id.as_i64())
        .bind(kind.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| storage_err("Failed to list associations", e))?;

        rows.iter().map(assoc_from_row).collect()
    }

    async fn count_associations_by_object(
        &self,
        object_id: ObjectId,
        kinds: &[AssocKind],
    ) -> AppResult<u64> {
        let kind_strs: Vec<String> = kinds.iter().map(|k| k.as_str().to_string()).collect();

        let row = sqlx::query(
            "SELECT COUNT(*) AS total FROM associations \
             WHERE object_id = $1 AND kind = ANY($2)",
        )
        .bind(object_id.as_i64())
        .bind(&kind_strs)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| storage_err("Failed to count associations", e))?;

        Ok(row.get::<i64, _>("total") as u64)
    }

    async fn delete_associations_by_subject(
        &self,
        subject_id: ObjectId,
        kind: AssocKind,
    ) -> AppResult<u64> {
        let result =
            sqlx::query("DELETE FROM associations WHERE subject_id = $1 AND kind = $2")
                .bind(subject_id.as_i64())
                .bind(kind.as_str())
                .execute(&self.pool)
                .await
                .map_err(|e| storage_err("Failed to delete associations", e))?;

        Ok(result.rows_affected())
    }
}
