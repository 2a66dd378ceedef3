use crate::core::{current_time_millis, IdGenerator, ObjectId};
use crate::error::{AppError, AppResult};
use crate::infrastructure::Store;
use crate::models::{AssocKind, Association, Page, PageRequest, Playlist, PlaylistWithVideos};
use crate::services::non_blank;
use std::sync::Arc;

#[derive(Clone)]
pub struct PlaylistService {
    store: Arc<dyn Store>,
    ids: Arc<IdGenerator>,
}

impl PlaylistService {
    pub fn new(store: Arc<dyn Store>, ids: Arc<IdGenerator>) -> Self {
        Self { store, ids }
    }

    pub async fn create(
        &self,
        owner_id: ObjectId,
        name: &str,
        description: Option<&str>,
    ) -> AppResult<Playlist> {
        let name = non_blank(name, "name")?;

        let now = current_time_millis();
        let playlist = Playlist {
            id: self.ids.next_id(),
            owner_id,
            name,
            description: description.unwrap_or("").trim().to_string(),
            created_at: now,
            updated_at: now,
        };
        self.store.insert_playlist(&playlist).await?;
        Ok(playlist)
    }

    pub async fn get(&self, id: ObjectId) -> AppResult<PlaylistWithVideos> {
        let playlist = self
            .store
            .get_playlist(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("playlist {} not found", id)))?;
        self.with_videos(playlist).await
    }

    pub async fn update(
        &self,
        id: ObjectId,
        name: &str,
        description: Option<&str>,
    ) -> AppResult<Playlist> {
        let name = non_blank(name, "name")?;
        self.store
            .update_playlist(id, &name, description.unwrap_or("").trim())
            .await?
            .ok_or_else(|| AppError::NotFound(format!("playlist {} not found", id)))
    }

    /// Delete a playlist along with its membership records.
    pub async fn delete(&self, id: ObjectId) -> AppResult<()> {
        if !self.store.delete_playlist(id).await? {
            return Err(AppError::NotFound(format!("playlist {} not found", id)));
        }
        self.store
            .delete_associations_by_subject(id, AssocKind::PlaylistVideo)
            .await?;
        tracing::info!("playlist {} deleted", id);
        Ok(())
    }

    /// A user's playlists, newest first. An owner with no playlists gets an
    /// empty page.
    pub async fn list_by_owner(
        &self,
        owner_id: ObjectId,
        page: PageRequest,
    ) -> AppResult<Page<Playlist>> {
        let (items, total_count) = futures::try_join!(
            self.store
                .list_playlists_by_owner(owner_id, page.offset(), page.limit()),
            self.store.count_playlists_by_owner(owner_id),
        )?;
        Ok(Page::assemble(items, total_count, page))
    }

    /// Add a video to a playlist. A duplicate add is a conflict, not a
    /// silent no-op.
    pub async fn add_video(
        &self,
        playlist_id: ObjectId,
        video_id: ObjectId,
    ) -> AppResult<PlaylistWithVideos> {
        let playlist = self
            .store
            .get_playlist(playlist_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("playlist {} not found", playlist_id)))?;

        let assoc = Association {
            subject_id: playlist_id,
            kind: AssocKind::PlaylistVideo,
            object_id: video_id,
            created_at: current_time_millis(),
        };
        if !self.store.insert_association_if_absent(&assoc).await? {
            return Err(AppError::Conflict(format!(
                "video {} is already in playlist {}",
                video_id, playlist_id
            )));
        }
        self.with_videos(playlist).await
    }

    pub async fn remove_video(
        &self,
        playlist_id: ObjectId,
        video_id: ObjectId,
    ) -> AppResult<PlaylistWithVideos> {
        let playlist = self
            .store
            .get_playlist(playlist_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("playlist {} not found", playlist_id)))?;

        let removed = self
            .store
            .delete_association(playlist_id, AssocKind::PlaylistVideo, video_id)
            .await?;
        if !removed {
            return Err(AppError::NotFound(format!(
                "video {} is not in playlist {}",
                video_id, playlist_id
            )));
        }
        self.with_videos(playlist).await
    }

    async fn with_videos(&self, playlist: Playlist) -> AppResult<PlaylistWithVideos> {
        let memberships = self
            .store
            .list_associations_by_subject(playlist.id, AssocKind::PlaylistVideo)
            .await?;
        Ok(PlaylistWithVideos {
            playlist,
            video_ids: memberships.into_iter().map(|m| m.object_id).collect(),
        })
    }
}
