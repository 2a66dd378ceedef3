use crate::core::ObjectId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Playlist {
    pub id: ObjectId,
    pub owner_id: ObjectId,
    pub name: String,
    pub description: String,
    pub created_at: i64,
    pub updated_at: i64,
}

/// A playlist together with its member video ids, newest addition first.
/// Membership lives in association records, not in the playlist row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistWithVideos {
    #[serde(flatten)]
    pub playlist: Playlist,
    pub video_ids: Vec<ObjectId>,
}
