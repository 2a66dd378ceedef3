use crate::core::ObjectId;
use crate::error::{AppError, AppResult};
use crate::models::page::SortDirection;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Video {
    pub id: ObjectId,
    pub owner_id: ObjectId,
    pub title: String,
    pub description: String,
    pub video_url: String,
    pub thumbnail_url: String,
    pub views: i64,
    pub is_published: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Partial update for a video. `None` leaves the field untouched.
#[derive(Debug, Clone, Default)]
pub struct VideoChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub thumbnail_url: Option<String>,
}

impl VideoChanges {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.thumbnail_url.is_none()
    }
}

/// Listing filter: all clauses are conjunctive.
#[derive(Debug, Clone, Default)]
pub struct VideoFilter {
    pub owner_id: Option<ObjectId>,
    /// Case-insensitive substring match on the title.
    pub title_query: Option<String>,
}

/// Closed set of sortable video fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideoSortField {
    CreatedAt,
    Views,
    Title,
}

impl VideoSortField {
    pub fn parse(s: &str) -> AppResult<Self> {
        match s {
            "created_at" => Ok(VideoSortField::CreatedAt),
            "views" => Ok(VideoSortField::Views),
            "title" => Ok(VideoSortField::Title),
            other => Err(AppError::InvalidArgument(format!(
                "unknown sort field: {}",
                other
            ))),
        }
    }

    /// Column name for SQL ordering. The closed enum is what keeps
    /// caller-supplied sort fields out of the query text.
    pub fn column(&self) -> &'static str {
        match self {
            VideoSortField::CreatedAt => "created_at",
            VideoSortField::Views => "views",
            VideoSortField::Title => "title",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VideoSort {
    pub field: VideoSortField,
    pub direction: SortDirection,
}

impl Default for VideoSort {
    fn default() -> Self {
        Self {
            field: VideoSortField::CreatedAt,
            direction: SortDirection::Desc,
        }
    }
}
