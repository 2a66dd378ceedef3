use crate::core::ObjectId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: ObjectId,
    pub video_id: ObjectId,
    pub owner_id: ObjectId,
    pub content: String,
    pub created_at: i64,
    pub updated_at: i64,
}
