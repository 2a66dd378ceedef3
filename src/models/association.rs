use crate::core::ObjectId;
use crate::error::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// Association record: subject "likes"/"subscribes to"/"contains" object.
///
/// At most one record exists per `(subject_id, kind, object_id)` tuple at any
/// time; the storage layer enforces this with a primary key on the tuple.
/// Records are created by conditional insert and destroyed by conditional
/// delete, never updated in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Association {
    pub subject_id: ObjectId,
    pub kind: AssocKind,
    pub object_id: ObjectId,
    pub created_at: i64,
}

/// Closed set of association kinds. Anything outside this set is a client
/// error at the parsing boundary, never a silent no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssocKind {
    VideoLike,
    CommentLike,
    TweetLike,
    Subscription,
    PlaylistVideo,
}

/// The like kinds, in one place for dashboard counting.
pub const LIKE_KINDS: [AssocKind; 3] = [
    AssocKind::VideoLike,
    AssocKind::CommentLike,
    AssocKind::TweetLike,
];

impl AssocKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssocKind::VideoLike => "video_like",
            AssocKind::CommentLike => "comment_like",
            AssocKind::TweetLike => "tweet_like",
            AssocKind::Subscription => "subscription",
            AssocKind::PlaylistVideo => "playlist_video",
        }
    }

    pub fn parse(s: &str) -> AppResult<Self> {
        match s {
            "video_like" => Ok(AssocKind::VideoLike),
            "comment_like" => Ok(AssocKind::CommentLike),
            "tweet_like" => Ok(AssocKind::TweetLike),
            "subscription" => Ok(AssocKind::Subscription),
            "playlist_video" => Ok(AssocKind::PlaylistVideo),
            other => Err(AppError::InvalidArgument(format!(
                "unknown association kind: {}",
                other
            ))),
        }
    }
}

/// Target of a like toggle, parsed from the request path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeTarget {
    Video,
    Comment,
    Tweet,
}

impl LikeTarget {
    pub fn parse(s: &str) -> AppResult<Self> {
        match s {
            "video" => Ok(LikeTarget::Video),
            "comment" => Ok(LikeTarget::Comment),
            "tweet" => Ok(LikeTarget::Tweet),
            other => Err(AppError::InvalidArgument(format!(
                "unknown like target: {}",
                other
            ))),
        }
    }

    pub fn kind(self) -> AssocKind {
        match self {
            LikeTarget::Video => AssocKind::VideoLike,
            LikeTarget::Comment => AssocKind::CommentLike,
            LikeTarget::Tweet => AssocKind::TweetLike,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_str_round_trip() {
        for kind in [
            AssocKind::VideoLike,
            AssocKind::CommentLike,
            AssocKind::TweetLike,
            AssocKind::Subscription,
            AssocKind::PlaylistVideo,
        ] {
            assert_eq!(AssocKind::parse(kind.as_str()).unwrap(), kind);
        }
    }

    #[test]
    fn unknown_kind_is_invalid_argument() {
        match AssocKind::parse("friendship") {
            Err(AppError::InvalidArgument(_)) => {}
            other => panic!("expected InvalidArgument, got {:?}", other),
        }
    }

    #[test]
    fn like_target_maps_to_kind() {
        assert_eq!(LikeTarget::parse("video").unwrap().kind(), AssocKind::VideoLike);
        assert_eq!(LikeTarget::parse("comment").unwrap().kind(), AssocKind::CommentLike);
        assert_eq!(LikeTarget::parse("tweet").unwrap().kind(), AssocKind::TweetLike);
        assert!(LikeTarget::parse("photo").is_err());
    }
}
