// Typed records and query descriptors

pub mod association;
pub mod comment;
pub mod page;
pub mod playlist;
pub mod tweet;
pub mod video;

pub use association::{AssocKind, Association, LikeTarget, LIKE_KINDS};
pub use comment::Comment;
pub use page::{Page, PageRequest, SortDirection};
pub use playlist::{Playlist, PlaylistWithVideos};
pub use tweet::Tweet;
pub use video::{Video, VideoChanges, VideoFilter, VideoSort, VideoSortField};
