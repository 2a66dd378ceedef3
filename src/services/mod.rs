// Entity services - one per entity family, plus the shared toggle operation.
// Services take the caller identity explicitly, validate already-parsed
// parameters, and translate storage results into typed outcomes.

pub mod comments;
pub mod dashboard;
pub mod likes;
pub mod playlists;
pub mod subscriptions;
pub mod toggle;
pub mod tweets;
pub mod videos;

pub use comments::CommentService;
pub use dashboard::{ChannelStats, DashboardService};
pub use likes::LikeService;
pub use playlists::PlaylistService;
pub use subscriptions::SubscriptionService;
pub use toggle::ToggleOutcome;
pub use tweets::TweetService;
pub use videos::{NewVideo, VideoService};

use crate::error::{AppError, AppResult};

/// Required text fields must be non-blank after trimming.
pub(crate) fn non_blank(value: &str, field: &str) -> AppResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::InvalidArgument(format!("{} is required", field)));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_blank_trims_and_rejects_whitespace() {
        assert_eq!(non_blank("  hello ", "content").unwrap(), "hello");
        assert!(non_blank("", "content").is_err());
        assert!(non_blank("   ", "content").is_err());
    }
}
