// Service-level behavior over the in-memory store backend.

use std::sync::Arc;

use vidhub::config::PaginationConfig;
use vidhub::core::{current_time_millis, IdGenerator, ObjectId};
use vidhub::error::AppError;
use vidhub::infrastructure::{MemoryStore, Store};
use vidhub::models::{
    AssocKind, Association, LikeTarget, PageRequest, Video, VideoChanges, VideoFilter, VideoSort,
};
use vidhub::services::{
    CommentService, DashboardService, LikeService, NewVideo, PlaylistService,
    SubscriptionService, TweetService, VideoService,
};

fn store() -> Arc<dyn Store> {
    Arc::new(MemoryStore::new())
}

fn ids() -> Arc<IdGenerator> {
    Arc::new(IdGenerator::new(1))
}

fn limits() -> PaginationConfig {
    PaginationConfig {
        default_per_page: 10,
        max_per_page: 100,
    }
}

fn page(page: i64, per_page: i64) -> PageRequest {
    PageRequest::new(Some(page), Some(per_page), &limits()).unwrap()
}

fn new_video(n: u32) -> NewVideo {
    NewVideo {
        title: format!("video {}", n),
        description: "a description".to_string(),
        video_url: format!("https://cdn.example/v/{}.mp4", n),
        thumbnail_url: format!("https://cdn.example/t/{}.jpg", n),
    }
}

fn user(n: i64) -> ObjectId {
    ObjectId::new(n)
}

#[tokio::test]
async fn like_toggle_round_trips() {
    let store = store();
    let likes = LikeService::new(store.clone());
    let (user_a, video) = (user(10), user(900));

    let first = likes.toggle(user_a, LikeTarget::Video, video).await.unwrap();
    assert!(first.active);
    let second = likes.toggle(user_a, LikeTarget::Video, video).await.unwrap();
    assert!(!second.active);

    // No record remains after the round trip
    let exists = store
        .association_exists(user_a, AssocKind::VideoLike, video)
        .await
        .unwrap();
    assert!(!exists);
}

#[tokio::test]
async fn toggle_alternates_over_a_sequence() {
    let store = store();
    let subs = SubscriptionService::new(store.clone());
    let (subscriber, channel) = (user(1), user(2));

    for i in 0..5 {
        let outcome = subs.toggle(subscriber, channel).await.unwrap();
        assert_eq!(outcome.active, i % 2 == 0);
    }
    // Odd number of toggles leaves the subscription active
    assert!(store
        .association_exists(subscriber, AssocKind::Subscription, channel)
        .await
        .unwrap());
}

#[tokio::test(flavor = "multi_thread")]
async fn concurrent_toggles_leave_at_most_one_record() {
    let store = store();
    let likes = LikeService::new(store.clone());
    let (user_a, video) = (user(7), user(700));

    let mut handles = Vec::new();
    for _ in 0..9 {
        let likes = likes.clone();
        handles.push(tokio::spawn(async move {
            likes.toggle(user_a, LikeTarget::Video, video).await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    // Whatever interleaving happened, the tuple is unique: the state is
    // either absent or a single record, and one more toggle flips it.
    let before = store
        .association_exists(user_a, AssocKind::VideoLike, video)
        .await
        .unwrap();
    let outcome = likes.toggle(user_a, LikeTarget::Video, video).await.unwrap();
    assert_eq!(outcome.active, !before);
}

#[tokio::test]
async fn distinct_kinds_toggle_independently() {
    let store = store();
    let likes = LikeService::new(store.clone());
    let user_a = user(3);
    let target = user(30);

    likes.toggle(user_a, LikeTarget::Video, target).await.unwrap();
    likes.toggle(user_a, LikeTarget::Comment, target).await.unwrap();

    assert!(store
        .association_exists(user_a, AssocKind::VideoLike, target)
        .await
        .unwrap());
    assert!(store
        .association_exists(user_a, AssocKind::CommentLike, target)
        .await
        .unwrap());

    let off = likes.toggle(user_a, LikeTarget::Video, target).await.unwrap();
    assert!(!off.active);
    assert!(store
        .association_exists(user_a, AssocKind::CommentLike, target)
        .await
        .unwrap());
}

#[tokio::test]
async fn video_listing_paginates_25_across_3_pages() {
    let store = store();
    let videos = VideoService::new(store.clone(), ids());
    let owner = user(42);

    for n in 0..25 {
        videos.publish(owner, new_video(n)).await.unwrap();
    }

    let filter = VideoFilter {
        owner_id: Some(owner),
        title_query: None,
    };
    let second = videos
        .list(filter.clone(), VideoSort::default(), page(2, 10))
        .await
        .unwrap();
    assert_eq!(second.items.len(), 10);
    assert_eq!(second.total_count, 25);
    assert_eq!(second.total_pages, 3);
    assert_eq!(second.page, 2);

    let third = videos
        .list(filter.clone(), VideoSort::default(), page(3, 10))
        .await
        .unwrap();
    assert_eq!(third.items.len(), 5);

    // Past the end: empty items, not an error
    let fourth = videos
        .list(filter, VideoSort::default(), page(4, 10))
        .await
        .unwrap();
    assert!(fourth.items.is_empty());
    assert_eq!(fourth.total_count, 25);
}

#[tokio::test]
async fn video_listing_orders_newest_first() {
    let store = store();
    let videos = VideoService::new(store.clone(), ids());
    let owner = user(42);

    let mut published = Vec::new();
    for n in 0..3 {
        published.push(videos.publish(owner, new_video(n)).await.unwrap());
    }

    let filter = VideoFilter {
        owner_id: Some(owner),
        title_query: None,
    };
    let listed = videos
        .list(filter, VideoSort::default(), page(1, 10))
        .await
        .unwrap();
    let listed_ids: Vec<ObjectId> = listed.items.iter().map(|v| v.id).collect();
    let mut expected: Vec<ObjectId> = published.iter().map(|v| v.id).collect();
    expected.reverse();
    assert_eq!(listed_ids, expected);
}

#[tokio::test]
async fn video_listing_filters_by_title_substring() {
    let store = store();
    let videos = VideoService::new(store.clone(), ids());
    let owner = user(1);

    videos
        .publish(
            owner,
            NewVideo {
                title: "Rust borrow checker deep dive".to_string(),
                ..new_video(0)
            },
        )
        .await
        .unwrap();
    videos.publish(owner, new_video(1)).await.unwrap();

    let filter = VideoFilter {
        owner_id: None,
        title_query: Some("BORROW".to_string()),
    };
    let found = videos
        .list(filter, VideoSort::default(), page(1, 10))
        .await
        .unwrap();
    assert_eq!(found.total_count, 1);
    assert!(found.items[0].title.contains("borrow"));
}

#[tokio::test]
async fn video_update_is_partial_and_delete_is_final() {
    let store = store();
    let videos = VideoService::new(store.clone(), ids());
    let owner = user(5);

    let video = videos.publish(owner, new_video(0)).await.unwrap();
    let updated = videos
        .update(
            video.id,
            VideoChanges {
                title: Some("renamed".to_string()),
                ..VideoChanges::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.title, "renamed");
    assert_eq!(updated.description, video.description);

    videos.delete(video.id).await.unwrap();
    let err = videos.get(video.id).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn toggle_publish_flips_the_flag() {
    let store = store();
    let videos = VideoService::new(store.clone(), ids());
    let video = videos.publish(user(5), new_video(0)).await.unwrap();
    assert!(video.is_published);

    let flipped = videos.toggle_publish(video.id).await.unwrap();
    assert!(!flipped.is_published);
    let flipped_back = videos.toggle_publish(video.id).await.unwrap();
    assert!(flipped_back.is_published);
}

#[tokio::test]
async fn update_and_delete_of_absent_ids_are_not_found() {
    let store = store();
    let videos = VideoService::new(store.clone(), ids());
    let comments = CommentService::new(store.clone(), ids());
    let tweets = TweetService::new(store.clone(), ids());
    let ghost = user(0x7fff_0000_1234);

    assert!(matches!(
        videos.delete(ghost).await.unwrap_err(),
        AppError::NotFound(_)
    ));
    assert!(matches!(
        comments.update(ghost, "new text").await.unwrap_err(),
        AppError::NotFound(_)
    ));
    assert!(matches!(
        tweets.delete(ghost).await.unwrap_err(),
        AppError::NotFound(_)
    ));
}

#[tokio::test]
async fn blank_content_is_rejected_before_storage() {
    let store = store();
    let comments = CommentService::new(store.clone(), ids());
    let tweets = TweetService::new(store.clone(), ids());

    assert!(matches!(
        comments.add(user(1), user(2), "   ").await.unwrap_err(),
        AppError::InvalidArgument(_)
    ));
    assert!(matches!(
        tweets.create(user(1), "").await.unwrap_err(),
        AppError::InvalidArgument(_)
    ));
    assert_eq!(
        store.count_comments_by_video(user(2)).await.unwrap(),
        0
    );
}

#[tokio::test]
async fn comment_listing_counts_before_pagination() {
    let store = store();
    let comments = CommentService::new(store.clone(), ids());
    let (owner, video) = (user(1), user(50));

    for n in 0..3 {
        comments
            .add(owner, video, &format!("comment {}", n))
            .await
            .unwrap();
    }

    let first = comments.list_for_video(video, page(1, 2)).await.unwrap();
    assert_eq!(first.items.len(), 2);
    assert_eq!(first.total_count, 3);
    assert_eq!(first.total_pages, 2);

    let second = comments.list_for_video(video, page(2, 2)).await.unwrap();
    assert_eq!(second.items.len(), 1);
}

#[tokio::test]
async fn playlist_membership_conflicts_and_cleanup() {
    let store = store();
    let playlists = PlaylistService::new(store.clone(), ids());
    let owner = user(9);
    let video = user(90);

    let playlist = playlists
        .create(owner, "favorites", Some("the good ones"))
        .await
        .unwrap();

    let with_video = playlists.add_video(playlist.id, video).await.unwrap();
    assert_eq!(with_video.video_ids, vec![video]);

    // Duplicate add is a conflict, not a silent no-op
    assert!(matches!(
        playlists.add_video(playlist.id, video).await.unwrap_err(),
        AppError::Conflict(_)
    ));

    let without = playlists.remove_video(playlist.id, video).await.unwrap();
    assert!(without.video_ids.is_empty());
    assert!(matches!(
        playlists
            .remove_video(playlist.id, video)
            .await
            .unwrap_err(),
        AppError::NotFound(_)
    ));

    // Deleting the playlist removes its membership records too
    playlists.add_video(playlist.id, video).await.unwrap();
    playlists.delete(playlist.id).await.unwrap();
    assert!(matches!(
        playlists.get(playlist.id).await.unwrap_err(),
        AppError::NotFound(_)
    ));
    assert!(!store
        .association_exists(playlist.id, AssocKind::PlaylistVideo, video)
        .await
        .unwrap());
}

#[tokio::test]
async fn playlist_membership_changes_require_an_existing_playlist() {
    let store = store();
    let playlists = PlaylistService::new(store.clone(), ids());
    let ghost = user(0x1234);

    assert!(matches!(
        playlists.add_video(ghost, user(1)).await.unwrap_err(),
        AppError::NotFound(_)
    ));
    assert!(matches!(
        playlists.remove_video(ghost, user(1)).await.unwrap_err(),
        AppError::NotFound(_)
    ));
}

#[tokio::test]
async fn owner_with_no_playlists_gets_an_empty_page() {
    let store = store();
    let playlists = PlaylistService::new(store.clone(), ids());

    let listing = playlists.list_by_owner(user(404), page(1, 10)).await.unwrap();
    assert!(listing.items.is_empty());
    assert_eq!(listing.total_count, 0);
    assert_eq!(listing.total_pages, 0);
}

#[tokio::test]
async fn liked_videos_follow_like_state() {
    let store = store();
    let videos = VideoService::new(store.clone(), ids());
    let likes = LikeService::new(store.clone());
    let (owner, fan) = (user(1), user(2));

    let v1 = videos.publish(owner, new_video(1)).await.unwrap();
    let v2 = videos.publish(owner, new_video(2)).await.unwrap();

    likes.toggle(fan, LikeTarget::Video, v1.id).await.unwrap();
    likes.toggle(fan, LikeTarget::Video, v2.id).await.unwrap();

    let liked = likes.liked_videos(fan).await.unwrap();
    let liked_ids: Vec<ObjectId> = liked.iter().map(|v| v.id).collect();
    assert_eq!(liked_ids.len(), 2);
    assert!(liked_ids.contains(&v1.id) && liked_ids.contains(&v2.id));

    likes.toggle(fan, LikeTarget::Video, v1.id).await.unwrap();
    let liked = likes.liked_videos(fan).await.unwrap();
    assert_eq!(liked.len(), 1);
    assert_eq!(liked[0].id, v2.id);
}

#[tokio::test]
async fn subscription_listings_see_both_sides() {
    let store = store();
    let subs = SubscriptionService::new(store.clone());
    let channel = user(100);

    for n in 1..=3 {
        subs.toggle(user(n), channel).await.unwrap();
    }
    subs.toggle(user(2), channel).await.unwrap(); // unsubscribes again

    let subscribers = subs.subscribers(channel).await.unwrap();
    let ids: Vec<ObjectId> = subscribers.iter().map(|s| s.subscriber_id).collect();
    assert_eq!(ids.len(), 2);
    assert!(ids.contains(&user(1)) && ids.contains(&user(3)));

    let channels = subs.subscribed_channels(user(1)).await.unwrap();
    assert_eq!(channels.len(), 1);
    assert_eq!(channels[0].channel_id, channel);
}

#[tokio::test]
async fn stats_are_zero_for_an_empty_owner() {
    let store = store();
    let dashboard = DashboardService::new(store.clone());

    let stats = dashboard.stats(user(12345)).await.unwrap();
    assert_eq!(stats.total_videos, 0);
    assert_eq!(stats.total_views, 0);
    assert_eq!(stats.total_subscribers, 0);
    assert_eq!(stats.total_likes, 0);
}

#[tokio::test]
async fn stats_aggregate_videos_views_subscribers_and_likes() {
    let store = store();
    let dashboard = DashboardService::new(store.clone());
    let subs = SubscriptionService::new(store.clone());
    let channel = user(500);
    let now = current_time_millis();

    for (n, views) in [(1i64, 10i64), (2, 5)] {
        let video = Video {
            id: user(900 + n),
            owner_id: channel,
            title: format!("video {}", n),
            description: String::new(),
            video_url: "https://cdn.example/v.mp4".to_string(),
            thumbnail_url: "https://cdn.example/t.jpg".to_string(),
            views,
            is_published: true,
            created_at: now,
            updated_at: now,
        };
        store.insert_video(&video).await.unwrap();
    }

    for n in 1..=3 {
        subs.toggle(user(n), channel).await.unwrap();
    }

    // Likes referencing the channel as object
    for n in 1..=2 {
        let like = Association {
            subject_id: user(n),
            kind: AssocKind::VideoLike,
            object_id: channel,
            created_at: now,
        };
        assert!(store.insert_association_if_absent(&like).await.unwrap());
    }

    let stats = dashboard.stats(channel).await.unwrap();
    assert_eq!(stats.total_videos, 2);
    assert_eq!(stats.total_views, 15);
    assert_eq!(stats.total_subscribers, 3);
    assert_eq!(stats.total_likes, 2);
}

#[tokio::test]
async fn channel_videos_are_paginated_newest_first() {
    let store = store();
    let videos = VideoService::new(store.clone(), ids());
    let dashboard = DashboardService::new(store.clone());
    let channel = user(7);

    for n in 0..12 {
        videos.publish(channel, new_video(n)).await.unwrap();
    }
    videos.publish(user(8), new_video(99)).await.unwrap();

    let listing = dashboard.channel_videos(channel, page(1, 10)).await.unwrap();
    assert_eq!(listing.items.len(), 10);
    assert_eq!(listing.total_count, 12);
    assert_eq!(listing.total_pages, 2);
    assert!(listing.items.iter().all(|v| v.owner_id == channel));
}
