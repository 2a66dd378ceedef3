use crate::core::ObjectId;
use crate::error::AppResult;
use crate::infrastructure::Store;
use crate::models::AssocKind;
use crate::services::toggle::{toggle_association, ToggleOutcome};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// One subscriber of a channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subscriber {
    pub subscriber_id: ObjectId,
    pub subscribed_at: i64,
}

/// One channel a user subscribes to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubscribedChannel {
    pub channel_id: ObjectId,
    pub subscribed_at: i64,
}

#[derive(Clone)]
pub struct SubscriptionService {
    store: Arc<dyn Store>,
}

impl SubscriptionService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Toggle the caller's subscription to a channel. Same operation as the
    /// like toggle with the kind fixed to subscription.
    pub async fn toggle(
        &self,
        subscriber_id: ObjectId,
        channel_id: ObjectId,
    ) -> AppResult<ToggleOutcome> {
        toggle_association(
            self.store.as_ref(),
            subscriber_id,
            AssocKind::Subscription,
            channel_id,
        )
        .await
    }

    /// Subscribers of a channel, newest first.
    pub async fn subscribers(&self, channel_id: ObjectId) -> AppResult<Vec<Subscriber>> {
        let records = self
            .store
            .list_associations_by_object(channel_id, AssocKind::Subscription)
            .await?;
        Ok(records
            .into_iter()
            .map(|r| Subscriber {
                subscriber_id: r.subject_id,
                subscribed_at: r.created_at,
            })
            .collect())
    }

    /// Channels a user subscribes to, newest first.
    pub async fn subscribed_channels(
        &self,
        subscriber_id: ObjectId,
    ) -> AppResult<Vec<SubscribedChannel>> {
        let records = self
            .store
            .list_associations_by_subject(subscriber_id, AssocKind::Subscription)
            .await?;
        Ok(records
            .into_iter()
            .map(|r| SubscribedChannel {
                channel_id: r.object_id,
                subscribed_at: r.created_at,
            })
            .collect())
    }
}
