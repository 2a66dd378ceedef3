// Toggle operation - flips presence of an association record.
// Shared by like toggles and subscription toggles.

use crate::core::{current_time_millis, ObjectId};
use crate::error::AppResult;
use crate::infrastructure::Store;
use crate::models::{AssocKind, Association};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToggleOutcome {
    pub active: bool,
}

/// Flip membership of the `(subject, kind, object)` tuple.
///
/// Both branches are single conditional storage operations, so two identical
/// concurrent calls can never leave two records or double-delete: the
/// storage layer's uniqueness constraint on the tuple arbitrates, and a lost
/// insert race is absorbed as "already active".
pub async fn toggle_association(
    store: &dyn Store,
    subject_id: ObjectId,
    kind: AssocKind,
    object_id: ObjectId,
) -> AppResult<ToggleOutcome> {
    if store.delete_association(subject_id, kind, object_id).await? {
        tracing::info!(
            "toggle: removed {} {} -> {}",
            kind.as_str(),
            subject_id,
            object_id
        );
        return Ok(ToggleOutcome { active: false });
    }

    let assoc = Association {
        subject_id,
        kind,
        object_id,
        created_at: current_time_millis(),
    };
    let inserted = store.insert_association_if_absent(&assoc).await?;
    if inserted {
        tracing::info!(
            "toggle: created {} {} -> {}",
            kind.as_str(),
            subject_id,
            object_id
        );
    }
    // !inserted means a concurrent identical toggle won the insert race;
    // either way the association is now active.
    Ok(ToggleOutcome { active: true })
}
