// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Concurrent load of the records shown on the user detail screen.

use crate::db::RecordStore;
use crate::error::{AppError, Result};
use crate::models::{ChildRecord, Collection, DisplayItem};

/// A user's records, flattened for display.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserRecords {
    pub profiles: Vec<DisplayItem>,
    pub exercises: Vec<DisplayItem>,
    pub histories: Vec<DisplayItem>,
}

impl UserRecords {
    /// True when the user owns nothing in any of the three collections.
    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty() && self.exercises.is_empty() && self.histories.is_empty()
    }
}

/// Query profiles, exercises and histories for `uid` concurrently.
///
/// All three queries run to completion. If any failed, the first failure in
/// profiles, exercises, histories order is returned as `PartialLoad`.
pub async fn load_user_records(store: &dyn RecordStore, uid: &str) -> Result<UserRecords> {
    let (profiles, exercises, histories) = tokio::join!(
        store.query_by_owner(Collection::Profiles, uid),
        store.query_by_owner(Collection::Exercises, uid),
        store.query_by_owner(Collection::Histories, uid),
    );

    let profiles = flatten(uid, Collection::Profiles, profiles);
    let exercises = flatten(uid, Collection::Exercises, exercises);
    let histories = flatten(uid, Collection::Histories, histories);

    Ok(UserRecords {
        profiles: profiles?,
        exercises: exercises?,
        histories: histories?,
    })
}

fn flatten(
    uid: &str,
    collection: Collection,
    result: Result<Vec<ChildRecord>>,
) -> Result<Vec<DisplayItem>> {
    match result {
        Ok(records) => Ok(records.iter().map(ChildRecord::display_item).collect()),
        Err(e) => {
            tracing::warn!(uid = %uid, collection = %collection, error = %e, "Record query failed");
            Err(AppError::PartialLoad {
                collection: collection.name(),
                message: e.to_string(),
            })
        }
    }
}
