// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Cascading deletion of a user and everything they own.
//!
//! Order is fixed:
//! 1. `exercises`, `histories`, `routines` (each committed on its own; a
//!    failure in one does not stop the others, but does stop step 2)
//! 2. each profile: its `records` subcollection, then the profile
//! 3. the identity record
//!
//! A failing step stops the cascade. Nothing is rolled back, so a failure
//! can leave the user partially deleted; running the cascade again finishes
//! the job because completed steps find nothing left to delete.

use crate::db::{collections, CollectionRef, OwnerDeletion, RecordStore};
use crate::error::{AppError, DeletionStage, Result};
use crate::models::{ChildRecord, Collection};

/// Owned top-level collections deleted before profiles, in order.
pub const OWNED_COLLECTIONS: [Collection; 3] = [
    Collection::Exercises,
    Collection::Histories,
    Collection::Routines,
];

/// What a completed cascade removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletionReport {
    /// Documents removed from the owned top-level collections
    pub documents_removed: usize,
    pub profiles_removed: usize,
    /// Documents removed from profile subcollections
    pub profile_records_removed: usize,
    pub identity: OwnerDeletion,
}

/// Delete all data owned by `uid`, then the identity record itself.
pub async fn delete_user_cascade(store: &dyn RecordStore, uid: &str) -> Result<DeletionReport> {
    tracing::info!(uid = %uid, "Starting cascading deletion");

    // The owned collections are independent of each other: each is
    // attempted even if an earlier one failed, but any failure stops the
    // cascade before profiles and the identity record are touched.
    let mut documents_removed = 0;
    let mut first_failure = None;
    for collection in OWNED_COLLECTIONS {
        match delete_owned(store, collection, uid).await {
            Ok(count) => documents_removed += count,
            Err(e) => {
                tracing::warn!(uid = %uid, collection = %collection, error = %e, "Owned collection not deleted");
                first_failure.get_or_insert(e);
            }
        }
    }
    if let Some(e) = first_failure {
        return Err(e);
    }

    let profiles = store
        .query_by_owner(Collection::Profiles, uid)
        .await
        .map_err(|e| AppError::deletion(DeletionStage::Query(Collection::Profiles.name()), e))?;

    let mut profile_records_removed = 0;
    for profile in &profiles {
        profile_records_removed += delete_profile(store, profile).await?;
    }

    let identity = store
        .delete_owner_record(uid)
        .await
        .map_err(|e| AppError::deletion(DeletionStage::Identity, e))?;

    let report = DeletionReport {
        documents_removed,
        profiles_removed: profiles.len(),
        profile_records_removed,
        identity,
    };

    tracing::info!(
        uid = %uid,
        documents = report.documents_removed,
        profiles = report.profiles_removed,
        profile_records = report.profile_records_removed,
        identity = ?report.identity,
        "Cascading deletion complete"
    );

    Ok(report)
}

/// Delete every document in `collection` owned by `uid`. Returns the count.
async fn delete_owned(store: &dyn RecordStore, collection: Collection, uid: &str) -> Result<usize> {
    let docs = store
        .query_by_owner(collection, uid)
        .await
        .map_err(|e| AppError::deletion(DeletionStage::Query(collection.name()), e))?;

    if docs.is_empty() {
        return Ok(0);
    }

    let ids: Vec<String> = docs.iter().map(|d| d.id().to_string()).collect();
    store
        .batch_delete(&CollectionRef::Top(collection), &ids)
        .await
        .map_err(|e| AppError::deletion(DeletionStage::Commit(collection.name()), e))?;

    tracing::debug!(uid = %uid, collection = %collection, count = ids.len(), "Deleted owned documents");
    Ok(ids.len())
}

/// Delete one profile's nested records and then the profile. Returns the
/// number of nested records removed.
async fn delete_profile(store: &dyn RecordStore, profile: &ChildRecord) -> Result<usize> {
    let profile_id = profile.id();
    let records_stage = || DeletionStage::ProfileRecords(profile_id.to_string());

    let record_ids = store
        .list_nested(Collection::Profiles, profile_id, collections::PROFILE_RECORDS)
        .await
        .map_err(|e| AppError::deletion(records_stage(), e))?;

    if !record_ids.is_empty() {
        store
            .batch_delete(&CollectionRef::profile_records(profile_id), &record_ids)
            .await
            .map_err(|e| AppError::deletion(records_stage(), e))?;
    }

    store
        .batch_delete(
            &CollectionRef::Top(Collection::Profiles),
            &[profile_id.to_string()],
        )
        .await
        .map_err(|e| AppError::deletion(DeletionStage::Profile(profile_id.to_string()), e))?;

    tracing::debug!(profile_id = %profile_id, records = record_ids.len(), "Deleted profile");

    Ok(record_ids.len())
}
