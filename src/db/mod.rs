// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Database layer: the record store contract and its implementations.

pub mod firestore;
pub mod memory;

pub use self::firestore::FirestoreDb;
pub use memory::MemoryBackend;

use crate::error::Result;
use crate::models::{ChildRecord, Collection};
use async_trait::async_trait;
use std::fmt;

/// Collection names as constants.
pub mod collections {
    pub const PROFILES: &str = "profiles";
    pub const EXERCISES: &str = "exercises";
    pub const HISTORIES: &str = "histories";
    pub const ROUTINES: &str = "routines";
    /// Nested under each profile document.
    pub const PROFILE_RECORDS: &str = "records";
}

/// Target of a batch deletion.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CollectionRef {
    /// A top-level collection.
    Top(Collection),
    /// A subcollection under `parent/{parent_id}`.
    Nested {
        parent: Collection,
        parent_id: String,
        name: &'static str,
    },
}

impl CollectionRef {
    /// The `records` subcollection of a profile.
    pub fn profile_records(profile_id: &str) -> Self {
        CollectionRef::Nested {
            parent: Collection::Profiles,
            parent_id: profile_id.to_string(),
            name: collections::PROFILE_RECORDS,
        }
    }
}

impl fmt::Display for CollectionRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CollectionRef::Top(collection) => write!(f, "{}", collection),
            CollectionRef::Nested {
                parent,
                parent_id,
                name,
            } => write!(f, "{}/{}/{}", parent, parent_id, name),
        }
    }
}

/// Outcome of deleting an identity record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OwnerDeletion {
    Deleted,
    /// The record was already gone.
    NotFound,
}

/// Remote store holding user-owned documents and the identity record.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// All documents in `collection` whose `uid` equals `owner_id`.
    async fn query_by_owner(
        &self,
        collection: Collection,
        owner_id: &str,
    ) -> Result<Vec<ChildRecord>>;

    /// IDs of all documents in the subcollection `name` under
    /// `parent/{parent_id}`.
    async fn list_nested(
        &self,
        parent: Collection,
        parent_id: &str,
        name: &'static str,
    ) -> Result<Vec<String>>;

    /// Delete the given documents from `target` as one logical batch.
    async fn batch_delete(&self, target: &CollectionRef, ids: &[String]) -> Result<()>;

    /// Delete the owner's identity record.
    async fn delete_owner_record(&self, owner_id: &str) -> Result<OwnerDeletion>;
}
