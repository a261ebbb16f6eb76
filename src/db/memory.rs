// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-memory backend.
//!
//! Implements both the user list source and the record store over plain
//! collections. Used for demo mode and by the test suite, which relies on
//! the call journal and on injected faults to observe the deletion order.

use crate::db::{CollectionRef, OwnerDeletion, RecordStore};
use crate::error::{AppError, Result};
use crate::models::{
    ChildRecord, Collection, Exercise, History, Profile, Routine, UserPage, UserRecord, Workout,
};
use crate::services::identity::UserListSource;
use async_trait::async_trait;
use chrono::{Duration, TimeZone, Utc};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};

/// An operation that can be made to fail.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Fault {
    ListUsers,
    Query(Collection),
    ListNested,
    Delete(Collection),
    DeleteNested,
    DeleteOwner,
}

/// A call observed by the backend, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    ListUsers { page_token: Option<String> },
    Query(Collection),
    ListNested { parent_id: String },
    BatchDelete { target: CollectionRef, count: usize },
    DeleteOwner { owner_id: String },
}

#[derive(Default)]
struct State {
    /// Identity records keyed (and therefore ordered) by ID.
    users: BTreeMap<String, UserRecord>,
    documents: HashMap<Collection, Vec<ChildRecord>>,
    /// Nested record IDs keyed by profile ID.
    profile_records: HashMap<String, Vec<String>>,
    faults: HashSet<Fault>,
    calls: Vec<Call>,
}

/// Deterministic in-memory identity service and document store.
#[derive(Default)]
pub struct MemoryBackend {
    state: Mutex<State>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// A backend seeded with sample users and records.
    pub fn demo() -> Self {
        let backend = Self::new();
        let base = Utc
            .with_ymd_and_hms(2025, 1, 6, 9, 0, 0)
            .single()
            .unwrap_or_else(Utc::now);

        for n in 1..=23u32 {
            let mut user = UserRecord::new(format!("user-{:03}", n));
            user.email = Some(format!("athlete{}@example.com", n));
            user.display_name = Some(format!("Athlete {}", n));
            user.created_at = Some(base + Duration::days(i64::from(n)));
            if n % 3 != 0 {
                user.last_login_at = Some(base + Duration::days(i64::from(n) + 30));
                user.last_refresh_at = Some(base + Duration::days(i64::from(n) + 31));
            }
            let uid = user.id.clone();
            backend.insert_user(user);

            if n % 4 == 0 {
                continue;
            }
            let profile_id = format!("{}-profile", uid);
            backend.insert_record(ChildRecord::Profile(Profile {
                id: profile_id.clone(),
                uid: uid.clone(),
                name: format!("Athlete {} main", n),
                created_at: Some(base),
                updated_at: None,
            }));
            backend.insert_profile_records(&profile_id, (0..n % 5).map(|i| format!("rec-{}", i)));
            backend.insert_record(ChildRecord::Exercise(Exercise {
                id: format!("{}-squat", uid),
                uid: uid.clone(),
                name: "Back squat".to_string(),
                created_at: Some(base),
                updated_at: None,
            }));
            backend.insert_record(ChildRecord::History(History {
                id: format!("{}-h1", uid),
                uid: uid.clone(),
                workout: Workout {
                    name: "Leg day".to_string(),
                    date: Some(base + Duration::days(2)),
                },
                created_at: Some(base),
                updated_at: None,
            }));
            backend.insert_record(ChildRecord::Routine(Routine {
                id: format!("{}-r1", uid),
                uid,
                name: "Push / Pull / Legs".to_string(),
                created_at: Some(base),
                updated_at: None,
            }));
        }

        backend
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn insert_user(&self, user: UserRecord) {
        self.state().users.insert(user.id.clone(), user);
    }

    pub fn insert_record(&self, record: ChildRecord) {
        self.state()
            .documents
            .entry(record.collection())
            .or_default()
            .push(record);
    }

    pub fn insert_profile_records(&self, profile_id: &str, ids: impl IntoIterator<Item = String>) {
        self.state()
            .profile_records
            .entry(profile_id.to_string())
            .or_default()
            .extend(ids);
    }

    /// Make every subsequent call of this kind fail.
    pub fn fail_on(&self, fault: Fault) {
        self.state().faults.insert(fault);
    }

    pub fn clear_faults(&self) {
        self.state().faults.clear();
    }

    /// Calls observed so far, oldest first.
    pub fn calls(&self) -> Vec<Call> {
        self.state().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state().calls.clear();
    }

    pub fn has_user(&self, id: &str) -> bool {
        self.state().users.contains_key(id)
    }

    /// Number of documents in `collection` owned by `owner_id`.
    pub fn count_owned(&self, collection: Collection, owner_id: &str) -> usize {
        self.state()
            .documents
            .get(&collection)
            .map(|docs| docs.iter().filter(|d| d.uid() == owner_id).count())
            .unwrap_or(0)
    }

    /// Number of nested records left under a profile.
    pub fn count_profile_records(&self, profile_id: &str) -> usize {
        self.state()
            .profile_records
            .get(profile_id)
            .map(Vec::len)
            .unwrap_or(0)
    }

    fn check(state: &State, fault: &Fault) -> Result<()> {
        if state.faults.contains(fault) {
            return Err(AppError::Database(format!("injected failure: {:?}", fault)));
        }
        Ok(())
    }
}

#[async_trait]
impl UserListSource for MemoryBackend {
    async fn fetch_page(&self, page_size: u32, page_token: Option<&str>) -> Result<UserPage> {
        let mut state = self.state();
        state.calls.push(Call::ListUsers {
            page_token: page_token.map(str::to_string),
        });
        Self::check(&state, &Fault::ListUsers).map_err(|e| AppError::Identity(e.to_string()))?;

        let mut remaining = state
            .users
            .values()
            .filter(|u| page_token.is_none_or(|token| u.id.as_str() > token));
        let users: Vec<UserRecord> = remaining
            .by_ref()
            .take(page_size as usize)
            .cloned()
            .collect();
        let next_page_token = match remaining.next() {
            Some(_) => users.last().map(|u| u.id.clone()),
            None => None,
        };

        Ok(UserPage {
            users,
            next_page_token,
        })
    }
}

#[async_trait]
impl RecordStore for MemoryBackend {
    async fn query_by_owner(
        &self,
        collection: Collection,
        owner_id: &str,
    ) -> Result<Vec<ChildRecord>> {
        let mut state = self.state();
        state.calls.push(Call::Query(collection));
        Self::check(&state, &Fault::Query(collection))?;

        Ok(state
            .documents
            .get(&collection)
            .map(|docs| {
                docs.iter()
                    .filter(|d| d.uid() == owner_id)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn list_nested(
        &self,
        _parent: Collection,
        parent_id: &str,
        _name: &'static str,
    ) -> Result<Vec<String>> {
        let mut state = self.state();
        state.calls.push(Call::ListNested {
            parent_id: parent_id.to_string(),
        });
        Self::check(&state, &Fault::ListNested)?;

        Ok(state
            .profile_records
            .get(parent_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn batch_delete(&self, target: &CollectionRef, ids: &[String]) -> Result<()> {
        let mut state = self.state();
        state.calls.push(Call::BatchDelete {
            target: target.clone(),
            count: ids.len(),
        });

        match target {
            CollectionRef::Top(collection) => {
                Self::check(&state, &Fault::Delete(*collection))?;
                if let Some(docs) = state.documents.get_mut(collection) {
                    docs.retain(|d| !ids.iter().any(|id| id == d.id()));
                }
            }
            CollectionRef::Nested { parent_id, .. } => {
                Self::check(&state, &Fault::DeleteNested)?;
                if let Some(records) = state.profile_records.get_mut(parent_id) {
                    records.retain(|r| !ids.contains(r));
                }
            }
        }
        Ok(())
    }

    async fn delete_owner_record(&self, owner_id: &str) -> Result<OwnerDeletion> {
        let mut state = self.state();
        state.calls.push(Call::DeleteOwner {
            owner_id: owner_id.to_string(),
        });
        Self::check(&state, &Fault::DeleteOwner).map_err(|e| AppError::Identity(e.to_string()))?;

        Ok(match state.users.remove(owner_id) {
            Some(_) => OwnerDeletion::Deleted,
            None => OwnerDeletion::NotFound,
        })
    }
}
