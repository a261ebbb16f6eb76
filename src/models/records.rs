// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Per-user documents stored in Firestore.
//!
//! Every document carries the owning user's ID in `uid`. Field names follow
//! the app that writes them (camelCase), and the document ID comes from the
//! Firestore document name rather than a stored field.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Top-level collections that hold user-owned documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Profiles,
    Exercises,
    Histories,
    Routines,
}

impl Collection {
    /// Firestore collection name.
    pub fn name(self) -> &'static str {
        match self {
            Collection::Profiles => crate::db::collections::PROFILES,
            Collection::Exercises => crate::db::collections::EXERCISES,
            Collection::Histories => crate::db::collections::HISTORIES,
            Collection::Routines => crate::db::collections::ROUTINES,
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A user profile. Owns the nested `records` subcollection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    #[serde(alias = "_firestore_id", default, skip_serializing)]
    pub id: String,
    pub uid: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, with = "firestore::serialize_as_optional_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, with = "firestore::serialize_as_optional_timestamp")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// A user-defined exercise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    #[serde(alias = "_firestore_id", default, skip_serializing)]
    pub id: String,
    pub uid: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, with = "firestore::serialize_as_optional_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, with = "firestore::serialize_as_optional_timestamp")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// The workout captured by a history entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Workout {
    #[serde(default)]
    pub name: String,
    #[serde(default, with = "firestore::serialize_as_optional_timestamp")]
    pub date: Option<DateTime<Utc>>,
}

/// A completed workout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct History {
    #[serde(alias = "_firestore_id", default, skip_serializing)]
    pub id: String,
    pub uid: String,
    #[serde(default)]
    pub workout: Workout,
    #[serde(default, with = "firestore::serialize_as_optional_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, with = "firestore::serialize_as_optional_timestamp")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// A saved routine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Routine {
    #[serde(alias = "_firestore_id", default, skip_serializing)]
    pub id: String,
    pub uid: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, with = "firestore::serialize_as_optional_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, with = "firestore::serialize_as_optional_timestamp")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Any document owned by a user.
#[derive(Debug, Clone, PartialEq)]
pub enum ChildRecord {
    Profile(Profile),
    Exercise(Exercise),
    History(History),
    Routine(Routine),
}

impl ChildRecord {
    pub fn id(&self) -> &str {
        match self {
            ChildRecord::Profile(p) => &p.id,
            ChildRecord::Exercise(e) => &e.id,
            ChildRecord::History(h) => &h.id,
            ChildRecord::Routine(r) => &r.id,
        }
    }

    /// Owning user ID.
    pub fn uid(&self) -> &str {
        match self {
            ChildRecord::Profile(p) => &p.uid,
            ChildRecord::Exercise(e) => &e.uid,
            ChildRecord::History(h) => &h.uid,
            ChildRecord::Routine(r) => &r.uid,
        }
    }

    pub fn collection(&self) -> Collection {
        match self {
            ChildRecord::Profile(_) => Collection::Profiles,
            ChildRecord::Exercise(_) => Collection::Exercises,
            ChildRecord::History(_) => Collection::Histories,
            ChildRecord::Routine(_) => Collection::Routines,
        }
    }

    /// Text shown for this record in the detail view.
    ///
    /// Histories are labelled by the name of the workout they record.
    pub fn label(&self) -> &str {
        match self {
            ChildRecord::Profile(p) => &p.name,
            ChildRecord::Exercise(e) => &e.name,
            ChildRecord::History(h) => &h.workout.name,
            ChildRecord::Routine(r) => &r.name,
        }
    }

    pub fn display_item(&self) -> DisplayItem {
        DisplayItem {
            id: self.id().to_string(),
            label: self.label().to_string(),
        }
    }
}

/// A record flattened for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayItem {
    pub id: String,
    pub label: String,
}
