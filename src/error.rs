// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types.
//!
//! Backend failures arrive as `Database` / `Identity` and are converted at the
//! controller boundary into the variant that describes what the operator was
//! doing (`Fetch`, `PartialLoad`, `Deletion`).

use crate::config::ConfigError;
use std::fmt;

/// Step of the cascading deletion that failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeletionStage {
    /// Querying an owned top-level collection.
    Query(&'static str),
    /// Committing the batch for an owned top-level collection.
    Commit(&'static str),
    /// Listing or deleting the nested records of a profile.
    ProfileRecords(String),
    /// Deleting the profile document itself.
    Profile(String),
    /// Deleting the identity record.
    Identity,
}

impl fmt::Display for DeletionStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeletionStage::Query(collection) => write!(f, "querying {}", collection),
            DeletionStage::Commit(collection) => write!(f, "deleting {}", collection),
            DeletionStage::ProfileRecords(id) => write!(f, "deleting records of profile {}", id),
            DeletionStage::Profile(id) => write!(f, "deleting profile {}", id),
            DeletionStage::Identity => write!(f, "deleting identity record"),
        }
    }
}

/// Application error type.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Failed to load users: {0}")]
    Fetch(String),

    #[error("Failed to load {collection}: {message}")]
    PartialLoad {
        collection: &'static str,
        message: String,
    },

    #[error("Deletion failed while {stage}: {message}")]
    Deletion {
        stage: DeletionStage,
        message: String,
    },

    #[error("Page {page} was never reached")]
    OutOfRange { page: usize },

    #[error("Database error: {0}")]
    Database(String),

    #[error("Identity service error: {0}")]
    Identity(String),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Terminal error: {0}")]
    Terminal(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Wrap a failed deletion step.
    pub fn deletion(stage: DeletionStage, source: AppError) -> Self {
        AppError::Deletion {
            stage,
            message: source.to_string(),
        }
    }

    /// Whether the error should be shown to the operator.
    ///
    /// `OutOfRange` signals a navigation bug; it is logged, not displayed.
    pub fn is_user_facing(&self) -> bool {
        !matches!(self, AppError::OutOfRange { .. })
    }
}

/// Result type alias used throughout the crate.
pub type Result<T> = std::result::Result<T, AppError>;
