// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Detail screen for one user: their records and the delete action.
//!
//! Every controller is created with a fresh epoch. Requests it issues carry
//! a [`DetailTicket`]; a completion whose ticket does not match the live
//! controller and its latest request is dropped. This covers both a user
//! navigating away mid-load and a reload racing an older load.

use crate::console::confirm::{ConfirmDialog, ConfirmKey, ConfirmOutcome};
use crate::error::Result;
use crate::models::{DisplayItem, UserRecord};
use crate::services::{DeletionReport, UserRecords};

/// Shown with every deletion failure; nothing is rolled back.
pub const PARTIAL_DELETION_WARNING: &str =
    "Some of this user's data may already be deleted. Retry to finish the deletion.";

/// Identifies the request a completion answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetailTicket {
    pub epoch: u64,
    pub generation: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailCommand {
    Back,
    Reload,
    RequestDelete,
    Confirm(ConfirmKey),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailEffect {
    None,
    Load { ticket: DetailTicket, uid: String },
    Delete { ticket: DetailTicket, uid: String },
    GoBack,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailPhase {
    Loading,
    Loaded(UserRecords),
    /// Loaded, and the user owns nothing.
    Empty,
    Error(String),
}

/// Render-ready snapshot of the detail screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailViewState<'a> {
    pub user: &'a UserRecord,
    pub profiles: &'a [DisplayItem],
    pub exercises: &'a [DisplayItem],
    pub histories: &'a [DisplayItem],
    pub loading: bool,
    pub deleting: bool,
    pub empty: bool,
    pub error: Option<&'a str>,
    pub deletion_error: Option<&'a str>,
    pub confirm: Option<&'a ConfirmDialog>,
}

pub struct UserDetailController {
    epoch: u64,
    user: UserRecord,
    phase: DetailPhase,
    load_generation: u64,
    delete_generation: u64,
    deleting: bool,
    deletion_error: Option<String>,
    confirm: Option<ConfirmDialog>,
}

impl UserDetailController {
    pub fn new(epoch: u64, user: UserRecord) -> Self {
        Self {
            epoch,
            user,
            phase: DetailPhase::Loading,
            load_generation: 0,
            delete_generation: 0,
            deleting: false,
            deletion_error: None,
            confirm: None,
        }
    }

    /// Start (or restart) loading the user's records.
    pub fn activate(&mut self) -> DetailEffect {
        self.load_generation += 1;
        self.phase = DetailPhase::Loading;
        tracing::debug!(uid = %self.user.id, generation = self.load_generation, "Loading user records");
        DetailEffect::Load {
            ticket: self.ticket(self.load_generation),
            uid: self.user.id.clone(),
        }
    }

    pub fn handle(&mut self, command: DetailCommand) -> DetailEffect {
        match command {
            DetailCommand::Back if self.deleting => {
                tracing::debug!(uid = %self.user.id, "Ignoring back during deletion");
                DetailEffect::None
            }
            DetailCommand::Back => DetailEffect::GoBack,
            DetailCommand::Reload if self.deleting => DetailEffect::None,
            DetailCommand::Reload => match self.phase {
                DetailPhase::Loading => DetailEffect::None,
                _ => self.activate(),
            },
            DetailCommand::RequestDelete => {
                if !self.deleting && self.confirm.is_none() {
                    self.confirm = Some(ConfirmDialog::new(
                        "Delete user",
                        format!(
                            "Delete {} and all of their data? This cannot be undone.",
                            self.user.id
                        ),
                    ));
                }
                DetailEffect::None
            }
            DetailCommand::Confirm(key) => {
                let Some(dialog) = self.confirm.as_mut() else {
                    return DetailEffect::None;
                };
                match dialog.handle(key) {
                    ConfirmOutcome::Pending => DetailEffect::None,
                    ConfirmOutcome::Cancelled => {
                        self.confirm = None;
                        DetailEffect::None
                    }
                    ConfirmOutcome::Confirmed => {
                        self.confirm = None;
                        self.confirm_delete()
                    }
                }
            }
        }
    }

    /// Begin the cascading deletion unless one is already running.
    pub fn confirm_delete(&mut self) -> DetailEffect {
        if self.deleting {
            return DetailEffect::None;
        }
        self.deleting = true;
        self.deletion_error = None;
        self.delete_generation += 1;
        tracing::info!(uid = %self.user.id, "Deletion confirmed");
        DetailEffect::Delete {
            ticket: self.ticket(self.delete_generation),
            uid: self.user.id.clone(),
        }
    }

    /// Apply a finished load. Returns `false` if it was stale.
    pub fn apply_load(&mut self, ticket: DetailTicket, result: Result<UserRecords>) -> bool {
        if ticket != self.ticket(self.load_generation) || self.phase != DetailPhase::Loading {
            tracing::debug!(?ticket, "Discarding stale record load");
            return false;
        }

        self.phase = match result {
            Ok(records) if records.is_empty() => DetailPhase::Empty,
            Ok(records) => DetailPhase::Loaded(records),
            Err(e) => DetailPhase::Error(e.to_string()),
        };
        true
    }

    /// Apply a finished deletion.
    ///
    /// A failed deletion reloads the records so the view shows what the
    /// cascade left behind.
    pub fn apply_deletion(
        &mut self,
        ticket: DetailTicket,
        result: Result<DeletionReport>,
    ) -> DetailEffect {
        if ticket != self.ticket(self.delete_generation) || !self.deleting {
            tracing::debug!(?ticket, "Discarding stale deletion result");
            return DetailEffect::None;
        }

        self.deleting = false;
        match result {
            Ok(report) => {
                tracing::info!(uid = %self.user.id, ?report, "User deleted");
                DetailEffect::GoBack
            }
            Err(e) => {
                tracing::error!(uid = %self.user.id, error = %e, "User deletion failed");
                self.deletion_error = Some(format!("{}. {}", e, PARTIAL_DELETION_WARNING));
                self.activate()
            }
        }
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn user(&self) -> &UserRecord {
        &self.user
    }

    pub fn phase(&self) -> &DetailPhase {
        &self.phase
    }

    pub fn is_deleting(&self) -> bool {
        self.deleting
    }

    pub fn is_confirming(&self) -> bool {
        self.confirm.is_some()
    }

    pub fn view(&self) -> DetailViewState<'_> {
        let empty: &[DisplayItem] = &[];
        let (profiles, exercises, histories) = match &self.phase {
            DetailPhase::Loaded(records) => (
                records.profiles.as_slice(),
                records.exercises.as_slice(),
                records.histories.as_slice(),
            ),
            _ => (empty, empty, empty),
        };
        DetailViewState {
            user: &self.user,
            profiles,
            exercises,
            histories,
            loading: self.phase == DetailPhase::Loading,
            deleting: self.deleting,
            empty: self.phase == DetailPhase::Empty,
            error: match &self.phase {
                DetailPhase::Error(message) => Some(message.as_str()),
                _ => None,
            },
            deletion_error: self.deletion_error.as_deref(),
            confirm: self.confirm.as_ref(),
        }
    }

    fn ticket(&self, generation: u64) -> DetailTicket {
        DetailTicket {
            epoch: self.epoch,
            generation,
        }
    }
}
