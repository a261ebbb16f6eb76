// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod records;
pub mod user;

pub use records::{ChildRecord, Collection, DisplayItem, Exercise, History, Profile, Routine, Workout};
pub use user::{UserPage, UserRecord};
