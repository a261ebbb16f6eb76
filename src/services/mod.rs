// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - remote clients and the operations built on them.

pub mod backend;
pub mod deletion;
pub mod identity;
pub mod user_records;

pub use backend::FirebaseBackend;
pub use deletion::{delete_user_cascade, DeletionReport, OWNED_COLLECTIONS};
pub use identity::{IdentityClient, UserListSource};
pub use user_records::{load_user_records, UserRecords};
