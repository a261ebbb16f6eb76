// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Arrogance Admin: terminal console for Firebase users and their data
//!
//! This crate provides a keyboard-driven console that pages through
//! Firebase Authentication users, shows the Firestore records each one
//! owns, and deletes a user together with everything they own.

pub mod config;
pub mod console;
pub mod db;
pub mod error;
pub mod models;
pub mod services;
pub mod time_utils;
