// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Terminal console: controllers, key bindings, event loop and drawing.

pub mod app;
pub mod confirm;
pub mod detail;
pub mod keys;
pub mod list;
pub mod pages;
pub mod render;

pub use app::{run_app, App, Completion};
pub use detail::{DetailCommand, DetailEffect, DetailTicket, UserDetailController};
pub use list::{ListCommand, ListEffect, PageRequest, UserListController};
pub use pages::{PageCursorTracker, PageToken};
