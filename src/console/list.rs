// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Paginated user list.
//!
//! The controller never performs I/O. Commands return a [`ListEffect`]; a
//! `Fetch` effect is carried out by the caller, whose result comes back
//! through [`UserListController::apply_page`] tagged with the generation of
//! the request. Only the latest generation is applied.

use crate::console::pages::{PageCursorTracker, PageToken};
use crate::error::{AppError, Result};
use crate::models::{UserPage, UserRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListPhase {
    /// Not mounted yet.
    Idle,
    Loading,
    Ready,
    /// Last fetch failed; previous rows are still shown.
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListCommand {
    MoveUp,
    MoveDown,
    NextPage,
    PrevPage,
    Select,
    Reload,
}

/// A page fetch the caller must perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub generation: u64,
    pub page: usize,
    pub page_size: u32,
    pub token: Option<PageToken>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListEffect {
    None,
    Fetch(PageRequest),
    Selected(UserRecord),
}

/// Render-ready snapshot of the list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListViewState<'a> {
    pub users: &'a [UserRecord],
    /// `None` when there are no rows
    pub cursor: Option<usize>,
    pub current_page: usize,
    pub has_next_page: bool,
    pub loading: bool,
    pub error: Option<&'a str>,
}

pub struct UserListController {
    page_size: u32,
    pages: PageCursorTracker,
    phase: ListPhase,
    users: Vec<UserRecord>,
    /// Always `< users.len()` when `users` is non-empty, 0 otherwise.
    cursor: usize,
    current_page: usize,
    /// Page whose rows are in `users`.
    loaded_page: usize,
    has_next_page: bool,
    error: Option<String>,
    generation: u64,
}

impl UserListController {
    pub fn new(page_size: u32) -> Self {
        Self {
            page_size,
            pages: PageCursorTracker::new(),
            phase: ListPhase::Idle,
            users: Vec::new(),
            cursor: 0,
            current_page: 0,
            loaded_page: 0,
            has_next_page: false,
            error: None,
            generation: 0,
        }
    }

    /// Start loading the first page. Only the first call has an effect.
    pub fn mount(&mut self) -> ListEffect {
        if self.phase != ListPhase::Idle {
            return ListEffect::None;
        }
        self.begin_fetch(None)
    }

    pub fn handle(&mut self, command: ListCommand) -> ListEffect {
        if matches!(self.phase, ListPhase::Idle | ListPhase::Loading) {
            tracing::debug!(?command, phase = ?self.phase, "Ignoring list command");
            return ListEffect::None;
        }

        match command {
            ListCommand::MoveUp => {
                self.cursor = self.cursor.saturating_sub(1);
                ListEffect::None
            }
            ListCommand::MoveDown => {
                if self.cursor + 1 < self.users.len() {
                    self.cursor += 1;
                }
                ListEffect::None
            }
            ListCommand::Select => self
                .users
                .get(self.cursor)
                .cloned()
                .map_or(ListEffect::None, ListEffect::Selected),
            ListCommand::NextPage => self.next_page(),
            ListCommand::PrevPage => self.prev_page(),
            ListCommand::Reload => self.reload(),
        }
    }

    /// Re-fetch the current page whatever the phase, dropping any fetch
    /// still in flight. Used after a user has been deleted.
    pub fn invalidate(&mut self) -> ListEffect {
        if self.phase == ListPhase::Idle {
            return self.mount();
        }
        self.current_page = self.loaded_page;
        self.reload()
    }

    /// Apply the outcome of a fetch. Returns `false` if it was stale.
    pub fn apply_page(&mut self, generation: u64, result: Result<UserPage>) -> bool {
        if self.phase != ListPhase::Loading || generation != self.generation {
            tracing::debug!(
                generation,
                current = self.generation,
                "Discarding stale page"
            );
            return false;
        }

        match result {
            Ok(page) => {
                tracing::debug!(
                    page = self.current_page,
                    count = page.users.len(),
                    "Page loaded"
                );
                self.has_next_page = page.next_page_token.is_some();
                self.users = page.users;
                self.cursor = 0;
                self.loaded_page = self.current_page;
                self.error = None;
                self.phase = ListPhase::Ready;
            }
            Err(e) => {
                let err = AppError::Fetch(e.to_string());
                tracing::warn!(page = self.current_page, error = %err, "Page load failed");
                self.error = Some(err.to_string());
                self.current_page = self.loaded_page;
                self.phase = ListPhase::Error;
            }
        }
        true
    }

    pub fn view(&self) -> ListViewState<'_> {
        ListViewState {
            users: &self.users,
            cursor: (!self.users.is_empty()).then_some(self.cursor),
            current_page: self.current_page,
            has_next_page: self.has_next_page,
            loading: self.phase == ListPhase::Loading,
            error: self.error.as_deref(),
        }
    }

    pub fn phase(&self) -> ListPhase {
        self.phase
    }

    pub fn users(&self) -> &[UserRecord] {
        &self.users
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn has_next_page(&self) -> bool {
        self.has_next_page
    }

    pub fn is_loading(&self) -> bool {
        self.phase == ListPhase::Loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    fn next_page(&mut self) -> ListEffect {
        let Some(last) = self.users.last() else {
            return ListEffect::None;
        };
        if !self.has_next_page {
            return ListEffect::None;
        }

        let next = self.current_page + 1;
        let token = match self
            .pages
            .record_token(next, last.id.clone())
            .and_then(|_| self.pages.token_for(next))
        {
            Ok(token) => token,
            Err(e) => return self.navigation_defect(e),
        };

        self.current_page = next;
        self.cursor = 0;
        self.begin_fetch(token)
    }

    fn prev_page(&mut self) -> ListEffect {
        if self.current_page == 0 {
            return ListEffect::None;
        }

        let prev = self.current_page - 1;
        let token = match self.pages.token_for(prev) {
            Ok(token) => token,
            Err(e) => return self.navigation_defect(e),
        };

        self.current_page = prev;
        self.cursor = 0;
        self.begin_fetch(token)
    }

    fn reload(&mut self) -> ListEffect {
        match self.pages.token_for(self.current_page) {
            Ok(token) => self.begin_fetch(token),
            Err(e) => self.navigation_defect(e),
        }
    }

    fn begin_fetch(&mut self, token: Option<PageToken>) -> ListEffect {
        self.generation += 1;
        self.phase = ListPhase::Loading;

        tracing::debug!(
            page = self.current_page,
            generation = self.generation,
            "Requesting page"
        );

        ListEffect::Fetch(PageRequest {
            generation: self.generation,
            page: self.current_page,
            page_size: self.page_size,
            token,
        })
    }

    fn navigation_defect(&mut self, err: AppError) -> ListEffect {
        tracing::error!(page = self.current_page, error = %err, "Page history out of step");
        if err.is_user_facing() {
            self.error = Some(err.to_string());
        }
        ListEffect::None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn users(ids: &[&str]) -> Vec<UserRecord> {
        ids.iter().map(|id| UserRecord::new(*id)).collect()
    }

    fn page(ids: &[&str], more: bool) -> Result<UserPage> {
        Ok(UserPage {
            users: users(ids),
            next_page_token: more.then(|| ids.last().unwrap().to_string()),
        })
    }

    fn fetch(effect: ListEffect) -> PageRequest {
        match effect {
            ListEffect::Fetch(request) => request,
            other => panic!("Expected fetch, got {:?}", other),
        }
    }

    #[test]
    fn test_mount_requests_first_page() {
        let mut list = UserListController::new(3);
        let request = fetch(list.mount());
        assert_eq!(request.page, 0);
        assert_eq!(request.page_size, 3);
        assert!(request.token.is_none());
        assert!(list.is_loading());

        // A second mount does nothing.
        assert_eq!(list.mount(), ListEffect::None);
    }

    #[test]
    fn test_commands_ignored_while_loading() {
        let mut list = UserListController::new(3);
        list.mount();
        for command in [
            ListCommand::MoveDown,
            ListCommand::NextPage,
            ListCommand::PrevPage,
            ListCommand::Select,
            ListCommand::Reload,
        ] {
            assert_eq!(list.handle(command), ListEffect::None);
        }
        assert_eq!(list.current_page(), 0);
        assert_eq!(list.cursor(), 0);
    }

    #[test]
    fn test_cursor_clamped() {
        let mut list = UserListController::new(3);
        let request = fetch(list.mount());
        list.apply_page(request.generation, page(&["a", "b"], false));

        list.handle(ListCommand::MoveUp);
        assert_eq!(list.cursor(), 0);
        list.handle(ListCommand::MoveDown);
        list.handle(ListCommand::MoveDown);
        list.handle(ListCommand::MoveDown);
        assert_eq!(list.cursor(), 1);

        assert_eq!(
            list.handle(ListCommand::Select),
            ListEffect::Selected(UserRecord::new("b"))
        );
    }

    #[test]
    fn test_empty_list() {
        let mut list = UserListController::new(3);
        let request = fetch(list.mount());
        list.apply_page(request.generation, page(&[], false));

        assert_eq!(list.view().cursor, None);
        assert_eq!(list.handle(ListCommand::MoveDown), ListEffect::None);
        assert_eq!(list.handle(ListCommand::Select), ListEffect::None);
        assert_eq!(list.handle(ListCommand::NextPage), ListEffect::None);
    }

    #[test]
    fn test_next_page_uses_last_user_id() {
        let mut list = UserListController::new(2);
        let first = fetch(list.mount());
        list.apply_page(first.generation, page(&["a", "b"], true));
        list.handle(ListCommand::MoveDown);

        let second = fetch(list.handle(ListCommand::NextPage));
        assert_eq!(second.page, 1);
        assert_eq!(second.token.as_deref(), Some("b"));
        assert_eq!(list.cursor(), 0);
    }

    #[test]
    fn test_stale_page_discarded() {
        let mut list = UserListController::new(2);
        let first = fetch(list.mount());
        list.apply_page(first.generation, page(&["a", "b"], true));

        let reload = fetch(list.handle(ListCommand::Reload));
        let newer = fetch(list.invalidate());
        assert!(!list.apply_page(reload.generation, page(&["x"], false)));
        assert!(list.is_loading());
        assert!(list.apply_page(newer.generation, page(&["a", "c"], false)));
        assert_eq!(list.users()[1].id, "c");
    }

    #[test]
    fn test_failed_page_rolls_back() {
        let mut list = UserListController::new(2);
        let first = fetch(list.mount());
        list.apply_page(first.generation, page(&["a", "b"], true));

        let second = fetch(list.handle(ListCommand::NextPage));
        list.apply_page(second.generation, Err(AppError::Identity("boom".to_string())));

        assert_eq!(list.phase(), ListPhase::Error);
        assert_eq!(list.current_page(), 0);
        assert_eq!(list.users().len(), 2);
        assert!(list.error().unwrap().contains("boom"));

        // Re-issuing the command retries the same page.
        let retry = fetch(list.handle(ListCommand::NextPage));
        assert_eq!(retry.page, 1);
        assert_eq!(retry.token.as_deref(), Some("b"));
        list.apply_page(retry.generation, page(&["c"], false));
        assert_eq!(list.phase(), ListPhase::Ready);
        assert!(list.error().is_none());
    }

    #[test]
    fn test_failed_first_load_retried_with_reload() {
        let mut list = UserListController::new(2);
        let first = fetch(list.mount());
        list.apply_page(first.generation, Err(AppError::Identity("offline".to_string())));
        assert_eq!(list.phase(), ListPhase::Error);
        assert_eq!(list.handle(ListCommand::NextPage), ListEffect::None);

        let retry = fetch(list.handle(ListCommand::Reload));
        assert!(retry.token.is_none());
    }
}
