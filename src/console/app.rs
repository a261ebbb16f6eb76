// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Console shell: routes keys to the active screen and runs the effects
//! the controllers ask for.
//!
//! Remote calls run as spawned tasks. Each one sends a [`Completion`] back
//! over the channel returned by [`App::new`], and the event loop applies it.
//! Only the loop touches controller state.

use crate::console::detail::{DetailEffect, DetailTicket, UserDetailController};
use crate::console::keys::{map_key, Input, KeyContext};
use crate::console::list::{ListEffect, PageRequest, UserListController};
use crate::console::render::ui;
use crate::db::RecordStore;
use crate::error::Result;
use crate::models::{UserPage, UserRecord};
use crate::services::{
    delete_user_cascade, load_user_records, DeletionReport, UserListSource, UserRecords,
};
use crossterm::event::{Event, EventStream, KeyEvent};
use futures_util::StreamExt;
use ratatui::backend::Backend;
use ratatui::Terminal;
use std::io;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Result of a spawned remote call.
#[derive(Debug)]
pub enum Completion {
    Page {
        generation: u64,
        result: Result<UserPage>,
    },
    Records {
        ticket: DetailTicket,
        result: Result<UserRecords>,
    },
    Deletion {
        ticket: DetailTicket,
        result: Result<DeletionReport>,
    },
}

pub struct App {
    users: Arc<dyn UserListSource>,
    store: Arc<dyn RecordStore>,
    tx: mpsc::UnboundedSender<Completion>,
    list: UserListController,
    detail: Option<UserDetailController>,
    next_epoch: u64,
    /// Spawned calls whose completion has not been applied yet.
    pending: usize,
    title: String,
    should_quit: bool,
}

impl App {
    pub fn new(
        users: Arc<dyn UserListSource>,
        store: Arc<dyn RecordStore>,
        page_size: u32,
        title: impl Into<String>,
    ) -> (Self, mpsc::UnboundedReceiver<Completion>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let app = Self {
            users,
            store,
            tx,
            list: UserListController::new(page_size),
            detail: None,
            next_epoch: 0,
            pending: 0,
            title: title.into(),
            should_quit: false,
        };
        (app, rx)
    }

    /// Mount the user list. Must be called from within a tokio runtime.
    pub fn start(&mut self) {
        let effect = self.list.mount();
        self.run_list_effect(effect);
    }

    pub fn list(&self) -> &UserListController {
        &self.list
    }

    pub fn detail(&self) -> Option<&UserDetailController> {
        self.detail.as_ref()
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn pending(&self) -> usize {
        self.pending
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn key_context(&self) -> KeyContext {
        match &self.detail {
            Some(detail) if detail.is_confirming() => KeyContext::Confirm,
            Some(_) => KeyContext::Detail,
            None => KeyContext::List,
        }
    }

    pub fn on_key(&mut self, key: KeyEvent) {
        let Some(input) = map_key(key, self.key_context()) else {
            return;
        };

        match input {
            Input::Quit if self.detail.as_ref().is_some_and(|d| d.is_deleting()) => {
                tracing::warn!("Ignoring quit while a deletion is in flight");
            }
            Input::Quit => {
                tracing::info!("Quit requested");
                self.should_quit = true;
            }
            Input::List(command) => {
                let effect = self.list.handle(command);
                self.run_list_effect(effect);
            }
            Input::Detail(command) => {
                if let Some(detail) = self.detail.as_mut() {
                    let effect = detail.handle(command);
                    self.run_detail_effect(effect);
                }
            }
        }
    }

    pub fn on_completion(&mut self, completion: Completion) {
        self.pending = self.pending.saturating_sub(1);

        match completion {
            Completion::Page { generation, result } => {
                self.list.apply_page(generation, result);
            }
            Completion::Records { ticket, result } => match self.live_detail(ticket) {
                Some(detail) => {
                    detail.apply_load(ticket, result);
                }
                None => tracing::debug!(?ticket, "Dropping records for a closed detail view"),
            },
            Completion::Deletion { ticket, result } => {
                let Some(detail) = self.live_detail(ticket) else {
                    tracing::debug!(?ticket, "Dropping deletion result for a closed detail view");
                    return;
                };
                match detail.apply_deletion(ticket, result) {
                    DetailEffect::GoBack => {
                        self.detail = None;
                        // The deleted user must disappear from the current page.
                        let effect = self.list.invalidate();
                        self.run_list_effect(effect);
                    }
                    effect => self.run_detail_effect(effect),
                }
            }
        }
    }

    fn live_detail(&mut self, ticket: DetailTicket) -> Option<&mut UserDetailController> {
        self.detail
            .as_mut()
            .filter(|detail| detail.epoch() == ticket.epoch)
    }

    fn run_list_effect(&mut self, effect: ListEffect) {
        match effect {
            ListEffect::None => {}
            ListEffect::Fetch(request) => self.spawn_page_fetch(request),
            ListEffect::Selected(user) => self.open_detail(user),
        }
    }

    fn run_detail_effect(&mut self, effect: DetailEffect) {
        match effect {
            DetailEffect::None => {}
            DetailEffect::GoBack => self.detail = None,
            DetailEffect::Load { ticket, uid } => {
                let store = Arc::clone(&self.store);
                self.spawn(async move {
                    let result = load_user_records(store.as_ref(), &uid).await;
                    Completion::Records { ticket, result }
                });
            }
            DetailEffect::Delete { ticket, uid } => {
                let store = Arc::clone(&self.store);
                self.spawn(async move {
                    let result = delete_user_cascade(store.as_ref(), &uid).await;
                    Completion::Deletion { ticket, result }
                });
            }
        }
    }

    fn open_detail(&mut self, user: UserRecord) {
        self.next_epoch += 1;
        tracing::debug!(uid = %user.id, epoch = self.next_epoch, "Opening user");
        let mut detail = UserDetailController::new(self.next_epoch, user);
        let effect = detail.activate();
        self.detail = Some(detail);
        self.run_detail_effect(effect);
    }

    fn spawn_page_fetch(&mut self, request: PageRequest) {
        let users = Arc::clone(&self.users);
        self.spawn(async move {
            let result = users
                .fetch_page(request.page_size, request.token.as_deref())
                .await;
            Completion::Page {
                generation: request.generation,
                result,
            }
        });
    }

    fn spawn<F>(&mut self, task: F)
    where
        F: std::future::Future<Output = Completion> + Send + 'static,
    {
        self.pending += 1;
        let tx = self.tx.clone();
        tokio::spawn(async move {
            // The receiver only goes away when the console is shutting down.
            let _ = tx.send(task.await);
        });
    }
}

/// Drive the console until the operator quits.
///
/// Renders a frame, then waits for either a terminal event or a completed
/// remote call, one at a time.
pub async fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    mut app: App,
    mut completions: mpsc::UnboundedReceiver<Completion>,
) -> io::Result<()> {
    let mut events = EventStream::new();
    app.start();

    loop {
        terminal.draw(|frame| ui(frame, &app))?;

        tokio::select! {
            maybe_event = events.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key))) => app.on_key(key),
                    Some(Ok(_)) => {}
                    Some(Err(e)) => return Err(e),
                    None => break,
                }
            }
            Some(completion) = completions.recv() => {
                app.on_completion(completion);
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
