// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Drawing the console into an off-screen buffer.

use arrogance_admin::console::render::ui;
use arrogance_admin::db::memory::Fault;
use arrogance_admin::db::MemoryBackend;
use arrogance_admin::models::{Collection, UserRecord};
use crossterm::event::KeyCode;
use ratatui::backend::TestBackend;
use ratatui::Terminal;
use std::sync::Arc;

mod common;
use common::{ctrl, history, press, profile, settle, start_app};

fn draw(app: &arrogance_admin::console::App) -> String {
    let mut terminal = Terminal::new(TestBackend::new(100, 24)).unwrap();
    terminal.draw(|frame| ui(frame, app)).unwrap();
    terminal
        .backend()
        .buffer()
        .content()
        .iter()
        .map(|cell| cell.symbol())
        .collect()
}

fn backend() -> Arc<MemoryBackend> {
    let backend = MemoryBackend::new();
    backend.insert_user(UserRecord::new("alice"));
    backend.insert_user(UserRecord::new("bob"));
    backend.insert_record(profile("p1", "alice"));
    backend.insert_record(history("h1", "alice", "Push day"));
    Arc::new(backend)
}

#[tokio::test]
async fn test_detail_screen_shows_sections() {
    let (mut app, mut rx) = start_app(backend(), 10);
    settle(&mut app, &mut rx).await;
    press(&mut app, &mut rx, KeyCode::Enter).await;

    let screen = draw(&app);
    assert!(screen.contains("alice"));
    assert!(screen.contains("Profiles"));
    assert!(screen.contains("Exercises"));
    assert!(screen.contains("Push day"));
}

#[tokio::test]
async fn test_empty_user_screen() {
    let (mut app, mut rx) = start_app(backend(), 10);
    settle(&mut app, &mut rx).await;
    press(&mut app, &mut rx, KeyCode::Down).await;
    press(&mut app, &mut rx, KeyCode::Enter).await;

    let screen = draw(&app);
    assert!(screen.contains("bob"));
    assert!(screen.contains("No data for this user."));
}

#[tokio::test]
async fn test_confirm_popup_drawn_over_detail() {
    let (mut app, mut rx) = start_app(backend(), 10);
    settle(&mut app, &mut rx).await;
    press(&mut app, &mut rx, KeyCode::Enter).await;
    app.on_key(ctrl('d'));

    let screen = draw(&app);
    assert!(screen.contains("Delete user"));
    assert!(screen.contains("Yes"));
    assert!(screen.contains("No"));
}

#[tokio::test]
async fn test_list_error_drawn_under_table() {
    let backend = backend();
    backend.fail_on(Fault::ListUsers);
    let (mut app, mut rx) = start_app(backend, 10);
    settle(&mut app, &mut rx).await;

    let screen = draw(&app);
    assert!(screen.contains("Failed to load users"));
}

#[tokio::test]
async fn test_load_error_offers_retry() {
    let backend = backend();
    backend.fail_on(Fault::Query(Collection::Profiles));
    let (mut app, mut rx) = start_app(backend, 10);
    settle(&mut app, &mut rx).await;
    press(&mut app, &mut rx, KeyCode::Enter).await;

    let screen = draw(&app);
    assert!(screen.contains("Press r to retry."));
}

#[tokio::test]
async fn test_quit_from_list_and_detail() {
    let (mut app, mut rx) = start_app(backend(), 10);
    settle(&mut app, &mut rx).await;
    press(&mut app, &mut rx, KeyCode::Enter).await;
    assert!(!app.should_quit());

    press(&mut app, &mut rx, KeyCode::Char('q')).await;
    assert!(app.should_quit());
}
