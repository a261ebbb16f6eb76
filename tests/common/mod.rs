// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use arrogance_admin::console::{App, Completion};
use arrogance_admin::db::{FirestoreDb, MemoryBackend};
use arrogance_admin::models::{
    ChildRecord, Exercise, History, Profile, Routine, UserRecord, Workout,
};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::sync::Arc;
use tokio::sync::mpsc;

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Create a test database connection.
#[allow(dead_code)]
pub async fn test_db() -> FirestoreDb {
    FirestoreDb::new("test-project", None)
        .await
        .expect("Failed to connect to Firestore emulator")
}

/// Unique ID for test isolation against a shared emulator.
#[allow(dead_code)]
pub fn unique_id(prefix: &str) -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    format!("{}-{}", prefix, nanos)
}

/// A backend holding users with the given IDs and no records.
#[allow(dead_code)]
pub fn backend_with_users(ids: &[&str]) -> Arc<MemoryBackend> {
    let backend = MemoryBackend::new();
    for id in ids {
        backend.insert_user(UserRecord::new(*id));
    }
    Arc::new(backend)
}

#[allow(dead_code)]
pub fn profile(id: &str, uid: &str) -> ChildRecord {
    ChildRecord::Profile(Profile {
        id: id.to_string(),
        uid: uid.to_string(),
        name: format!("Profile {}", id),
        created_at: None,
        updated_at: None,
    })
}

#[allow(dead_code)]
pub fn exercise(id: &str, uid: &str) -> ChildRecord {
    ChildRecord::Exercise(Exercise {
        id: id.to_string(),
        uid: uid.to_string(),
        name: format!("Exercise {}", id),
        created_at: None,
        updated_at: None,
    })
}

#[allow(dead_code)]
pub fn history(id: &str, uid: &str, workout: &str) -> ChildRecord {
    ChildRecord::History(History {
        id: id.to_string(),
        uid: uid.to_string(),
        workout: Workout {
            name: workout.to_string(),
            date: None,
        },
        created_at: None,
        updated_at: None,
    })
}

#[allow(dead_code)]
pub fn routine(id: &str, uid: &str) -> ChildRecord {
    ChildRecord::Routine(Routine {
        id: id.to_string(),
        uid: uid.to_string(),
        name: format!("Routine {}", id),
        created_at: None,
        updated_at: None,
    })
}

/// Console wired to a memory backend, with the list already mounted.
#[allow(dead_code)]
pub fn start_app(
    backend: Arc<MemoryBackend>,
    page_size: u32,
) -> (App, mpsc::UnboundedReceiver<Completion>) {
    let (mut app, rx) = App::new(backend.clone(), backend, page_size, "test");
    app.start();
    (app, rx)
}

/// Apply completions until no spawned call is outstanding.
#[allow(dead_code)]
pub async fn settle(app: &mut App, rx: &mut mpsc::UnboundedReceiver<Completion>) {
    while app.pending() > 0 {
        let completion = rx.recv().await.expect("completion channel closed");
        app.on_completion(completion);
    }
}

#[allow(dead_code)]
pub fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

#[allow(dead_code)]
pub fn ctrl(c: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
}

/// Press `code` and wait for any call it starts.
#[allow(dead_code)]
pub async fn press(app: &mut App, rx: &mut mpsc::UnboundedReceiver<Completion>, code: KeyCode) {
    app.on_key(key(code));
    settle(app, rx).await;
}
