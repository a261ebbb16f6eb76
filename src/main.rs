// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Arrogance Admin console
//!
//! Browse Firebase Authentication users, inspect the Firestore records they
//! own, and delete a user with all of their data.

use anyhow::Context;
use arrogance_admin::{
    config::Config,
    console::{run_app, App},
    db::{MemoryBackend, RecordStore},
    services::{FirebaseBackend, UserListSource},
};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::fs::File;
use std::io::{self, IsTerminal};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Load configuration from environment
    let config = Config::from_env().context("Failed to load configuration")?;

    // The terminal belongs to the UI, so logs go to a file
    init_logging(&config.log_file)?;
    tracing::info!(
        project = %config.project_id,
        demo = config.demo,
        page_size = config.page_size,
        "Starting Arrogance Admin"
    );

    if !io::stdout().is_terminal() {
        anyhow::bail!("Arrogance Admin requires an interactive terminal");
    }

    let (users, store, title) = if config.demo {
        tracing::info!("Using seeded in-memory backend");
        as_sources(Arc::new(MemoryBackend::demo()), "demo".to_string())
    } else {
        let backend = FirebaseBackend::shared(&config)
            .await
            .context("Failed to connect to Firebase")?;
        as_sources(backend, config.project_id.clone())
    };

    let (app, completions) = App::new(users, store, config.page_size, title);

    let mut terminal = setup_terminal()?;
    let result = run_app(&mut terminal, app, completions).await;
    restore_terminal(&mut terminal)?;
    result?;

    tracing::info!("Exiting");
    Ok(())
}

type Sources = (Arc<dyn UserListSource>, Arc<dyn RecordStore>, String);

fn as_sources<B>(backend: Arc<B>, title: String) -> Sources
where
    B: UserListSource + RecordStore + 'static,
{
    (backend.clone(), backend, title)
}

/// Put the terminal into raw mode on the alternate screen.
fn setup_terminal() -> io::Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    stdout.execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;
    terminal.clear()?;
    Ok(terminal)
}

/// Undo `setup_terminal`.
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> io::Result<()> {
    disable_raw_mode()?;
    terminal.backend_mut().execute(LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Initialize structured JSON logging to `path`.
fn init_logging(path: &Path) -> anyhow::Result<()> {
    let file = File::options()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;

    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_ansi(false)
        .with_current_span(true)
        .flatten_event(true)
        .with_writer(Mutex::new(file));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "arrogance_admin=debug,info".into()),
        )
        .with(format)
        .init();

    Ok(())
}
