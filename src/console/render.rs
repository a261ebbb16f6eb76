// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Drawing. Reads view state only; never mutates the controllers.

use crate::console::app::App;
use crate::console::confirm::{Choice, ConfirmDialog};
use crate::console::detail::DetailViewState;
use crate::console::list::ListViewState;
use crate::models::DisplayItem;
use crate::time_utils::format_short;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Row, Table, TableState, Wrap};
use ratatui::Frame;

const APP_NAME: &str = "Arrogance Admin";
const LIST_HELP: &str = "j/k move  h/l page  enter open  r reload  q quit";
const DETAIL_HELP: &str = "esc back  ctrl+d delete  r reload  q quit";
const CONFIRM_HELP: &str = "h/l or tab switch  enter apply  esc cancel";

/// Render a full frame: header, body, footer.
pub fn ui(frame: &mut Frame<'_>, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(5),
            Constraint::Length(2),
        ])
        .split(frame.area());

    render_header(frame, chunks[0], app);

    let help = match app.detail() {
        Some(detail) => {
            let view = detail.view();
            render_detail(frame, chunks[1], &view);
            if let Some(dialog) = view.confirm {
                render_confirm(frame, chunks[1], dialog);
                CONFIRM_HELP
            } else {
                DETAIL_HELP
            }
        }
        None => {
            render_list(frame, chunks[1], &app.list().view());
            LIST_HELP
        }
    };

    let footer = Paragraph::new(help)
        .style(Style::default().fg(Color::DarkGray))
        .block(Block::default().borders(Borders::TOP));
    frame.render_widget(footer, chunks[2]);
}

fn render_header(frame: &mut Frame<'_>, area: Rect, app: &App) {
    let line = Line::from(vec![
        Span::styled(
            APP_NAME,
            Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" • "),
        Span::styled(app.title(), Style::default().fg(Color::Cyan)),
    ]);
    let header = Paragraph::new(line).block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, area);
}

fn render_list(frame: &mut Frame<'_>, area: Rect, view: &ListViewState<'_>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(area);

    let rows: Vec<Row> = view
        .users
        .iter()
        .map(|user| {
            Row::new(vec![
                user.id.clone(),
                user.email.clone().unwrap_or_default(),
                format_short(user.created_at),
                format_short(user.last_refresh_at.or(user.last_login_at)),
            ])
        })
        .collect();

    let title = if view.loading { " Users (loading...) " } else { " Users " };
    let table = Table::new(
        rows,
        [
            Constraint::Percentage(35),
            Constraint::Percentage(30),
            Constraint::Percentage(17),
            Constraint::Percentage(18),
        ],
    )
    .header(
        Row::new(vec!["UID", "Email", "Created at", "Last login"])
            .style(Style::default().add_modifier(Modifier::BOLD)),
    )
    .block(Block::default().title(title).borders(Borders::ALL))
    .row_highlight_style(
        Style::default()
            .fg(Color::Magenta)
            .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol("> ");

    if view.users.is_empty() && !view.loading {
        let empty = Paragraph::new("No users found")
            .style(Style::default().add_modifier(Modifier::ITALIC))
            .block(Block::default().title(title).borders(Borders::ALL));
        frame.render_widget(empty, chunks[0]);
    } else {
        let mut state = TableState::default().with_selected(view.cursor);
        frame.render_stateful_widget(table, chunks[0], &mut state);
    }

    let mut pager = Vec::new();
    if view.current_page > 0 {
        pager.push(Span::raw("← Prev | "));
    }
    pager.push(Span::styled(
        format!("Page {}", view.current_page + 1),
        Style::default().add_modifier(Modifier::BOLD),
    ));
    if view.has_next_page {
        pager.push(Span::raw(" | Next →"));
    }
    frame.render_widget(Paragraph::new(Line::from(pager)), chunks[1]);

    if let Some(error) = view.error {
        let error = Paragraph::new(error).style(Style::default().fg(Color::Red));
        frame.render_widget(error, chunks[2]);
    }
}

fn render_detail(frame: &mut Frame<'_>, area: Rect, view: &DetailViewState<'_>) {
    let mut lines = vec![
        Line::from(Span::styled(
            view.user.id.as_str(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(format!(
            "Email: {}",
            view.user.email.as_deref().unwrap_or("-")
        )),
        Line::from(format!(
            "Created at: {}   Last login: {}",
            format_short(view.user.created_at),
            format_short(view.user.last_login_at)
        )),
        Line::default(),
    ];

    if view.loading {
        lines.push(italic("Loading..."));
    } else if let Some(error) = view.error {
        lines.push(Line::from(Span::styled(
            error,
            Style::default().fg(Color::Red),
        )));
        lines.push(italic("Press r to retry."));
    } else if view.empty {
        lines.push(italic("No data for this user."));
    } else {
        push_section(&mut lines, "Profiles", view.profiles);
        push_section(&mut lines, "Exercises", view.exercises);
        push_section(&mut lines, "Histories", view.histories);
    }

    if view.deleting {
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(
            "Deleting user...",
            Style::default().fg(Color::Yellow),
        )));
    }
    if let Some(error) = view.deletion_error {
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(
            error,
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )));
    }

    let detail = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(Block::default().title(" User ").borders(Borders::ALL));
    frame.render_widget(detail, area);
}

fn push_section<'a>(lines: &mut Vec<Line<'a>>, title: &'a str, items: &'a [DisplayItem]) {
    lines.push(Line::from(Span::styled(
        title,
        Style::default()
            .fg(Color::Magenta)
            .add_modifier(Modifier::BOLD),
    )));
    if items.is_empty() {
        lines.push(italic("  none"));
    }
    for item in items {
        lines.push(Line::from(format!("  {}  {}", item.label, item.id)));
    }
    lines.push(Line::default());
}

fn italic(text: &str) -> Line<'_> {
    Line::from(Span::styled(
        text,
        Style::default().add_modifier(Modifier::ITALIC),
    ))
}

fn render_confirm(frame: &mut Frame<'_>, area: Rect, dialog: &ConfirmDialog) {
    let area = centered(area, 60, 7);

    let button = |label: &'static str, choice: Choice, color: Color| {
        let style = if dialog.choice() == choice {
            Style::default()
                .fg(color)
                .add_modifier(Modifier::BOLD | Modifier::REVERSED)
        } else {
            Style::default().fg(Color::Gray)
        };
        Span::styled(label, style)
    };

    let text = vec![
        Line::from(dialog.message.as_str()),
        Line::default(),
        Line::from(vec![
            button(" Yes ", Choice::Confirm, Color::Red),
            Span::raw("   "),
            button(" No ", Choice::Cancel, Color::Green),
        ])
        .alignment(Alignment::Center),
    ];

    let popup = Paragraph::new(text).wrap(Wrap { trim: true }).block(
        Block::default()
            .title(format!(" {} ", dialog.title))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Red)),
    );
    frame.render_widget(Clear, area);
    frame.render_widget(popup, area);
}

/// A `width`% wide, `height` rows tall rectangle centered in `area`.
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(height),
            Constraint::Fill(1),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - width) / 2),
            Constraint::Percentage(width),
            Constraint::Percentage((100 - width) / 2),
        ])
        .split(vertical[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryBackend;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;
    use std::sync::Arc;

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        buffer
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect::<String>()
    }

    #[tokio::test]
    async fn test_renders_list_frame() {
        let backend = Arc::new(MemoryBackend::demo());
        let (mut app, mut rx) = App::new(backend.clone(), backend, 3, "demo");
        app.start();
        let completion = rx.recv().await.unwrap();
        app.on_completion(completion);

        let mut terminal = Terminal::new(TestBackend::new(100, 20)).unwrap();
        terminal.draw(|frame| ui(frame, &app)).unwrap();

        let text = screen_text(&terminal);
        assert!(text.contains(APP_NAME));
        assert!(text.contains("user-001"));
        assert!(text.contains("Page 1"));
        assert!(text.contains("Next"));
    }
}
