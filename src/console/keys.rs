// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Key bindings.

use crate::console::confirm::ConfirmKey;
use crate::console::detail::DetailCommand;
use crate::console::list::ListCommand;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Which screen (or overlay) receives the key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyContext {
    List,
    Detail,
    Confirm,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    Quit,
    List(ListCommand),
    Detail(DetailCommand),
}

/// Map a key press to an input for `context`. Unbound keys map to `None`.
pub fn map_key(key: KeyEvent, context: KeyContext) -> Option<Input> {
    if key.kind != KeyEventKind::Press {
        return None;
    }

    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    if ctrl && key.code == KeyCode::Char('c') {
        return Some(Input::Quit);
    }

    match context {
        KeyContext::Confirm => {
            let key = match key.code {
                KeyCode::Left
                | KeyCode::Right
                | KeyCode::Tab
                | KeyCode::BackTab
                | KeyCode::Char('h')
                | KeyCode::Char('l') => ConfirmKey::Toggle,
                KeyCode::Enter => ConfirmKey::Apply,
                KeyCode::Esc => ConfirmKey::Cancel,
                _ => return None,
            };
            Some(Input::Detail(DetailCommand::Confirm(key)))
        }
        KeyContext::Detail => {
            let command = match key.code {
                KeyCode::Char('d') if ctrl => DetailCommand::RequestDelete,
                KeyCode::Esc | KeyCode::Delete | KeyCode::Backspace => DetailCommand::Back,
                KeyCode::Char('r') => DetailCommand::Reload,
                KeyCode::Char('q') => return Some(Input::Quit),
                _ => return None,
            };
            Some(Input::Detail(command))
        }
        KeyContext::List => {
            let command = match key.code {
                KeyCode::Down | KeyCode::Char('j') => ListCommand::MoveDown,
                KeyCode::Up | KeyCode::Char('k') => ListCommand::MoveUp,
                KeyCode::Right | KeyCode::Char('l') => ListCommand::NextPage,
                KeyCode::Left | KeyCode::Char('h') => ListCommand::PrevPage,
                KeyCode::Enter => ListCommand::Select,
                KeyCode::Char('r') => ListCommand::Reload,
                KeyCode::Char('q') => return Some(Input::Quit),
                _ => return None,
            };
            Some(Input::List(command))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    #[test]
    fn test_list_bindings() {
        let cases = [
            (KeyCode::Char('j'), ListCommand::MoveDown),
            (KeyCode::Down, ListCommand::MoveDown),
            (KeyCode::Char('k'), ListCommand::MoveUp),
            (KeyCode::Up, ListCommand::MoveUp),
            (KeyCode::Char('l'), ListCommand::NextPage),
            (KeyCode::Right, ListCommand::NextPage),
            (KeyCode::Char('h'), ListCommand::PrevPage),
            (KeyCode::Left, ListCommand::PrevPage),
            (KeyCode::Enter, ListCommand::Select),
            (KeyCode::Char('r'), ListCommand::Reload),
        ];
        for (code, command) in cases {
            assert_eq!(
                map_key(press(code), KeyContext::List),
                Some(Input::List(command)),
                "{:?}",
                code
            );
        }
        assert_eq!(map_key(press(KeyCode::Esc), KeyContext::List), None);
    }

    #[test]
    fn test_detail_bindings() {
        for code in [KeyCode::Esc, KeyCode::Delete, KeyCode::Backspace] {
            assert_eq!(
                map_key(press(code), KeyContext::Detail),
                Some(Input::Detail(DetailCommand::Back))
            );
        }
        assert_eq!(
            map_key(ctrl('d'), KeyContext::Detail),
            Some(Input::Detail(DetailCommand::RequestDelete))
        );
        assert_eq!(map_key(press(KeyCode::Char('d')), KeyContext::Detail), None);
        assert_eq!(map_key(press(KeyCode::Char('j')), KeyContext::Detail), None);
    }

    #[test]
    fn test_confirm_bindings() {
        let toggle = Some(Input::Detail(DetailCommand::Confirm(ConfirmKey::Toggle)));
        assert_eq!(map_key(press(KeyCode::Tab), KeyContext::Confirm), toggle);
        assert_eq!(map_key(press(KeyCode::Char('h')), KeyContext::Confirm), toggle);
        assert_eq!(
            map_key(press(KeyCode::Esc), KeyContext::Confirm),
            Some(Input::Detail(DetailCommand::Confirm(ConfirmKey::Cancel)))
        );
        // Quitting by letter is disabled while the dialog is open.
        assert_eq!(map_key(press(KeyCode::Char('q')), KeyContext::Confirm), None);
    }

    #[test]
    fn test_quit_everywhere() {
        for context in [KeyContext::List, KeyContext::Detail, KeyContext::Confirm] {
            assert_eq!(map_key(ctrl('c'), context), Some(Input::Quit));
        }
        assert_eq!(
            map_key(press(KeyCode::Char('q')), KeyContext::List),
            Some(Input::Quit)
        );
    }

    #[test]
    fn test_release_ignored() {
        let mut key = press(KeyCode::Char('j'));
        key.kind = KeyEventKind::Release;
        assert_eq!(map_key(key, KeyContext::List), None);
    }
}
