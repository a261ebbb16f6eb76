// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! History of pagination tokens.
//!
//! The list source only cursors forward, so the token that reached each
//! page is remembered the first time that page is visited. Going back is a
//! lookup, never a re-derivation.

use crate::error::{AppError, Result};

/// Opaque continuation token issued by the list source.
pub type PageToken = String;

/// Tokens for pages visited so far. Pages are zero-based; page 0 needs no
/// token, so slot `i` holds the token that reaches page `i + 1`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageCursorTracker {
    tokens: Vec<PageToken>,
}

impl PageCursorTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remember the token that reaches `page`.
    ///
    /// Returns `true` if the token was appended, `false` if `page` is the
    /// first page or already has a token (the first token recorded wins).
    /// Recording a page beyond the next unvisited one is an error.
    pub fn record_token(&mut self, page: usize, token: PageToken) -> Result<bool> {
        let Some(slot) = page.checked_sub(1) else {
            return Ok(false);
        };

        match slot.cmp(&self.tokens.len()) {
            std::cmp::Ordering::Less => Ok(false),
            std::cmp::Ordering::Equal => {
                self.tokens.push(token);
                Ok(true)
            }
            std::cmp::Ordering::Greater => Err(AppError::OutOfRange { page }),
        }
    }

    /// Token that reaches `page`; `None` for the first page.
    pub fn token_for(&self, page: usize) -> Result<Option<PageToken>> {
        match page.checked_sub(1) {
            None => Ok(None),
            Some(slot) => self
                .tokens
                .get(slot)
                .cloned()
                .map(Some)
                .ok_or(AppError::OutOfRange { page }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_page_has_no_token() {
        let mut pages = PageCursorTracker::new();
        assert_eq!(pages.token_for(0).unwrap(), None);
        assert!(!pages.record_token(0, "ignored".to_string()).unwrap());
        assert_eq!(pages.token_for(0).unwrap(), None);
        assert!(pages.token_for(1).is_err());
    }

    #[test]
    fn test_record_and_lookup() {
        let mut pages = PageCursorTracker::new();
        assert!(pages.record_token(1, "c".to_string()).unwrap());
        assert!(pages.record_token(2, "f".to_string()).unwrap());

        assert_eq!(pages.token_for(1).unwrap().as_deref(), Some("c"));
        assert_eq!(pages.token_for(2).unwrap().as_deref(), Some("f"));
        assert!(pages.token_for(3).is_err());
    }

    #[test]
    fn test_revisit_keeps_first_token() {
        let mut pages = PageCursorTracker::new();
        pages.record_token(1, "c".to_string()).unwrap();
        assert!(!pages.record_token(1, "other".to_string()).unwrap());
        assert_eq!(pages.token_for(1).unwrap().as_deref(), Some("c"));
    }

    #[test]
    fn test_gap_is_out_of_range() {
        let mut pages = PageCursorTracker::new();
        let err = pages.record_token(2, "f".to_string()).unwrap_err();
        assert!(matches!(err, AppError::OutOfRange { page: 2 }));
        assert!(!err.is_user_facing());
    }

    #[test]
    fn test_unvisited_page_is_out_of_range() {
        let pages = PageCursorTracker::new();
        assert!(matches!(
            pages.token_for(1),
            Err(AppError::OutOfRange { page: 1 })
        ));
    }
}
