// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Yes/no confirmation dialog. Cancel is selected when it opens.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    Cancel,
    Confirm,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmKey {
    /// Switch between the two buttons.
    Toggle,
    /// Apply the selected button.
    Apply,
    /// Close without confirming.
    Cancel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmOutcome {
    Pending,
    Confirmed,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmDialog {
    pub title: String,
    pub message: String,
    choice: Choice,
}

impl ConfirmDialog {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            choice: Choice::Cancel,
        }
    }

    pub fn choice(&self) -> Choice {
        self.choice
    }

    pub fn handle(&mut self, key: ConfirmKey) -> ConfirmOutcome {
        match key {
            ConfirmKey::Toggle => {
                self.choice = match self.choice {
                    Choice::Cancel => Choice::Confirm,
                    Choice::Confirm => Choice::Cancel,
                };
                ConfirmOutcome::Pending
            }
            ConfirmKey::Apply => match self.choice {
                Choice::Confirm => ConfirmOutcome::Confirmed,
                Choice::Cancel => ConfirmOutcome::Cancelled,
            },
            ConfirmKey::Cancel => ConfirmOutcome::Cancelled,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_cancel() {
        let mut dialog = ConfirmDialog::new("Delete", "Really?");
        assert_eq!(dialog.choice(), Choice::Cancel);
        assert_eq!(dialog.handle(ConfirmKey::Apply), ConfirmOutcome::Cancelled);
    }

    #[test]
    fn test_toggle_then_apply() {
        let mut dialog = ConfirmDialog::new("Delete", "Really?");
        assert_eq!(dialog.handle(ConfirmKey::Toggle), ConfirmOutcome::Pending);
        assert_eq!(dialog.choice(), Choice::Confirm);
        assert_eq!(dialog.handle(ConfirmKey::Apply), ConfirmOutcome::Confirmed);

        dialog.handle(ConfirmKey::Toggle);
        assert_eq!(dialog.choice(), Choice::Cancel);
    }

    #[test]
    fn test_escape_always_cancels() {
        let mut dialog = ConfirmDialog::new("Delete", "Really?");
        dialog.handle(ConfirmKey::Toggle);
        assert_eq!(dialog.handle(ConfirmKey::Cancel), ConfirmOutcome::Cancelled);
    }
}
