//! User-facing notifications and confirmation prompts.
//!
//! The command layer talks to these traits instead of a concrete UI, so the
//! core is testable without a terminal.

/// A message for the user, by severity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Alert {
    /// An operation completed.
    Success(String),
    /// An operation was rejected or failed.
    Error(String),
    /// An operation completed with a caveat, e.g. a failed persistence
    /// write.
    Warning(String),
    /// Neutral information, e.g. first-run seeding.
    Info(String),
}

impl Alert {
    /// The message text, regardless of severity.
    pub fn message(&self) -> &str {
        match self {
            Alert::Success(message)
            | Alert::Error(message)
            | Alert::Warning(message)
            | Alert::Info(message) => message,
        }
    }
}

/// Receives alerts for display.
pub trait AlertSink {
    /// Show `alert` to the user.
    fn notify(&mut self, alert: Alert);
}

/// Asks the user to confirm a destructive action.
pub trait ConfirmationPrompt {
    /// Present `message` and return whether the user confirmed.
    fn confirm(&mut self, message: &str) -> bool;
}
